use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotName {
    Dimension,
    Count,
    EventName,
    EventMonth,
    VenueName,
    VenueCity,
    VenueState,
    CatDesc,
}

impl SlotName {
    pub const ALL: [SlotName; 8] = [
        Self::Dimension,
        Self::Count,
        Self::EventName,
        Self::EventMonth,
        Self::VenueName,
        Self::VenueCity,
        Self::VenueState,
        Self::CatDesc,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dimension => "dimension",
            Self::Count => "count",
            Self::EventName => "event_name",
            Self::EventMonth => "event_month",
            Self::VenueName => "venue_name",
            Self::VenueCity => "venue_city",
            Self::VenueState => "venue_state",
            Self::CatDesc => "cat_desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.as_str() == value)
    }
}

/// One optional value per known slot. Serialized with every key present so
/// the remembered snapshot always lists the full slot set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotValues {
    pub dimension: Option<String>,
    pub count: Option<String>,
    pub event_name: Option<String>,
    pub event_month: Option<String>,
    pub venue_name: Option<String>,
    pub venue_city: Option<String>,
    pub venue_state: Option<String>,
    pub cat_desc: Option<String>,
}

impl SlotValues {
    pub fn get(&self, slot: SlotName) -> Option<&str> {
        self.value(slot).as_deref()
    }

    pub fn set(&mut self, slot: SlotName, value: Option<String>) {
        *self.value_mut(slot) = value;
    }

    pub fn with(mut self, slot: SlotName, value: impl Into<String>) -> Self {
        self.set(slot, Some(value.into()));
        self
    }

    fn value(&self, slot: SlotName) -> &Option<String> {
        match slot {
            SlotName::Dimension => &self.dimension,
            SlotName::Count => &self.count,
            SlotName::EventName => &self.event_name,
            SlotName::EventMonth => &self.event_month,
            SlotName::VenueName => &self.venue_name,
            SlotName::VenueCity => &self.venue_city,
            SlotName::VenueState => &self.venue_state,
            SlotName::CatDesc => &self.cat_desc,
        }
    }

    fn value_mut(&mut self, slot: SlotName) -> &mut Option<String> {
        match slot {
            SlotName::Dimension => &mut self.dimension,
            SlotName::Count => &mut self.count,
            SlotName::EventName => &mut self.event_name,
            SlotName::EventMonth => &mut self.event_month,
            SlotName::VenueName => &mut self.venue_name,
            SlotName::VenueCity => &mut self.venue_city,
            SlotName::VenueState => &mut self.venue_state,
            SlotName::CatDesc => &mut self.cat_desc,
        }
    }
}
