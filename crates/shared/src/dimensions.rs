use crate::slots::SlotName;

/// A reportable grouping axis and the slot that carries its drill-down filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimension {
    pub name: &'static str,
    pub column: &'static str,
    pub slot: SlotName,
    pub singular: Option<&'static str>,
}

impl Dimension {
    pub const fn new(
        name: &'static str,
        column: &'static str,
        slot: SlotName,
        singular: &'static str,
    ) -> Self {
        Self {
            name,
            column,
            slot,
            singular: Some(singular),
        }
    }

    pub fn singular_label(&self) -> &'static str {
        self.singular.unwrap_or(self.name)
    }
}

const STANDARD_DIMENSIONS: [Dimension; 6] = [
    Dimension::new("events", "e.event_name", SlotName::EventName, "event"),
    Dimension::new("months", "d.month", SlotName::EventMonth, "month"),
    Dimension::new("venues", "v.venue_name", SlotName::VenueName, "venue"),
    Dimension::new("cities", "v.venue_city", SlotName::VenueCity, "city"),
    Dimension::new("states", "v.venue_state", SlotName::VenueState, "state"),
    Dimension::new("categories", "c.cat_desc", SlotName::CatDesc, "category"),
];

/// Ordered dimension table. Iteration order drives WHERE-clause order,
/// filter descriptions and the clarification prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionRegistry {
    dimensions: Vec<Dimension>,
}

impl DimensionRegistry {
    pub fn new(dimensions: Vec<Dimension>) -> Self {
        Self { dimensions }
    }

    pub fn standard() -> Self {
        Self::new(STANDARD_DIMENSIONS.to_vec())
    }

    pub fn get(&self, name: &str) -> Option<&Dimension> {
        let name = name.trim();
        self.dimensions
            .iter()
            .find(|dimension| dimension.name.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dimension> {
        self.dimensions.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.dimensions.iter().map(|dimension| dimension.name)
    }

    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }
}

impl Default for DimensionRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
