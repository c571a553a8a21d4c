use tracing::debug;

use crate::slots::SlotName;

const MONTH_ABBREVIATION_CHARS: usize = 3;

/// Two-letter postal codes paired with their display names.
const US_STATES: &[(&str, &str)] = &[
    ("AK", "Alaska"),
    ("AL", "Alabama"),
    ("AR", "Arkansas"),
    ("AS", "American Samoa"),
    ("AZ", "Arizona"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DC", "District of Columbia"),
    ("DE", "Delaware"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("GU", "Guam"),
    ("HI", "Hawaii"),
    ("IA", "Iowa"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("MA", "Massachusetts"),
    ("MD", "Maryland"),
    ("ME", "Maine"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MO", "Missouri"),
    ("MS", "Mississippi"),
    ("MT", "Montana"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("NE", "Nebraska"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NV", "Nevada"),
    ("NY", "New York"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("PR", "Puerto Rico"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VA", "Virginia"),
    ("VI", "Virgin Islands"),
    ("VT", "Vermont"),
    ("WA", "Washington"),
    ("WI", "Wisconsin"),
    ("WV", "West Virginia"),
    ("WY", "Wyoming"),
];

const MONTH_NAMES: &[(&str, &str)] = &[
    ("JAN", "January"),
    ("FEB", "February"),
    ("MAR", "March"),
    ("APR", "April"),
    ("MAY", "May"),
    ("JUN", "June"),
    ("JUL", "July"),
    ("AUG", "August"),
    ("SEP", "September"),
    ("OCT", "October"),
    ("NOV", "November"),
    ("DEC", "December"),
];

const VENUE_NAME_SUBSTITUTIONS: &[(&str, &str)] =
    &[("theater", "theatre"), ("u. s.", "us"), ("u.s.", "us")];

/// Canonicalizes a slot value before it is embedded in a SQL literal.
pub fn normalize_query_value(slot: SlotName, value: &str) -> String {
    let shaped: String = match slot {
        SlotName::EventMonth => value.chars().take(MONTH_ABBREVIATION_CHARS).collect(),
        SlotName::VenueName => VENUE_NAME_SUBSTITUTIONS.iter().fold(
            value.to_lowercase(),
            |venue, &(from, to)| venue.replace(from, to),
        ),
        SlotName::VenueState => state_code(value)
            .map(ToString::to_string)
            .unwrap_or_else(|| value.to_string()),
        _ => value.to_string(),
    };
    // Escaping runs last so no truncation can split a doubled quote.
    let normalized = shaped.replace('\'', "''");

    debug!(
        slot = slot.as_str(),
        value,
        normalized = normalized.as_str(),
        "normalized query value"
    );
    normalized
}

/// Canonicalizes a value as it is read from intent recognition.
pub fn normalize_slot_value(slot: SlotName, value: &str) -> String {
    match slot {
        SlotName::VenueState => state_code(value)
            .map(ToString::to_string)
            .unwrap_or_else(|| value.to_string()),
        _ => value.to_string(),
    }
}

/// Turns a raw result cell into display text for the reported dimension.
pub fn render_dimension_output(dimension: &str, value: &str) -> String {
    match dimension {
        "states" => state_name(value),
        "months" => month_name(value),
        _ => value.to_string(),
    }
}

pub fn state_code(name: &str) -> Option<&'static str> {
    US_STATES
        .iter()
        .find(|(_, state)| state.eq_ignore_ascii_case(name))
        .map(|(code, _)| *code)
}

pub fn state_name(value: &str) -> String {
    US_STATES
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(value))
        .map(|(_, state)| (*state).to_string())
        .unwrap_or_else(|| title_case(value))
}

pub fn month_name(value: &str) -> String {
    let abbreviation = value
        .to_uppercase()
        .chars()
        .take(MONTH_ABBREVIATION_CHARS)
        .collect::<String>();

    MONTH_NAMES
        .iter()
        .find(|(code, _)| *code == abbreviation)
        .map(|(_, month)| (*month).to_string())
        .unwrap_or_else(|| title_case(value))
}

pub fn venue_display_name(value: &str) -> String {
    title_case(value).replace("Us ", "US ")
}

/// Upper-cases the first letter of every run of letters and lower-cases the rest.
pub fn title_case(value: &str) -> String {
    let mut titled = String::with_capacity(value.len());
    let mut previous_is_letter = false;

    for c in value.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                titled.extend(c.to_lowercase());
            } else {
                titled.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            titled.push(c);
            previous_is_letter = false;
        }
    }

    titled
}

#[derive(Debug, Clone, Copy)]
pub struct SlotFormatter {
    pub template: &'static str,
    pub transform: fn(&str) -> String,
}

impl SlotFormatter {
    /// Phrase used mid-sentence, e.g. "in the state of California".
    pub fn describe(&self, value: &str) -> String {
        self.template
            .to_lowercase()
            .replacen("{}", &(self.transform)(value), 1)
    }
}

pub fn slot_formatter(slot: SlotName) -> Option<SlotFormatter> {
    let (template, transform): (&'static str, fn(&str) -> String) = match slot {
        SlotName::EventName => ("For {}", title_case),
        SlotName::EventMonth => ("In the month of {}", month_name),
        SlotName::VenueName => ("At {}", venue_display_name),
        SlotName::VenueCity => ("In the city of {}", title_case),
        SlotName::VenueState => ("In the state of {}", state_name),
        SlotName::CatDesc => ("For {}", title_case),
        SlotName::Dimension | SlotName::Count => return None,
    };

    Some(SlotFormatter {
        template,
        transform,
    })
}
