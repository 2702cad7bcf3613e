//! Structured JSON records stored by the character, outline, bible and
//! timeline editors.
//!
//! Parsing is lenient field by field: a value of the wrong JSON type is
//! treated as absent, and an array element that is not an object becomes an
//! empty record. Only a payload that is not a JSON array is rejected.

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        _ => String::new(),
    })
}

/// numbers and numeric strings; anything else orders as 0
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => text.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(values) => values.into_iter().map(record_or_default).collect(),
        _ => Vec::new(),
    })
}

fn lenient_color<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<TimelineColor>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(id) => TimelineColor::from_id(&id),
        _ => None,
    })
}

fn record_or_default<T: DeserializeOwned + Default>(value: Value) -> T {
    serde_json::from_value(value).unwrap_or_default()
}

/// Parses a section payload as an array of records.
///
/// Returns `None`, after logging, when the payload is not a JSON array.
pub fn parse_records<T: DeserializeOwned + Default>(section: &str, raw: &str) -> Option<Vec<T>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(values)) => Some(values.into_iter().map(record_or_default).collect()),
        Ok(_) => {
            warn!(section, "structured section is not a JSON array, rendering it empty");
            None
        }
        Err(err) => {
            warn!(section, error = %err, "structured section is not valid JSON, rendering it empty");
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CustomField {
    #[serde(deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(deserialize_with = "lenient_text")]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Character {
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub role: String,
    #[serde(deserialize_with = "lenient_text")]
    pub age_appearance: String,
    #[serde(deserialize_with = "lenient_text")]
    pub background: String,
    #[serde(deserialize_with = "lenient_text")]
    pub goal: String,
    #[serde(deserialize_with = "lenient_text")]
    pub conflict: String,
    #[serde(deserialize_with = "lenient_text")]
    pub arc: String,
    #[serde(deserialize_with = "lenient_text")]
    pub relationships: String,
    #[serde(deserialize_with = "lenient_text")]
    pub traits: String,
    #[serde(deserialize_with = "lenient_text")]
    pub quote: String,
    #[serde(deserialize_with = "lenient_text")]
    pub notes: String,
    #[serde(deserialize_with = "lenient_list")]
    pub custom_fields: Vec<CustomField>,
}

/// One unit of the story outline.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Beat {
    #[serde(deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(deserialize_with = "lenient_text")]
    pub container: String,
    #[serde(deserialize_with = "lenient_text")]
    pub summary: String,
    #[serde(deserialize_with = "lenient_text")]
    pub objective: String,
    #[serde(deserialize_with = "lenient_text")]
    pub obstacle: String,
    #[serde(deserialize_with = "lenient_text")]
    pub outcome: String,
    #[serde(deserialize_with = "lenient_text")]
    pub time_place: String,
    #[serde(deserialize_with = "lenient_text")]
    pub characters: String,
    #[serde(deserialize_with = "lenient_text")]
    pub links: String,
    #[serde(deserialize_with = "lenient_list")]
    pub custom_fields: Vec<CustomField>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BibleSection {
    #[serde(deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(deserialize_with = "lenient_text")]
    pub content: String,
}

/// Named colours of the timeline editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimelineColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    White,
    Black,
    Orange,
}

impl TimelineColor {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "red" => Some(TimelineColor::Red),
            "blue" => Some(TimelineColor::Blue),
            "green" => Some(TimelineColor::Green),
            "yellow" => Some(TimelineColor::Yellow),
            "purple" => Some(TimelineColor::Purple),
            "white" => Some(TimelineColor::White),
            "black" => Some(TimelineColor::Black),
            "orange" => Some(TimelineColor::Orange),
            _ => None,
        }
    }

    pub fn hex(self) -> u32 {
        match self {
            TimelineColor::Red => 0xff5252,
            TimelineColor::Blue => 0x4dabff,
            TimelineColor::Green => 0x4caf50,
            TimelineColor::Yellow => 0xffca28,
            TimelineColor::Purple => 0x9c27b0,
            TimelineColor::White => 0xe0e0e0,
            TimelineColor::Black => 0x424242,
            TimelineColor::Orange => 0xff9800,
        }
    }

    pub fn rgb(self) -> [f32; 3] {
        hex_to_rgb(self.hex())
    }
}

/// `0xRRGGBB` to PDF colour components
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0)]
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineEvent {
    #[serde(deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(deserialize_with = "lenient_text")]
    pub desc: String,
    #[serde(deserialize_with = "lenient_number")]
    pub ordering: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub stack_pos: f64,
    #[serde(deserialize_with = "lenient_color")]
    pub color_id: Option<TimelineColor>,
}

/// An event with its position in the chronology, e.g. `3` or `2.1`.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberedEvent {
    pub number: String,
    pub event: TimelineEvent,
}

/// Events sharing one `ordering` value.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineGroup {
    pub ordering: f64,
    pub events: Vec<NumberedEvent>,
}

/// Groups events by `ordering` in ascending order, sorts each group by
/// `stackPos` and numbers them: a lone event takes the group number, the
/// members of a larger group are numbered `group.position`.
///
/// Sorting is stable, so ties keep their array order.
pub fn number_events(mut events: Vec<TimelineEvent>) -> Vec<TimelineGroup> {
    events.sort_by(|a, b| {
        a.ordering
            .total_cmp(&b.ordering)
            .then(a.stack_pos.total_cmp(&b.stack_pos))
    });

    let mut groups: Vec<TimelineGroup> = Vec::new();
    for event in events {
        match groups.last_mut() {
            Some(group) if group.ordering == event.ordering => group.events.push(NumberedEvent {
                number: String::new(),
                event,
            }),
            _ => groups.push(TimelineGroup {
                ordering: event.ordering,
                events: vec![NumberedEvent {
                    number: String::new(),
                    event,
                }],
            }),
        }
    }

    for (index, group) in groups.iter_mut().enumerate() {
        let main = index + 1;
        let single = group.events.len() == 1;
        for (position, numbered) in group.events.iter_mut().enumerate() {
            numbered.number = if single {
                main.to_string()
            } else {
                format!("{main}.{}", position + 1)
            };
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_types_count_as_absent() {
        let raw = r#"[{"name": "Ada", "role": 3, "customFields": "oops"}, 7]"#;
        let characters: Vec<Character> = parse_records("personaggi", raw).unwrap();
        assert_eq!(characters.len(), 2);
        assert_eq!(characters[0].name, "Ada");
        assert_eq!(characters[0].role, "");
        assert!(characters[0].custom_fields.is_empty());
        assert_eq!(characters[1], Character::default());
    }

    #[test]
    fn non_arrays_are_rejected() {
        assert!(parse_records::<Beat>("scaletta", r#"{"title": "x"}"#).is_none());
        assert!(parse_records::<Beat>("scaletta", "[{").is_none());
        assert_eq!(parse_records::<Beat>("scaletta", "[]"), Some(Vec::new()));
    }

    #[test]
    fn timeline_fields() {
        let raw = r#"[{"title": "A", "ordering": "10", "stackPos": null, "colorId": "blue"},
                      {"ordering": 2.5, "colorId": "teal"}]"#;
        let events: Vec<TimelineEvent> = parse_records("timeline", raw).unwrap();
        assert_eq!(events[0].ordering, 10.0);
        assert_eq!(events[0].stack_pos, 0.0);
        assert_eq!(events[0].color_id, Some(TimelineColor::Blue));
        assert_eq!(events[1].color_id, None);
    }

    #[test]
    fn groups_are_numbered_hierarchically() {
        let event = |title: &str, ordering: f64, stack_pos: f64| TimelineEvent {
            title: title.to_string(),
            ordering,
            stack_pos,
            ..TimelineEvent::default()
        };
        let groups = number_events(vec![
            event("a", 0.0, 0.0),
            event("c", 10.0, 1.0),
            event("b", 10.0, 0.0),
            event("d", 20.0, 0.0),
        ]);

        let numbered: Vec<(&str, &str)> = groups
            .iter()
            .flat_map(|group| group.events.iter())
            .map(|numbered| (numbered.number.as_str(), numbered.event.title.as_str()))
            .collect();
        assert_eq!(numbered, vec![("1", "a"), ("2.1", "b"), ("2.2", "c"), ("3", "d")]);
        assert_eq!(groups.len(), 3);
    }

    #[test]
    fn palette_colours() {
        assert_eq!(TimelineColor::Red.hex(), 0xff5252);
        let [r, g, b] = TimelineColor::Black.rgb();
        assert!((r - 0x42 as f32 / 255.0).abs() < 1e-6);
        assert_eq!(r, g);
        assert_eq!(g, b);
    }
}
