use crate::feed::{assemble, CityEntry, FeedError, NumericField, RecordFields};
use crate::types::observation::WeatherFeed;
use serde::Deserialize;
use serde_json::Value;

const ROOT: &str = "cities";

/// Either a bare value or an array of them.
///
/// `Many` is tried first: a struct would otherwise happily deserialize from a
/// short array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonCity {
    /// Kept loose so a non-string name reports as a missing name.
    name: Option<Value>,
    #[serde(default)]
    records: Option<OneOrMany<Value>>,
}

/// Parses a JSON feed from text.
///
/// The document is an object whose `cities` entry holds one city object or an
/// array of them. Each city has a `name` and `records`; a record has `time`,
/// `temperature`, `pressure` and `humidity`, where the metrics may be numbers
/// or numeric strings.
pub fn parse_json(text: &str) -> Result<WeatherFeed, FeedError> {
    let value: Value = serde_json::from_str(text)?;
    parse_json_value(&value)
}

/// Parses an already deserialized JSON feed.
pub fn parse_json_value(value: &Value) -> Result<WeatherFeed, FeedError> {
    let cities = match value.get(ROOT) {
        None | Some(Value::Null) => return Err(FeedError::MissingRoot),
        Some(cities) => cities,
    };

    let cities = OneOrMany::<JsonCity>::deserialize(cities)?.into_vec();
    let entries = cities
        .into_iter()
        .map(|city| CityEntry {
            name: match city.name {
                Some(Value::String(name)) => Some(name),
                _ => None,
            },
            records: city
                .records
                .map(OneOrMany::into_vec)
                .unwrap_or_default()
                .iter()
                .map(record_fields)
                .collect(),
        })
        .collect();

    assemble(entries)
}

fn record_fields(record: &Value) -> Option<RecordFields> {
    let record = record.as_object()?;
    let numeric = |name: &str| record.get(name).and_then(numeric_field);
    Some(RecordFields {
        time: record.get("time").and_then(Value::as_str).map(str::to_string),
        temperature: numeric("temperature"),
        pressure: numeric("pressure"),
        humidity: numeric("humidity"),
    })
}

fn numeric_field(value: &Value) -> Option<NumericField> {
    match value {
        Value::Null => None,
        Value::Number(number) => Some(
            number
                .as_f64()
                .map(NumericField::Number)
                .unwrap_or_else(|| NumericField::Invalid(number.to_string())),
        ),
        Value::String(text) => Some(NumericField::Text(text.clone())),
        other => Some(NumericField::Invalid(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::SkipReason;
    use serde_json::json;

    #[test]
    fn test_parse_cities_array() {
        let feed = parse_json_value(&json!({
            "cities": [
                {
                    "name": "Austin",
                    "records": [
                        {"time": "2024-01-01 05:00:00", "temperature": 10, "pressure": 1015.2, "humidity": 60},
                        {"time": "2024-01-02 05:00:00", "temperature": "20", "pressure": "1013.8", "humidity": "70"}
                    ]
                },
                {
                    "name": "Denver",
                    "records": [
                        {"time": "2024-01-01T18:00:00Z", "temperature": -2.5, "pressure": 840, "humidity": 30}
                    ]
                }
            ]
        }))
        .unwrap();

        assert_eq!(feed.city_names().collect::<Vec<_>>(), vec!["Austin", "Denver"]);
        let austin = feed.city("Austin").unwrap();
        assert_eq!(austin.observations[0].temperature, 10.0);
        assert_eq!(austin.observations[1].temperature, 20.0);
        assert_eq!(austin.observations[1].humidity, 70.0);
        assert_eq!(feed.city("Denver").unwrap().observations[0].timestamp, "2024-01-01T18:00:00Z");
    }

    #[test]
    fn test_single_city_and_record_without_wrapper() {
        let record = json!({"time": "2024-01-01 05:00:00", "temperature": 10, "pressure": 1000, "humidity": 50});
        let bare = parse_json_value(&json!({
            "cities": {"name": "Austin", "records": record.clone()}
        }))
        .unwrap();
        let wrapped = parse_json_value(&json!({
            "cities": [{"name": "Austin", "records": [record]}]
        }))
        .unwrap();

        assert_eq!(bare, wrapped);
        assert_eq!(bare.city("Austin").unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_records_are_skipped() {
        let feed = parse_json_value(&json!({
            "cities": [{
                "name": "Austin",
                "records": [
                    {"time": "2024-01-01 05:00:00", "temperature": "N/A", "pressure": 1000, "humidity": 50},
                    {"time": "2024-01-01 06:00:00", "temperature": 11, "pressure": null, "humidity": 50},
                    "garbage",
                    {"time": 1704085200, "temperature": 11, "pressure": 1000, "humidity": 50},
                    {"time": "2024-01-01 07:00:00", "temperature": true, "pressure": 1000, "humidity": 50},
                    {"time": "2024-01-01 08:00:00", "temperature": 12, "pressure": 1001, "humidity": 52}
                ]
            }]
        }))
        .unwrap();

        let austin = feed.city("Austin").unwrap();
        assert_eq!(austin.len(), 1);
        assert_eq!(austin.observations[0].temperature, 12.0);

        let reasons: Vec<&SkipReason> = feed.skipped.iter().map(|s| &s.reason).collect();
        assert_eq!(reasons.len(), 5);
        assert!(matches!(reasons[0], SkipReason::NotNumeric { field: "temperature", .. }));
        assert_eq!(*reasons[1], SkipReason::MissingField("pressure"));
        assert_eq!(*reasons[2], SkipReason::NotARecord);
        assert_eq!(*reasons[3], SkipReason::MissingField("time"));
        assert!(matches!(reasons[4], SkipReason::NotNumeric { field: "temperature", .. }));
    }

    #[test]
    fn test_city_without_records_is_empty() {
        let feed = parse_json(r#"{"cities": [{"name": "Lima"}]}"#).unwrap();
        assert!(feed.city("Lima").unwrap().is_empty());
    }

    #[test]
    fn test_structural_errors() {
        assert_eq!(parse_json("{}").unwrap_err().kind(), "missing-root");
        assert_eq!(parse_json(r#"{"cities": null}"#).unwrap_err().kind(), "missing-root");
        assert_eq!(parse_json("[1, 2]").unwrap_err().kind(), "missing-root");
        assert_eq!(parse_json(r#"{"cities": []}"#).unwrap_err().kind(), "missing-cities");
        assert_eq!(
            parse_json(r#"{"cities": [{"records": []}]}"#).unwrap_err().kind(),
            "missing-city-name"
        );
        assert!(matches!(
            parse_json(r#"{"cities": [{"name": "Lima"}, {"name": 42}]}"#),
            Err(FeedError::MissingCityName { index: 1 })
        ));
        assert_eq!(
            parse_json(r#"{"cities": {"name": ["Lima"], "records": []}}"#)
                .unwrap_err()
                .kind(),
            "missing-city-name"
        );
        assert_eq!(
            parse_json(r#"{"cities": [{"name": "A"}, {"name": "A"}]}"#)
                .unwrap_err()
                .kind(),
            "duplicate-city"
        );
        assert_eq!(parse_json("{\"cities\": [").unwrap_err().kind(), "malformed-json");
    }
}
