//! Parsing of weather-observation feeds.
//!
//! A feed arrives either as XML
//! (`<WeatherData><City name=".."><record>..</record></City></WeatherData>`) or as
//! JSON (`{"cities": [{"name": "..", "records": [..]}]}`). Both formats may omit
//! the array wrapper around a single city or record; that shape is normalized
//! here so callers only ever see vectors.
//!
//! Records whose metrics cannot be read as finite numbers are dropped one by one
//! and reported in [`WeatherFeed::skipped`]. Structural problems fail the whole
//! feed with a [`FeedError`].

pub mod error;
mod json;
mod xml;

pub use error::{FeedError, SkipReason};
pub use json::{parse_json, parse_json_value};
pub use xml::parse_xml;

use crate::types::observation::{CitySeries, RawObservation, WeatherFeed};
use log::{debug, warn};
use serde::Serialize;
use std::collections::HashSet;

/// A feed document as delivered by a [`crate::FeedSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawFeed {
    Xml(String),
    Json(String),
}

impl RawFeed {
    /// Classifies a document by its first non-whitespace character.
    ///
    /// ```
    /// use weather_profiles::RawFeed;
    ///
    /// assert!(matches!(RawFeed::detect("  <WeatherData/>"), RawFeed::Xml(_)));
    /// assert!(matches!(RawFeed::detect(r#"{"cities": []}"#), RawFeed::Json(_)));
    /// ```
    pub fn detect(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.trim_start().starts_with('<') {
            RawFeed::Xml(text)
        } else {
            RawFeed::Json(text)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RawFeed::Xml(text) | RawFeed::Json(text) => text,
        }
    }
}

/// A record that was left out of its city's series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRecord {
    pub city: String,
    /// Position of the record within its city entry.
    pub index: usize,
    #[serde(serialize_with = "serialize_reason")]
    pub reason: SkipReason,
}

fn serialize_reason<S: serde::Serializer>(reason: &SkipReason, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(reason)
}

/// Parses a feed in whichever format it was delivered.
///
/// # Errors
///
/// See [`FeedError`]. `FeedError::kind()` gives the short tag, e.g.
/// `"missing-root"`.
///
/// # Examples
///
/// ```
/// use weather_profiles::{parse_feed, RawFeed};
///
/// let raw = RawFeed::detect(
///     r#"<WeatherData>
///          <City name="Austin">
///            <record>
///              <time>2024-01-01 05:00:00</time>
///              <temperature>10</temperature>
///              <pressure>1012.5</pressure>
///              <humidity>40</humidity>
///            </record>
///          </City>
///        </WeatherData>"#,
/// );
/// let feed = parse_feed(&raw).unwrap();
/// assert_eq!(feed.city("Austin").unwrap().observations[0].temperature, 10.0);
/// ```
pub fn parse_feed(raw: &RawFeed) -> Result<WeatherFeed, FeedError> {
    match raw {
        RawFeed::Xml(text) => parse_xml(text),
        RawFeed::Json(text) => parse_json(text),
    }
}

/// The metric fields of one record, before coercion.
///
/// Both adapters reduce their records to this shape so that coercion and skip
/// accounting happen in one place.
pub(crate) struct RecordFields {
    pub time: Option<String>,
    pub temperature: Option<NumericField>,
    pub pressure: Option<NumericField>,
    pub humidity: Option<NumericField>,
}

/// A metric as found in the feed.
pub(crate) enum NumericField {
    Number(f64),
    Text(String),
    /// Present but of a type that can never be a number.
    Invalid(String),
}

/// A city entry before coercion; `None` records are entries that are not records.
pub(crate) struct CityEntry {
    pub name: Option<String>,
    pub records: Vec<Option<RecordFields>>,
}

/// Turns the adapter output into a [`WeatherFeed`], applying the skip rule and
/// the uniqueness check on city names.
pub(crate) fn assemble(entries: Vec<CityEntry>) -> Result<WeatherFeed, FeedError> {
    if entries.is_empty() {
        return Err(FeedError::MissingCities);
    }

    let mut seen = HashSet::with_capacity(entries.len());
    let mut feed = WeatherFeed::default();

    for (city_index, entry) in entries.into_iter().enumerate() {
        let name = entry
            .name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .ok_or(FeedError::MissingCityName { index: city_index })?;
        if !seen.insert(name.clone()) {
            return Err(FeedError::DuplicateCity(name));
        }

        let mut observations = Vec::with_capacity(entry.records.len());
        for (index, record) in entry.records.into_iter().enumerate() {
            match record.ok_or(SkipReason::NotARecord).and_then(coerce_record) {
                Ok(observation) => observations.push(observation),
                Err(reason) => {
                    warn!("Skipping record #{} of city '{}': {}", index, name, reason);
                    feed.skipped.push(SkippedRecord {
                        city: name.clone(),
                        index,
                        reason,
                    });
                }
            }
        }
        feed.cities.push(CitySeries::new(name, observations));
    }

    debug!(
        "Parsed feed with {} cities, {} observations, {} skipped records",
        feed.len(),
        feed.observation_count(),
        feed.skipped.len()
    );
    Ok(feed)
}

fn coerce_record(fields: RecordFields) -> Result<RawObservation, SkipReason> {
    let timestamp = fields
        .time
        .map(|time| time.trim().to_string())
        .filter(|time| !time.is_empty())
        .ok_or(SkipReason::MissingField("time"))?;

    Ok(RawObservation {
        timestamp,
        temperature: coerce_number("temperature", fields.temperature)?,
        pressure: coerce_number("pressure", fields.pressure)?,
        humidity: coerce_number("humidity", fields.humidity)?,
    })
}

fn coerce_number(field: &'static str, value: Option<NumericField>) -> Result<f64, SkipReason> {
    let number = match value.ok_or(SkipReason::MissingField(field))? {
        NumericField::Number(number) => number,
        NumericField::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(SkipReason::MissingField(field));
            }
            trimmed
                .parse::<f64>()
                .map_err(|_| SkipReason::NotNumeric { field, value: text })?
        }
        NumericField::Invalid(value) => return Err(SkipReason::NotNumeric { field, value }),
    };
    if !number.is_finite() {
        return Err(SkipReason::NonFinite(field));
    }
    Ok(number)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(time: &str, temperature: NumericField) -> RecordFields {
        RecordFields {
            time: Some(time.to_string()),
            temperature: Some(temperature),
            pressure: Some(NumericField::Number(1010.0)),
            humidity: Some(NumericField::Text(" 55.5 ".to_string())),
        }
    }

    #[test]
    fn test_coerce_number_variants() {
        assert_eq!(coerce_number("t", Some(NumericField::Number(1.5))), Ok(1.5));
        assert_eq!(
            coerce_number("t", Some(NumericField::Text("-3.25".into()))),
            Ok(-3.25)
        );
        assert_eq!(coerce_number("t", None), Err(SkipReason::MissingField("t")));
        assert_eq!(
            coerce_number("t", Some(NumericField::Text("  ".into()))),
            Err(SkipReason::MissingField("t"))
        );
        assert_eq!(
            coerce_number("t", Some(NumericField::Text("N/A".into()))),
            Err(SkipReason::NotNumeric {
                field: "t",
                value: "N/A".into()
            })
        );
        assert_eq!(
            coerce_number("t", Some(NumericField::Text("NaN".into()))),
            Err(SkipReason::NonFinite("t"))
        );
        assert_eq!(
            coerce_number("t", Some(NumericField::Text("inf".into()))),
            Err(SkipReason::NonFinite("t"))
        );
        assert!(matches!(
            coerce_number("t", Some(NumericField::Invalid("true".into()))),
            Err(SkipReason::NotNumeric { .. })
        ));
    }

    #[test]
    fn test_assemble_counts_skips() {
        let entries = vec![CityEntry {
            name: Some("Austin".to_string()),
            records: vec![
                Some(fields("2024-01-01 05:00:00", NumericField::Number(10.0))),
                Some(fields("2024-01-01 06:00:00", NumericField::Text("N/A".into()))),
                None,
                Some(fields("2024-01-01 07:00:00", NumericField::Text("12".into()))),
            ],
        }];

        let feed = assemble(entries).unwrap();
        let austin = feed.city("Austin").unwrap();
        assert_eq!(austin.len(), 2);
        assert_eq!(austin.observations[1].temperature, 12.0);
        assert_eq!(austin.observations[1].humidity, 55.5);

        assert_eq!(feed.skipped.len(), 2);
        assert_eq!(feed.skipped[0].index, 1);
        assert_eq!(feed.skipped[1].index, 2);
        assert_eq!(feed.skipped[1].reason, SkipReason::NotARecord);
    }

    #[test]
    fn test_assemble_rejects_structural_problems() {
        assert!(matches!(assemble(vec![]), Err(FeedError::MissingCities)));

        let unnamed = vec![CityEntry {
            name: Some("  ".to_string()),
            records: vec![],
        }];
        assert!(matches!(
            assemble(unnamed),
            Err(FeedError::MissingCityName { index: 0 })
        ));

        let duplicated = vec![
            CityEntry {
                name: Some("Oslo".to_string()),
                records: vec![],
            },
            CityEntry {
                name: Some("Oslo".to_string()),
                records: vec![],
            },
        ];
        let err = assemble(duplicated).unwrap_err();
        assert_eq!(err.kind(), "duplicate-city");
    }

    #[test]
    fn test_missing_time_is_skipped() {
        let mut record = fields("", NumericField::Number(1.0));
        record.time = Some("   ".to_string());
        assert_eq!(
            coerce_record(record).unwrap_err(),
            SkipReason::MissingField("time")
        );
    }

    #[test]
    fn test_detect() {
        assert!(matches!(RawFeed::detect("\n<?xml version=\"1.0\"?>"), RawFeed::Xml(_)));
        assert!(matches!(RawFeed::detect("{}"), RawFeed::Json(_)));
        assert_eq!(RawFeed::detect("{}").as_str(), "{}");
    }
}
