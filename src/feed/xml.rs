use crate::feed::{assemble, CityEntry, FeedError, NumericField, RecordFields};
use crate::types::observation::WeatherFeed;
use xmltree::{Element, XMLNode};

const ROOT: &str = "WeatherData";
const CITY: &str = "City";
const RECORD: &str = "record";

/// Parses an XML feed.
///
/// The document element must be `<WeatherData>`. Each `<City>` carries its name
/// in a `name` attribute (a `<name>` child is accepted as well) and holds any
/// number of `<record>` elements with `time`, `temperature`, `pressure` and
/// `humidity` children.
pub fn parse_xml(text: &str) -> Result<WeatherFeed, FeedError> {
    let root = Element::parse(text.as_bytes())?;
    if root.name != ROOT {
        return Err(FeedError::MissingRoot);
    }

    let entries = child_elements(&root, CITY)
        .map(|city| CityEntry {
            name: city_name(city),
            records: child_elements(city, RECORD)
                .map(|record| Some(record_fields(record)))
                .collect(),
        })
        .collect();

    assemble(entries)
}

fn child_elements<'a>(parent: &'a Element, name: &'a str) -> impl Iterator<Item = &'a Element> {
    parent.children.iter().filter_map(move |node| match node {
        XMLNode::Element(element) if element.name == name => Some(element),
        _ => None,
    })
}

fn city_name(city: &Element) -> Option<String> {
    city.attributes
        .get("name")
        .cloned()
        .or_else(|| child_text(city, "name"))
}

fn child_text(parent: &Element, name: &str) -> Option<String> {
    parent
        .get_child(name)
        .and_then(|child| child.get_text())
        .map(|text| text.into_owned())
}

fn record_fields(record: &Element) -> RecordFields {
    let numeric = |name: &str| child_text(record, name).map(NumericField::Text);
    RecordFields {
        time: child_text(record, "time"),
        temperature: numeric("temperature"),
        pressure: numeric("pressure"),
        humidity: numeric("humidity"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::SkipReason;

    const TWO_CITIES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<WeatherData>
  <City name="Austin">
    <record>
      <time>2024-01-01 05:00:00</time>
      <temperature>10</temperature>
      <pressure>1015.2</pressure>
      <humidity>60</humidity>
    </record>
    <record>
      <time>2024-01-02 05:00:00</time>
      <temperature>20</temperature>
      <pressure>1013.8</pressure>
      <humidity>70</humidity>
    </record>
  </City>
  <City name="Denver">
    <record>
      <time>2024-01-01T18:00:00</time>
      <temperature>-2.5</temperature>
      <pressure>840</pressure>
      <humidity>30</humidity>
    </record>
  </City>
</WeatherData>"#;

    #[test]
    fn test_parse_multiple_cities() {
        let feed = parse_xml(TWO_CITIES).unwrap();
        assert_eq!(feed.city_names().collect::<Vec<_>>(), vec!["Austin", "Denver"]);

        let austin = feed.city("Austin").unwrap();
        assert_eq!(austin.len(), 2);
        assert_eq!(austin.observations[0].timestamp, "2024-01-01 05:00:00");
        assert_eq!(austin.observations[1].temperature, 20.0);
        assert_eq!(austin.observations[1].pressure, 1013.8);

        let denver = feed.city("Denver").unwrap();
        assert_eq!(denver.observations[0].temperature, -2.5);
        assert!(feed.skipped.is_empty());
    }

    #[test]
    fn test_single_record_without_wrapper() {
        let feed = parse_xml(
            r#"<WeatherData><City name="Lima"><record>
                 <time>2024-01-01 12:00:00</time><temperature>22</temperature>
                 <pressure>1009</pressure><humidity>80</humidity>
               </record></City></WeatherData>"#,
        )
        .unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed.city("Lima").unwrap().len(), 1);
    }

    #[test]
    fn test_name_child_fallback() {
        let feed = parse_xml(
            "<WeatherData><City><name>Quito</name></City></WeatherData>",
        )
        .unwrap();
        assert!(feed.city("Quito").unwrap().is_empty());
    }

    #[test]
    fn test_non_numeric_record_skipped() {
        let feed = parse_xml(
            r#"<WeatherData><City name="Austin">
                 <record><time>2024-01-01 01:00:00</time><temperature>N/A</temperature>
                   <pressure>1000</pressure><humidity>50</humidity></record>
                 <record><time>2024-01-01 02:00:00</time><temperature>5</temperature>
                   <pressure>1000</pressure></record>
                 <record><time>2024-01-01 03:00:00</time><temperature>7</temperature>
                   <pressure>1001</pressure><humidity>51</humidity></record>
               </City></WeatherData>"#,
        )
        .unwrap();

        let austin = feed.city("Austin").unwrap();
        assert_eq!(austin.len(), 1);
        assert_eq!(austin.observations[0].temperature, 7.0);

        assert_eq!(feed.skipped.len(), 2);
        assert!(matches!(
            feed.skipped[0].reason,
            SkipReason::NotNumeric { field: "temperature", .. }
        ));
        assert_eq!(feed.skipped[1].reason, SkipReason::MissingField("humidity"));
    }

    #[test]
    fn test_missing_root() {
        let err = parse_xml(r#"<Forecast><City name="Austin"/></Forecast>"#).unwrap_err();
        assert!(matches!(err, FeedError::MissingRoot));
        assert_eq!(err.kind(), "missing-root");
    }

    #[test]
    fn test_missing_cities() {
        let err = parse_xml("<WeatherData><Town name=\"x\"/></WeatherData>").unwrap_err();
        assert_eq!(err.kind(), "missing-cities");
    }

    #[test]
    fn test_malformed_xml() {
        let err = parse_xml("<WeatherData><City name=\"Austin\">").unwrap_err();
        assert_eq!(err.kind(), "malformed-xml");
    }
}
