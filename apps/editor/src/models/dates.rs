//! Date fields of résumé entries.
//!
//! Start dates are plain optional dates. End dates carry three states that the
//! editor depends on: a concrete date, an explicit "ended, date unspecified"
//! (`null` on the wire) and "ongoing" (key absent on the wire). The checkbox
//! "I currently work here" is driven entirely by the ongoing state, so the
//! three encodings must survive every hydrate/serialize round trip.
//!
//! Concrete dates are [`WireDate`]s: they remember the shape they were read
//! in and write it back unchanged.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

const WIRE_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_FORMAT: &str = "%m/%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Day,
    Month,
    Year,
    Timestamp {
        at: DateTime<FixedOffset>,
        seconds: SecondsFormat,
        use_z: bool,
    },
}

/// A calendar date plus the textual shape it arrived in.
///
/// Validation and display only look at [`WireDate::date`]. Dates built from a
/// `NaiveDate` serialize as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireDate {
    date: NaiveDate,
    shape: Shape,
}

impl WireDate {
    /// Parses the date shapes seen in stored résumés: `YYYY-MM-DD`, RFC 3339
    /// timestamps emitted by the date picker, `YYYY-MM` and bare `YYYY`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, WIRE_FORMAT) {
            return Some(WireDate { date, shape: Shape::Day });
        }
        if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
            let shape = Shape::Timestamp {
                at,
                seconds: seconds_format(raw),
                use_z: raw.ends_with('Z'),
            };
            return Some(WireDate { date: at.date_naive(), shape });
        }
        if let Ok(date) = NaiveDate::parse_from_str(&format!("{raw}-01"), WIRE_FORMAT) {
            return Some(WireDate { date, shape: Shape::Month });
        }
        if raw.len() == 4 && raw.chars().all(|c| c.is_ascii_digit()) {
            let date = NaiveDate::parse_from_str(&format!("{raw}-01-01"), WIRE_FORMAT).ok()?;
            return Some(WireDate { date, shape: Shape::Year });
        }
        None
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Fraction width of an RFC 3339 timestamp. Widths chrono cannot reproduce
/// fall back to its shortest exact form.
fn seconds_format(raw: &str) -> SecondsFormat {
    let fraction = raw
        .split_once('.')
        .map(|(_, rest)| rest.chars().take_while(char::is_ascii_digit).count())
        .unwrap_or(0);
    match fraction {
        0 => SecondsFormat::Secs,
        3 => SecondsFormat::Millis,
        6 => SecondsFormat::Micros,
        9 => SecondsFormat::Nanos,
        _ => SecondsFormat::AutoSi,
    }
}

impl From<NaiveDate> for WireDate {
    fn from(date: NaiveDate) -> Self {
        WireDate { date, shape: Shape::Day }
    }
}

impl fmt::Display for WireDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shape {
            Shape::Day => write!(f, "{}", self.date.format(WIRE_FORMAT)),
            Shape::Month => write!(f, "{}", self.date.format("%Y-%m")),
            Shape::Year => write!(f, "{}", self.date.format("%Y")),
            Shape::Timestamp { at, seconds, use_z } => f.write_str(&at.to_rfc3339_opts(seconds, use_z)),
        }
    }
}

impl Serialize for WireDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WireDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        WireDate::parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid date '{raw}'")))
    }
}

/// End date of a work experience, education or project entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndDate {
    /// Ended on a known date.
    Dated(WireDate),
    /// Ended, but no date was picked. Default for freshly appended items.
    EndedUnspecified,
    /// Still in progress. Encoded by omitting the key entirely.
    #[default]
    Ongoing,
}

impl EndDate {
    /// Used with `skip_serializing_if` so that ongoing entries omit the key.
    pub fn is_ongoing(&self) -> bool {
        matches!(self, EndDate::Ongoing)
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            EndDate::Dated(d) => Some(d.date()),
            _ => None,
        }
    }

    /// Applies the "currently working/studying" checkbox.
    pub fn from_currently_active(checked: bool) -> Self {
        if checked {
            EndDate::Ongoing
        } else {
            EndDate::EndedUnspecified
        }
    }
}

impl Serialize for EndDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EndDate::Dated(d) => serializer.collect_str(d),
            EndDate::EndedUnspecified | EndDate::Ongoing => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for EndDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Reached only when the key is present; absence is handled by `#[serde(default)]`.
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(EndDate::EndedUnspecified),
            Some(s) if s.trim().is_empty() => Ok(EndDate::EndedUnspecified),
            Some(s) => WireDate::parse(&s)
                .map(EndDate::Dated)
                .ok_or_else(|| D::Error::custom(format!("invalid end date '{s}'"))),
        }
    }
}

/// `MM/YYYY`, as printed on every template.
pub fn month_year(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

/// Label for a start/end pair, e.g. `01/2020 - Present`.
///
/// Ongoing prints "Present"; an ended entry without a date prints only the
/// start. Without a start date only a concrete end date is shown.
pub fn date_range_label(start: Option<NaiveDate>, end: EndDate) -> Option<String> {
    match (start, end.date()) {
        (Some(s), Some(e)) => Some(format!("{} - {}", month_year(s), month_year(e))),
        (Some(s), None) if end.is_ongoing() => Some(format!("{} - Present", month_year(s))),
        (Some(s), None) => Some(month_year(s)),
        (None, Some(e)) => Some(month_year(e)),
        (None, None) => None,
    }
}

/// serde adapter for optional start dates (`with = "crate::models::dates::start_date"`).
/// A blank string reads as no date.
pub mod start_date {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    use super::WireDate;

    pub fn serialize<S: Serializer>(value: &Option<WireDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.collect_str(d),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<WireDate>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => WireDate::parse(&s)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid start date '{s}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn parsed(raw: &str) -> Option<NaiveDate> {
        WireDate::parse(raw).map(|d| d.date())
    }

    #[test]
    fn test_parse_date_plain() {
        assert_eq!(parsed("2020-01-15"), Some(ymd(2020, 1, 15)));
    }

    #[test]
    fn test_parse_date_picker_timestamp() {
        assert_eq!(parsed("2021-03-01T00:00:00.000Z"), Some(ymd(2021, 3, 1)));
    }

    #[test]
    fn test_parse_date_month_and_year_only() {
        assert_eq!(parsed("2019-07"), Some(ymd(2019, 7, 1)));
        assert_eq!(parsed("2018"), Some(ymd(2018, 1, 1)));
    }

    #[test]
    fn test_parse_date_garbage() {
        assert_eq!(parsed("last spring"), None);
    }

    #[test]
    fn test_wire_shape_is_written_back() {
        for raw in [
            "2020-01-15",
            "2019-07",
            "2018",
            "2020-01-15T00:00:00.000Z",
            "2020-01-15T09:30:00Z",
            "2020-01-15T09:30:00.123456+02:00",
        ] {
            assert_eq!(WireDate::parse(raw).unwrap().to_string(), raw);
        }
    }

    #[test]
    fn test_naive_dates_write_day_shape() {
        assert_eq!(WireDate::from(ymd(2021, 2, 3)).to_string(), "2021-02-03");
    }

    #[test]
    fn test_end_date_compares_calendar_day() {
        let stamped = EndDate::Dated(WireDate::parse("2020-05-01T00:00:00.000Z").unwrap());
        assert_eq!(stamped.date(), Some(ymd(2020, 5, 1)));
    }

    #[test]
    fn test_date_range_ongoing_shows_present() {
        let label = date_range_label(Some(ymd(2020, 1, 1)), EndDate::Ongoing);
        assert_eq!(label.as_deref(), Some("01/2020 - Present"));
    }

    #[test]
    fn test_date_range_dated() {
        let label = date_range_label(Some(ymd(2020, 1, 1)), EndDate::Dated(ymd(2022, 6, 30).into()));
        assert_eq!(label.as_deref(), Some("01/2020 - 06/2022"));
    }

    #[test]
    fn test_date_range_ended_unspecified_is_not_present() {
        let label = date_range_label(Some(ymd(2020, 1, 1)), EndDate::EndedUnspecified);
        assert_eq!(label.as_deref(), Some("01/2020"));
    }

    #[test]
    fn test_date_range_without_start() {
        assert_eq!(date_range_label(None, EndDate::Ongoing), None);
        assert_eq!(date_range_label(None, EndDate::EndedUnspecified), None);
    }

    #[test]
    fn test_currently_active_checkbox_states() {
        assert_eq!(EndDate::from_currently_active(true), EndDate::Ongoing);
        assert_eq!(EndDate::from_currently_active(false), EndDate::EndedUnspecified);
        assert_ne!(EndDate::from_currently_active(true), EndDate::from_currently_active(false));
    }
}
