use std::sync::OnceLock;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use juniper::graphql_object;
use regex::Regex;

use crate::parse::remove_excess_whitespace::remove_all_whitespace;

/// One opening window of a restaurant. Both times are `None` when the restaurant is closed
/// (or the page has no hours) on `date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Availability {
    date: NaiveDate,
    opens_at: Option<NaiveDateTime>,
    closes_at: Option<NaiveDateTime>,
}

#[graphql_object]
impl Availability {
    pub fn date(&self) -> NaiveDate {
        self.date
    }
    pub fn opens_at(&self) -> Option<NaiveDateTime> {
        self.opens_at
    }
    /// May fall on the day after `date` for windows that run past midnight.
    pub fn closes_at(&self) -> Option<NaiveDateTime> {
        self.closes_at
    }
    pub fn is_closed(&self) -> bool {
        self.opens_at.is_none() && self.closes_at.is_none()
    }
}

impl Availability {
    pub const fn closed(date: NaiveDate) -> Self {
        Self {
            date,
            opens_at: None,
            closes_at: None,
        }
    }

    /// Moves `closes_at` to the next day if it is not after `opens_at`.
    pub fn open(date: NaiveDate, opens: NaiveTime, closes: NaiveTime) -> Self {
        let opens_at = date.and_time(opens);
        let mut closes_at = date.and_time(closes);
        if closes_at <= opens_at {
            closes_at += Duration::days(1);
        }
        Self {
            date,
            opens_at: Some(opens_at),
            closes_at: Some(closes_at),
        }
    }

    /// Reads the text of a time cell. Each comma, newline or `<br>` separated segment becomes
    /// one availability; a cell without any text means there is no data for the day.
    pub fn from_cell_text<'t>(
        fragments: impl IntoIterator<Item = &'t str>,
        date: NaiveDate,
    ) -> Result<Vec<Self>, String> {
        static SEGMENT_SEPARATOR: OnceLock<Regex> = OnceLock::new();
        let separator =
            SEGMENT_SEPARATOR.get_or_init(|| Regex::new(r"[,\n]").expect("regex should be valid"));

        let mut availabilities = vec![];
        for fragment in fragments {
            for segment in separator.split(fragment).map(str::trim) {
                if !segment.is_empty() {
                    availabilities.push(Self::from_segment(segment, date)?);
                }
            }
        }
        if availabilities.is_empty() {
            availabilities.push(Self::closed(date));
        }
        Ok(availabilities)
    }

    /// `7:30am-10:30pm` is a window, text without a `-` or any digit (like `Closed`) is a closed day.
    pub fn from_segment(segment: &str, date: NaiveDate) -> Result<Self, String> {
        let mut parts = segment.split('-');
        let (Some(opens), Some(closes)) = (parts.next(), parts.next()) else {
            if segment.chars().any(|c| c.is_ascii_digit()) {
                return Err(format!("`{segment}` looks like hours but has no `-` between the times"));
            }
            return Ok(Self::closed(date));
        };
        if parts.next().is_some() {
            return Err(format!("`{segment}` has more than one `-`"));
        }
        Ok(Self::open(date, parse_time(opens)?, parse_time(closes)?))
    }

    pub fn contains(&self, time: NaiveDateTime) -> bool {
        match (self.opens_at, self.closes_at) {
            (Some(opens_at), Some(closes_at)) => opens_at <= time && time < closes_at,
            _ => false,
        }
    }
}

fn parse_time(text: &str) -> Result<NaiveTime, String> {
    let text = remove_all_whitespace(text);
    NaiveTime::parse_from_str(&text, "%I:%M%p")
        .map_err(|e| format!("`{text}` is not a time like 11:00am ({e})"))
}
