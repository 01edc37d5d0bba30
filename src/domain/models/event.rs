use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::domain::services::date_filter::DateBound;
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: i32,
    pub organizer_id: i32,
    pub venue_id: i32,
    pub space_id: Option<i32>,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct EventDate {
    pub id: i32,
    pub event_id: i32,
    pub venue_id: Option<i32>,
    pub space_id: Option<i32>,
    pub date_start: DateTime<Utc>,
    pub date_end: Option<DateTime<Utc>>,
    pub entry_time: Option<NaiveTime>,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewEventDate {
    pub venue_id: Option<i32>,
    pub space_id: Option<i32>,
    pub date_start: DateTime<Utc>,
    pub date_end: Option<DateTime<Utc>>,
    pub entry_time: Option<NaiveTime>,
    /// Main image of this date only; overrides the event's main image.
    pub main_image_id: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub organizer_id: i32,
    pub venue_id: i32,
    pub space_id: Option<i32>,
    pub title: String,
    pub description: String,
    pub date: NewEventDate,
    pub event_type_ids: Vec<i32>,
    pub genre_type_ids: Vec<i32>,
    pub main_image_id: Option<i32>,
}

/// Partial update of one occurrence and its parent event. `None` keeps the
/// stored value, `Some(None)` clears a nullable column; link lists replace
/// the current set when present.
#[derive(Debug, Clone, Default)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub venue_id: Option<i32>,
    pub space_id: Option<Option<i32>>,
    pub date_start: Option<DateTime<Utc>>,
    pub date_end: Option<Option<DateTime<Utc>>>,
    pub entry_time: Option<Option<NaiveTime>>,
    pub event_type_ids: Option<Vec<i32>>,
    pub genre_type_ids: Option<Vec<i32>>,
    pub main_image_id: Option<i32>,
    pub date_main_image_id: Option<i32>,
}

impl EventUpdate {
    /// Date fields of `current` with this update applied, checked for order.
    pub fn merge_date(&self, current: &EventDate) -> Result<MergedDate, AppError> {
        let merged = MergedDate {
            date_start: self.date_start.unwrap_or(current.date_start),
            date_end: self.date_end.unwrap_or(current.date_end),
            entry_time: self.entry_time.unwrap_or(current.entry_time),
        };
        ensure_date_order(merged.date_start, merged.date_end)?;
        Ok(merged)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergedDate {
    pub date_start: DateTime<Utc>,
    pub date_end: Option<DateTime<Utc>>,
    pub entry_time: Option<NaiveTime>,
}

pub fn ensure_date_order(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Result<(), AppError> {
    match end {
        Some(end) if end < start => Err(AppError::Validation("date_end must not be before date_start".into())),
        _ => Ok(()),
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct EventDetail {
    pub event: Event,
    pub event_date: EventDate,
    pub event_type_ids: Vec<i32>,
    pub genre_type_ids: Vec<i32>,
}

/// One (event, event date) row of the search query, with names resolved in
/// the requested locale.
#[derive(Debug, Serialize, FromRow, Clone)]
pub struct EventOccurrence {
    pub event_id: i32,
    pub event_date_id: i32,
    pub event_title: String,
    pub event_description: String,
    pub event_date_start: DateTime<Utc>,
    pub event_date_end: Option<DateTime<Utc>>,
    pub event_created_at: DateTime<Utc>,
    pub venue_id: Option<i32>,
    pub venue_name: Option<String>,
    pub venue_postal_code: Option<String>,
    pub venue_city: Option<String>,
    pub organizer_id: Option<i32>,
    pub organizer_name: Option<String>,
    pub space_id: Option<i32>,
    pub space_name: Option<String>,
    pub space_type: Option<String>,
    pub event_types: Option<String>,
    pub genre_types: Option<String>,
    pub venue_types: Option<String>,
    pub image_id: Option<i32>,
    pub image_source_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub cities: Vec<String>,
    pub postal_codes: Vec<String>,
    pub date_start: Vec<DateBound>,
    pub date_end: Vec<DateBound>,
    pub event_ids: Vec<i32>,
    pub venue_ids: Vec<i32>,
    pub space_ids: Vec<i32>,
    pub event_type_ids: Vec<i32>,
    pub genre_type_ids: Vec<i32>,
    pub venue_type_ids: Vec<i32>,
}

impl EventFilter {
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
            && self.postal_codes.is_empty()
            && self.date_start.is_empty()
            && self.date_end.is_empty()
            && self.event_ids.is_empty()
            && self.venue_ids.is_empty()
            && self.space_ids.is_empty()
            && self.event_type_ids.is_empty()
            && self.genre_type_ids.is_empty()
            && self.venue_type_ids.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    DateStart,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventSort {
    pub key: SortKey,
    pub order: SortOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

pub const DEFAULT_LANG: &str = "de";
pub const MAX_PAGE_SIZE: i64 = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct EventQuery {
    pub filter: EventFilter,
    pub lang: String,
    pub sort: EventSort,
    pub page: Option<Page>,
}

impl Default for EventQuery {
    fn default() -> Self {
        Self {
            filter: EventFilter::default(),
            lang: DEFAULT_LANG.to_string(),
            sort: EventSort::default(),
            page: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stored_date() -> EventDate {
        EventDate {
            id: 1,
            event_id: 1,
            venue_id: None,
            space_id: None,
            date_start: Utc.with_ymd_and_hms(2030, 6, 10, 19, 0, 0).unwrap(),
            date_end: Some(Utc.with_ymd_and_hms(2030, 6, 10, 22, 0, 0).unwrap()),
            entry_time: NaiveTime::from_hms_opt(18, 30, 0),
            created_at: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
            modified_at: None,
        }
    }

    #[test]
    fn lone_end_is_checked_against_stored_start() {
        let update = EventUpdate {
            date_end: Some(Some(Utc.with_ymd_and_hms(2030, 6, 1, 0, 0, 0).unwrap())),
            ..Default::default()
        };
        assert!(matches!(update.merge_date(&stored_date()), Err(AppError::Validation(_))));
    }

    #[test]
    fn lone_start_is_checked_against_stored_end() {
        let update = EventUpdate {
            date_start: Some(Utc.with_ymd_and_hms(2030, 6, 11, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        assert!(update.merge_date(&stored_date()).is_err());
    }

    #[test]
    fn explicit_null_clears_and_absent_keeps() {
        let update = EventUpdate { date_end: Some(None), ..Default::default() };
        let merged = update.merge_date(&stored_date()).unwrap();
        assert_eq!(merged.date_end, None);
        assert_eq!(merged.entry_time, NaiveTime::from_hms_opt(18, 30, 0));
        assert_eq!(merged.date_start, stored_date().date_start);
    }
}
