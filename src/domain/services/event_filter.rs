//! Turns raw query-string pairs into an [`EventQuery`].
//!
//! Pairs are taken as a list so repeated keys survive; list-valued keys also
//! accept comma-separated values.

use crate::domain::models::event::{
    EventQuery, Page, SortKey, SortOrder, DEFAULT_LANG, MAX_PAGE_SIZE,
};
use crate::domain::services::date_filter::{parse_date_filter, CompareOp, DateBound};
use crate::error::FilterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Search,
    Sort,
}

/// Parameters for the filtered search: every filter key plus `lang`,
/// `sort_by`, `order_by`, `limit` and `offset`.
pub fn parse_event_query(params: &[(String, String)]) -> Result<EventQuery, FilterError> {
    parse(params, Mode::Search)
}

/// Parameters for the creation-time listing: `lang`, `order_by`, `limit`
/// and `offset` only. Always sorts by `created_at`.
pub fn parse_sort_query(params: &[(String, String)]) -> Result<EventQuery, FilterError> {
    let mut query = parse(params, Mode::Sort)?;
    query.sort.key = SortKey::CreatedAt;
    Ok(query)
}

fn parse(params: &[(String, String)], mode: Mode) -> Result<EventQuery, FilterError> {
    let mut query = EventQuery::default();
    let mut limit = None;
    let mut offset = None;

    for (key, value) in params {
        let value = value.trim();
        match key.as_str() {
            "lang" => query.lang = parse_lang(value)?,
            "order_by" => {
                query.sort.order = match value.to_ascii_lowercase().as_str() {
                    "asc" => SortOrder::Asc,
                    "desc" => SortOrder::Desc,
                    _ => return Err(invalid(key, value)),
                }
            }
            "limit" => limit = Some(parse_number(key, value)?),
            "offset" => offset = Some(parse_number(key, value)?),
            _ if mode == Mode::Sort => return Err(FilterError::UnknownKey(key.clone())),
            "sort_by" => {
                query.sort.key = match value {
                    "date_start" => SortKey::DateStart,
                    "created_at" => SortKey::CreatedAt,
                    _ => return Err(invalid(key, value)),
                }
            }
            "city" => push_text(&mut query.filter.cities, key, value)?,
            "postal_code" => push_text(&mut query.filter.postal_codes, key, value)?,
            "date_start" => query
                .filter
                .date_start
                .extend(parse_date(key, value, CompareOp::Gte)?),
            "date_end" => query
                .filter
                .date_end
                .extend(parse_date(key, value, CompareOp::Lte)?),
            "event_id" => push_ids(&mut query.filter.event_ids, key, value)?,
            "venue_id" => push_ids(&mut query.filter.venue_ids, key, value)?,
            "space_id" => push_ids(&mut query.filter.space_ids, key, value)?,
            "event_type_id" => push_ids(&mut query.filter.event_type_ids, key, value)?,
            "genre_type_id" => push_ids(&mut query.filter.genre_type_ids, key, value)?,
            "venue_type_id" => push_ids(&mut query.filter.venue_type_ids, key, value)?,
            _ => return Err(FilterError::UnknownKey(key.clone())),
        }
    }

    query.page = match (limit, offset) {
        (None, None) => None,
        (limit, offset) => {
            let limit = limit.unwrap_or(MAX_PAGE_SIZE);
            if !(1..=MAX_PAGE_SIZE).contains(&limit) {
                return Err(invalid("limit", &limit.to_string()));
            }
            let offset = offset.unwrap_or(0);
            if offset < 0 {
                return Err(invalid("offset", &offset.to_string()));
            }
            Some(Page { limit, offset })
        }
    };

    Ok(query)
}

/// Two ASCII letters, lower-cased. Empty falls back to the default locale.
pub fn parse_lang(value: &str) -> Result<String, FilterError> {
    if value.is_empty() {
        return Ok(DEFAULT_LANG.to_string());
    }
    if value.len() == 2 && value.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(value.to_ascii_lowercase())
    } else {
        Err(invalid("lang", value))
    }
}

fn push_text(target: &mut Vec<String>, key: &str, value: &str) -> Result<(), FilterError> {
    if value.is_empty() {
        return Err(invalid(key, value));
    }
    target.push(value.to_string());
    Ok(())
}

fn push_ids(target: &mut Vec<i32>, key: &str, value: &str) -> Result<(), FilterError> {
    for part in value.split(',') {
        let part = part.trim();
        let id = part.parse::<i32>().map_err(|_| FilterError::InvalidInteger {
            key: key.to_string(),
            value: part.to_string(),
        })?;
        if !target.contains(&id) {
            target.push(id);
        }
    }
    Ok(())
}

fn parse_date(
    key: &str,
    value: &str,
    default_op: CompareOp,
) -> Result<Vec<DateBound>, FilterError> {
    parse_date_filter(value, default_op)
        .map(|f| f.bounds)
        .map_err(|source| FilterError::InvalidDate { key: key.to_string(), source })
}

fn parse_number(key: &str, value: &str) -> Result<i64, FilterError> {
    value.parse().map_err(|_| FilterError::InvalidInteger {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn invalid(key: &str, value: &str) -> FilterError {
    FilterError::InvalidValue { key: key.to_string(), value: value.to_string() }
}
