//! Parsing of date filter expressions such as `>=2024-05-01` or
//! `<2024-05-01T20:00:00+02:00`.
//!
//! A bare date stands for the whole UTC day, so `=2024-05-01` matches every
//! start time on that day and `<=2024-05-01` includes the evening of the 1st.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }
}

/// One comparison against a timestamp column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateBound {
    pub op: CompareOp,
    pub at: DateTime<Utc>,
}

/// A parsed expression. Date-only equality expands to a half-open range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFilter {
    pub bounds: Vec<DateBound>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateFilterError {
    #[error("empty date expression")]
    Empty,
    #[error("unrecognized date or time {0:?}")]
    InvalidDate(String),
    #[error("date {0} is out of range")]
    OutOfRange(NaiveDate),
}

const OPERATORS: [(&str, CompareOp); 5] = [
    (">=", CompareOp::Gte),
    ("<=", CompareOp::Lte),
    (">", CompareOp::Gt),
    ("<", CompareOp::Lt),
    ("=", CompareOp::Eq),
];

enum Moment {
    Instant(DateTime<Utc>),
    Day(NaiveDate),
}

pub fn parse_date_filter(raw: &str, default_op: CompareOp) -> Result<DateFilter, DateFilterError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DateFilterError::Empty);
    }

    let (op, rest) = OPERATORS
        .iter()
        .find_map(|(token, op)| trimmed.strip_prefix(token).map(|rest| (*op, rest.trim_start())))
        .unwrap_or((default_op, trimmed));

    if rest.is_empty() {
        return Err(DateFilterError::Empty);
    }

    let bounds = match parse_moment(rest)? {
        Moment::Instant(at) => vec![DateBound { op, at }],
        Moment::Day(day) => {
            let start = start_of_day(day);
            let next = || {
                start
                    .checked_add_signed(Duration::days(1))
                    .ok_or(DateFilterError::OutOfRange(day))
            };
            match op {
                CompareOp::Eq => vec![
                    DateBound { op: CompareOp::Gte, at: start },
                    DateBound { op: CompareOp::Lt, at: next()? },
                ],
                CompareOp::Gt => vec![DateBound { op: CompareOp::Gte, at: next()? }],
                CompareOp::Gte => vec![DateBound { op: CompareOp::Gte, at: start }],
                CompareOp::Lt => vec![DateBound { op: CompareOp::Lt, at: start }],
                CompareOp::Lte => vec![DateBound { op: CompareOp::Lt, at: next()? }],
            }
        }
    };

    Ok(DateFilter { bounds })
}

fn parse_moment(input: &str) -> Result<Moment, DateFilterError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(Moment::Instant(dt.with_timezone(&Utc)));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(Moment::Instant(naive.and_utc()));
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(Moment::Day)
        .map_err(|_| DateFilterError::InvalidDate(input.to_string()))
}

fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn two_char_operators_win_over_single_char() {
        let f = parse_date_filter(">=2024-05-01T10:00:00Z", CompareOp::Eq).unwrap();
        assert_eq!(f.bounds, vec![DateBound { op: CompareOp::Gte, at: utc(2024, 5, 1, 10, 0) }]);

        let f = parse_date_filter("<= 2024-05-01 10:00", CompareOp::Eq).unwrap();
        assert_eq!(f.bounds, vec![DateBound { op: CompareOp::Lte, at: utc(2024, 5, 1, 10, 0) }]);
    }

    #[test]
    fn missing_operator_uses_default() {
        let f = parse_date_filter("2024-05-01T10:00", CompareOp::Lte).unwrap();
        assert_eq!(f.bounds[0].op, CompareOp::Lte);
    }

    #[test]
    fn offsets_are_normalized_to_utc() {
        let f = parse_date_filter(">2024-05-01T20:00:00+02:00", CompareOp::Eq).unwrap();
        assert_eq!(f.bounds, vec![DateBound { op: CompareOp::Gt, at: utc(2024, 5, 1, 18, 0) }]);
    }

    #[test]
    fn bare_dates_cover_the_whole_day() {
        let day = utc(2024, 5, 1, 0, 0);
        let next = utc(2024, 5, 2, 0, 0);

        let eq = parse_date_filter("=2024-05-01", CompareOp::Gte).unwrap();
        assert_eq!(
            eq.bounds,
            vec![
                DateBound { op: CompareOp::Gte, at: day },
                DateBound { op: CompareOp::Lt, at: next },
            ]
        );

        let gt = parse_date_filter(">2024-05-01", CompareOp::Eq).unwrap();
        assert_eq!(gt.bounds, vec![DateBound { op: CompareOp::Gte, at: next }]);

        let lte = parse_date_filter("2024-05-01", CompareOp::Lte).unwrap();
        assert_eq!(lte.bounds, vec![DateBound { op: CompareOp::Lt, at: next }]);

        let lt = parse_date_filter("<2024-05-01", CompareOp::Eq).unwrap();
        assert_eq!(lt.bounds, vec![DateBound { op: CompareOp::Lt, at: day }]);
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse_date_filter("", CompareOp::Gte), Err(DateFilterError::Empty));
        assert_eq!(parse_date_filter(">=", CompareOp::Gte), Err(DateFilterError::Empty));
        assert!(matches!(
            parse_date_filter(">=tomorrow", CompareOp::Gte),
            Err(DateFilterError::InvalidDate(_))
        ));
        assert!(parse_date_filter("2024-13-01", CompareOp::Gte).is_err());
        assert!(parse_date_filter("=>2024-05-01", CompareOp::Gte).is_err());
    }

    #[test]
    fn last_representable_day_is_rejected_instead_of_overflowing() {
        let last = NaiveDate::MAX.format("%Y-%m-%d").to_string();

        for expr in [format!("={last}"), format!("<={last}"), format!(">{last}")] {
            assert_eq!(
                parse_date_filter(&expr, CompareOp::Gte),
                Err(DateFilterError::OutOfRange(NaiveDate::MAX)),
                "{expr}"
            );
        }

        let f = parse_date_filter(&format!(">={last}"), CompareOp::Eq).unwrap();
        assert_eq!(f.bounds[0].at, start_of_day(NaiveDate::MAX));
    }
}
