use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};

use super::error::QueryError;
use super::params::RawParams;

/// A day-granular date window. Bounds are inclusive calendar days; either
/// side may be open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateFilter {
    pub fn range(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Timestamp bounds for SQL comparison: inclusive start-of-day,
    /// exclusive start of the day after `end`.
    pub fn bounds(&self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        let start = self
            .start
            .map(|d| d.and_time(NaiveTime::MIN).and_utc());
        let end_exclusive = self
            .end
            .and_then(|d| d.succ_opt())
            .map(|d| d.and_time(NaiveTime::MIN).and_utc());
        (start, end_exclusive)
    }
}

/// Resolve the date filter for a list request. Precedence (first match wins):
/// explicit `startDate`/`endDate`, then `week`+`year`, then `month`+`year`.
pub fn date_filter(raw: &RawParams) -> Result<Option<DateFilter>, QueryError> {
    let start_date = raw.get("startDate");
    let end_date = raw.get("endDate");

    if start_date.is_some() || end_date.is_some() {
        let start = start_date.map(|s| parse_date("startDate", s)).transpose()?;
        let end = end_date.map(|s| parse_date("endDate", s)).transpose()?;
        return Ok(Some(DateFilter { start, end }));
    }

    if let Some(week) = raw.get("week") {
        let week = parse_int("week", week)?;
        let year = require_year(raw, "week")?;
        return Ok(Some(week_window(year, week)?));
    }

    if let Some(month) = raw.get("month") {
        let month = parse_int("month", month)?;
        let year = require_year(raw, "month")?;
        return Ok(Some(month_window(year, month)?));
    }

    Ok(None)
}

/// Week N of a year: Jan 1 plus (N-1) whole weeks, rolled back to the most
/// recent Sunday, spanning 7 days.
pub fn week_window(year: i32, week: u32) -> Result<DateFilter, QueryError> {
    if !(1..=53).contains(&week) {
        return Err(QueryError::invalid_param(
            "week",
            format!("Week must be between 1 and 53, got {}", week),
        ));
    }
    let jan_first = first_of_year(year)?;
    let anchor = jan_first + Duration::days(((week - 1) * 7) as i64);
    let start = anchor - Duration::days(anchor.weekday().num_days_from_sunday() as i64);
    let end = start + Duration::days(6);
    Ok(DateFilter::range(start, end))
}

/// A calendar month: first day through last day, the latter derived from the
/// first day of the following month.
pub fn month_window(year: i32, month: u32) -> Result<DateFilter, QueryError> {
    if !(1..=12).contains(&month) {
        return Err(QueryError::invalid_param(
            "month",
            format!("Month must be between 1 and 12, got {}", month),
        ));
    }
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| QueryError::invalid_param("year", format!("Invalid year: {}", year)))?;
    let next_month_first = if month == 12 {
        first_of_year(year + 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
            .ok_or_else(|| QueryError::invalid_param("year", format!("Invalid year: {}", year)))?
    };
    let end = next_month_first.pred_opt().ok_or_else(|| {
        QueryError::invalid_param("year", format!("Invalid year: {}", year))
    })?;
    Ok(DateFilter::range(start, end))
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (truncated to its day).
pub fn parse_date(field: &str, s: &str) -> Result<NaiveDate, QueryError> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc).date_naive());
    }
    Err(QueryError::invalid_param(
        field,
        format!("Invalid date: {}", s),
    ))
}

fn parse_int(field: &str, s: &str) -> Result<u32, QueryError> {
    s.parse::<u32>()
        .map_err(|_| QueryError::invalid_param(field, format!("Invalid number: {}", s)))
}

fn require_year(raw: &RawParams, dependent: &str) -> Result<i32, QueryError> {
    let year = raw.get("year").ok_or_else(|| {
        QueryError::invalid_param("year", format!("year is required with {}", dependent))
    })?;
    year.parse::<i32>()
        .map_err(|_| QueryError::invalid_param("year", format!("Invalid number: {}", year)))
}

fn first_of_year(year: i32) -> Result<NaiveDate, QueryError> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| QueryError::invalid_param("year", format!("Invalid year: {}", year)))
}
