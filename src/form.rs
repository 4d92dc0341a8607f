use crate::models::{Category, QueryParams, QueryRange};
use chrono::{Duration, NaiveDate};
use thiserror::Error;

pub const MAX_RANGE_DAYS: i64 = 31;
const DEFAULT_LOOKBACK_DAYS: i64 = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("Please keep the range of dates to below {} days (selected {days}).", MAX_RANGE_DAYS)]
    TooLong { days: i64 },
    #[error("End date must fall after start date.")]
    EndNotAfterStart,
    #[error("Please specify the application type (Individual or Offtaker).")]
    MissingCategory,
    #[error("Unknown application type `{0}`.")]
    UnknownCategory(String),
    #[error("Please provide the {0}.")]
    MissingDate(&'static str),
    #[error("The {field} `{value}` is not a date in YYYY-MM-DD format.")]
    InvalidDate { field: &'static str, value: String },
}

pub fn validate_range(
    category: Category,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<QueryRange, RangeError> {
    let days = (end_date - start_date).num_days();
    if days > MAX_RANGE_DAYS {
        return Err(RangeError::TooLong { days });
    }
    if start_date >= end_date {
        return Err(RangeError::EndNotAfterStart);
    }

    Ok(QueryRange {
        category,
        start_date,
        end_date,
    })
}

pub fn parse_query(params: &QueryParams) -> Result<QueryRange, RangeError> {
    let category = match non_empty(params.category.as_deref()) {
        Some(value) => value
            .parse::<Category>()
            .map_err(|err| RangeError::UnknownCategory(err.0))?,
        None => return Err(RangeError::MissingCategory),
    };
    let start_date = parse_date("start date", params.start_date.as_deref())?;
    let end_date = parse_date("end date", params.end_date.as_deref())?;

    validate_range(category, start_date, end_date)
}

pub fn default_dates(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today - Duration::days(DEFAULT_LOOKBACK_DAYS), today)
}

fn parse_date(field: &'static str, value: Option<&str>) -> Result<NaiveDate, RangeError> {
    let value = non_empty(value).ok_or(RangeError::MissingDate(field))?;
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| RangeError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
