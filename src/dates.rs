use time::{format_description::FormatItem, macros::format_description, Date};

use crate::error::ApiError;

pub const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parses an optional `YYYY-MM-DD` field; blank values count as absent.
pub fn parse_iso_date(field: &str, raw: Option<&str>) -> Result<Option<Date>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => Date::parse(s, ISO_DATE).map(Some).map_err(|_| {
            ApiError::validation(format!("Invalid {field}, expected YYYY-MM-DD"))
        }),
    }
}

/// Rejects ranges that end before they start.
pub fn validate_range(start: Option<Date>, end: Option<Date>) -> Result<(), ApiError> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(ApiError::validation("End date must not be before start date"));
        }
    }
    Ok(())
}

/// `#[serde(serialize_with)]` helper writing `Option<Date>` as `YYYY-MM-DD` or null.
pub fn serialize_opt_date<S>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match date {
        Some(d) => {
            let text = d.format(ISO_DATE).map_err(serde::ser::Error::custom)?;
            serializer.serialize_some(&text)
        }
        None => serializer.serialize_none(),
    }
}
