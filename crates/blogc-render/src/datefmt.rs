//! Reformatting of `DATE_*` variables through a `DATE_FORMAT` directive
//! string, for the `_FORMATTED` suffix convention.
//!
//! Grounded on `original_source/src/datetime-parser.h`'s
//! `blogc_convert_datetime`: parse the stored date, then render it with the
//! caller-supplied strftime-style format. The original's exact input grammar
//! isn't in the retrieved source, so this accepts the two forms blogc posts
//! conventionally use (`DATE: 2021-01-02 15:04:05` and a bare date).

use chrono::NaiveDateTime;
use thiserror::Error;

/// A `DATE`/`DATE_FORMATTED` value that didn't match any recognized
/// datetime grammar. Never propagated — `format_date` falls back to the
/// raw value — but named so the failure reads the same way
/// `SourceParseError`/`TemplateParseError` do rather than as a bare string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("could not parse date {raw:?} against any recognized datetime format")]
pub struct DateTimeParseError {
    raw: String,
}

fn parse_source_datetime(raw: &str) -> Result<NaiveDateTime, DateTimeParseError> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| DateTimeParseError { raw: raw.to_string() })
}

/// Reformat `raw` using `format` (a strftime-style directive string). Falls
/// back to `raw` unchanged — with a logged warning — if `raw` doesn't parse
/// as a date blogc recognizes.
#[must_use]
pub fn format_date(raw: &str, format: Option<&str>) -> String {
    let Some(format) = format else {
        return raw.to_string();
    };
    match parse_source_datetime(raw) {
        Ok(dt) => dt.format(format).to_string(),
        Err(err) => {
            log::warn!("{err}, using raw value");
            raw.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_datetime_with_directive() {
        assert_eq!(
            format_date("2021-01-02 15:04:05", Some("%Y/%m/%d")),
            "2021/01/02"
        );
    }

    #[test]
    fn formats_bare_date() {
        assert_eq!(format_date("2021-01-02", Some("%B %d, %Y")), "January 02, 2021");
    }

    #[test]
    fn no_format_returns_raw() {
        assert_eq!(format_date("2021-01-02", None), "2021-01-02");
    }

    #[test]
    fn unparseable_date_falls_back_to_raw() {
        assert_eq!(format_date("not-a-date", Some("%Y")), "not-a-date");
    }
}
