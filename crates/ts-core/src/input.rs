//! Export layout: a free-text header, a blank line, then the entry array.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::entry::{ParsedEntries, parse_entries, parse_timestamp};
use crate::error::MalformedInput;

pub const START_DIRECTIVE: &str = "temp.report.start";
pub const END_DIRECTIVE: &str = "temp.report.end";

static START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^temp\.report\.start:[ \t]*(.*?)\s*$").unwrap());

static END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^temp\.report\.end:[ \t]*(.*?)\s*$").unwrap());

/// Report bounds extracted from the header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Header {
    pub start: Option<DateTime<Utc>>,
    /// Exclusive upper bound.
    pub end: Option<DateTime<Utc>>,
}

impl Header {
    /// Extracts the report directives; other header lines are ignored.
    ///
    /// A directive with an empty value counts as absent.
    pub fn parse(text: &str) -> Result<Self, MalformedInput> {
        Ok(Self {
            start: directive(&START_RE, START_DIRECTIVE, text)?,
            end: directive(&END_RE, END_DIRECTIVE, text)?,
        })
    }
}

fn directive(
    re: &Regex,
    name: &'static str,
    text: &str,
) -> Result<Option<DateTime<Utc>>, MalformedInput> {
    let Some(value) = re
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|v| !v.is_empty())
    else {
        return Ok(None);
    };

    parse_timestamp(value)
        .map(Some)
        .ok_or_else(|| MalformedInput::InvalidDirective {
            directive: name,
            value: value.to_string(),
        })
}

/// Splits an export into its header and entry sections.
pub fn split_export(text: &str) -> Result<(&str, &str), MalformedInput> {
    let separator = [("\n\n", 2), ("\r\n\r\n", 4)]
        .into_iter()
        .filter_map(|(needle, len)| text.find(needle).map(|pos| (pos, len)))
        .min_by_key(|(pos, _)| *pos);

    let (pos, len) = separator.ok_or(MalformedInput::MissingSeparator)?;
    Ok((&text[..pos], &text[pos + len..]))
}

/// Parses a complete export.
pub fn parse_export(
    text: &str,
    now: DateTime<Utc>,
) -> Result<(Header, ParsedEntries), MalformedInput> {
    let (header_text, entries_text) = split_export(text)?;
    let header = Header::parse(header_text)?;
    tracing::debug!(?header, "parsed header");
    let parsed = parse_entries(entries_text, now)?;
    Ok((header, parsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn header_directives_in_any_order() {
        let text = "temp.report.end: 20250201T000000Z\ncolor: on\ntemp.report.start: 20250127T000000Z\n";
        let header = Header::parse(text).unwrap();
        assert_eq!(
            header.start,
            Some(Utc.with_ymd_and_hms(2025, 1, 27, 0, 0, 0).unwrap())
        );
        assert_eq!(
            header.end,
            Some(Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn missing_and_empty_directives_are_absent() {
        let header = Header::parse("temp.report.start: \nverbose: on").unwrap();
        assert_eq!(header, Header::default());
    }

    #[test]
    fn directive_must_start_the_line() {
        let header = Header::parse("x.temp.report.start: 20250127T000000Z").unwrap();
        assert!(header.start.is_none());
    }

    #[test]
    fn bad_directive_value_is_rejected() {
        let err = Header::parse("temp.report.end: tomorrow").unwrap_err();
        assert!(matches!(
            err,
            MalformedInput::InvalidDirective {
                directive: END_DIRECTIVE,
                ..
            }
        ));
    }

    #[test]
    fn split_on_first_blank_line() {
        let (header, entries) = split_export("a: 1\nb: 2\n\n[]\n\n").unwrap();
        assert_eq!(header, "a: 1\nb: 2");
        assert_eq!(entries, "[]\n\n");
    }

    #[test]
    fn split_handles_crlf() {
        let (header, entries) = split_export("a: 1\r\n\r\n[]").unwrap();
        assert_eq!(header, "a: 1");
        assert_eq!(entries, "[]");
    }

    #[test]
    fn missing_separator_is_rejected() {
        let err = split_export("a: 1\n[]").unwrap_err();
        assert!(matches!(err, MalformedInput::MissingSeparator));
    }

    #[test]
    fn parse_export_combines_sections() {
        let now = Utc.with_ymd_and_hms(2025, 1, 29, 12, 0, 0).unwrap();
        let text = "temp.report.start: 20250127T000000Z\n\n[{\"start\":\"20250127T080000Z\",\"end\":\"20250127T090000Z\"}]\n";
        let (header, parsed) = parse_export(text, now).unwrap();
        assert!(header.start.is_some());
        assert!(header.end.is_none());
        assert_eq!(parsed.entries.len(), 1);
    }
}
