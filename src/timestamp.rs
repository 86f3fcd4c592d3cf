//! PDF date string normalization.
//!
//! PDF signing times use the `D:YYYYMMDDHHmmSS` encoding (ISO 32000-1 §7.9.4)
//! with an optional `Z` / `+HH'mm'` / `-HH'mm'` UTC-offset suffix. Trailing
//! date fields may be omitted; month and day default to 1, the time fields to
//! zero. Malformed input yields `None` rather than an error, at which point
//! the pipeline falls back to the signer's signed signing-time attribute.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};

/// Parse a PDF-native date string into a timestamp with its UTC offset.
///
/// The offset is applied, not discarded: `D:20230615120000+05'30'` is the
/// instant 2023-06-15T12:00:00+05:30, a different instant from the same
/// wall-clock fields at +00:00.
pub fn parse_pdf_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let s = raw.trim();
    let s = s.strip_prefix("D:").unwrap_or(s);

    let digits_len = s.bytes().take_while(u8::is_ascii_digit).count();
    // Year is mandatory; the rest come in whole two-digit fields.
    if digits_len < 4 || digits_len > 14 || digits_len % 2 != 0 {
        return None;
    }
    let (digits, rest) = s.split_at(digits_len);

    let field = |start: usize, default: u32| -> Option<u32> {
        if digits.len() >= start + 2 {
            digits[start..start + 2].parse().ok()
        } else {
            Some(default)
        }
    };

    let year: i32 = digits[0..4].parse().ok()?;
    let month = field(4, 1)?;
    let day = field(6, 1)?;
    let hour = field(8, 0)?;
    let minute = field(10, 0)?;
    let second = field(12, 0)?;

    let offset = parse_utc_offset(rest)?;
    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
    offset.from_local_datetime(&naive).single()
}

/// Parse the offset suffix: empty or `Z` mean UTC, otherwise a signed
/// `HH'mm'` with quote-delimited minutes (the trailing quote is optional in
/// the wild).
fn parse_utc_offset(rest: &str) -> Option<FixedOffset> {
    let rest = rest.trim_end();
    if rest.is_empty() || rest == "Z" {
        return FixedOffset::east_opt(0);
    }

    let (sign, tail) = match rest.as_bytes().first() {
        Some(b'+') => (1, &rest[1..]),
        Some(b'-') => (-1, &rest[1..]),
        _ => return None,
    };

    if tail.len() < 2 || !tail.is_char_boundary(2) {
        return None;
    }
    let hours: i32 = tail[..2].parse().ok()?;
    let tail = &tail[2..];

    let minutes: i32 = match tail.strip_prefix('\'') {
        None if tail.is_empty() => 0,
        None => return None,
        Some(m) => {
            let m = m.strip_suffix('\'').unwrap_or(m);
            if m.is_empty() {
                0
            } else {
                m.parse().ok()?
            }
        },
    };
    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
