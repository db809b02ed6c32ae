//! Parsing and formatting of 80-character header cards.
//!
//! Only the fixed-format subset needed to round-trip a primary header is handled:
//!
//! ```text
//! KEYWORD = value                / comment
//! 12345678901234567890123456789012345...
//!         ^ column 9-10: value indicator "= "
//!                              ^ column 30: end of right-aligned numeric/logical values
//! ```
//!
//! Values that do not fit one of the supported [`HeaderValue`] variants (complex numbers,
//! undefined values...) and commentary cards (`COMMENT`, `HISTORY`, blank keyword) are kept
//! as text, together with their original card image.
use std::str::FromStr;

use num_bigint::BigInt;

use crate::constants::CARD_SIZE;
use crate::edit_errors::HeaderEditError;
use crate::header::record::HeaderRecord;
use crate::header::value::HeaderValue;

const VALUE_INDICATOR: &str = "= ";
const KEYWORD_FIELD: usize = 8;
const FIXED_VALUE_END: usize = 30;

/// Split the text following the value indicator into the value field and the comment.
///
/// Return
/// ----------
/// * `(value, comment, quoted)`: the raw value (unescaped when quoted), the trimmed comment if
///   any, and whether the value was a quoted string.
fn split_value_comment(field: &str) -> (String, Option<String>, bool) {
    let trimmed = field.trim_start();

    if let Some(body) = trimmed.strip_prefix('\'') {
        let mut value = String::new();
        let mut chars = body.char_indices().peekable();
        let mut rest = "";
        while let Some((i, c)) = chars.next() {
            if c == '\'' {
                if let Some((_, '\'')) = chars.peek() {
                    value.push('\'');
                    chars.next();
                } else {
                    rest = &body[i + 1..];
                    break;
                }
            } else {
                value.push(c);
            }
        }
        let comment = rest
            .split_once('/')
            .map(|(_, c)| c.trim().to_string())
            .filter(|c| !c.is_empty());
        // trailing blanks in a string value are not significant
        return (value.trim_end().to_string(), comment, true);
    }

    match trimmed.split_once('/') {
        Some((value, comment)) => {
            let comment = Some(comment.trim().to_string()).filter(|c| !c.is_empty());
            (value.trim().to_string(), comment, false)
        }
        None => (trimmed.trim().to_string(), None, false),
    }
}

fn parse_number(raw: &str) -> Option<HeaderValue> {
    let digits = raw.strip_prefix(&['+', '-'][..]).unwrap_or(raw);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        let raw = raw.strip_prefix('+').unwrap_or(raw);
        return Some(if let Ok(i) = raw.parse::<i32>() {
            HeaderValue::Int(i)
        } else if let Ok(l) = raw.parse::<i64>() {
            HeaderValue::Long(l)
        } else {
            HeaderValue::BigInt(BigInt::from_str(raw).ok()?)
        });
    }

    let has_digit = raw.bytes().any(|b| b.is_ascii_digit());
    let allowed = raw
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'E' | b'e' | b'D' | b'd'));
    if has_digit && allowed {
        return raw
            .replace(&['D', 'd'][..], "E")
            .parse::<f64>()
            .ok()
            .map(HeaderValue::Real);
    }
    None
}

/// Parse one card into a record. The card image is kept on the record.
///
/// Arguments
/// -----------------
/// * `card`: an 80-character card (shorter cards are accepted and treated as blank-padded).
///
/// Return
/// ----------
/// * The parsed [`HeaderRecord`]. Parsing never fails: anything that is not understood is kept
///   as a text value.
pub fn parse_card(card: &str) -> HeaderRecord {
    // stay on a char boundary for non-ASCII input
    let keyword_end = (0..=card.len().min(KEYWORD_FIELD))
        .rev()
        .find(|&i| card.is_char_boundary(i))
        .unwrap_or(0);
    let keyword = card[..keyword_end].trim_end().to_string();
    let rest = &card[keyword_end..];

    let is_commentary = matches!(keyword.as_str(), "COMMENT" | "HISTORY" | "");
    if is_commentary || !rest.starts_with(VALUE_INDICATOR) {
        return HeaderRecord::with_card(
            keyword,
            HeaderValue::Text(rest.trim_end().to_string()),
            None,
            card.to_string(),
        );
    }

    let (raw, comment, quoted) = split_value_comment(&rest[VALUE_INDICATOR.len()..]);
    let value = if quoted {
        HeaderValue::Text(raw)
    } else {
        match raw.as_str() {
            "T" => HeaderValue::Logical(true),
            "F" => HeaderValue::Logical(false),
            _ => parse_number(&raw).unwrap_or(HeaderValue::Text(raw)),
        }
    };

    HeaderRecord::with_card(keyword, value, comment, card.to_string())
}

fn format_real(r: f64) -> Result<String, HeaderEditError> {
    if !r.is_finite() {
        return Err(HeaderEditError::NonFiniteValue(r));
    }
    Ok(format!("{r:?}").to_uppercase())
}

fn format_value(value: &HeaderValue) -> Result<String, HeaderEditError> {
    let fixed = |s: String| format!("{s:>width$}", width = FIXED_VALUE_END - 10);
    Ok(match value {
        HeaderValue::Text(s) => format!("'{:<8}'", s.replace('\'', "''")),
        HeaderValue::Logical(b) => fixed(if *b { "T" } else { "F" }.to_string()),
        HeaderValue::Int(i) => fixed(i.to_string()),
        HeaderValue::Long(l) => fixed(l.to_string()),
        HeaderValue::BigInt(b) => fixed(b.to_string()),
        HeaderValue::Real(r) => fixed(format_real(*r)?),
        HeaderValue::Decimal(d) => fixed(d.to_string().to_uppercase()),
    })
}

/// Format a record as an 80-character card.
///
/// Records carrying their original card image are returned unchanged. A comment that does not
/// fit in the remaining columns is truncated.
///
/// Return
/// ----------
/// * The card, or [`HeaderEditError::ValueTooLong`] if the value alone does not fit, or
///   [`HeaderEditError::NonFiniteValue`] for a NaN/infinite real.
pub fn format_card(record: &HeaderRecord) -> Result<String, HeaderEditError> {
    if let Some(card) = record.card() {
        return Ok(format!("{card:<CARD_SIZE$}"));
    }

    let mut card = format!(
        "{:<KEYWORD_FIELD$}{VALUE_INDICATOR}{}",
        record.keyword(),
        format_value(record.value())?
    );
    if card.len() > CARD_SIZE {
        return Err(HeaderEditError::ValueTooLong {
            keyword: record.keyword().to_string(),
            len: card.len() - KEYWORD_FIELD - VALUE_INDICATOR.len(),
            max: CARD_SIZE - KEYWORD_FIELD - VALUE_INDICATOR.len(),
        });
    }

    if let Some(comment) = record.comment() {
        card.push_str(" / ");
        card.push_str(comment);
        card.truncate(CARD_SIZE);
    }

    Ok(format!("{card:<CARD_SIZE$}"))
}
