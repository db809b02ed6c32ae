use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::edit_errors::HeaderEditError;
use crate::header::value::HeaderValue;
use crate::params::EditorParams;

static KEYWORD_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9_-]+$").expect("keyword pattern is valid"));

/// Normalize a keyword supplied by a caller: surrounding blanks removed, upper case.
pub fn normalize_keyword(keyword: &str) -> String {
    keyword.trim().to_ascii_uppercase()
}

/// Check that a normalized keyword can be written to a header card.
pub fn validate_keyword(keyword: &str, params: &EditorParams) -> Result<(), HeaderEditError> {
    if keyword.len() > params.max_keyword_len || !KEYWORD_CHARSET.is_match(keyword) {
        return Err(HeaderEditError::InvalidKeyword(keyword.to_string()));
    }
    Ok(())
}

fn is_card_text(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7e).contains(&b))
}

/// Length of a string value once written to a card, quotes doubled.
fn escaped_len(text: &str) -> usize {
    text.len() + text.matches('\'').count()
}

/// A keyword/value/comment triple of a header.
///
/// Records read from a file keep their original card image, so that a record nobody touched is
/// written back unchanged (commentary cards, unusual number formats, complex values...).
/// Records built by the editor have no card image and are formatted from their fields.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderRecord {
    keyword: String,
    value: HeaderValue,
    comment: Option<String>,
    card: Option<String>,
}

impl HeaderRecord {
    pub fn new(keyword: &str, value: HeaderValue, comment: Option<String>) -> Self {
        HeaderRecord {
            keyword: normalize_keyword(keyword),
            value,
            comment,
            card: None,
        }
    }

    pub(crate) fn with_card(
        keyword: String,
        value: HeaderValue,
        comment: Option<String>,
        card: String,
    ) -> Self {
        HeaderRecord {
            keyword,
            value,
            comment,
            card: Some(card),
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn value(&self) -> &HeaderValue {
        &self.value
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Original card image, if the record was read from a file and never modified.
    pub fn card(&self) -> Option<&str> {
        self.card.as_deref()
    }

    /// Copy of this record under another keyword, value and comment preserved.
    pub fn renamed(&self, keyword: &str) -> Self {
        HeaderRecord::new(keyword, self.value.clone(), self.comment.clone())
    }

    /// Check the record against the header limits.
    ///
    /// Arguments
    /// -----------------
    /// * `params`: the configured length limits.
    ///
    /// Return
    /// ----------
    /// * `Ok(())` if the keyword is well formed, a real value is finite, the string value and
    ///   comment contain only printable ASCII and every individual and joint length limit holds.
    ///   String lengths count embedded quotes twice, as they are written on the card.
    pub fn validate(&self, params: &EditorParams) -> Result<(), HeaderEditError> {
        validate_keyword(&self.keyword, params)?;

        if let HeaderValue::Real(r) = self.value {
            if !r.is_finite() {
                return Err(HeaderEditError::NonFiniteValue(r));
            }
        }

        let comment_len = self.comment.as_deref().map_or(0, str::len);
        if let Some(comment) = &self.comment {
            if !is_card_text(comment) {
                return Err(HeaderEditError::InvalidCharacters(self.keyword.clone()));
            }
            if comment_len > params.max_comment_len {
                return Err(HeaderEditError::CommentTooLong {
                    keyword: self.keyword.clone(),
                    len: comment_len,
                    max: params.max_comment_len,
                });
            }
        }

        if let HeaderValue::Text(text) = &self.value {
            if !is_card_text(text) {
                return Err(HeaderEditError::InvalidCharacters(self.keyword.clone()));
            }
            let len = escaped_len(text);
            if len > params.max_string_value_len {
                return Err(HeaderEditError::ValueTooLong {
                    keyword: self.keyword.clone(),
                    len,
                    max: params.max_string_value_len,
                });
            }
            if len + comment_len > params.max_string_with_comment_len {
                return Err(HeaderEditError::ValueTooLong {
                    keyword: self.keyword.clone(),
                    len: len + comment_len,
                    max: params.max_string_with_comment_len,
                });
            }
        }

        Ok(())
    }
}

impl fmt::Display for HeaderRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.keyword, self.value)?;
        if let Some(comment) = &self.comment {
            write!(f, " / {comment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod record_test {
    use super::*;

    #[test]
    fn test_new_normalizes_keyword() {
        let rec = HeaderRecord::new(" object ", "M 31".into(), None);
        assert_eq!(rec.keyword(), "OBJECT");
        assert_eq!(rec.card(), None);
        assert_eq!(rec.to_string(), "OBJECT = M 31");
    }

    #[test]
    fn test_validate_keyword() {
        let params = EditorParams::default();
        assert!(HeaderRecord::new("DATE-OBS", 1.into(), None)
            .validate(&params)
            .is_ok());
        assert_eq!(
            HeaderRecord::new("TOOLONGKEY", 1.into(), None).validate(&params),
            Err(HeaderEditError::InvalidKeyword("TOOLONGKEY".into()))
        );
        assert_eq!(
            HeaderRecord::new("BAD KEY", 1.into(), None).validate(&params),
            Err(HeaderEditError::InvalidKeyword("BAD KEY".into()))
        );
        assert!(HeaderRecord::new("", 1.into(), None)
            .validate(&params)
            .is_err());
    }

    #[test]
    fn test_validate_joint_length() {
        let params = EditorParams::default();
        let value = "x".repeat(40);
        let comment = "c".repeat(30);

        // both fit individually, not together
        let rec = HeaderRecord::new("OBJECT", value.clone().into(), Some(comment));
        assert_eq!(
            rec.validate(&params),
            Err(HeaderEditError::ValueTooLong {
                keyword: "OBJECT".into(),
                len: 70,
                max: 65
            })
        );

        let rec = HeaderRecord::new("OBJECT", value.into(), Some("short".into()));
        assert!(rec.validate(&params).is_ok());

        // the joint limit only applies to string values
        let rec = HeaderRecord::new("EXPTIME", 30.0.into(), Some("c".repeat(70)));
        assert!(rec.validate(&params).is_ok());
    }

    #[test]
    fn test_validate_characters() {
        let params = EditorParams::default();
        let rec = HeaderRecord::new("OBJECT", "Andromède".into(), None);
        assert_eq!(
            rec.validate(&params),
            Err(HeaderEditError::InvalidCharacters("OBJECT".into()))
        );
    }

    #[test]
    fn test_validate_non_finite_real() {
        let params = EditorParams::default();
        for r in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(
                HeaderRecord::new("SCALE", HeaderValue::Real(r), None).validate(&params),
                Err(HeaderEditError::NonFiniteValue(r))
            );
        }
        assert!(HeaderRecord::new("SCALE", HeaderValue::Real(-0.0), None)
            .validate(&params)
            .is_ok());
    }

    #[test]
    fn test_validate_counts_escaped_quotes() {
        let params = EditorParams::default();

        let fits = format!("{}'", "x".repeat(66));
        assert!(HeaderRecord::new("NOTE", fits.into(), None)
            .validate(&params)
            .is_ok());

        // 68 characters, 69 once the quote is doubled
        let too_long = format!("{}'", "x".repeat(67));
        assert_eq!(
            HeaderRecord::new("NOTE", too_long.into(), None).validate(&params),
            Err(HeaderEditError::ValueTooLong {
                keyword: "NOTE".into(),
                len: 69,
                max: 68
            })
        );
    }
}
