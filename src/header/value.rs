use std::fmt;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Value stored in a header record.
///
/// A value is never modified in place: editor operations build a new [`HeaderValue`] and
/// replace the old one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HeaderValue {
    Int(i32),
    Long(i64),
    BigInt(BigInt),
    Real(f64),
    Decimal(BigDecimal),
    Logical(bool),
    Text(String),
}

impl HeaderValue {
    /// Name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            HeaderValue::Int(_) => "int",
            HeaderValue::Long(_) => "long",
            HeaderValue::BigInt(_) => "big integer",
            HeaderValue::Real(_) => "real",
            HeaderValue::Decimal(_) => "decimal",
            HeaderValue::Logical(_) => "logical",
            HeaderValue::Text(_) => "string",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            HeaderValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of the value, `None` for logical and string values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            HeaderValue::Int(i) => Some(*i as f64),
            HeaderValue::Long(l) => Some(*l as f64),
            HeaderValue::BigInt(b) => b.to_f64(),
            HeaderValue::Real(r) => Some(*r),
            HeaderValue::Decimal(d) => d.to_f64(),
            HeaderValue::Logical(_) | HeaderValue::Text(_) => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, HeaderValue::Logical(_) | HeaderValue::Text(_))
    }
}

/// Stringified form of the value, as concatenated by chains.
///
/// Strings are rendered without quotes and logicals as `T`/`F`, the header convention.
impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Int(i) => write!(f, "{i}"),
            HeaderValue::Long(l) => write!(f, "{l}"),
            HeaderValue::BigInt(b) => write!(f, "{b}"),
            HeaderValue::Real(r) => write!(f, "{r:?}"),
            HeaderValue::Decimal(d) => write!(f, "{d}"),
            HeaderValue::Logical(b) => write!(f, "{}", if *b { "T" } else { "F" }),
            HeaderValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i32> for HeaderValue {
    fn from(v: i32) -> Self {
        HeaderValue::Int(v)
    }
}

impl From<i64> for HeaderValue {
    fn from(v: i64) -> Self {
        HeaderValue::Long(v)
    }
}

impl From<BigInt> for HeaderValue {
    fn from(v: BigInt) -> Self {
        HeaderValue::BigInt(v)
    }
}

impl From<f64> for HeaderValue {
    fn from(v: f64) -> Self {
        HeaderValue::Real(v)
    }
}

impl From<BigDecimal> for HeaderValue {
    fn from(v: BigDecimal) -> Self {
        HeaderValue::Decimal(v)
    }
}

impl From<bool> for HeaderValue {
    fn from(v: bool) -> Self {
        HeaderValue::Logical(v)
    }
}

impl From<String> for HeaderValue {
    fn from(v: String) -> Self {
        HeaderValue::Text(v)
    }
}

impl From<&str> for HeaderValue {
    fn from(v: &str) -> Self {
        HeaderValue::Text(v.to_string())
    }
}
