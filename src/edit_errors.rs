use thiserror::Error;

#[derive(Error, Debug)]
pub enum HeaderEditError {
    #[error("Keyword {0} not found in header")]
    KeywordNotFound(String),

    #[error("Keyword {0} already exists in header")]
    KeywordExists(String),

    #[error("Keyword {0} is protected and cannot be modified")]
    ProtectedKeyword(String),

    #[error("Index {index} is out of range (header holds {count} records)")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("Invalid keyword: {0:?}")]
    InvalidKeyword(String),

    #[error("Value of {keyword} is too long ({len} > {max} characters)")]
    ValueTooLong {
        keyword: String,
        len: usize,
        max: usize,
    },

    #[error("Comment of {keyword} is too long ({len} > {max} characters)")]
    CommentTooLong {
        keyword: String,
        len: usize,
        max: usize,
    },

    #[error("Value of {0} contains characters that cannot be stored in a header card")]
    InvalidCharacters(String),

    #[error("Chained value for {0} is empty")]
    EmptyChainValue(String),

    #[error("Keyword {0} referenced by the chain not found in header")]
    ChainKeywordMissing(String),

    #[error("Value of {keyword} is not a parsable date/time: {value:?}")]
    UnparsableDateTime { keyword: String, value: String },

    #[error("Shifting the value of {0} overflows the supported date/time range")]
    ShiftOverflow(String),

    #[error("Value of {keyword} has the wrong type, expected {expected}")]
    WrongValueType {
        keyword: String,
        expected: &'static str,
    },

    #[error("Non finite numeric value: {0}")]
    NonFiniteValue(f64),

    #[error("Kepler equation did not converge after {0} iterations")]
    KeplerNoConvergence(usize),

    #[error("Invalid FITS file: {0}")]
    InvalidFitsFile(String),

    #[error("Invalid editor parameters: {0}")]
    InvalidParams(String),

    #[error("Unable to perform file operation: {0}")]
    Io(#[from] std::io::Error),
}

impl PartialEq for HeaderEditError {
    fn eq(&self, other: &Self) -> bool {
        use HeaderEditError::*;
        match (self, other) {
            (KeywordNotFound(a), KeywordNotFound(b)) => a == b,
            (KeywordExists(a), KeywordExists(b)) => a == b,
            (ProtectedKeyword(a), ProtectedKeyword(b)) => a == b,
            (
                IndexOutOfRange { index: a, count: c },
                IndexOutOfRange { index: b, count: d },
            ) => a == b && c == d,
            (InvalidKeyword(a), InvalidKeyword(b)) => a == b,
            (
                ValueTooLong {
                    keyword: a,
                    len: l1,
                    max: m1,
                },
                ValueTooLong {
                    keyword: b,
                    len: l2,
                    max: m2,
                },
            ) => a == b && l1 == l2 && m1 == m2,
            (
                CommentTooLong {
                    keyword: a,
                    len: l1,
                    max: m1,
                },
                CommentTooLong {
                    keyword: b,
                    len: l2,
                    max: m2,
                },
            ) => a == b && l1 == l2 && m1 == m2,
            (InvalidCharacters(a), InvalidCharacters(b)) => a == b,
            (EmptyChainValue(a), EmptyChainValue(b)) => a == b,
            (ChainKeywordMissing(a), ChainKeywordMissing(b)) => a == b,
            (
                UnparsableDateTime {
                    keyword: a,
                    value: v1,
                },
                UnparsableDateTime {
                    keyword: b,
                    value: v2,
                },
            ) => a == b && v1 == v2,
            (ShiftOverflow(a), ShiftOverflow(b)) => a == b,
            (
                WrongValueType {
                    keyword: a,
                    expected: e1,
                },
                WrongValueType {
                    keyword: b,
                    expected: e2,
                },
            ) => a == b && e1 == e2,
            // NaN never equals itself, compare the bit patterns instead
            (NonFiniteValue(a), NonFiniteValue(b)) => a.to_bits() == b.to_bits(),
            (KeplerNoConvergence(a), KeplerNoConvergence(b)) => a == b,
            (InvalidFitsFile(a), InvalidFitsFile(b)) => a == b,
            (InvalidParams(a), InvalidParams(b)) => a == b,

            // I/O errors are not comparable: equal if same variant
            (Io(_), Io(_)) => true,

            _ => false,
        }
    }
}
