//! Classification of structural keywords.
//!
//! The mandatory keywords of a FITS header (`SIMPLE`, `BITPIX`, `NAXIS`, `NAXISn`, `EXTEND`,
//! `XTENSION`) describe the layout of the data unit. Removing, renaming or moving one of them
//! corrupts the file, so every editor operation refuses to touch them.
use std::sync::LazyLock;

use regex::Regex;

static PROTECTED_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:NAXIS\d{0,3}|SIMPLE|BITPIX|EXTEND|XTENSION)$")
        .expect("protected keyword pattern is valid")
});

/// Return `true` if `keyword` names a structural record.
///
/// The comparison is case-insensitive and ignores surrounding blanks, so `naxis1` and
/// `"NAXIS1  "` are protected as well.
pub fn is_protected(keyword: &str) -> bool {
    PROTECTED_KEYWORDS.is_match(&keyword.trim().to_ascii_uppercase())
}
