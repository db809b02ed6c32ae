//! # Editor parameters
//!
//! This module defines the [`crate::params::EditorParams`] configuration struct and its builder,
//! which control the **length limits** enforced on every record written to a header and the
//! **numerical tolerances** of the time engine.
//!
//! ## Purpose
//!
//! The [`EditorParams`](crate::params::EditorParams) object centralizes every tunable value used by
//! the [`HeaderEditor`](crate::editor::HeaderEditor) operations. It allows you to:
//!
//! - Bound keyword, string value and comment lengths (individually and jointly),
//! - Tune the Kepler solver used by the heliocentric correction (tolerance, iteration cap),
//! - Choose how many fractional digits are kept when a Julian Date is persisted.
//!
//! ## Example
//!
//! ```rust
//! use fitsedit::params::EditorParams;
//!
//! let params = EditorParams::builder()
//!     .max_comment_len(47)
//!     .kepler_max_iter(50)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(params.max_keyword_len, 8);
//! ```
use serde::{Deserialize, Serialize};

use crate::constants::{
    MAX_COMMENT_LEN, MAX_KEYWORD_LEN, MAX_STRING_VALUE_LEN, MAX_STRING_WITH_COMMENT_LEN,
};
use crate::edit_errors::HeaderEditError;

/// Configuration parameters shared by every editor operation.
///
/// Fields
/// -----------------
/// **Header limits**
/// * `max_keyword_len` – maximum keyword length.
/// * `max_string_value_len` – maximum length of a string value, quotes excluded.
/// * `max_comment_len` – maximum comment length.
/// * `max_string_with_comment_len` – maximum combined length of a string value and its comment.
///   A string value and a comment that both fit individually may still overflow one card.
///
/// **Time engine**
/// * `kepler_eps` – residual below which the Newton iteration on Kepler's equation stops.
/// * `kepler_max_iter` – maximum number of Newton iterations before reporting non-convergence.
/// * `jd_decimal_places` – fractional digits kept when a Julian Date is written (half-up rounding).
///
/// Defaults
/// -----------------
/// * `max_keyword_len`: 8
/// * `max_string_value_len`: 68
/// * `max_comment_len`: 72
/// * `max_string_with_comment_len`: 65
/// * `kepler_eps`: 1e-12
/// * `kepler_max_iter`: 100
/// * `jd_decimal_places`: 6
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorParams {
    // --- Header limits ---
    pub max_keyword_len: usize,
    pub max_string_value_len: usize,
    pub max_comment_len: usize,
    pub max_string_with_comment_len: usize,

    // --- Time engine ---
    pub kepler_eps: f64,
    pub kepler_max_iter: usize,
    pub jd_decimal_places: u32,
}

impl EditorParams {
    /// Construct a new [`EditorParams`] with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [`EditorParamsBuilder`] initialized with the default values.
    pub fn builder() -> EditorParamsBuilder {
        EditorParamsBuilder::new()
    }
}

impl Default for EditorParams {
    fn default() -> Self {
        EditorParams {
            max_keyword_len: MAX_KEYWORD_LEN,
            max_string_value_len: MAX_STRING_VALUE_LEN,
            max_comment_len: MAX_COMMENT_LEN,
            max_string_with_comment_len: MAX_STRING_WITH_COMMENT_LEN,

            kepler_eps: 1e-12,
            kepler_max_iter: 100,
            jd_decimal_places: 6,
        }
    }
}

/// Builder for [`EditorParams`], with validation.
#[derive(Debug, Clone)]
pub struct EditorParamsBuilder {
    params: EditorParams,
}

impl Default for EditorParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: EditorParams::default(),
        }
    }

    // --- Header limits ---
    pub fn max_keyword_len(mut self, v: usize) -> Self {
        self.params.max_keyword_len = v;
        self
    }
    pub fn max_string_value_len(mut self, v: usize) -> Self {
        self.params.max_string_value_len = v;
        self
    }
    pub fn max_comment_len(mut self, v: usize) -> Self {
        self.params.max_comment_len = v;
        self
    }
    pub fn max_string_with_comment_len(mut self, v: usize) -> Self {
        self.params.max_string_with_comment_len = v;
        self
    }

    // --- Time engine ---
    pub fn kepler_eps(mut self, v: f64) -> Self {
        self.params.kepler_eps = v;
        self
    }
    pub fn kepler_max_iter(mut self, v: usize) -> Self {
        self.params.kepler_max_iter = v;
        self
    }
    pub fn jd_decimal_places(mut self, v: u32) -> Self {
        self.params.jd_decimal_places = v;
        self
    }

    /// Finalize the builder and produce an [`EditorParams`] instance.
    ///
    /// Validation rules
    /// -----------------
    /// * every length limit is at least 1,
    /// * `max_keyword_len <= 8`, longer keywords need the HIERARCH convention which is not supported,
    /// * `max_string_with_comment_len <= max_string_value_len`,
    /// * `kepler_eps > 0.0` and finite, `kepler_max_iter >= 1`,
    /// * `jd_decimal_places <= 15`, the resolution of an `f64` Julian Date.
    ///
    /// Returns
    /// -----------------
    /// * `Ok(EditorParams)` if all values are valid.
    /// * `Err(HeaderEditError::InvalidParams)` naming the first rule that failed.
    pub fn build(self) -> Result<EditorParams, HeaderEditError> {
        let p = &self.params;

        if p.max_keyword_len == 0 || p.max_keyword_len > MAX_KEYWORD_LEN {
            return Err(HeaderEditError::InvalidParams(format!(
                "max_keyword_len must be in 1..={MAX_KEYWORD_LEN}"
            )));
        }
        if p.max_string_value_len == 0
            || p.max_comment_len == 0
            || p.max_string_with_comment_len == 0
        {
            return Err(HeaderEditError::InvalidParams(
                "length limits must be at least 1".into(),
            ));
        }
        if p.max_string_with_comment_len > p.max_string_value_len {
            return Err(HeaderEditError::InvalidParams(
                "max_string_with_comment_len must not exceed max_string_value_len".into(),
            ));
        }
        if !(p.kepler_eps.is_finite() && p.kepler_eps > 0.0) {
            return Err(HeaderEditError::InvalidParams(
                "kepler_eps must be a positive finite number".into(),
            ));
        }
        if p.kepler_max_iter == 0 {
            return Err(HeaderEditError::InvalidParams(
                "kepler_max_iter must be at least 1".into(),
            ));
        }
        if p.jd_decimal_places > 15 {
            return Err(HeaderEditError::InvalidParams(
                "jd_decimal_places must be at most 15".into(),
            ));
        }

        Ok(self.params)
    }
}
