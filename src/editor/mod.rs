//! # Header editor
//!
//! [`HeaderEditor`] is an extension trait implemented for every [`HeaderStore`]. It gathers the
//! editing operations of a header: positional mutations (add, insert, remove, rename, change),
//! chained values, date/time shifts and the Julian Date computations.
//!
//! ## Contract
//!
//! * Every operation returns `Ok(message)` on success or a [`HeaderEditError`] naming the
//!   keyword or index at fault. The message is meant for a log or console sink.
//! * Operations are atomic: every check runs before the first mutation, so a failed operation
//!   leaves the store untouched.
//! * Structural keywords (see [`keyword_guard`](crate::header::keyword_guard)) are never
//!   changed, removed, renamed or displaced.
//! * Indices are **1-based**, counting from the first record. An index of `0` is a programming
//!   error and panics.
//!
//! ## Example
//!
//! ```rust
//! use fitsedit::editor::HeaderEditor;
//! use fitsedit::header::document::HeaderDocument;
//! use fitsedit::header::value::HeaderValue;
//! use fitsedit::header::HeaderStore;
//! use fitsedit::params::EditorParams;
//!
//! let params = EditorParams::default();
//! let mut header = HeaderDocument::new();
//!
//! header
//!     .add_record("OBJECT", HeaderValue::from("M31"), Some("target"), false, &params)
//!     .unwrap();
//! header.rename_keyword("OBJECT", "TARGET", false, &params).unwrap();
//!
//! assert!(header.exists("TARGET"));
//! ```
pub mod chain;
pub mod compute;
pub mod shift;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use crate::conversion::Sexagesimal;
use crate::edit_errors::HeaderEditError;
use crate::header::keyword_guard::is_protected;
use crate::header::record::{normalize_keyword, validate_keyword, HeaderRecord};
use crate::header::value::HeaderValue;
use crate::header::HeaderStore;
use crate::params::EditorParams;

use chain::ChainToken;
use compute::ValueSource;
use shift::TimeShift;

/// Flattened outcome of an operation, `{success, message}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditReport {
    pub success: bool,
    pub message: String,
}

impl From<Result<String, HeaderEditError>> for EditReport {
    fn from(outcome: Result<String, HeaderEditError>) -> Self {
        match outcome {
            Ok(message) => EditReport {
                success: true,
                message,
            },
            Err(err) => EditReport {
                success: false,
                message: err.to_string(),
            },
        }
    }
}

pub(crate) fn ensure_unprotected(keyword: &str) -> Result<(), HeaderEditError> {
    if is_protected(keyword) {
        return Err(HeaderEditError::ProtectedKeyword(keyword.to_string()));
    }
    Ok(())
}

/// Build and validate a new record.
pub(crate) fn prepare_record(
    keyword: &str,
    value: HeaderValue,
    comment: Option<&str>,
    params: &EditorParams,
) -> Result<HeaderRecord, HeaderEditError> {
    let record = HeaderRecord::new(keyword, value, comment.map(str::to_string));
    record.validate(params)?;
    Ok(record)
}

/// Where an upsert lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placement {
    Append,
    Replace(usize),
}

/// Checks of the add-or-update policy, without mutating the store.
pub(crate) fn plan_upsert<S: HeaderStore + ?Sized>(
    store: &S,
    record: &HeaderRecord,
    update_if_exists: bool,
) -> Result<Placement, HeaderEditError> {
    match store.position_of(record.keyword()) {
        None => Ok(Placement::Append),
        Some(_) if !update_if_exists => {
            Err(HeaderEditError::KeywordExists(record.keyword().to_string()))
        }
        Some(pos) => {
            ensure_unprotected(record.keyword())?;
            Ok(Placement::Replace(pos))
        }
    }
}

pub(crate) fn apply_upsert<S: HeaderStore + ?Sized>(
    store: &mut S,
    record: HeaderRecord,
    placement: Placement,
) -> String {
    let keyword = record.keyword().to_string();
    match placement {
        Placement::Append => {
            debug!(keyword = %keyword, "append record");
            store.push(record);
            format!("Record {keyword} added")
        }
        Placement::Replace(pos) => {
            debug!(keyword = %keyword, position = pos, "replace record");
            store.replace_at(pos, record);
            format!("Record {keyword} updated")
        }
    }
}

pub(crate) fn upsert<S: HeaderStore + ?Sized>(
    store: &mut S,
    record: HeaderRecord,
    update_if_exists: bool,
) -> Result<String, HeaderEditError> {
    let placement = plan_upsert(&*store, &record, update_if_exists)?;
    Ok(apply_upsert(store, record, placement))
}

fn check_index(index: usize) {
    assert!(index >= 1, "header indices are 1-based, got 0");
}

/// Editing operations available on every [`HeaderStore`].
///
/// Keywords given to the operations are normalized (trimmed, upper case) before use.
pub trait HeaderEditor {
    /// Append a record, or update the existing one in place.
    ///
    /// Arguments
    /// -----------------
    /// * `keyword`: record keyword.
    /// * `value`: the new value.
    /// * `comment`: the new comment.
    /// * `update_if_exists`: replace value and comment of an existing record instead of failing.
    /// * `params`: header limits.
    ///
    /// Return
    /// ----------
    /// * A success message, or [`HeaderEditError::KeywordExists`] when the keyword is present
    ///   and `update_if_exists` is false, [`HeaderEditError::ProtectedKeyword`] when the update
    ///   would touch a structural record, or a validation error.
    fn add_record(
        &mut self,
        keyword: &str,
        value: HeaderValue,
        comment: Option<&str>,
        update_if_exists: bool,
        params: &EditorParams,
    ) -> Result<String, HeaderEditError>;

    /// Insert a record so it occupies the 1-based position `index`.
    ///
    /// When the keyword already exists, the old record is removed first if
    /// `remove_old_if_exists`, and `index` is understood against the header after that removal.
    /// An index past the last record appends. A structural record is never displaced.
    ///
    /// # Panics
    /// If `index == 0`.
    fn add_record_at_index(
        &mut self,
        index: usize,
        keyword: &str,
        value: HeaderValue,
        comment: Option<&str>,
        remove_old_if_exists: bool,
        params: &EditorParams,
    ) -> Result<String, HeaderEditError>;

    /// Remove the first record with this keyword.
    fn remove_by_keyword(&mut self, keyword: &str) -> Result<String, HeaderEditError>;

    /// Remove the record at the 1-based position `index`.
    ///
    /// # Panics
    /// If `index == 0`.
    fn remove_by_index(&mut self, index: usize) -> Result<String, HeaderEditError>;

    /// Rename a record, keeping its value, comment and position.
    ///
    /// If `new` is already used, that record is removed first when `remove_new_if_exists`.
    /// Neither `old` nor `new` may be a structural keyword, whether or not `new` is present.
    /// Renaming a keyword to itself succeeds without changes.
    fn rename_keyword(
        &mut self,
        old: &str,
        new: &str,
        remove_new_if_exists: bool,
        params: &EditorParams,
    ) -> Result<String, HeaderEditError>;

    /// Replace the value of a record in place.
    ///
    /// A `None` comment keeps the existing one. A missing keyword is appended when
    /// `add_if_missing`, otherwise the operation fails.
    fn change_value(
        &mut self,
        keyword: &str,
        value: HeaderValue,
        comment: Option<&str>,
        add_if_missing: bool,
        params: &EditorParams,
    ) -> Result<String, HeaderEditError>;

    /// Write the concatenation of literals and other records' values under `keyword`.
    ///
    /// See [`chain::build_chain`] for the resolution rules.
    fn chain_records(
        &mut self,
        keyword: &str,
        chain: &[ChainToken],
        comment: Option<&str>,
        update_if_exists: bool,
        skip_missing_refs: bool,
        params: &EditorParams,
    ) -> Result<String, HeaderEditError>;

    /// Shift a date, time or date-time value. See [`shift`].
    fn shift_time(
        &mut self,
        keyword: &str,
        shift: &TimeShift,
        params: &EditorParams,
    ) -> Result<String, HeaderEditError>;

    /// Write the Julian Date at mid-exposure under `JD`. See [`compute`].
    fn compute_julian_date(
        &mut self,
        datetime: &ValueSource<NaiveDateTime>,
        exposure: &ValueSource<f64>,
        comment: Option<&str>,
        params: &EditorParams,
    ) -> Result<String, HeaderEditError>;

    /// Write the Heliocentric Julian Date at mid-exposure under `HJD`, and the literal
    /// coordinates under `RA`/`DEC`. See [`compute`].
    fn compute_heliocentric_julian_date(
        &mut self,
        datetime: &ValueSource<NaiveDateTime>,
        exposure: &ValueSource<f64>,
        ra: &ValueSource<Sexagesimal>,
        dec: &ValueSource<Sexagesimal>,
        comment: Option<&str>,
        params: &EditorParams,
    ) -> Result<String, HeaderEditError>;
}

impl<S: HeaderStore + ?Sized> HeaderEditor for S {
    fn add_record(
        &mut self,
        keyword: &str,
        value: HeaderValue,
        comment: Option<&str>,
        update_if_exists: bool,
        params: &EditorParams,
    ) -> Result<String, HeaderEditError> {
        let record = prepare_record(keyword, value, comment, params)?;
        upsert(self, record, update_if_exists)
    }

    fn add_record_at_index(
        &mut self,
        index: usize,
        keyword: &str,
        value: HeaderValue,
        comment: Option<&str>,
        remove_old_if_exists: bool,
        params: &EditorParams,
    ) -> Result<String, HeaderEditError> {
        check_index(index);
        let record = prepare_record(keyword, value, comment, params)?;
        let keyword = record.keyword().to_string();

        let old_position = self.position_of(&keyword);
        if old_position.is_some() {
            if !remove_old_if_exists {
                return Err(HeaderEditError::KeywordExists(keyword));
            }
            ensure_unprotected(&keyword)?;
        }

        // position in the header once the old record is gone
        let target = index - 1;
        let count_after = self.record_count() - usize::from(old_position.is_some());
        if target < count_after {
            let current = match old_position {
                Some(old) if old <= target => target + 1,
                _ => target,
            };
            if let Some(displaced) = self.get(current) {
                ensure_unprotected(displaced.keyword())?;
            }
        }

        if let Some(old) = old_position {
            debug!(keyword = %keyword, position = old, "remove previous record");
            self.remove_at(old);
        }
        if target >= self.record_count() {
            debug!(keyword = %keyword, index, "index past the last record, append");
            self.push(record);
            Ok(format!("Record {keyword} added at the end of the header"))
        } else {
            debug!(keyword = %keyword, index, "insert record");
            self.insert_at(target, record);
            Ok(format!("Record {keyword} inserted at index {index}"))
        }
    }

    fn remove_by_keyword(&mut self, keyword: &str) -> Result<String, HeaderEditError> {
        let keyword = normalize_keyword(keyword);
        let pos = self
            .position_of(&keyword)
            .ok_or_else(|| HeaderEditError::KeywordNotFound(keyword.clone()))?;
        ensure_unprotected(&keyword)?;

        debug!(keyword = %keyword, position = pos, "remove record");
        self.remove_at(pos);
        Ok(format!("Record {keyword} removed"))
    }

    fn remove_by_index(&mut self, index: usize) -> Result<String, HeaderEditError> {
        check_index(index);
        let count = self.record_count();
        let record = self
            .get(index - 1)
            .ok_or(HeaderEditError::IndexOutOfRange { index, count })?;
        ensure_unprotected(record.keyword())?;

        let removed = self.remove_at(index - 1);
        debug!(keyword = %removed.keyword(), index, "remove record");
        Ok(format!(
            "Record {} at index {index} removed",
            removed.keyword()
        ))
    }

    fn rename_keyword(
        &mut self,
        old: &str,
        new: &str,
        remove_new_if_exists: bool,
        params: &EditorParams,
    ) -> Result<String, HeaderEditError> {
        let old = normalize_keyword(old);
        let new = normalize_keyword(new);

        let (old_pos, renamed) = self
            .position_of(&old)
            .and_then(|pos| self.get(pos).map(|record| (pos, record.renamed(&new))))
            .ok_or_else(|| HeaderEditError::KeywordNotFound(old.clone()))?;
        ensure_unprotected(&old)?;
        if old == new {
            return Ok(format!("Keyword {old} unchanged"));
        }
        validate_keyword(&new, params)?;
        ensure_unprotected(&new)?;

        let new_pos = self.position_of(&new);
        if new_pos.is_some() && !remove_new_if_exists {
            return Err(HeaderEditError::KeywordExists(new));
        }

        let mut target = old_pos;
        if let Some(pos) = new_pos {
            debug!(keyword = %new, position = pos, "remove record in the way of a rename");
            self.remove_at(pos);
            if pos < old_pos {
                target -= 1;
            }
        }
        debug!(old = %old, new = %new, position = target, "rename record");
        self.replace_at(target, renamed);
        Ok(format!("Keyword {old} renamed to {new}"))
    }

    fn change_value(
        &mut self,
        keyword: &str,
        value: HeaderValue,
        comment: Option<&str>,
        add_if_missing: bool,
        params: &EditorParams,
    ) -> Result<String, HeaderEditError> {
        let keyword = normalize_keyword(keyword);
        let Some(pos) = self.position_of(&keyword) else {
            if !add_if_missing {
                return Err(HeaderEditError::KeywordNotFound(keyword));
            }
            let record = prepare_record(&keyword, value, comment, params)?;
            return Ok(apply_upsert(self, record, Placement::Append));
        };
        ensure_unprotected(&keyword)?;

        let kept_comment = self
            .get(pos)
            .and_then(|record| record.comment())
            .map(str::to_string);
        let comment = comment.map(str::to_string).or(kept_comment);
        let record = prepare_record(&keyword, value, comment.as_deref(), params)?;

        debug!(keyword = %keyword, position = pos, "change value");
        self.replace_at(pos, record);
        Ok(format!("Value of {keyword} changed"))
    }

    fn chain_records(
        &mut self,
        keyword: &str,
        chain: &[ChainToken],
        comment: Option<&str>,
        update_if_exists: bool,
        skip_missing_refs: bool,
        params: &EditorParams,
    ) -> Result<String, HeaderEditError> {
        chain::chain_records(
            self,
            keyword,
            chain,
            comment,
            update_if_exists,
            skip_missing_refs,
            params,
        )
    }

    fn shift_time(
        &mut self,
        keyword: &str,
        shift: &TimeShift,
        params: &EditorParams,
    ) -> Result<String, HeaderEditError> {
        shift::shift_time(self, keyword, shift, params)
    }

    fn compute_julian_date(
        &mut self,
        datetime: &ValueSource<NaiveDateTime>,
        exposure: &ValueSource<f64>,
        comment: Option<&str>,
        params: &EditorParams,
    ) -> Result<String, HeaderEditError> {
        compute::compute_julian_date(self, datetime, exposure, comment, params)
    }

    fn compute_heliocentric_julian_date(
        &mut self,
        datetime: &ValueSource<NaiveDateTime>,
        exposure: &ValueSource<f64>,
        ra: &ValueSource<Sexagesimal>,
        dec: &ValueSource<Sexagesimal>,
        comment: Option<&str>,
        params: &EditorParams,
    ) -> Result<String, HeaderEditError> {
        compute::compute_heliocentric_julian_date(
            self, datetime, exposure, ra, dec, comment, params,
        )
    }
}
