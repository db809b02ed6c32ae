//! # Batch processing
//!
//! An [`EditRequest`] describes one editor operation with all its arguments. It can be built in
//! code or deserialized (JSON, TOML, ...) and then applied to any number of files with
//! [`process_files`].
//!
//! Files are processed one after the other. Each file is an independent unit of failure: an
//! error on one file is recorded in its [`FileReport`] and the next file is processed as usual.
//! A file is written back only when the operation succeeded.
//!
//! ```rust, no_run
//! use fitsedit::batch::{process_files, EditRequest};
//! use fitsedit::header::value::HeaderValue;
//! use fitsedit::params::EditorParams;
//!
//! let request = EditRequest::AddRecord {
//!     keyword: "OBSERVER".into(),
//!     value: HeaderValue::from("E. Hubble"),
//!     comment: None,
//!     update_if_exists: true,
//! };
//! let reports = process_files(&["a.fits", "b.fits"], &request, &EditorParams::default());
//! assert!(reports.iter().all(|r| r.success));
//! ```
use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::conversion::Sexagesimal;
use crate::edit_errors::HeaderEditError;
use crate::editor::chain::ChainToken;
use crate::editor::compute::ValueSource;
use crate::editor::shift::TimeShift;
use crate::editor::HeaderEditor;
use crate::fits_file::FitsFile;
use crate::header::value::HeaderValue;
use crate::header::HeaderStore;
use crate::params::EditorParams;

/// One editor operation and its arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum EditRequest {
    AddRecord {
        keyword: String,
        value: HeaderValue,
        #[serde(default)]
        comment: Option<String>,
        #[serde(default)]
        update_if_exists: bool,
    },
    AddRecordAtIndex {
        index: usize,
        keyword: String,
        value: HeaderValue,
        #[serde(default)]
        comment: Option<String>,
        #[serde(default)]
        remove_old_if_exists: bool,
    },
    RemoveByKeyword {
        keyword: String,
    },
    RemoveByIndex {
        index: usize,
    },
    RenameKeyword {
        old: String,
        new: String,
        #[serde(default)]
        remove_new_if_exists: bool,
    },
    ChangeValue {
        keyword: String,
        value: HeaderValue,
        #[serde(default)]
        comment: Option<String>,
        #[serde(default)]
        add_if_missing: bool,
    },
    ChainRecords {
        keyword: String,
        chain: Vec<ChainToken>,
        #[serde(default)]
        comment: Option<String>,
        #[serde(default)]
        update_if_exists: bool,
        #[serde(default)]
        skip_missing_refs: bool,
    },
    ShiftTime {
        keyword: String,
        shift: TimeShift,
    },
    ComputeJulianDate {
        datetime: ValueSource<NaiveDateTime>,
        exposure: ValueSource<f64>,
        #[serde(default)]
        comment: Option<String>,
    },
    ComputeHeliocentricJulianDate {
        datetime: ValueSource<NaiveDateTime>,
        exposure: ValueSource<f64>,
        ra: ValueSource<Sexagesimal>,
        dec: ValueSource<Sexagesimal>,
        #[serde(default)]
        comment: Option<String>,
    },
}

impl EditRequest {
    /// Apply the operation to a header.
    ///
    /// Unlike the [`HeaderEditor`] methods, a request carrying index `0` fails with
    /// [`HeaderEditError::IndexOutOfRange`] instead of panicking: requests usually come from
    /// user input.
    pub fn apply<S: HeaderStore + ?Sized>(
        &self,
        store: &mut S,
        params: &EditorParams,
    ) -> Result<String, HeaderEditError> {
        match self {
            EditRequest::AddRecord {
                keyword,
                value,
                comment,
                update_if_exists,
            } => store.add_record(
                keyword,
                value.clone(),
                comment.as_deref(),
                *update_if_exists,
                params,
            ),
            EditRequest::AddRecordAtIndex {
                index,
                keyword,
                value,
                comment,
                remove_old_if_exists,
            } => {
                check_request_index(&*store, *index)?;
                store.add_record_at_index(
                    *index,
                    keyword,
                    value.clone(),
                    comment.as_deref(),
                    *remove_old_if_exists,
                    params,
                )
            }
            EditRequest::RemoveByKeyword { keyword } => store.remove_by_keyword(keyword),
            EditRequest::RemoveByIndex { index } => {
                check_request_index(&*store, *index)?;
                store.remove_by_index(*index)
            }
            EditRequest::RenameKeyword {
                old,
                new,
                remove_new_if_exists,
            } => store.rename_keyword(old, new, *remove_new_if_exists, params),
            EditRequest::ChangeValue {
                keyword,
                value,
                comment,
                add_if_missing,
            } => store.change_value(
                keyword,
                value.clone(),
                comment.as_deref(),
                *add_if_missing,
                params,
            ),
            EditRequest::ChainRecords {
                keyword,
                chain,
                comment,
                update_if_exists,
                skip_missing_refs,
            } => store.chain_records(
                keyword,
                chain,
                comment.as_deref(),
                *update_if_exists,
                *skip_missing_refs,
                params,
            ),
            EditRequest::ShiftTime { keyword, shift } => store.shift_time(keyword, shift, params),
            EditRequest::ComputeJulianDate {
                datetime,
                exposure,
                comment,
            } => store.compute_julian_date(datetime, exposure, comment.as_deref(), params),
            EditRequest::ComputeHeliocentricJulianDate {
                datetime,
                exposure,
                ra,
                dec,
                comment,
            } => store.compute_heliocentric_julian_date(
                datetime,
                exposure,
                ra,
                dec,
                comment.as_deref(),
                params,
            ),
        }
    }
}

fn check_request_index<S: HeaderStore + ?Sized>(
    store: &S,
    index: usize,
) -> Result<(), HeaderEditError> {
    if index == 0 {
        return Err(HeaderEditError::IndexOutOfRange {
            index,
            count: store.record_count(),
        });
    }
    Ok(())
}

/// Outcome of a request on one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: Utf8PathBuf,
    pub success: bool,
    pub message: String,
}

fn process_file(
    path: &Utf8Path,
    request: &EditRequest,
    params: &EditorParams,
) -> Result<String, HeaderEditError> {
    let mut file = FitsFile::open(path)?;
    let message = request.apply(&mut file, params)?;
    file.persist()?;
    Ok(message)
}

/// Apply `request` to every file of `paths`, in order.
///
/// Arguments
/// -----------------
/// * `paths`: the files to edit.
/// * `request`: the operation to apply to each of them.
/// * `params`: header limits and solver settings.
///
/// Return
/// ----------
/// * One [`FileReport`] per path, in the same order. Failed files are left untouched on disk.
pub fn process_files<P: AsRef<Utf8Path>>(
    paths: &[P],
    request: &EditRequest,
    params: &EditorParams,
) -> Vec<FileReport> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            match process_file(path, request, params) {
                Ok(message) => {
                    info!(path = %path, "{message}");
                    FileReport {
                        path: path.to_path_buf(),
                        success: true,
                        message,
                    }
                }
                Err(err) => {
                    warn!(path = %path, error = %err, "file left unchanged");
                    FileReport {
                        path: path.to_path_buf(),
                        success: false,
                        message: err.to_string(),
                    }
                }
            }
        })
        .collect()
}
