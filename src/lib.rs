//! Editing of FITS header records, with Julian Date and Heliocentric Julian Date computation.
//!
//! * [`header`]: records, values, the [`HeaderStore`](header::HeaderStore) contract and the
//!   in-memory [`HeaderDocument`](header::document::HeaderDocument).
//! * [`editor`]: the [`HeaderEditor`](editor::HeaderEditor) operations.
//! * [`fits_file`]: loading and persisting the primary header of a FITS file.
//! * [`batch`]: typed requests applied to many files.
pub mod batch;
pub mod constants;
pub mod conversion;
pub mod edit_errors;
pub mod editor;
pub mod fits_file;
pub mod header;
pub mod heliocentric;
pub mod kepler;
pub mod params;
pub mod time;

pub use edit_errors::HeaderEditError;
pub use editor::{EditReport, HeaderEditor};
pub use header::HeaderStore;
pub use params::EditorParams;
