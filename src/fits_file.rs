//! # FITS file header store
//!
//! [`FitsFile`] loads the **primary header** of a FITS file into a
//! [`HeaderDocument`] and writes the whole file back once an edit succeeded.
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ primary header               │  n × 2880-byte blocks, 36 cards of 80 chars each,
//! │   ... cards ... END  (blank) │  terminated by the END card, padded with blanks
//! ├──────────────────────────────┤
//! │ data unit, extensions        │  copied verbatim, never interpreted
//! └──────────────────────────────┘
//! ```
//!
//! Because the header may grow or shrink by whole blocks, the file is always rewritten in full.
//! No attempt is made to make that rewrite atomic.
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::constants::{BLOCK_SIZE, CARDS_PER_BLOCK, CARD_SIZE};
use crate::edit_errors::HeaderEditError;
use crate::header::card::{format_card, parse_card};
use crate::header::document::HeaderDocument;
use crate::header::record::HeaderRecord;
use crate::header::HeaderStore;

const END_CARD: &str = "END";

/// A FITS file opened for header editing.
///
/// The header is exposed through [`HeaderStore`]; the bytes following the header are kept
/// untouched in memory and written back after the new header by [`FitsFile::persist`].
#[derive(Debug, Clone)]
pub struct FitsFile {
    path: Utf8PathBuf,
    header: HeaderDocument,
    trailing: Vec<u8>,
}

/// Decode one card, replacing bytes outside printable ASCII so that parsing works on
/// character boundaries.
fn decode_card(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| if (0x20..=0x7e).contains(&b) { b as char } else { '?' })
        .collect()
}

impl FitsFile {
    /// Read a FITS file and parse its primary header.
    ///
    /// Arguments
    /// -----------------
    /// * `path`: path of the FITS file.
    ///
    /// Return
    /// ----------
    /// * The opened file, [`HeaderEditError::Io`] if it cannot be read, or
    ///   [`HeaderEditError::InvalidFitsFile`] if its size is not a multiple of 2880 bytes or no
    ///   `END` card terminates the primary header.
    pub fn open(path: impl AsRef<Utf8Path>) -> Result<Self, HeaderEditError> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        Self::from_bytes(path, &bytes)
    }

    /// Parse the content of a FITS file already in memory.
    pub fn from_bytes(path: &Utf8Path, bytes: &[u8]) -> Result<Self, HeaderEditError> {
        if bytes.is_empty() || bytes.len() % BLOCK_SIZE != 0 {
            return Err(HeaderEditError::InvalidFitsFile(format!(
                "{path}: size {} is not a non-zero multiple of {BLOCK_SIZE} bytes",
                bytes.len()
            )));
        }

        let mut records = Vec::new();
        for (i, raw) in bytes.chunks_exact(CARD_SIZE).enumerate() {
            let card = decode_card(raw);
            if card[..8].trim_end() == END_CARD {
                let header_end = (i / CARDS_PER_BLOCK + 1) * BLOCK_SIZE;
                debug!(%path, records = records.len(), "primary header loaded");
                return Ok(FitsFile {
                    path: path.to_owned(),
                    header: records.into_iter().collect(),
                    trailing: bytes[header_end..].to_vec(),
                });
            }
            records.push(parse_card(&card));
        }

        Err(HeaderEditError::InvalidFitsFile(format!(
            "{path}: no END card in primary header"
        )))
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn header(&self) -> &HeaderDocument {
        &self.header
    }

    /// Serialize the header and the untouched trailing bytes.
    ///
    /// Return
    /// ----------
    /// * The complete file content, or the formatting error of the first record that cannot be
    ///   written as a card.
    pub fn to_bytes(&self) -> Result<Vec<u8>, HeaderEditError> {
        let mut out = Vec::with_capacity((self.header.record_count() + 1) * CARD_SIZE);
        for record in self.header.records() {
            out.extend_from_slice(format_card(record)?.as_bytes());
        }
        out.extend_from_slice(format!("{END_CARD:<CARD_SIZE$}").as_bytes());

        let padded = out.len().div_ceil(BLOCK_SIZE) * BLOCK_SIZE;
        out.resize(padded, b' ');
        out.extend_from_slice(&self.trailing);
        Ok(out)
    }

    /// Write the whole file back to its path.
    pub fn persist(&self) -> Result<(), HeaderEditError> {
        let bytes = self.to_bytes()?;
        fs::write(&self.path, bytes)?;
        debug!(path = %self.path, "file persisted");
        Ok(())
    }
}

impl HeaderStore for FitsFile {
    fn record_count(&self) -> usize {
        self.header.record_count()
    }

    fn position_of(&self, keyword: &str) -> Option<usize> {
        self.header.position_of(keyword)
    }

    fn get(&self, position: usize) -> Option<&HeaderRecord> {
        self.header.get(position)
    }

    fn insert_at(&mut self, position: usize, record: HeaderRecord) {
        self.header.insert_at(position, record)
    }

    fn remove_at(&mut self, position: usize) -> HeaderRecord {
        self.header.remove_at(position)
    }

    fn records(&self) -> Box<dyn Iterator<Item = &HeaderRecord> + '_> {
        self.header.records()
    }
}
