#![allow(dead_code)]

use camino::{Utf8Path, Utf8PathBuf};
use fitsedit::header::document::HeaderDocument;
use fitsedit::header::record::HeaderRecord;
use fitsedit::header::value::HeaderValue;

/// A small image header: structural keywords first, then observation metadata.
pub fn sample_header() -> HeaderDocument {
    [
        HeaderRecord::new("SIMPLE", HeaderValue::Logical(true), None),
        HeaderRecord::new("BITPIX", HeaderValue::Int(16), None),
        HeaderRecord::new("NAXIS", HeaderValue::Int(2), None),
        HeaderRecord::new("NAXIS1", HeaderValue::Int(4), None),
        HeaderRecord::new("NAXIS2", HeaderValue::Int(4), None),
        HeaderRecord::new("EXTEND", HeaderValue::Logical(true), None),
        HeaderRecord::new("OBJECT", HeaderValue::from("M31"), Some("target".into())),
        HeaderRecord::new(
            "DATE-OBS",
            HeaderValue::from("1990-11-25T17:47:45.012456321"),
            None,
        ),
        HeaderRecord::new("EXPTIME", HeaderValue::Real(0.0), Some("[s]".into())),
        HeaderRecord::new("FILTER", HeaderValue::from("R"), None),
    ]
    .into_iter()
    .collect()
}

pub fn keywords(doc: &HeaderDocument) -> Vec<String> {
    doc.keywords().map(str::to_string).collect()
}

/// Pad each card to 80 characters, append `END` and pad the header to a 2880-byte block, then
/// append `data` (already a multiple of 2880 bytes).
pub fn fits_bytes(cards: &[&str], data: &[u8]) -> Vec<u8> {
    let mut header: String = cards.iter().map(|c| format!("{c:<80}")).collect();
    header.push_str(&format!("{:<80}", "END"));
    let padded = header.len().div_ceil(2880) * 2880;
    let mut bytes = format!("{header:<padded$}").into_bytes();
    bytes.extend_from_slice(data);
    bytes
}

pub const SAMPLE_CARDS: [&str; 12] = [
    "SIMPLE  =                    T / conforms to FITS standard",
    "BITPIX  =                    8 / array data type",
    "NAXIS   =                    1 / number of array dimensions",
    "NAXIS1  =                 2880",
    "EXTEND  =                    T",
    "OBJECT  = 'M31     '           / target",
    "DATE-OBS= '2010-11-23T20:58:26' / start of exposure",
    "EXPTIME =                 60.0 / [s]",
    "OBJCTRA = '00 42 44.3'",
    "OBJCTDEC= '+41 16 09'",
    "COMMENT   written by an acquisition program",
    "HISTORY   dark subtracted",
];

/// Write a sample FITS file with a one-block data unit, return its path.
pub fn write_sample(dir: &Utf8Path, name: &str) -> Utf8PathBuf {
    let data: Vec<u8> = (0..2880u32).map(|i| (i % 251) as u8).collect();
    let path = dir.join(name);
    std::fs::write(&path, fits_bytes(&SAMPLE_CARDS, &data)).unwrap();
    path
}

pub fn utf8_tempdir() -> (tempfile::TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    (dir, path)
}
