//! # Julian Date records
//!
//! Two operations derive time references from the header and write them back:
//!
//! * `JD`  – Julian Date at mid-exposure,
//! * `HJD` – Heliocentric Julian Date at mid-exposure, plus `RA` and `DEC` when the target
//!   coordinates were given literally.
//!
//! Each input is a [`ValueSource`]: either a literal or the keyword of a record to read. Stored
//! values must have the right type:
//!
//! | input      | accepted record values                                             |
//! |------------|--------------------------------------------------------------------|
//! | date-time  | string `YYYY-MM-DDThh:mm:ss[.f]`                                   |
//! | exposure   | any number, in seconds                                             |
//! | RA         | string `hh:mm:ss.s` / `hh mm ss.s` (hours), or a number in degrees |
//! | DEC        | string `dd:mm:ss.s` / `dd mm ss.s` (degrees), or a number in degrees |
//!
//! The result is rounded half-up to [`EditorParams::jd_decimal_places`] digits and stored as a
//! decimal so the digits written are exactly the rounded ones.
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{
    Degree, Second, DEC_COMMENT, DEC_KEYWORD, HJD_COMMENT, HJD_KEYWORD, JD_COMMENT, JD_KEYWORD,
    RA_COMMENT, RA_KEYWORD,
};
use crate::conversion::{dec_to_deg, ra_to_deg, Sexagesimal};
use crate::edit_errors::HeaderEditError;
use crate::header::record::{normalize_keyword, HeaderRecord};
use crate::header::value::HeaderValue;
use crate::header::HeaderStore;
use crate::heliocentric::heliocentric_julian_date;
use crate::params::EditorParams;
use crate::time::{datetime_to_jd, day_fraction_to_seconds, mid_exposure, round_julian_date};

use super::{apply_upsert, plan_upsert, prepare_record};

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Where an input value comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValueSource<T> {
    /// Value given directly by the caller.
    Literal(T),
    /// Value read from the record with this keyword.
    Keyword(String),
}

impl<T> ValueSource<T> {
    pub fn is_literal(&self) -> bool {
        matches!(self, ValueSource::Literal(_))
    }
}

fn lookup<'a, S: HeaderStore + ?Sized>(
    store: &'a S,
    keyword: &str,
) -> Result<(String, &'a HeaderValue), HeaderEditError> {
    let keyword = normalize_keyword(keyword);
    match store.find(&keyword) {
        Some(record) => Ok((keyword, record.value())),
        None => Err(HeaderEditError::KeywordNotFound(keyword)),
    }
}

fn resolve_datetime<S: HeaderStore + ?Sized>(
    store: &S,
    source: &ValueSource<NaiveDateTime>,
) -> Result<NaiveDateTime, HeaderEditError> {
    match source {
        ValueSource::Literal(dt) => Ok(*dt),
        ValueSource::Keyword(keyword) => {
            let (keyword, value) = lookup(store, keyword)?;
            let text = value.as_text().ok_or_else(|| HeaderEditError::WrongValueType {
                keyword: keyword.clone(),
                expected: "date-time string",
            })?;
            NaiveDateTime::parse_from_str(text.trim(), DATETIME_FORMAT).map_err(|_| {
                HeaderEditError::UnparsableDateTime {
                    keyword,
                    value: text.to_string(),
                }
            })
        }
    }
}

fn resolve_exposure<S: HeaderStore + ?Sized>(
    store: &S,
    source: &ValueSource<Second>,
) -> Result<Second, HeaderEditError> {
    match source {
        ValueSource::Literal(seconds) => Ok(*seconds),
        ValueSource::Keyword(keyword) => {
            let (keyword, value) = lookup(store, keyword)?;
            value.as_f64().ok_or(HeaderEditError::WrongValueType {
                keyword,
                expected: "number",
            })
        }
    }
}

/// Resolve a coordinate to degrees. `to_deg` converts the sexagesimal form.
fn resolve_coordinate<S: HeaderStore + ?Sized>(
    store: &S,
    source: &ValueSource<Sexagesimal>,
    to_deg: fn(&Sexagesimal) -> Degree,
) -> Result<Degree, HeaderEditError> {
    match source {
        ValueSource::Literal(sexa) => Ok(to_deg(sexa)),
        ValueSource::Keyword(keyword) => {
            let (keyword, value) = lookup(store, keyword)?;
            let degrees = match value {
                HeaderValue::Text(text) => Sexagesimal::parse(text).map(|s| to_deg(&s)),
                other => other.as_f64(),
            };
            degrees.ok_or(HeaderEditError::WrongValueType {
                keyword,
                expected: "sexagesimal string or number",
            })
        }
    }
}

/// Validate a batch of records and plan where each lands, before anything is written.
fn write_all<S: HeaderStore + ?Sized>(
    store: &mut S,
    records: Vec<HeaderRecord>,
) -> Result<String, HeaderEditError> {
    let placements = records
        .iter()
        .map(|record| plan_upsert(&*store, record, true))
        .collect::<Result<Vec<_>, _>>()?;

    let messages: Vec<String> = records
        .into_iter()
        .zip(placements)
        .map(|(record, placement)| apply_upsert(&mut *store, record, placement))
        .collect();
    Ok(messages.join("; "))
}

fn jd_record(
    keyword: &str,
    jd: f64,
    comment: &str,
    params: &EditorParams,
) -> Result<HeaderRecord, HeaderEditError> {
    let rounded = round_julian_date(jd, params.jd_decimal_places)?;
    prepare_record(keyword, HeaderValue::Decimal(rounded), Some(comment), params)
}

pub(crate) fn compute_julian_date<S: HeaderStore + ?Sized>(
    store: &mut S,
    datetime: &ValueSource<NaiveDateTime>,
    exposure: &ValueSource<Second>,
    comment: Option<&str>,
    params: &EditorParams,
) -> Result<String, HeaderEditError> {
    let start = resolve_datetime(&*store, datetime)?;
    let exposure = resolve_exposure(&*store, exposure)?;

    let mid = mid_exposure(&start, exposure)?;
    let jd = datetime_to_jd(&mid);
    debug!(%start, exposure, %mid, jd, "julian date at mid-exposure");

    let record = jd_record(JD_KEYWORD, jd, comment.unwrap_or(JD_COMMENT), params)?;
    write_all(store, vec![record])
}

pub(crate) fn compute_heliocentric_julian_date<S: HeaderStore + ?Sized>(
    store: &mut S,
    datetime: &ValueSource<NaiveDateTime>,
    exposure: &ValueSource<Second>,
    ra: &ValueSource<Sexagesimal>,
    dec: &ValueSource<Sexagesimal>,
    comment: Option<&str>,
    params: &EditorParams,
) -> Result<String, HeaderEditError> {
    let start = resolve_datetime(&*store, datetime)?;
    let exposure = resolve_exposure(&*store, exposure)?;
    let ra_deg = resolve_coordinate(&*store, ra, ra_to_deg)?;
    let dec_deg = resolve_coordinate(&*store, dec, dec_to_deg)?;

    let mid = mid_exposure(&start, exposure)?;
    let jd = datetime_to_jd(&mid);
    let hjd = heliocentric_julian_date(jd, ra_deg, dec_deg, params)?;
    debug!(
        %mid,
        jd,
        hjd,
        correction_s = day_fraction_to_seconds(hjd - jd),
        "heliocentric julian date at mid-exposure"
    );

    let mut records = vec![jd_record(
        HJD_KEYWORD,
        hjd,
        comment.unwrap_or(HJD_COMMENT),
        params,
    )?];
    if let ValueSource::Literal(sexa) = ra {
        records.push(prepare_record(
            RA_KEYWORD,
            HeaderValue::Text(sexa.format()),
            Some(RA_COMMENT),
            params,
        )?);
    }
    if let ValueSource::Literal(sexa) = dec {
        records.push(prepare_record(
            DEC_KEYWORD,
            HeaderValue::Text(sexa.format()),
            Some(DEC_COMMENT),
            params,
        )?);
    }

    write_all(store, records)
}

#[cfg(test)]
mod compute_test {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    use super::*;
    use crate::editor::HeaderEditor;
    use crate::header::document::HeaderDocument;

    fn header() -> HeaderDocument {
        [
            HeaderRecord::new("SIMPLE", HeaderValue::Logical(true), None),
            HeaderRecord::new("DATE-OBS", HeaderValue::from("2010-11-23T20:58:26"), None),
            HeaderRecord::new("DATE", HeaderValue::from("2010-11-23"), None),
            HeaderRecord::new("EXPTIME", HeaderValue::Int(0), None),
            HeaderRecord::new("EXPOSURE", HeaderValue::from("thirty"), None),
            HeaderRecord::new("OBJCTRA", HeaderValue::from("12 25 48"), None),
            HeaderRecord::new("OBJCTDEC", HeaderValue::from("+65 14 48"), None),
            HeaderRecord::new("RA", HeaderValue::Real(186.45), Some("degrees".into())),
        ]
        .into_iter()
        .collect()
    }

    fn decimal(doc: &HeaderDocument, keyword: &str) -> BigDecimal {
        match doc.find(keyword).unwrap().value() {
            HeaderValue::Decimal(d) => d.clone(),
            other => panic!("{keyword} is not a decimal: {other:?}"),
        }
    }

    fn datetime(
        (y, mo, d): (i32, u32, u32),
        (h, mi, s): (u32, u32, u32),
        nano: u32,
    ) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_nano_opt(h, mi, s, nano)
            .unwrap()
    }

    #[test]
    fn test_julian_date_from_keywords() {
        let params = EditorParams::default();
        let mut doc = header();

        doc.compute_julian_date(
            &ValueSource::Keyword("DATE-OBS".into()),
            &ValueSource::Keyword("EXPTIME".into()),
            None,
            &params,
        )
        .unwrap();

        let jd = doc.find("JD").unwrap();
        assert_eq!(jd.comment(), Some(JD_COMMENT));
        assert_eq!(
            decimal(&doc, "JD"),
            BigDecimal::from_str("2455524.373912").unwrap()
        );
        assert_eq!(doc.position_of("JD"), Some(8));
    }

    #[test]
    fn test_julian_date_literal_mid_exposure() {
        let params = EditorParams::default();
        let mut doc = header();

        // 20 s exposure: mid-exposure is 10 s after the start
        let start = datetime((1990, 5, 20), (14, 26, 37), 12_347_856);
        doc.compute_julian_date(
            &ValueSource::Literal(start),
            &ValueSource::Literal(20.0),
            Some("custom"),
            &params,
        )
        .unwrap();

        assert_eq!(
            decimal(&doc, "JD"),
            BigDecimal::from_str("2448032.101933").unwrap()
        );
        assert_eq!(doc.find("JD").unwrap().comment(), Some("custom"));

        // recomputing updates the record in place
        doc.compute_julian_date(
            &ValueSource::Literal(start),
            &ValueSource::Literal(0.0),
            None,
            &params,
        )
        .unwrap();
        assert_eq!(doc.record_count(), 9);
    }

    #[test]
    fn test_resolution_failures_write_nothing() {
        let params = EditorParams::default();
        let mut doc = header();
        let before = doc.clone();

        assert_eq!(
            doc.compute_julian_date(
                &ValueSource::Keyword("MJD-OBS".into()),
                &ValueSource::Literal(1.0),
                None,
                &params,
            ),
            Err(HeaderEditError::KeywordNotFound("MJD-OBS".into()))
        );
        assert_eq!(
            doc.compute_julian_date(
                &ValueSource::Keyword("DATE-OBS".into()),
                &ValueSource::Keyword("EXPOSURE".into()),
                None,
                &params,
            ),
            Err(HeaderEditError::WrongValueType {
                keyword: "EXPOSURE".into(),
                expected: "number"
            })
        );
        assert!(matches!(
            doc.compute_julian_date(
                &ValueSource::Keyword("DATE".into()),
                &ValueSource::Literal(1.0),
                None,
                &params,
            ),
            Err(HeaderEditError::UnparsableDateTime { .. })
        ));
        assert!(matches!(
            doc.compute_julian_date(
                &ValueSource::Keyword("SIMPLE".into()),
                &ValueSource::Literal(1.0),
                None,
                &params,
            ),
            Err(HeaderEditError::WrongValueType { .. })
        ));
        assert!(matches!(
            doc.compute_julian_date(
                &ValueSource::Keyword("DATE-OBS".into()),
                &ValueSource::Literal(f64::NAN),
                None,
                &params,
            ),
            Err(HeaderEditError::NonFiniteValue(_))
        ));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_heliocentric_julian_date_literal_coordinates() {
        let params = EditorParams::default();
        let mut doc = header();
        doc.remove_by_keyword("RA").unwrap();

        doc.compute_heliocentric_julian_date(
            &ValueSource::Literal(datetime((1990, 11, 25), (17, 47, 45), 12_456_321)),
            &ValueSource::Literal(0.0),
            &ValueSource::Literal(Sexagesimal::new(12.0, 25.0, 48.0)),
            &ValueSource::Literal(Sexagesimal::new(65.0, 14.0, 48.0)),
            None,
            &params,
        )
        .unwrap();

        assert_eq!(
            decimal(&doc, "HJD"),
            BigDecimal::from_str("2448221.242056").unwrap()
        );
        assert_eq!(doc.find("HJD").unwrap().comment(), Some(HJD_COMMENT));

        let ra = doc.find("RA").unwrap();
        assert_eq!(ra.value(), &HeaderValue::from("12:25:48.000"));
        assert_eq!(ra.comment(), Some(RA_COMMENT));
        let dec = doc.find("DEC").unwrap();
        assert_eq!(dec.value(), &HeaderValue::from("65:14:48.000"));
        assert_eq!(dec.comment(), Some(DEC_COMMENT));
    }

    #[test]
    fn test_heliocentric_julian_date_keyword_coordinates() {
        let params = EditorParams::default();
        let mut doc = header();

        doc.compute_heliocentric_julian_date(
            &ValueSource::Keyword("DATE-OBS".into()),
            &ValueSource::Keyword("EXPTIME".into()),
            &ValueSource::Keyword("OBJCTRA".into()),
            &ValueSource::Keyword("OBJCTDEC".into()),
            None,
            &params,
        )
        .unwrap();
        assert!(doc.exists("HJD"));
        assert!(!doc.exists("DEC"));
        // referenced coordinates are left untouched
        assert_eq!(doc.find("RA").unwrap().value(), &HeaderValue::Real(186.45));

        // RA given in degrees gives the same result as the sexagesimal string
        let from_sexa = decimal(&doc, "HJD");
        doc.compute_heliocentric_julian_date(
            &ValueSource::Keyword("DATE-OBS".into()),
            &ValueSource::Keyword("EXPTIME".into()),
            &ValueSource::Keyword("RA".into()),
            &ValueSource::Keyword("OBJCTDEC".into()),
            None,
            &params,
        )
        .unwrap();
        assert_eq!(decimal(&doc, "HJD"), from_sexa);
    }

    #[test]
    fn test_heliocentric_checks_every_input_first() {
        let params = EditorParams::default();
        let mut doc = header();
        let before = doc.clone();

        assert_eq!(
            doc.compute_heliocentric_julian_date(
                &ValueSource::Keyword("DATE-OBS".into()),
                &ValueSource::Keyword("EXPTIME".into()),
                &ValueSource::Literal(Sexagesimal::new(1.0, 2.0, 3.0)),
                &ValueSource::Keyword("DATE".into()),
                None,
                &params,
            ),
            Err(HeaderEditError::WrongValueType {
                keyword: "DATE".into(),
                expected: "sexagesimal string or number"
            })
        );
        assert_eq!(doc, before);
    }
}
