mod common;

use camino::Utf8Path;

use common::{fits_bytes, utf8_tempdir, write_sample, SAMPLE_CARDS};
use fitsedit::batch::{process_files, EditRequest};
use fitsedit::editor::compute::ValueSource;
use fitsedit::editor::shift::TimeShift;
use fitsedit::fits_file::FitsFile;
use fitsedit::header::value::HeaderValue;
use fitsedit::{EditorParams, HeaderEditError, HeaderEditor, HeaderStore};

#[test]
fn test_untouched_file_is_byte_identical() {
    let (_guard, dir) = utf8_tempdir();
    let path = write_sample(&dir, "plain.fits");
    let original = std::fs::read(&path).unwrap();

    let file = FitsFile::open(&path).unwrap();
    assert_eq!(file.record_count(), SAMPLE_CARDS.len());
    file.persist().unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), original);
}

#[test]
fn test_edit_keeps_other_cards_and_data() {
    let (_guard, dir) = utf8_tempdir();
    let path = write_sample(&dir, "edit.fits");
    let original = std::fs::read(&path).unwrap();
    let params = EditorParams::default();

    let mut file = FitsFile::open(&path).unwrap();
    file.change_value("OBJECT", "M 31".into(), None, false, &params)
        .unwrap();
    file.persist().unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), original.len());
    // the data unit follows the single header block unchanged
    assert_eq!(bytes[2880..], original[2880..]);
    // only the OBJECT card changed
    for (i, (new, old)) in bytes[..2880]
        .chunks(80)
        .zip(original[..2880].chunks(80))
        .enumerate()
    {
        if i == 5 {
            assert_eq!(
                std::str::from_utf8(new).unwrap().trim_end(),
                "OBJECT  = 'M 31    ' / target"
            );
        } else {
            assert_eq!(new, old, "card {i}");
        }
    }

    let reopened = FitsFile::open(&path).unwrap();
    assert_eq!(
        reopened.find("OBJECT").unwrap().value(),
        &HeaderValue::from("M 31")
    );
}

#[test]
fn test_header_growing_past_a_block() {
    let (_guard, dir) = utf8_tempdir();
    let path = write_sample(&dir, "grow.fits");
    let params = EditorParams::default();

    let mut file = FitsFile::open(&path).unwrap();
    for i in 0..30 {
        file.add_record(&format!("KEY{i}"), HeaderValue::Int(i), None, false, &params)
            .unwrap();
    }
    file.persist().unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 3 * 2880);
    let reopened = FitsFile::open(&path).unwrap();
    assert_eq!(reopened.record_count(), SAMPLE_CARDS.len() + 30);
    assert_eq!(reopened.find("KEY29").unwrap().value(), &HeaderValue::Int(29));
}

#[test]
fn test_invalid_files() {
    let path = Utf8Path::new("broken.fits");

    assert!(matches!(
        FitsFile::from_bytes(path, &[b' '; 100]),
        Err(HeaderEditError::InvalidFitsFile(_))
    ));

    let mut no_end = fits_bytes(&["SIMPLE  =                    T"], &[]);
    no_end[80..83].copy_from_slice(b"   ");
    assert!(matches!(
        FitsFile::from_bytes(path, &no_end),
        Err(HeaderEditError::InvalidFitsFile(_))
    ));

    assert!(matches!(
        FitsFile::open("/nonexistent/broken.fits"),
        Err(HeaderEditError::Io(_))
    ));
}

#[test]
fn test_batch_continues_after_a_failing_file() {
    let (_guard, dir) = utf8_tempdir();
    let first = write_sample(&dir, "first.fits");
    let broken = dir.join("broken.fits");
    std::fs::write(&broken, b"not a fits file").unwrap();
    let last = write_sample(&dir, "last.fits");

    let request = EditRequest::ComputeJulianDate {
        datetime: ValueSource::Keyword("DATE-OBS".into()),
        exposure: ValueSource::Keyword("EXPTIME".into()),
        comment: None,
    };
    let reports = process_files(&[&first, &broken, &last], &request, &EditorParams::default());

    assert_eq!(reports.len(), 3);
    assert!(reports[0].success);
    assert!(!reports[1].success);
    assert!(reports[2].success);
    assert_eq!(reports[1].path, broken);

    // 2010-11-23T20:58:26 + 30 s
    for path in [&first, &last] {
        let file = FitsFile::open(path).unwrap();
        assert_eq!(file.find("JD").unwrap().value().to_string(), "2455524.374259");
    }
}

#[test]
fn test_failed_operation_leaves_file_untouched() {
    let (_guard, dir) = utf8_tempdir();
    let path = write_sample(&dir, "untouched.fits");
    let original = std::fs::read(&path).unwrap();

    let requests = [
        EditRequest::RemoveByKeyword {
            keyword: "NAXIS1".into(),
        },
        EditRequest::ShiftTime {
            keyword: "OBJECT".into(),
            shift: TimeShift {
                days: 1,
                ..Default::default()
            },
        },
        EditRequest::RemoveByIndex { index: 99 },
    ];
    for request in &requests {
        let reports = process_files(&[&path], request, &EditorParams::default());
        assert!(!reports[0].success, "{request:?}");
        assert_eq!(std::fs::read(&path).unwrap(), original);
    }
}
