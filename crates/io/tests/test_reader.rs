//! Integration test: reading precipitation and ANPP tables from disk.

use std::io::Write;
use std::path::Path;

use approx::assert_relative_eq;
use sam_io::{
    IoError, ReaderConfig, parse_anpp_dataset, parse_monthly_precip, read_anpp_dataset,
    read_monthly_precip,
};
use tempfile::NamedTempFile;

const MONTHS: &str = "Jan Feb Mar Apr May Jun Jul Aug Sep Oct Nov Dec";

fn write_temp(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(text.as_bytes()).expect("write temp file");
    file
}

fn wide_table(first_year: i32, n_years: usize) -> String {
    let mut text = format!("Year {MONTHS}\n");
    for i in 0..n_years {
        let year = first_year + i as i32;
        let cells: Vec<String> = (1..=12).map(|m| format!("{}.5", m + i)).collect();
        text.push_str(&format!("{year} {}\n", cells.join(" ")));
    }
    text
}

#[test]
fn read_monthly_precip_file_not_found() {
    let path = Path::new("/tmp/sam_test_nonexistent_ppt.txt");
    let err = read_monthly_precip(path, &ReaderConfig::default()).unwrap_err();
    assert!(
        matches!(err, IoError::FileNotFound { .. }),
        "expected FileNotFound, got {err:?}",
    );
}

#[test]
fn invalid_config_rejects_early() {
    let path = Path::new("/tmp/sam_test_nonexistent_anpp.txt");
    let config = ReaderConfig::default().with_year_column("");

    // Fails on config validation before the file is touched.
    let err = read_anpp_dataset(path, &config).unwrap_err();
    assert!(
        matches!(err, IoError::Validation { .. }),
        "expected Validation error, got {err:?}",
    );
}

#[test]
fn read_wide_precip_from_file() {
    let file = write_temp(&wide_table(1893, 3));
    let precip = read_monthly_precip(file.path(), &ReaderConfig::default()).unwrap();

    assert_eq!(precip.first_year(), 1893);
    assert_eq!(precip.last_year(), 1895);
    assert_eq!(precip.n_missing(), 0);
    assert_relative_eq!(precip.get(0, 0).unwrap(), 1.5);
    assert_relative_eq!(precip.get(2, 11).unwrap(), 14.5);
}

#[test]
fn wide_precip_keeps_missing_cells() {
    let text = format!("Year {MONTHS}\n1950 1 2 3 4 NA 6 7 8 9 10 11 12\n");
    let precip = parse_monthly_precip(&text, &ReaderConfig::default()).unwrap();
    assert_eq!(precip.n_missing(), 1);
    assert!(precip.get(0, 4).is_err());
    assert_relative_eq!(precip.get(0, 5).unwrap(), 6.0);
}

#[test]
fn wide_precip_rejects_year_gap_and_negatives() {
    let text = format!(
        "Year {MONTHS}\n\
         1950 1 2 3 4 5 6 7 8 9 10 11 12\n\
         1952 1 2 3 4 5 6 7 8 9 10 11 -1\n"
    );
    match parse_monthly_precip(&text, &ReaderConfig::default()).unwrap_err() {
        IoError::Validation { count, details } => {
            assert_eq!(count, 2);
            assert!(details.contains("year 1952 at line 3 does not follow 1950"));
            assert!(details.contains("negative Dec at line 3"));
        }
        other => panic!("expected IoError::Validation, got {other:?}"),
    }
}

#[test]
fn long_precip_fills_absent_months() {
    let text = "Year Month ppt\n1950 1 10\n1950 12 20\n1951 6 NA\n1951 7 30\n";
    let precip = parse_monthly_precip(text, &ReaderConfig::default()).unwrap();

    assert_eq!(precip.first_year(), 1950);
    assert_eq!(precip.n_years(), 2);
    assert_relative_eq!(precip.get(0, 0).unwrap(), 10.0);
    assert_relative_eq!(precip.get(0, 11).unwrap(), 20.0);
    assert_relative_eq!(precip.get(1, 6).unwrap(), 30.0);
    assert_eq!(precip.n_missing(), 24 - 3);
}

#[test]
fn long_precip_rejects_sparse_year_span() {
    let text = "Year Month ppt\n-2000000000 1 1.0\n2000000000 1 1.0\n";
    let err = parse_monthly_precip(text, &ReaderConfig::default()).unwrap_err();
    match err {
        IoError::Validation { count, details } => {
            assert_eq!(count, 1);
            assert!(details.contains("spans 4000000001 years"), "{details}");
        }
        other => panic!("expected IoError::Validation, got {other:?}"),
    }

    let text = "Year Month ppt\n1950 1 1.0\n1952 1 1.0\n";
    assert!(matches!(
        parse_monthly_precip(text, &ReaderConfig::default()),
        Err(IoError::Validation { .. })
    ));
}

#[test]
fn long_precip_custom_columns() {
    let config = ReaderConfig::default().with_long_columns("mo", "rain");
    let text = "Year mo rain\n2000 3 4.5\n";
    let precip = parse_monthly_precip(text, &config).unwrap();
    assert_relative_eq!(precip.get(0, 2).unwrap(), 4.5);
}

#[test]
fn read_anpp_dataset_from_file() {
    let text = "\
# ANPP with event-size classes
\"Year\" \"ANPP\" \"Event1\" \"Event2\" \"Event3\" \"Event4\"
\"1\" 1939 118.2 12 4 1 0
\"2\" 1940 97.0 NA 3 NA 1
\"3\" 1941 140.8 9 5 2 1
";
    let file = write_temp(text);
    let ds = read_anpp_dataset(file.path(), &ReaderConfig::default()).unwrap();

    assert_eq!(ds.len(), 3);
    assert_eq!(ds.observations()[1].year, 1940);
    assert_relative_eq!(ds.anpp()[2], 140.8);
    assert_eq!(ds.events().n_missing(), 2);
    assert_eq!(ds.events().missing_cells(), vec![(1, 0), (1, 2)]);
    assert_eq!(ds.events().get(2, 3), Some(1.0));
}

#[test]
fn anpp_must_be_present() {
    let text = "Year ANPP Event1 Event2 Event3 Event4\n1939 NA 1 2 3 4\n";
    let err = parse_anpp_dataset(text, &ReaderConfig::default()).unwrap_err();
    assert!(
        matches!(err, IoError::MissingValue { line: 2, .. }),
        "expected MissingValue, got {err:?}",
    );
}

#[test]
fn anpp_requires_event_columns() {
    let text = "Year ANPP Event1 Event2 Event3\n1939 10 1 2 3\n";
    match parse_anpp_dataset(text, &ReaderConfig::default()).unwrap_err() {
        IoError::MissingColumn { name } => assert_eq!(name, "Event4"),
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}

#[test]
fn anpp_custom_columns_and_marker() {
    let config = ReaderConfig::default()
        .with_na_marker("-99")
        .with_year_column("yr")
        .with_anpp_column("npp")
        .with_event_columns(["s".into(), "m".into(), "l".into(), "xl".into()]);
    let text = "yr npp s m l xl\n2001 55 -99 1 1 0\n";
    let ds = parse_anpp_dataset(text, &config).unwrap();
    assert_eq!(ds.events().get(0, 0), None);
    assert_relative_eq!(ds.anpp()[0], 55.0);
}

#[test]
fn anpp_rejects_duplicate_years_and_negative_events() {
    let text = "Year ANPP Event1 Event2 Event3 Event4\n1939 10 1 2 3 4\n1939 11 1 -2 3 4\n";
    match parse_anpp_dataset(text, &ReaderConfig::default()).unwrap_err() {
        IoError::Validation { count, .. } => assert_eq!(count, 2),
        other => panic!("expected IoError::Validation, got {other:?}"),
    }
}
