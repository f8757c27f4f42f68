//! 表読み込みテスト
//!
//! CSV/XLSXからの読み込みと不正な表の検出を検証

use pivot_stats::error::PivotStatsError;
use pivot_stats::loader;
use pivot_stats_common::{Direction, Error as CommonError, Language, System};
use rust_xlsxwriter::Workbook;
use std::fmt::Write as _;
use std::path::Path;
use tempfile::tempdir;

const HEADER: &str = "Direction,Language,Google Translate,DeepL Classic,DeepL Next Gen";

/// 全言語が揃ったCSV。skip に一致する行は出力しない
fn pivot_csv(skip: Option<(&str, &str)>) -> String {
    let mut csv = String::from(HEADER);
    csv.push('\n');
    for direction in ["ES→EL", "EL→ES"] {
        for (i, lang) in Language::ALL.iter().enumerate() {
            if skip == Some((direction, lang.name())) {
                continue;
            }
            let google = if *lang == Language::English { 55 } else { (i % 3) as u32 };
            writeln!(csv, "{},{},{},10,{}", direction, lang.name(), google, i).unwrap();
        }
    }
    csv
}

fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn assert_malformed(result: Result<impl std::fmt::Debug, PivotStatsError>, needle: &str) {
    match result {
        Err(PivotStatsError::Common(CommonError::MalformedInput(msg))) => {
            assert!(msg.contains(needle), "メッセージに'{}'がない: {}", needle, msg);
        }
        other => panic!("MalformedInputを期待: {:?}", other),
    }
}

#[test]
fn test_load_pivot_scores_csv() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = write_file(dir.path(), "scores.csv", &pivot_csv(None));

    let scores = loader::load_pivot_scores(&path, None).expect("読み込み失敗");
    let google = scores.counts(Direction::EsEl, System::Google);
    assert_eq!(google[Language::English.index()], 55);
    assert_eq!(scores.counts(Direction::ElEs, System::DeepLNextGen)[15], 15);
    assert_eq!(scores.combined_counts(System::DeepLClassic), [20; 16]);
}

#[test]
fn test_missing_language_is_malformed() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = write_file(dir.path(), "scores.csv", &pivot_csv(Some(("EL→ES", "Swahili"))));

    assert_malformed(loader::load_pivot_scores(&path, None), "Swahili");
}

#[test]
fn test_duplicate_language_is_malformed() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut csv = pivot_csv(None);
    csv.push_str("ES→EL,German,1,1,1\n");
    let path = write_file(dir.path(), "scores.csv", &csv);

    assert_malformed(loader::load_pivot_scores(&path, None), "duplicate");
}

#[test]
fn test_non_numeric_count_is_malformed() {
    let dir = tempdir().expect("Failed to create temp dir");
    let csv = pivot_csv(None).replacen("ES→EL,German,1,10,1", "ES→EL,German,one,10,1", 1);
    let path = write_file(dir.path(), "scores.csv", &csv);

    assert_malformed(loader::load_pivot_scores(&path, None), "'one'");
}

#[test]
fn test_out_of_range_count_is_malformed() {
    let dir = tempdir().expect("Failed to create temp dir");
    let csv = pivot_csv(None).replacen("ES→EL,German,1,10,1", "ES→EL,German,57,10,1", 1);
    let path = write_file(dir.path(), "scores.csv", &csv);

    assert_malformed(loader::load_pivot_scores(&path, None), "57");
}

#[test]
fn test_negative_count_is_malformed() {
    let dir = tempdir().expect("Failed to create temp dir");
    let csv = pivot_csv(None).replacen("ES→EL,German,1,10,1", "ES→EL,German,-1,10,1", 1);
    let path = write_file(dir.path(), "scores.csv", &csv);

    assert_malformed(loader::load_pivot_scores(&path, None), "-1");
}

#[test]
fn test_blank_rows_are_skipped() {
    let dir = tempdir().expect("Failed to create temp dir");
    let csv = pivot_csv(None).replacen('\n', "\n,,,,\n", 1);
    let path = write_file(dir.path(), "scores.csv", &csv);

    assert!(loader::load_pivot_scores(&path, None).is_ok());
}

#[test]
fn test_load_bias_directional_csv() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = write_file(
        dir.path(),
        "bias.csv",
        "Direction,System,Errors,Total\n\
         ES→EL,Google,45,56\nES→EL,DeepL Classic,42,56\nES→EL,DeepL Next Gen,5,56\n\
         EL→ES,Google,40,56\nEL→ES,DeepL Classic,37,56\nEL→ES,DeepL Next Gen,3,56\n",
    );

    let bias = loader::load_bias_table(&path, None).expect("読み込み失敗");
    let google = bias.record(System::Google);
    assert_eq!((google.errors, google.total), (85, 112));
    assert_eq!(bias.breakdown().len(), 6);
}

#[test]
fn test_bias_missing_direction_row_is_malformed() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = write_file(
        dir.path(),
        "bias.csv",
        "Direction,System,Errors,Total\nES→EL,Google,45,56\n",
    );

    assert_malformed(loader::load_bias_table(&path, None), "no bias record");
}

#[test]
fn test_bias_wrong_total_is_malformed() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = write_file(
        dir.path(),
        "bias.csv",
        "System,Errors,Total\nGoogle,85,100\nDeepL Classic,79,112\nDeepL Next Gen,7,112\n",
    );

    assert_malformed(loader::load_bias_table(&path, None), "total 100 must be 112");
}

#[test]
fn test_bias_oversized_total_is_malformed() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut csv = String::from("Direction,System,Errors,Total\n");
    for direction in ["ES→EL", "EL→ES"] {
        for system in ["Google", "DeepL Classic", "DeepL Next Gen"] {
            writeln!(csv, "{},{},1,4294967295", direction, system).unwrap();
        }
    }
    let path = write_file(dir.path(), "bias.csv", &csv);

    assert_malformed(loader::load_bias_table(&path, None), "must be 56");
}

#[test]
fn test_bias_zero_total_is_division_by_zero() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = write_file(
        dir.path(),
        "bias.csv",
        "System,Errors,Total\nGoogle,0,0\nDeepL Classic,79,112\nDeepL Next Gen,7,112\n",
    );

    let result = loader::load_bias_table(&path, None);
    assert!(matches!(
        result,
        Err(PivotStatsError::Common(CommonError::DivisionByZero(_)))
    ));
}

#[test]
fn test_missing_file() {
    let result = loader::load_pivot_scores(Path::new("/nonexistent/path/scores.csv"), None);
    assert!(matches!(result, Err(PivotStatsError::FileNotFound(_))));
}

#[test]
fn test_unsupported_extension() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = write_file(dir.path(), "scores.txt", &pivot_csv(None));

    let result = loader::load_pivot_scores(&path, None);
    assert!(matches!(result, Err(PivotStatsError::UnsupportedFormat(_))));
}

/// rust_xlsxwriterで作ったブックをcalamineで読む
#[test]
fn test_load_pivot_scores_xlsx() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("scores.xlsx");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Pivot").unwrap();
    for (col, header) in HEADER.split(',').enumerate() {
        worksheet.write_string(0, col as u16, header).unwrap();
    }
    let mut row: u32 = 1;
    for direction in ["ES→EL", "EL→ES"] {
        for lang in Language::ALL.iter() {
            worksheet.write_string(row, 0, direction).unwrap();
            worksheet.write_string(row, 1, lang.name()).unwrap();
            let google = if *lang == Language::English { 29.0 } else { 13.0 };
            worksheet.write_number(row, 2, google).unwrap();
            worksheet.write_number(row, 3, 12.0).unwrap();
            worksheet.write_number(row, 4, 24.0).unwrap();
            row += 1;
        }
    }
    workbook.save(&path).expect("xlsx保存失敗");

    let scores = loader::load_pivot_scores(&path, Some("Pivot")).expect("xlsx読み込み失敗");
    assert_eq!(scores.counts(Direction::ElEs, System::Google)[0], 29);
    assert_eq!(scores.counts(Direction::EsEl, System::DeepLNextGen), [24; 16]);

    // シート名省略時は先頭シート
    assert!(loader::load_pivot_scores(&path, None).is_ok());

    let missing = loader::load_pivot_scores(&path, Some("NoSuchSheet"));
    assert!(matches!(missing, Err(PivotStatsError::Workbook(_))));
}
