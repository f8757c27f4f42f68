//! CSV読み込み

use super::Table;
use crate::error::Result;
use std::io::Read;
use std::path::Path;

/// CSVファイルを読み込み（1行目はヘッダー）
pub fn read_csv(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path)?;
    read_csv_from(file)
}

pub fn read_csv_from<R: Read>(reader: R) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()?
        .iter()
        // Excel書き出しのBOM対策
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table { headers, rows })
}
