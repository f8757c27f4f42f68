//! Excel/ODS読み込み（calamine）

use super::Table;
use crate::error::{PivotStatsError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// シートを読み込み（省略時は先頭シート、1行目はヘッダー）
pub fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| PivotStatsError::Workbook(format!("{}: {}", path.display(), e)))?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| PivotStatsError::Workbook(format!("シートがありません: {}", path.display())))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| PivotStatsError::Workbook(format!("{} [{}]: {}", path.display(), sheet_name, e)))?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<String>>());

    let headers = rows.next().unwrap_or_default();
    let rows = rows.collect();

    tracing::debug!(sheet = %sheet_name, "workbook sheet loaded");

    Ok(Table { headers, rows })
}

/// セル値を文字列化（整数値のfloatは整数表記）
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 => format!("{}", *f as i64),
        Data::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}
