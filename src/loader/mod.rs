//! 表データ読み込み
//!
//! CSV/XLSXを文字列の表にしてから、ピボットスコア表とバイアス表に変換する。

pub mod delimited;
pub mod workbook;

use crate::error::{PivotStatsError, Result};
use pivot_stats_common::{
    BiasRecord, BiasTable, Direction, DirectionalBias, Error as CommonError, Language,
    MatchRecord, PivotScores, System,
};
use std::path::Path;

/// ヘッダーつきの文字列表
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// 列名で検索（大文字小文字・前後空白を無視）
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    fn require_column(&self, name: &str) -> Result<usize> {
        self.column(name).ok_or_else(|| {
            CommonError::MalformedInput(format!("missing column '{}'", name)).into()
        })
    }

    /// 空行を除いた (行番号, 行) の列。行番号はヘッダーを1行目とした番号
    fn data_rows(&self) -> impl Iterator<Item = (usize, &Vec<String>)> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| (i + 2, row))
            .filter(|(_, row)| row.iter().any(|cell| !cell.trim().is_empty()))
    }
}

/// 入力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Workbook,
}

impl TableFormat {
    /// 拡張子から判定
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(TableFormat::Csv),
            "xlsx" | "xlsm" | "xls" | "ods" => Ok(TableFormat::Workbook),
            _ => Err(PivotStatsError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// ファイルを読み込み
pub fn read_table(path: &Path, sheet: Option<&str>) -> Result<Table> {
    if !path.exists() {
        return Err(PivotStatsError::FileNotFound(path.display().to_string()));
    }

    let table = match TableFormat::from_path(path)? {
        TableFormat::Csv => delimited::read_csv(path)?,
        TableFormat::Workbook => workbook::read_workbook(path, sheet)?,
    };

    tracing::debug!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.rows.len(),
        "table loaded"
    );
    Ok(table)
}

fn cell<'a>(row: &'a [String], col: usize) -> &'a str {
    row.get(col).map(|s| s.trim()).unwrap_or("")
}

/// 非負整数として解析
fn parse_count(value: &str, what: &str, line: usize) -> Result<u32> {
    value.parse::<u32>().map_err(|_| {
        CommonError::MalformedInput(format!(
            "row {}: {} '{}' is not a non-negative integer",
            line, what, value
        ))
        .into()
    })
}

fn with_row<T>(result: pivot_stats_common::Result<T>, line: usize) -> Result<T> {
    result.map_err(|e| e.context(format!("row {}", line)).into())
}

/// ピボットスコア表を解析
///
/// 列: Direction, Language, 各システムの一致文数。
pub fn parse_pivot_scores(table: &Table) -> Result<PivotScores> {
    let direction_col = table.require_column("Direction")?;
    let language_col = table.require_column("Language")?;

    let mut system_cols: Vec<(System, usize)> = Vec::new();
    for (col, header) in table.headers.iter().enumerate() {
        if col == direction_col || col == language_col {
            continue;
        }
        match header.parse::<System>() {
            Ok(system) => {
                if system_cols.iter().any(|(s, _)| *s == system) {
                    return Err(CommonError::MalformedInput(format!(
                        "duplicate column for {}",
                        system
                    ))
                    .into());
                }
                system_cols.push((system, col));
            }
            Err(_) => tracing::debug!(column = %header, "ignoring column"),
        }
    }
    for system in System::ALL {
        if !system_cols.iter().any(|(s, _)| *s == system) {
            return Err(CommonError::MalformedInput(format!("missing column for {}", system)).into());
        }
    }

    let mut records = Vec::with_capacity(table.rows.len() * system_cols.len());
    for (line, row) in table.data_rows() {
        let direction: Direction = with_row(cell(row, direction_col).parse(), line)?;
        let language: Language = with_row(cell(row, language_col).parse(), line)?;

        for &(system, col) in &system_cols {
            let what = format!("{} count for {} / {}", system, direction, language);
            let matches = parse_count(cell(row, col), &what, line)?;
            records.push(MatchRecord {
                direction,
                language,
                system,
                matches,
            });
        }
    }

    Ok(PivotScores::from_records(&records)?)
}

/// バイアス誤り数表を解析
///
/// Direction列があれば方向別（合計は両方向の和）、なければシステム単位の合計。
pub fn parse_bias_table(table: &Table) -> Result<BiasTable> {
    let system_col = table.require_column("System")?;
    let errors_col = table.require_column("Errors")?;
    let total_col = table.require_column("Total")?;

    match table.column("Direction") {
        Some(direction_col) => {
            let mut records = Vec::new();
            for (line, row) in table.data_rows() {
                let direction: Direction = with_row(cell(row, direction_col).parse(), line)?;
                let system: System = with_row(cell(row, system_col).parse(), line)?;
                records.push(DirectionalBias {
                    direction,
                    system,
                    errors: parse_count(cell(row, errors_col), "error count", line)?,
                    total: parse_count(cell(row, total_col), "total", line)?,
                });
            }
            Ok(BiasTable::from_directional(&records)?)
        }
        None => {
            let mut records = Vec::new();
            for (line, row) in table.data_rows() {
                let system: System = with_row(cell(row, system_col).parse(), line)?;
                records.push(BiasRecord {
                    system,
                    errors: parse_count(cell(row, errors_col), "error count", line)?,
                    total: parse_count(cell(row, total_col), "total", line)?,
                });
            }
            Ok(BiasTable::from_records(&records)?)
        }
    }
}

pub fn load_pivot_scores(path: &Path, sheet: Option<&str>) -> Result<PivotScores> {
    parse_pivot_scores(&read_table(path, sheet)?)
}

pub fn load_bias_table(path: &Path, sheet: Option<&str>) -> Result<BiasTable> {
    parse_bias_table(&read_table(path, sheet)?)
}
