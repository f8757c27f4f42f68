//! Excel生成（CLI版）
//!
//! 共通ライブラリの excel_core でブックを作り、ファイルに保存する

use super::create_output_file;
use crate::error::{PivotStatsError, Result};
use pivot_stats_common::export::excel_core::generate_report_workbook;
use pivot_stats_common::Report;
use std::io::Write;
use std::path::Path;

pub fn write_excel_report(report: &Report, output_path: &Path) -> Result<()> {
    let buffer = generate_report_workbook(report).map_err(PivotStatsError::ExcelGeneration)?;

    let mut writer = create_output_file(output_path)
        .map_err(|e| PivotStatsError::ExcelGeneration(format!("ファイル作成エラー: {}", e)))?;
    writer
        .write_all(&buffer)
        .map_err(|e| PivotStatsError::ExcelGeneration(format!("書き込みエラー: {}", e)))?;
    writer
        .flush()
        .map_err(|e| PivotStatsError::ExcelGeneration(format!("書き込みエラー: {}", e)))?;

    Ok(())
}
