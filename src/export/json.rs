//! JSONレポート出力

use super::create_output_file;
use crate::error::Result;
use pivot_stats_common::Report;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    #[serde(flatten)]
    report: &'a Report,
}

pub fn to_json_string(report: &Report) -> Result<String> {
    let payload = JsonReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        report,
    };
    Ok(serde_json::to_string_pretty(&payload)?)
}

pub fn write_json_report(report: &Report, output_path: &Path) -> Result<()> {
    let json = to_json_string(report)?;
    let mut writer = create_output_file(output_path)?;
    writer.write_all(json.as_bytes())?;
    writer.flush()?;
    Ok(())
}
