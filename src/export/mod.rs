pub mod excel;
pub mod json;

use crate::error::Result;
use pivot_stats_common::{render_text, Report, TextLayout};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// 出力先の指定
#[derive(Debug, Clone, Default)]
pub struct OutputTargets {
    /// テキストレポート（None なら標準出力）
    pub text: Option<PathBuf>,
    pub json: Option<PathBuf>,
    pub xlsx: Option<PathBuf>,
}

pub(crate) fn create_output_file(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(BufWriter::new(File::create(path)?))
}

/// テキストレポートを書き出し
pub fn write_text_report(report: &Report, layout: &TextLayout, output: Option<&Path>) -> Result<()> {
    let text = render_text(report, layout);

    match output {
        Some(path) => {
            let mut writer = create_output_file(path)?;
            writer.write_all(text.as_bytes())?;
            writer.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(text.as_bytes())?;
            lock.flush()?;
        }
    }

    Ok(())
}

/// 指定された全ての形式で出力
pub fn export_report(report: &Report, layout: &TextLayout, targets: &OutputTargets) -> Result<()> {
    write_text_report(report, layout, targets.text.as_deref())?;
    if let Some(path) = &targets.text {
        eprintln!("✔ テキスト出力: {}", path.display());
    }

    if let Some(path) = &targets.json {
        json::write_json_report(report, path)?;
        eprintln!("✔ JSON出力: {}", path.display());
    }

    if let Some(path) = &targets.xlsx {
        excel::write_excel_report(report, path)?;
        eprintln!("✔ Excel出力: {}", path.display());
    }

    Ok(())
}
