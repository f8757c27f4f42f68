//! 解析の実行計画
//!
//! CLI引数 > 環境変数 > 設定ファイル > デフォルト の順で入出力を決め、
//! 表を読み込んで集計する。

use crate::cli::AnalyzeArgs;
use crate::config::Config;
use crate::error::{PivotStatsError, Result};
use crate::export::OutputTargets;
use crate::loader;
use pivot_stats_common::{summarize, Report, SummaryOptions, TextLayout};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AnalysisPlan {
    pub scores_path: PathBuf,
    pub bias_path: PathBuf,
    pub sheet: Option<String>,
    pub options: SummaryOptions,
    pub layout: TextLayout,
    pub outputs: OutputTargets,
}

impl AnalysisPlan {
    pub fn resolve(args: &AnalyzeArgs, config: &Config) -> Result<Self> {
        let temperature = args.temperature.unwrap_or(config.temperature);
        if !temperature.is_finite() || temperature <= 0.0 {
            return Err(PivotStatsError::Config(format!(
                "temperature は正の有限値である必要があります: {}",
                temperature
            )));
        }

        Ok(Self {
            scores_path: args.scores.clone().unwrap_or_else(|| config.pivot_scores_path()),
            bias_path: args.bias.clone().unwrap_or_else(|| config.bias_errors_path()),
            sheet: args.sheet.clone().or_else(|| config.sheet.clone()),
            options: SummaryOptions { temperature },
            layout: TextLayout {
                top_n: args.top.unwrap_or(config.top_n),
            },
            outputs: OutputTargets {
                text: args.output.clone(),
                json: args.json.clone(),
                xlsx: args.xlsx.clone(),
            },
        })
    }

    /// 表を読み込んで集計（どちらかが不正なら何も返さない）
    pub fn run(&self) -> Result<Report> {
        let scores = loader::load_pivot_scores(&self.scores_path, self.sheet.as_deref())?;
        let bias = loader::load_bias_table(&self.bias_path, self.sheet.as_deref())?;
        let report = summarize(&scores, &bias, &self.options)?;

        tracing::info!(
            systems = report.systems.len(),
            baseline = %report.baseline,
            temperature = report.temperature,
            "summary computed"
        );
        Ok(report)
    }
}
