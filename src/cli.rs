use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pivot-stats")]
#[command(about = "ピボット言語確率・バイアス率・Cohen's h を計算してレポートを出力", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub analyze: AnalyzeArgs,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// 解析の入出力オプション（全て省略可）
#[derive(Args, Debug, Clone, Default)]
pub struct AnalyzeArgs {
    /// ピボットスコア表（CSV/XLSX、デフォルト: データディレクトリ/pivot_scores.csv）
    #[arg(long)]
    pub scores: Option<PathBuf>,

    /// バイアス誤り数表（CSV/XLSX、デフォルト: データディレクトリ/bias_errors.csv）
    #[arg(long)]
    pub bias: Option<PathBuf>,

    /// XLSX入力のシート名（省略時は先頭シート）
    #[arg(long)]
    pub sheet: Option<String>,

    /// テキストレポートの出力先（省略時は標準出力）
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSONレポートの出力先
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Excelレポートの出力先
    #[arg(long)]
    pub xlsx: Option<PathBuf>,

    /// softmax温度
    #[arg(long)]
    pub temperature: Option<f64>,

    /// 方向別分布で表示する上位件数（0で全件）
    #[arg(long)]
    pub top: Option<usize>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// softmax温度を設定
        #[arg(long)]
        set_temperature: Option<f64>,

        /// 上位表示件数を設定
        #[arg(long)]
        set_top: Option<usize>,

        /// データディレクトリを設定
        #[arg(long)]
        set_data_dir: Option<PathBuf>,
    },
}
