use anyhow::Context;
use clap::Parser;
use pivot_stats::{analysis, cli, config, export, logging};
use analysis::AnalysisPlan;
use cli::{Cli, Commands};
use config::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = Config::load().context("設定ファイルの読み込みに失敗しました")?;

    match cli.command {
        None => {
            eprintln!("📊 pivot-stats - 統計解析\n");
            let plan = AnalysisPlan::resolve(&cli.analyze, &config)?;

            // 1. 読み込み・集計
            eprintln!("[1/2] 表を読み込み中...");
            eprintln!("  - ピボットスコア: {}", plan.scores_path.display());
            eprintln!("  - バイアス誤り数: {}", plan.bias_path.display());
            let report = plan.run().with_context(|| {
                format!(
                    "解析に失敗しました ({}, {})",
                    plan.scores_path.display(),
                    plan.bias_path.display()
                )
            })?;
            eprintln!("✔ {}システムを集計\n", report.systems.len());

            // 2. 出力
            eprintln!("[2/2] レポートを出力中...");
            export::export_report(&report, &plan.layout, &plan.outputs)
                .context("レポートの出力に失敗しました")?;

            eprintln!("\n✅ 完了");
        }

        Some(Commands::Config { show, set_temperature, set_top, set_data_dir }) => {
            let mut config = config;
            let mut changed = false;

            if let Some(temperature) = set_temperature {
                config.set_temperature(temperature)?;
                changed = true;
            }
            if let Some(top) = set_top {
                config.top_n = top;
                changed = true;
            }
            if let Some(dir) = set_data_dir {
                config.data_dir = dir;
                changed = true;
            }

            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("設定:");
                println!("  データディレクトリ: {}", config.data_dir().display());
                println!("  softmax温度: {}", config.temperature);
                println!("  上位表示件数: {}", config.top_n);
                println!("  シート: {}", config.sheet.as_deref().unwrap_or("(先頭シート)"));
            }
        }
    }

    Ok(())
}
