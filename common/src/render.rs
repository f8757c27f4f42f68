//! テキストレポート生成
//!
//! 論文付録と同じ5節構成で Report を整形する。

use crate::stats::EffectMagnitude;
use crate::summary::{Distribution, Report};
use crate::types::{Direction, Language};
use std::fmt::Write;

const RULE_WIDTH: usize = 80;

/// 英語確率を強調表示する対象
const HIGHLIGHT: Language = Language::English;

/// テキストレポート設定
#[derive(Debug, Clone, Copy)]
pub struct TextLayout {
    /// 方向別分布で表示する上位件数（0で全件）
    pub top_n: usize,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self { top_n: 5 }
    }
}

fn percent(p: f64) -> String {
    format!("{:5.1}%", p * 100.0)
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n\n{}", title);
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
}

fn write_distribution(out: &mut String, dist: &Distribution, top_n: usize, indent: &str, per: Option<u32>) {
    for entry in dist.top(top_n) {
        let _ = match per {
            Some(total) => writeln!(
                out,
                "{}{:12}: {} ({}/{} matches)",
                indent,
                entry.language.name(),
                percent(entry.probability),
                entry.matches,
                total
            ),
            None => writeln!(
                out,
                "{}{:12}: {} ({} matches)",
                indent,
                entry.language.name(),
                percent(entry.probability),
                entry.matches
            ),
        };
    }
}

/// Report をテキストに整形
pub fn render_text(report: &Report, layout: &TextLayout) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(out, "STATISTICAL ANALYSIS: Multilingual NMT Gender Bias Study");
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    if (report.temperature - 1.0).abs() > f64::EPSILON {
        let _ = writeln!(out, "softmax temperature: {}", report.temperature);
    }

    // 1. 方向別
    heading(&mut out, "1. SOFTMAX PROBABILITIES");
    for direction in Direction::ALL {
        let _ = writeln!(out, "\n{} ({}):", direction, direction.long_name());
        for summary in &report.systems {
            let Some(dist) = summary.direction(direction) else {
                continue;
            };
            let _ = writeln!(out, "\n  {}:", summary.system);
            write_distribution(
                &mut out,
                dist,
                layout.top_n,
                "    ",
                Some(crate::types::SENTENCES_PER_DIRECTION),
            );
            let _ = writeln!(
                out,
                "    {:12}: {} *** {} ***",
                HIGHLIGHT.name(),
                percent(dist.probability(HIGHLIGHT)),
                HIGHLIGHT.name().to_uppercase()
            );
            let _ = writeln!(out, "    dominant pivot: {}", dist.dominant);
        }
    }

    // 2. 両方向合算
    heading(&mut out, "2. COMBINED DIRECTION SOFTMAX");
    for summary in &report.systems {
        let _ = writeln!(out, "\n{}:", summary.system);
        write_distribution(&mut out, &summary.combined, 0, "  ", None);
        let _ = writeln!(out, "  => dominant pivot language: {}", summary.dominant);
    }

    // 3. 効果量
    heading(&mut out, "3. COHEN'S h EFFECT SIZES");
    let _ = writeln!(out, "\nBias rates (combined):");
    for summary in &report.systems {
        let _ = writeln!(
            out,
            "  {:18}{} ({}/{})",
            format!("{}:", summary.system),
            percent(summary.bias_rate),
            summary.bias.errors,
            summary.bias.total
        );
    }
    let _ = writeln!(out, "\nEffect sizes (Cohen's h):");
    for (i, summary) in report.systems.iter().enumerate() {
        // 各ペアは一度だけ表示
        for effect in &summary.effect_sizes {
            let other_index = report
                .systems
                .iter()
                .position(|s| s.system == effect.versus)
                .unwrap_or(0);
            if other_index <= i {
                continue;
            }
            let _ = writeln!(
                out,
                "  {:34}h = {:5.2} ({})",
                format!("{} vs {}:", summary.system, effect.versus),
                effect.h,
                effect.magnitude
            );
        }
    }
    let _ = writeln!(out, "\nInterpretation (Cohen, 1988):");
    for (band, magnitude) in [
        ("|h| < 0.2", EffectMagnitude::Small),
        ("0.2 ≤ |h| < 0.5", EffectMagnitude::SmallToMedium),
        ("0.5 ≤ |h| < 0.8", EffectMagnitude::MediumToLarge),
        ("|h| ≥ 0.8", EffectMagnitude::Large),
    ] {
        let _ = writeln!(out, "  {:18}{}", band, magnitude);
    }

    // 4. 削減倍率
    heading(&mut out, "4. BIAS REDUCTION");
    let _ = writeln!(out);
    let mut any_reduction = false;
    for summary in report.systems.iter().filter(|s| s.system != report.baseline) {
        if let Some(factor) = summary.reduction_factor {
            any_reduction = true;
            let _ = writeln!(
                out,
                "{:34}{:.1}× reduction",
                format!("{} → {}:", summary.system, report.baseline),
                factor
            );
        }
    }
    if !any_reduction {
        let _ = writeln!(out, "{} has a bias rate of 0%; no reduction factor.", report.baseline);
    }

    // 5. 方向別の誤り数
    if !report.bias_breakdown.is_empty() {
        heading(&mut out, "5. SUMMARY STATISTICS");
        let _ = writeln!(out, "\nError counts by direction:");
        for direction in Direction::ALL {
            let rows: Vec<_> = report
                .bias_breakdown
                .iter()
                .filter(|r| r.direction == direction)
                .collect();
            let Some(first) = rows.first() else {
                continue;
            };
            let _ = writeln!(out, "\n{} (out of {}):", direction.long_name(), first.total);
            for row in rows {
                let _ = writeln!(
                    out,
                    "  {:20}: {:3} errors ({})",
                    row.system.to_string(),
                    row.errors,
                    percent(row.rate)
                );
            }
        }
        let _ = writeln!(out, "\nCombined:");
        for summary in &report.systems {
            let _ = writeln!(
                out,
                "  {:20}: {:3} errors ({})",
                summary.system.to_string(),
                summary.bias.errors,
                percent(summary.bias_rate)
            );
        }
    }

    let _ = writeln!(out, "\n{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(out, "Analysis complete!");
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));

    out
}
