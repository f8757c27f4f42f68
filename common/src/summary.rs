//! 集計モジュール
//!
//! PivotScores と BiasTable から、システムごとの確率分布・優勢言語・
//! バイアス率・効果量をまとめた Report を作る。

use crate::error::Result;
use crate::stats::{
    bias_rate, cohens_h, dominant_language, reduction_factor, softmax_with_temperature,
    EffectMagnitude,
};
use crate::types::{BiasRecord, BiasTable, Direction, Language, PivotScores, System};
use serde::{Deserialize, Serialize};

/// 集計オプション
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryOptions {
    /// softmax温度
    pub temperature: f64,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self { temperature: 1.0 }
    }
}

/// 1言語分の確率
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LanguageProbability {
    pub language: Language,
    pub matches: u32,
    pub probability: f64,
}

/// 16言語上の確率分布（候補順）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub dominant: Language,
    pub entries: Vec<LanguageProbability>,
}

impl Distribution {
    fn from_counts(counts: &[u32; Language::COUNT], temperature: f64) -> Result<Self> {
        let scores: Vec<(Language, f64)> = Language::ALL
            .iter()
            .map(|&lang| (lang, f64::from(counts[lang.index()])))
            .collect();
        let probs = softmax_with_temperature(&scores, temperature)?;
        // 16要素なので必ずSome
        let dominant = dominant_language(&probs).unwrap_or(Language::ALL[0]);

        let entries = probs
            .into_iter()
            .map(|(language, probability)| LanguageProbability {
                language,
                matches: counts[language.index()],
                probability,
            })
            .collect();

        Ok(Self { dominant, entries })
    }

    pub fn probability(&self, language: Language) -> f64 {
        self.entries
            .iter()
            .find(|e| e.language == language)
            .map(|e| e.probability)
            .unwrap_or(0.0)
    }

    /// 確率の降順（同率は候補順）で上位n件。n=0なら全件
    pub fn top(&self, n: usize) -> Vec<&LanguageProbability> {
        let mut sorted: Vec<&LanguageProbability> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        if n > 0 {
            sorted.truncate(n);
        }
        sorted
    }
}

/// 方向別の分布
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionDistribution {
    pub direction: Direction,
    pub distribution: Distribution,
}

/// 他システムとの効果量
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectSize {
    pub versus: System,
    pub h: f64,
    pub magnitude: EffectMagnitude,
}

/// システム単位の集計結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSummary {
    pub system: System,
    pub bias: BiasRecord,
    pub bias_rate: f64,
    /// 最小バイアスのシステムに対する倍率（基準が0%なら None）
    pub reduction_factor: Option<f64>,
    /// 両方向合算分布での優勢ピボット言語
    pub dominant: Language,
    pub combined: Distribution,
    pub directions: Vec<DirectionDistribution>,
    pub effect_sizes: Vec<EffectSize>,
}

impl SystemSummary {
    pub fn direction(&self, direction: Direction) -> Option<&Distribution> {
        self.directions
            .iter()
            .find(|d| d.direction == direction)
            .map(|d| &d.distribution)
    }

    pub fn effect_versus(&self, other: System) -> Option<&EffectSize> {
        self.effect_sizes.iter().find(|e| e.versus == other)
    }
}

/// 方向別のバイアス率
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalRate {
    pub direction: Direction,
    pub system: System,
    pub errors: u32,
    pub total: u32,
    pub rate: f64,
}

/// 集計レポート
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub temperature: f64,
    /// バイアス率が最小のシステム（削減倍率の基準）
    pub baseline: System,
    pub systems: Vec<SystemSummary>,
    #[serde(default)]
    pub bias_breakdown: Vec<DirectionalRate>,
}

impl Report {
    pub fn system(&self, system: System) -> Option<&SystemSummary> {
        self.systems.iter().find(|s| s.system == system)
    }
}

/// 全システムを集計
///
/// 入力のどこかが不正なら途中結果は返さずエラーにする。
pub fn summarize(scores: &PivotScores, bias: &BiasTable, options: &SummaryOptions) -> Result<Report> {
    let mut rates = Vec::with_capacity(System::ALL.len());
    for system in System::ALL {
        let record = bias.record(system);
        let rate = bias_rate(record.errors, record.total).map_err(|e| e.context(system))?;
        rates.push((system, record, rate));
    }

    // 同率なら System::ALL の順で先のもの
    let (baseline, _, baseline_rate) = rates
        .iter()
        .copied()
        .fold(rates[0], |best, cur| if cur.2 < best.2 { cur } else { best });

    let mut systems = Vec::with_capacity(rates.len());
    for &(system, record, rate) in &rates {
        let mut directions = Vec::with_capacity(Direction::ALL.len());
        for direction in Direction::ALL {
            let distribution =
                Distribution::from_counts(&scores.counts(direction, system), options.temperature)
                    .map_err(|e| e.context(format!("{} / {}", direction, system)))?;
            directions.push(DirectionDistribution {
                direction,
                distribution,
            });
        }

        let combined = Distribution::from_counts(&scores.combined_counts(system), options.temperature)
            .map_err(|e| e.context(format!("combined / {}", system)))?;

        let mut effect_sizes = Vec::with_capacity(rates.len() - 1);
        for &(other, _, other_rate) in rates.iter().filter(|(s, _, _)| *s != system) {
            let h = cohens_h(rate, other_rate)
                .map_err(|e| e.context(format!("{} vs {}", system, other)))?;
            effect_sizes.push(EffectSize {
                versus: other,
                h,
                magnitude: EffectMagnitude::classify(h),
            });
        }

        let reduction = if baseline_rate > 0.0 {
            Some(reduction_factor(rate, baseline_rate)?)
        } else {
            None
        };

        systems.push(SystemSummary {
            system,
            bias: record,
            bias_rate: rate,
            reduction_factor: reduction,
            dominant: combined.dominant,
            combined,
            directions,
            effect_sizes,
        });
    }

    let mut bias_breakdown = Vec::with_capacity(bias.breakdown().len());
    for record in bias.breakdown() {
        let rate = bias_rate(record.errors, record.total)
            .map_err(|e| e.context(format!("{} / {}", record.direction, record.system)))?;
        bias_breakdown.push(DirectionalRate {
            direction: record.direction,
            system: record.system,
            errors: record.errors,
            total: record.total,
            rate,
        });
    }

    Ok(Report {
        temperature: options.temperature,
        baseline,
        systems,
        bias_breakdown,
    })
}
