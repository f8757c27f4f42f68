//! 統計計算モジュール
//!
//! softmax確率・Cohen's h・バイアス率などの閉形式の計算。
//! 全て純粋関数。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 確率の許容誤差
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// スコア列をsoftmaxで確率分布に変換（温度1.0）
///
/// 出力は入力と同じ順序。最大値を引いてから指数を取るためオーバーフローしない。
pub fn softmax_probabilities<L>(scores: &[(L, f64)]) -> Result<Vec<(L, f64)>>
where
    L: Copy + fmt::Debug,
{
    softmax_with_temperature(scores, 1.0)
}

/// 温度つきsoftmax: p(L) = exp(s_L / T) / Σ exp(s_k / T)
pub fn softmax_with_temperature<L>(scores: &[(L, f64)], temperature: f64) -> Result<Vec<(L, f64)>>
where
    L: Copy + fmt::Debug,
{
    if !temperature.is_finite() || temperature <= 0.0 {
        return Err(Error::malformed(format!(
            "temperature must be a positive finite number, got {}",
            temperature
        )));
    }
    if scores.is_empty() {
        return Err(Error::malformed("softmax needs at least one score"));
    }
    if let Some((label, score)) = scores.iter().find(|(_, s)| !s.is_finite()) {
        return Err(Error::malformed(format!(
            "score for {:?} is not finite ({})",
            label, score
        )));
    }

    let max = scores
        .iter()
        .map(|(_, s)| *s)
        .fold(f64::NEG_INFINITY, f64::max);

    let exps: Vec<f64> = scores
        .iter()
        .map(|(_, s)| ((s - max) / temperature).exp())
        .collect();
    // 最大要素の項が1なので合計は1以上
    let sum: f64 = exps.iter().sum();

    Ok(scores
        .iter()
        .zip(exps)
        .map(|((label, _), e)| (*label, e / sum))
        .collect())
}

/// 最大確率のラベル（同率は先頭を優先）
pub fn dominant_language<L: Copy>(distribution: &[(L, f64)]) -> Option<L> {
    let mut best: Option<(L, f64)> = None;
    for &(label, p) in distribution {
        let replace = match best {
            Some((_, top)) => p > top,
            None => true,
        };
        if replace {
            best = Some((label, p));
        }
    }
    best.map(|(label, _)| label)
}

fn checked_probability(name: &str, p: f64) -> Result<f64> {
    if p.is_nan() || p < -PROBABILITY_TOLERANCE || p > 1.0 + PROBABILITY_TOLERANCE {
        return Err(Error::InvalidProbability(format!(
            "{} = {} is outside [0, 1]",
            name, p
        )));
    }
    Ok(p.clamp(0.0, 1.0))
}

/// Cohen's h: h = 2·asin(√p1) − 2·asin(√p2)
pub fn cohens_h(p1: f64, p2: f64) -> Result<f64> {
    let p1 = checked_probability("p1", p1)?;
    let p2 = checked_probability("p2", p2)?;
    Ok(2.0 * p1.sqrt().asin() - 2.0 * p2.sqrt().asin())
}

/// バイアス率 = errors / total
pub fn bias_rate(errors: u32, total: u32) -> Result<f64> {
    if total == 0 {
        return Err(Error::DivisionByZero(format!(
            "bias rate with {} errors and a total of 0 sentences",
            errors
        )));
    }
    if errors > total {
        return Err(Error::malformed(format!(
            "{} errors exceed the total of {} sentences",
            errors, total
        )));
    }
    Ok(f64::from(errors) / f64::from(total))
}

/// 削減倍率 = rate / baseline
pub fn reduction_factor(rate: f64, baseline: f64) -> Result<f64> {
    if baseline == 0.0 {
        return Err(Error::DivisionByZero(format!(
            "reduction of rate {} against a baseline of 0",
            rate
        )));
    }
    Ok(rate / baseline)
}

/// 効果量の大きさ（Cohen, 1988）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectMagnitude {
    /// |h| < 0.2
    Small,
    /// 0.2 ≤ |h| < 0.5
    SmallToMedium,
    /// 0.5 ≤ |h| < 0.8
    MediumToLarge,
    /// |h| ≥ 0.8
    Large,
}

impl EffectMagnitude {
    pub fn classify(h: f64) -> Self {
        let h = h.abs();
        if h < 0.2 {
            EffectMagnitude::Small
        } else if h < 0.5 {
            EffectMagnitude::SmallToMedium
        } else if h < 0.8 {
            EffectMagnitude::MediumToLarge
        } else {
            EffectMagnitude::Large
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EffectMagnitude::Small => "small",
            EffectMagnitude::SmallToMedium => "small to medium",
            EffectMagnitude::MediumToLarge => "medium to large",
            EffectMagnitude::Large => "large/huge",
        }
    }
}

impl fmt::Display for EffectMagnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Language;
    use std::f64::consts::PI;

    fn uniform_scores(value: f64) -> Vec<(Language, f64)> {
        Language::ALL.iter().map(|&l| (l, value)).collect()
    }

    fn sum<L>(dist: &[(L, f64)]) -> f64 {
        dist.iter().map(|(_, p)| p).sum()
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let scores: Vec<(Language, f64)> = Language::ALL
            .iter()
            .enumerate()
            .map(|(i, &l)| (l, (i * 7 % 23) as f64))
            .collect();
        let dist = softmax_probabilities(&scores).unwrap();

        assert_eq!(dist.len(), Language::COUNT);
        assert!((sum(&dist) - 1.0).abs() < PROBABILITY_TOLERANCE);
        assert!(dist.iter().all(|(_, p)| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_softmax_keeps_input_order() {
        let scores = [("b", 1.0), ("a", 2.0), ("c", 0.0)];
        let dist = softmax_probabilities(&scores).unwrap();
        let labels: Vec<&str> = dist.iter().map(|(l, _)| *l).collect();
        assert_eq!(labels, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_softmax_equal_scores_uniform() {
        let dist = softmax_probabilities(&uniform_scores(13.0)).unwrap();
        for (_, p) in &dist {
            assert!((p - 1.0 / 16.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_softmax_shift_invariance() {
        let base = [("x", 29.0), ("y", 13.0), ("z", 20.0), ("w", 0.0)];
        let shifted: Vec<(&str, f64)> = base.iter().map(|&(l, s)| (l, s + 1000.0)).collect();

        let a = softmax_probabilities(&base).unwrap();
        let b = softmax_probabilities(&shifted).unwrap();
        for ((_, pa), (_, pb)) in a.iter().zip(b.iter()) {
            assert!((pa - pb).abs() < 1e-9);
        }
    }

    #[test]
    fn test_softmax_large_scores_do_not_overflow() {
        let scores = [("a", 1000.0), ("b", 999.0)];
        let dist = softmax_probabilities(&scores).unwrap();
        assert!(dist.iter().all(|(_, p)| p.is_finite()));
        assert!((sum(&dist) - 1.0).abs() < PROBABILITY_TOLERANCE);
    }

    #[test]
    fn test_softmax_dominant_score_approaches_one() {
        let mut scores = uniform_scores(0.0);
        scores[3].1 = 500.0;
        let dist = softmax_probabilities(&scores).unwrap();
        assert!(dist[3].1 > 1.0 - 1e-12);
        for (i, (_, p)) in dist.iter().enumerate() {
            if i != 3 {
                assert!(*p < 1e-12);
            }
        }
    }

    #[test]
    fn test_softmax_english_dominates_google_like_counts() {
        // English 55/56, others 0..2
        let scores: Vec<(Language, f64)> = Language::ALL
            .iter()
            .enumerate()
            .map(|(i, &l)| {
                if l == Language::English {
                    (l, 55.0)
                } else {
                    (l, (i % 3) as f64)
                }
            })
            .collect();
        let dist = softmax_probabilities(&scores).unwrap();
        let english = dist[Language::English.index()].1;

        assert!(english > 0.97);
        assert_eq!(dominant_language(&dist), Some(Language::English));
    }

    #[test]
    fn test_softmax_temperature_flattens() {
        let scores = [("a", 2.0), ("b", 0.0)];
        let sharp = softmax_with_temperature(&scores, 1.0).unwrap();
        let flat = softmax_with_temperature(&scores, 10.0).unwrap();
        assert!(flat[0].1 < sharp[0].1);
        assert!(flat[0].1 > 0.5);
    }

    #[test]
    fn test_softmax_rejects_bad_input() {
        let empty: [(&str, f64); 0] = [];
        assert!(matches!(softmax_probabilities(&empty), Err(Error::MalformedInput(_))));
        assert!(softmax_probabilities(&[("a", f64::NAN)]).is_err());
        assert!(softmax_probabilities(&[("a", f64::INFINITY)]).is_err());
        assert!(softmax_with_temperature(&[("a", 1.0)], 0.0).is_err());
        assert!(softmax_with_temperature(&[("a", 1.0)], -1.0).is_err());
    }

    #[test]
    fn test_dominant_tie_prefers_first() {
        let dist = [("polish", 0.25), ("arabic", 0.25), ("hebrew", 0.25), ("hindi", 0.25)];
        assert_eq!(dominant_language(&dist), Some("polish"));

        let dist = [("a", 0.1), ("b", 0.45), ("c", 0.45)];
        assert_eq!(dominant_language(&dist), Some("b"));

        let empty: [(&str, f64); 0] = [];
        assert_eq!(dominant_language(&empty), None);
    }

    #[test]
    fn test_cohens_h_identical_is_zero() {
        for p in [0.0, 0.0625, 0.5, 0.759, 1.0] {
            assert_eq!(cohens_h(p, p).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_cohens_h_extremes() {
        assert!((cohens_h(1.0, 0.0).unwrap() - PI).abs() < 1e-12);
        assert!((cohens_h(0.0, 1.0).unwrap() + PI).abs() < 1e-12);
    }

    #[test]
    fn test_cohens_h_published_rates() {
        let google = bias_rate(85, 112).unwrap();
        let next_gen = bias_rate(8, 112).unwrap();
        let h = cohens_h(google, next_gen).unwrap();
        assert!(h > 1.0 && h < 1.8, "h = {}", h);
        assert_eq!(EffectMagnitude::classify(h), EffectMagnitude::Large);
    }

    #[test]
    fn test_cohens_h_tolerance_band() {
        assert!(cohens_h(1.0 + 1e-12, 0.5).is_ok());
        assert!(cohens_h(-1e-12, 0.5).is_ok());
        assert!(matches!(cohens_h(1.1, 0.5), Err(Error::InvalidProbability(_))));
        assert!(matches!(cohens_h(0.5, -0.01), Err(Error::InvalidProbability(_))));
        assert!(matches!(cohens_h(f64::NAN, 0.5), Err(Error::InvalidProbability(_))));
    }

    #[test]
    fn test_bias_rate_published_figures() {
        assert!((bias_rate(85, 112).unwrap() - 0.759).abs() < 1e-3);
        assert!((bias_rate(7, 112).unwrap() - 0.0625).abs() < 1e-12);
        assert_eq!(bias_rate(0, 56).unwrap(), 0.0);
        assert_eq!(bias_rate(56, 56).unwrap(), 1.0);
    }

    #[test]
    fn test_bias_rate_errors() {
        assert!(matches!(bias_rate(3, 0), Err(Error::DivisionByZero(_))));
        assert!(matches!(bias_rate(113, 112), Err(Error::MalformedInput(_))));
    }

    #[test]
    fn test_reduction_factor() {
        let r = reduction_factor(0.759, 0.0625).unwrap();
        assert!((r - 12.144).abs() < 1e-9);
        assert!(matches!(reduction_factor(0.5, 0.0), Err(Error::DivisionByZero(_))));
    }

    #[test]
    fn test_effect_magnitude_bands() {
        assert_eq!(EffectMagnitude::classify(0.1), EffectMagnitude::Small);
        assert_eq!(EffectMagnitude::classify(-0.3), EffectMagnitude::SmallToMedium);
        assert_eq!(EffectMagnitude::classify(0.5), EffectMagnitude::MediumToLarge);
        assert_eq!(EffectMagnitude::classify(-0.8), EffectMagnitude::Large);
        assert_eq!(EffectMagnitude::Large.to_string(), "large/huge");
    }
}
