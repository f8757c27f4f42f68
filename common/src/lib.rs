//! Pivot Stats Common Library
//!
//! ピボット言語確率とバイアス効果量の計算。CLIから利用される型と関数。

pub mod types;
pub mod error;
pub mod stats;
pub mod summary;
pub mod render;
pub mod export;

pub use types::{
    BiasRecord, BiasTable, Direction, DirectionalBias, Language, MatchRecord, PivotScores, System,
    COMBINED_SENTENCES, SENTENCES_PER_DIRECTION,
};
pub use error::{Error, Result};
pub use stats::{
    bias_rate, cohens_h, dominant_language, reduction_factor, softmax_probabilities,
    softmax_with_temperature, EffectMagnitude, PROBABILITY_TOLERANCE,
};
pub use summary::{summarize, Distribution, EffectSize, Report, SummaryOptions, SystemSummary};
pub use render::{render_text, TextLayout};
