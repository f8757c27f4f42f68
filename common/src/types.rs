//! データモデル
//!
//! - Direction / System / Language: 固定の列挙（ラベル解析つき）
//! - MatchRecord / BiasRecord / DirectionalBias: 表の1行
//! - PivotScores / BiasTable: 検証済みの入力表（ロード後は不変）

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// 1方向あたりの文数
pub const SENTENCES_PER_DIRECTION: u32 = 56;

/// 両方向合計の文数
pub const COMBINED_SENTENCES: u32 = SENTENCES_PER_DIRECTION * 2;

/// 大文字小文字・記号・空白を無視したラベル比較用キー
fn label_key(label: &str) -> String {
    label
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// 翻訳方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "ES→EL")]
    EsEl,
    #[serde(rename = "EL→ES")]
    ElEs,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::EsEl, Direction::ElEs];

    /// 言語名での表記（Spanish→Greek）
    pub fn long_name(&self) -> &'static str {
        match self {
            Direction::EsEl => "Spanish→Greek",
            Direction::ElEs => "Greek→Spanish",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::EsEl => write!(f, "ES→EL"),
            Direction::ElEs => write!(f, "EL→ES"),
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match label_key(s).as_str() {
            "esel" | "spanishgreek" => Ok(Direction::EsEl),
            "eles" | "greekspanish" => Ok(Direction::ElEs),
            _ => Err(Error::malformed(format!(
                "unknown direction '{}' (expected ES→EL or EL→ES)",
                s.trim()
            ))),
        }
    }
}

/// 翻訳システム
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum System {
    #[serde(rename = "Google Translate")]
    Google,
    #[serde(rename = "DeepL Classic")]
    DeepLClassic,
    #[serde(rename = "DeepL Next Gen")]
    DeepLNextGen,
}

impl System {
    pub const ALL: [System; 3] = [System::Google, System::DeepLClassic, System::DeepLNextGen];

    /// 短縮表記
    pub fn short_name(&self) -> &'static str {
        match self {
            System::Google => "Google",
            System::DeepLClassic => "DeepL-Classic",
            System::DeepLNextGen => "DeepL-NextGen",
        }
    }
}

impl fmt::Display for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            System::Google => write!(f, "Google Translate"),
            System::DeepLClassic => write!(f, "DeepL Classic"),
            System::DeepLNextGen => write!(f, "DeepL Next Gen"),
        }
    }
}

impl FromStr for System {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match label_key(s).as_str() {
            "google" | "googletranslate" => Ok(System::Google),
            "deeplclassic" => Ok(System::DeepLClassic),
            "deeplnextgen" | "deeplng" => Ok(System::DeepLNextGen),
            _ => Err(Error::malformed(format!("unknown system '{}'", s.trim()))),
        }
    }
}

/// ピボット候補言語（宣言順が同率時の優先順）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    German,
    Swedish,
    Turkish,
    Chinese,
    Swahili,
    Hungarian,
    Italian,
    French,
    Polish,
    Arabic,
    Hebrew,
    Hindi,
    Russian,
    Japanese,
    Albanian,
}

impl Language {
    pub const COUNT: usize = 16;

    /// 固定の候補順
    pub const ALL: [Language; Language::COUNT] = [
        Language::English,
        Language::German,
        Language::Swedish,
        Language::Turkish,
        Language::Chinese,
        Language::Swahili,
        Language::Hungarian,
        Language::Italian,
        Language::French,
        Language::Polish,
        Language::Arabic,
        Language::Hebrew,
        Language::Hindi,
        Language::Russian,
        Language::Japanese,
        Language::Albanian,
    ];

    /// 候補順でのインデックス
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::German => "German",
            Language::Swedish => "Swedish",
            Language::Turkish => "Turkish",
            Language::Chinese => "Chinese",
            Language::Swahili => "Swahili",
            Language::Hungarian => "Hungarian",
            Language::Italian => "Italian",
            Language::French => "French",
            Language::Polish => "Polish",
            Language::Arabic => "Arabic",
            Language::Hebrew => "Hebrew",
            Language::Hindi => "Hindi",
            Language::Russian => "Russian",
            Language::Japanese => "Japanese",
            Language::Albanian => "Albanian",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let key = label_key(s);
        Language::ALL
            .iter()
            .copied()
            .find(|lang| label_key(lang.name()) == key)
            .ok_or_else(|| Error::malformed(format!("unknown language '{}'", s.trim())))
    }
}

/// ピボットスコア表の1セル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub direction: Direction,
    pub language: Language,
    pub system: System,
    /// 一致文数（0〜56）
    pub matches: u32,
}

/// システム単位のバイアス誤り数（両方向合計）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiasRecord {
    pub system: System,
    pub errors: u32,
    pub total: u32,
}

/// 方向別のバイアス誤り数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionalBias {
    pub direction: Direction,
    pub system: System,
    pub errors: u32,
    pub total: u32,
}

/// 検証済みピボットスコア表
///
/// 全ての (方向, システム) について16言語がちょうど1件ずつ揃っている。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PivotScores {
    counts: BTreeMap<(Direction, System), [u32; Language::COUNT]>,
}

impl PivotScores {
    /// レコード列から構築（欠損・重複・範囲外はエラー）
    pub fn from_records(records: &[MatchRecord]) -> Result<Self> {
        let mut cells: BTreeMap<(Direction, System), [Option<u32>; Language::COUNT]> =
            BTreeMap::new();

        for record in records {
            if record.matches > SENTENCES_PER_DIRECTION {
                return Err(Error::malformed(format!(
                    "{} / {} / {}: match count {} exceeds {}",
                    record.direction,
                    record.system,
                    record.language,
                    record.matches,
                    SENTENCES_PER_DIRECTION
                )));
            }

            let slot = &mut cells
                .entry((record.direction, record.system))
                .or_insert([None; Language::COUNT])[record.language.index()];

            if slot.is_some() {
                return Err(Error::malformed(format!(
                    "{} / {}: duplicate entry for {}",
                    record.direction, record.system, record.language
                )));
            }
            *slot = Some(record.matches);
        }

        let mut counts = BTreeMap::new();
        for direction in Direction::ALL {
            for system in System::ALL {
                let row = cells.get(&(direction, system)).ok_or_else(|| {
                    Error::malformed(format!("{} / {}: no match counts", direction, system))
                })?;

                let mut complete = [0u32; Language::COUNT];
                for language in Language::ALL {
                    complete[language.index()] = row[language.index()].ok_or_else(|| {
                        Error::malformed(format!(
                            "{} / {}: missing language {}",
                            direction, system, language
                        ))
                    })?;
                }
                counts.insert((direction, system), complete);
            }
        }

        Ok(Self { counts })
    }

    /// 一致文数（候補順）
    pub fn counts(&self, direction: Direction, system: System) -> [u32; Language::COUNT] {
        self.counts
            .get(&(direction, system))
            .copied()
            .unwrap_or([0; Language::COUNT])
    }

    /// 両方向を合算した一致文数
    pub fn combined_counts(&self, system: System) -> [u32; Language::COUNT] {
        let mut total = [0u32; Language::COUNT];
        for direction in Direction::ALL {
            for (sum, count) in total.iter_mut().zip(self.counts(direction, system)) {
                *sum += count;
            }
        }
        total
    }
}

/// 検証済みバイアス表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BiasTable {
    combined: BTreeMap<System, BiasRecord>,
    breakdown: Vec<DirectionalBias>,
}

impl BiasTable {
    /// システム単位の合計値から構築
    pub fn from_records(records: &[BiasRecord]) -> Result<Self> {
        let mut combined = BTreeMap::new();
        for record in records {
            check_counts(
                &record.system.to_string(),
                record.errors,
                record.total,
                COMBINED_SENTENCES,
            )?;
            if combined.insert(record.system, *record).is_some() {
                return Err(Error::malformed(format!(
                    "duplicate bias record for {}",
                    record.system
                )));
            }
        }
        for system in System::ALL {
            if !combined.contains_key(&system) {
                return Err(Error::malformed(format!("no bias record for {}", system)));
            }
        }

        Ok(Self {
            combined,
            breakdown: Vec::new(),
        })
    }

    /// 方向別の値から構築（合計は両方向の和）
    pub fn from_directional(records: &[DirectionalBias]) -> Result<Self> {
        let mut cells: BTreeMap<(Direction, System), DirectionalBias> = BTreeMap::new();
        for record in records {
            check_counts(
                &format!("{} / {}", record.direction, record.system),
                record.errors,
                record.total,
                SENTENCES_PER_DIRECTION,
            )?;
            if cells.insert((record.direction, record.system), *record).is_some() {
                return Err(Error::malformed(format!(
                    "{} / {}: duplicate bias record",
                    record.direction, record.system
                )));
            }
        }

        let mut breakdown = Vec::with_capacity(Direction::ALL.len() * System::ALL.len());
        let mut combined = BTreeMap::new();
        for direction in Direction::ALL {
            for system in System::ALL {
                let record = cells.get(&(direction, system)).ok_or_else(|| {
                    Error::malformed(format!("{} / {}: no bias record", direction, system))
                })?;
                breakdown.push(*record);

                let sum = combined.entry(system).or_insert(BiasRecord {
                    system,
                    errors: 0,
                    total: 0,
                });
                sum.errors += record.errors;
                sum.total += record.total;
            }
        }

        Ok(Self {
            combined,
            breakdown,
        })
    }

    pub fn record(&self, system: System) -> BiasRecord {
        self.combined.get(&system).copied().unwrap_or(BiasRecord {
            system,
            errors: 0,
            total: 0,
        })
    }

    /// 方向別の内訳（合計値のみで構築した場合は空）
    pub fn breakdown(&self) -> &[DirectionalBias] {
        &self.breakdown
    }
}

/// 誤り数と文数の検証（文数は固定）
fn check_counts(what: &str, errors: u32, total: u32, expected: u32) -> Result<()> {
    if total == 0 {
        return Err(Error::DivisionByZero(format!("{}: total is 0", what)));
    }
    if total != expected {
        return Err(Error::malformed(format!(
            "{}: total {} must be {} sentences",
            what, total, expected
        )));
    }
    if errors > total {
        return Err(Error::malformed(format!(
            "{}: {} errors exceed the total of {} sentences",
            what, errors, total
        )));
    }
    Ok(())
}
