use crate::error::{PivotStatsError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// データディレクトリを上書きする環境変数
pub const DATA_DIR_ENV: &str = "PIVOT_STATS_DATA_DIR";

/// 同梱データのファイル名
pub const PIVOT_SCORES_FILE: &str = "pivot_scores.csv";
pub const BIAS_ERRORS_FILE: &str = "bias_errors.csv";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub temperature: f64,
    pub top_n: usize,
    pub sheet: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            temperature: 1.0,
            top_n: 5,
            sheet: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// ファイルがなければデフォルト
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PivotStatsError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("pivot-stats").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.temperature.is_finite() || self.temperature <= 0.0 {
            return Err(PivotStatsError::Config(format!(
                "temperature は正の有限値である必要があります: {}",
                self.temperature
            )));
        }
        Ok(())
    }

    /// データディレクトリ（環境変数を優先）
    pub fn data_dir(&self) -> PathBuf {
        match std::env::var(DATA_DIR_ENV) {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => self.data_dir.clone(),
        }
    }

    pub fn pivot_scores_path(&self) -> PathBuf {
        self.data_dir().join(PIVOT_SCORES_FILE)
    }

    pub fn bias_errors_path(&self) -> PathBuf {
        self.data_dir().join(BIAS_ERRORS_FILE)
    }

    pub fn set_temperature(&mut self, temperature: f64) -> Result<()> {
        let previous = self.temperature;
        self.temperature = temperature;
        if let Err(e) = self.validate() {
            self.temperature = previous;
            return Err(e);
        }
        Ok(())
    }
}
