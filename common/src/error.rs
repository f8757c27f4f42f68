//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 表の欠損・重複・範囲外・数値でない値
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// 効果量計算時に [0,1] 外の確率
    #[error("Invalid probability: {0}")]
    InvalidProbability(String),

    /// 分母が0
    #[error("Division by zero: {0}")]
    DivisionByZero(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedInput(msg.into())
    }

    /// メッセージの先頭に対象レコードを付与
    pub fn context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            Error::MalformedInput(m) => Error::MalformedInput(format!("{}: {}", ctx, m)),
            Error::InvalidProbability(m) => Error::InvalidProbability(format!("{}: {}", ctx, m)),
            Error::DivisionByZero(m) => Error::DivisionByZero(format!("{}: {}", ctx, m)),
        }
    }
}
