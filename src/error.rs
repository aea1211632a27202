use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TarotError {
    #[error("不存在的抽牌范围: {0}")]
    InvalidCardType(String),

    #[error("不存在的抽牌方法: {0}")]
    InvalidSpread(String),

    #[error("当前牌组配置错误，抽牌范围内没有卡牌")]
    EmptyPool,

    #[error("牌阵需要{requested}张牌，但抽牌范围内只有{available}张")]
    InsufficientPool { requested: usize, available: usize },

    #[error("卡牌图片不存在: {}", .0.display())]
    AssetMissing(PathBuf),

    #[error("外部服务错误: {0}")]
    ExternalService(String),

    #[error("没有可用的牌组")]
    NoDeck,

    #[error("牌组「{name}」不可用，可用牌组: {}", .available.join("、"))]
    UnknownDeck { name: String, available: Vec<String> },

    #[error("权限不足，只有管理员可以使用该命令")]
    PermissionDenied,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}

impl TarotError {
    /// 入力・牌阵設定の検証エラーか（ユーザーへ短い拒否メッセージを返す対象）
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            TarotError::InvalidCardType(_)
                | TarotError::InvalidSpread(_)
                | TarotError::EmptyPool
                | TarotError::InsufficientPool { .. }
        )
    }

    /// ユーザー向けの拒否メッセージ
    pub fn denial_message(&self) -> String {
        format!("❌ {}", self)
    }
}

pub type Result<T, E = TarotError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_classified() {
        assert!(TarotError::InvalidCardType("中等".into()).is_validation());
        assert!(TarotError::InvalidSpread("x".into()).is_validation());
        assert!(TarotError::EmptyPool.is_validation());
        assert!(TarotError::InsufficientPool { requested: 10, available: 5 }.is_validation());
        assert!(!TarotError::ExternalService("timeout".into()).is_validation());
        assert!(!TarotError::NoDeck.is_validation());
        assert!(!TarotError::PermissionDenied.is_validation());
    }

    #[test]
    fn unknown_deck_lists_available() {
        let e = TarotError::UnknownDeck {
            name: "west".into(),
            available: vec!["bilibili".into(), "east".into()],
        };
        assert_eq!(e.to_string(), "牌组「west」不可用，可用牌组: bilibili、east");
        assert_eq!(
            TarotError::InvalidSpread("七星".into()).denial_message(),
            "❌ 不存在的抽牌方法: 七星"
        );
        assert_eq!(
            TarotError::PermissionDenied.denial_message(),
            "❌ 权限不足，只有管理员可以使用该命令"
        );
    }
}
