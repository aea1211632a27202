use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    pub config_version: String,
    pub enabled: bool,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            config_version: "2.2.1".to_string(),
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentsConfig {
    pub enable_tarots: bool,
}

impl Default for ComponentsConfig {
    fn default() -> Self {
        Self { enable_tarots: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionsConfig {
    pub admin_users: Vec<String>,
}

impl Default for PermissionsConfig {
    fn default() -> Self {
        Self {
            admin_users: vec!["123456789".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub enable_proxy: bool,
    pub proxy_url: String,
}

/// 牌组設定（using_cards: 使用中の牌组, use_cards: 利用可能な牌组一覧）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardsConfig {
    pub using_cards: String,
    pub use_cards: Vec<String>,
}

impl Default for CardsConfig {
    fn default() -> Self {
        Self {
            using_cards: "bilibili".to_string(),
            use_cards: vec!["bilibili".to_string(), "east".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentConfig {
    pub enable_original_text: bool,
    pub ai_interpretation: bool,
}

impl Default for AdjustmentConfig {
    fn default() -> Self {
        Self {
            enable_original_text: false,
            ai_interpretation: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarratorConfig {
    pub model: String,
    pub timeout: u64,
    pub max_retries: u32,
    pub max_reply_chars: usize,
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            timeout: 30,
            max_retries: 3,
            max_reply_chars: 100,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub plugin: PluginConfig,
    pub components: ComponentsConfig,
    pub permissions: PermissionsConfig,
    pub proxy: ProxyConfig,
    pub cards: CardsConfig,
    pub adjustment: AdjustmentConfig,
    pub narrator: NarratorConfig,
}

impl AppConfig {
    pub fn is_admin(&self, user_id: &str) -> bool {
        self.permissions.admin_users.iter().any(|s| s == user_id)
    }

    /// 有効なプロキシURL（無効または空ならNone）
    pub fn proxy_url(&self) -> Option<&str> {
        if self.proxy.enable_proxy && !self.proxy.proxy_url.is_empty() {
            Some(&self.proxy.proxy_url)
        } else {
            None
        }
    }
}

/// 設定の永続化
pub trait ConfigStore {
    fn load(&self) -> Result<AppConfig>;
    /// 書き込みは全体置換（途中状態が読まれないこと）
    fn save(&self, config: &AppConfig) -> Result<()>;

    /// 読み込み失敗時はデフォルト設定
    fn load_or_default(&self) -> AppConfig {
        match self.load() {
            Ok(config) => config,
            Err(e) => {
                error!("[Config] 加载配置失败: {}", e);
                AppConfig::default()
            }
        }
    }
}

/// TOMLファイルによる設定ストア
#[derive(Debug, Clone)]
pub struct TomlConfigStore {
    path: PathBuf,
}

impl TomlConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(base_dir: &Path) -> Self {
        Self::new(base_dir.join(CONFIG_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| CONFIG_FILE_NAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ConfigStore for TomlConfigStore {
    fn load(&self) -> Result<AppConfig> {
        let text = fs::read_to_string(&self.path)?;
        let config: AppConfig = toml::from_str(&text)?;
        Ok(config)
    }

    fn save(&self, config: &AppConfig) -> Result<()> {
        let text = toml::to_string_pretty(config)?;
        let tmp = self.temp_path();
        fs::write(&tmp, text)?;
        // 同一ディレクトリ内のrenameで置換
        fs::rename(&tmp, &self.path)?;
        info!("[Config] 保存: {}", self.path.display());
        Ok(())
    }
}
