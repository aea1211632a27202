// 牌组の管理
// tarot_jsons/<牌组名>/tarots.json があるディレクトリを利用可能な牌组とみなす

use crate::catalog::{CardCatalog, CARDS_FILE_NAME};
use crate::config::CardsConfig;
use crate::error::{Result, TarotError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

pub const DECKS_DIR_NAME: &str = "tarot_jsons";

/// 読み込み済みの牌组
#[derive(Debug, Clone)]
pub struct Deck {
    pub name: String,
    pub dir: PathBuf,
    pub cards: CardCatalog,
}

impl Deck {
    pub fn load(decks_dir: &Path, name: &str) -> Result<Self> {
        let dir = decks_dir.join(name);
        let cards = CardCatalog::load(&dir.join(CARDS_FILE_NAME))?;
        info!("[Deck] 已加载牌组 {}: {}张卡牌", name, cards.len());
        Ok(Self {
            name: name.to_string(),
            dir,
            cards,
        })
    }
}

/// 牌组ディレクトリを走査（名前順）
pub fn scan_decks(decks_dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(decks_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("[Deck] 无法读取牌组目录 {}: {}", decks_dir.display(), e);
            return Vec::new();
        }
    };
    let mut found: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir() && path.join(CARDS_FILE_NAME).is_file())
        .filter_map(|path| path.file_name().and_then(|n| n.to_str()).map(str::to_string))
        .collect();
    found.sort();
    for name in &found {
        info!("[Deck] 发现牌组: {}", name);
    }
    found
}

/// 使用中・利用可能な牌组
#[derive(Debug, Clone, PartialEq)]
pub struct DeckRegistry {
    using: String,
    available: Vec<String>,
}

impl DeckRegistry {
    pub fn from_config(cards: &CardsConfig) -> Self {
        Self {
            using: cards.using_cards.clone(),
            available: cards.use_cards.clone(),
        }
    }

    pub fn using(&self) -> Option<&str> {
        if self.using.is_empty() {
            None
        } else {
            Some(&self.using)
        }
    }

    pub fn available(&self) -> &[String] {
        &self.available
    }

    pub fn is_available(&self, name: &str) -> bool {
        self.available.iter().any(|n| n == name)
    }

    /// 走査結果に合わせて修正する。変更があればtrue
    pub fn reconcile(&mut self, scanned: Vec<String>) -> bool {
        let before = self.clone();

        if self.using.is_empty() || !scanned.contains(&self.using) {
            match scanned.first() {
                Some(first) => {
                    warn!("[Deck] 自动切换牌组至: {}", first);
                    self.using = first.clone();
                }
                None => {
                    error!("[Deck] 未发现任何可用牌组");
                    self.using.clear();
                }
            }
        }
        self.available = scanned;
        if !self.available.is_empty() {
            info!("[Deck] 可用牌组: {:?}", self.available);
        }

        *self != before
    }

    /// use_cards に含まれる牌组のみ切替可能
    pub fn switch(&mut self, name: &str) -> Result<()> {
        if !self.is_available(name) {
            return Err(TarotError::UnknownDeck {
                name: name.to_string(),
                available: self.available.clone(),
            });
        }
        self.using = name.to_string();
        Ok(())
    }

    pub fn apply_to(&self, cards: &mut CardsConfig) {
        cards.using_cards = self.using.clone();
        cards.use_cards = self.available.clone();
    }
}
