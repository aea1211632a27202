use crate::asset;
use crate::catalog::{SpreadCatalog, SPREADS_FILE_NAME};
use crate::config::{AppConfig, ConfigStore, TomlConfigStore};
use crate::deck::{self, Deck, DeckRegistry, DECKS_DIR_NAME};
use crate::divination::{Divination, Pacing, TarotRequest};
use crate::error::{Result, TarotError};
use crate::messaging::{MessageSink, Narrator};
use rand::Rng;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// 塔罗牌プラグイン本体
pub struct TarotsPlugin<S: ConfigStore = TomlConfigStore> {
    decks_dir: PathBuf,
    store: S,
    config: AppConfig,
    registry: DeckRegistry,
    deck: Option<Deck>,
    spreads: SpreadCatalog,
    pacing: Pacing,
}

impl TarotsPlugin<TomlConfigStore> {
    /// base_dir 配下の config.toml と tarot_jsons/ を使う
    pub fn init(base_dir: &Path) -> Result<Self> {
        Self::with_store(base_dir, TomlConfigStore::in_dir(base_dir))
    }
}

impl<S: ConfigStore> TarotsPlugin<S> {
    pub fn with_store(base_dir: &Path, store: S) -> Result<Self> {
        let decks_dir = base_dir.join(DECKS_DIR_NAME);
        let mut config = store.load_or_default();

        // 牌组を走査して設定を修正
        let mut registry = DeckRegistry::from_config(&config.cards);
        if registry.reconcile(deck::scan_decks(&decks_dir)) {
            registry.apply_to(&mut config.cards);
            if let Err(e) = store.save(&config) {
                error!("[Plugin] 更新牌组配置失败: {}", e);
            }
        }

        let (deck, spreads) = match registry.using() {
            Some(name) => {
                let deck = Deck::load(&decks_dir, name)?;
                let spreads = SpreadCatalog::load(&decks_dir.join(SPREADS_FILE_NAME))?;
                info!(
                    "[Plugin] 已加载{}张卡牌和{}种抽牌方式",
                    deck.cards.meta.total_cards,
                    spreads.len()
                );
                (Some(deck), spreads)
            }
            None => {
                info!("[Plugin] 没有加载到任何可用牌组");
                (None, SpreadCatalog::default())
            }
        };

        Ok(Self {
            decks_dir,
            store,
            config,
            registry,
            deck,
            spreads,
            pacing: Pacing::default(),
        })
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn registry(&self) -> &DeckRegistry {
        &self.registry
    }

    pub fn deck(&self) -> Option<&Deck> {
        self.deck.as_ref()
    }

    pub fn spreads(&self) -> &SpreadCatalog {
        &self.spreads
    }

    pub fn is_enabled(&self) -> bool {
        self.config.plugin.enabled && self.config.components.enable_tarots
    }

    pub async fn divine<R: Rng + Send>(
        &self,
        request: &TarotRequest,
        sink: &dyn MessageSink,
        narrator: Option<&dyn Narrator>,
        rng: &mut R,
    ) -> Result<String> {
        let divination = Divination {
            deck: self.deck.as_ref(),
            spreads: &self.spreads,
            adjustment: &self.config.adjustment,
            max_reply_chars: self.config.narrator.max_reply_chars,
            pacing: self.pacing,
        };
        divination.execute(request, sink, narrator, rng).await
    }

    /// 使用中牌组の画像欠落チェック
    pub fn check_assets(&self) -> Result<Vec<String>> {
        let deck = self.deck.as_ref().ok_or(TarotError::NoDeck)?;
        Ok(asset::find_missing_images(&deck.cards, &deck.dir))
    }

    /// 牌组切替。読み込みに成功してから設定を保存する
    pub fn switch_deck(&mut self, name: &str) -> Result<()> {
        let mut registry = self.registry.clone();
        registry.switch(name)?;
        let deck = Deck::load(&self.decks_dir, name)?;
        if self.deck.is_none() {
            self.spreads = SpreadCatalog::load(&self.decks_dir.join(SPREADS_FILE_NAME))?;
        }

        let mut config = self.config.clone();
        registry.apply_to(&mut config.cards);
        self.store.save(&config)?;

        info!("[Plugin] 切换牌组: {}", name);
        self.registry = registry;
        self.config = config;
        self.deck = Some(deck);
        Ok(())
    }
}
