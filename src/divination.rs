// 占卜アクション
// 抽牌 → 画像送信 → （原文）→ 解読 の順に実行する

use crate::asset;
use crate::catalog::SpreadCatalog;
use crate::config::AdjustmentConfig;
use crate::deck::Deck;
use crate::draw::{self, DrawnCard, SPREAD_NAMES};
use crate::error::{Result, TarotError};
use crate::interpret;
use crate::messaging::{MessageSink, Narrator};
use rand::Rng;
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{error, info, warn};

pub const ACTIVATION_KEYWORDS: [&str; 6] = ["抽一张塔罗牌", "抽张塔罗牌", "塔罗占卜", "塔罗牌", "占卜", "算一卦"];
pub const DEFAULT_CARD_TYPE: &str = "全部";
pub const DEFAULT_SPREAD: &str = "单张";
pub const DEFAULT_USER: &str = "用户";

/// 本文から検出する抽牌范围（長いものから）
const CARD_TYPE_KEYWORDS: [(&str, &str); 5] = [
    ("大阿卡纳", "大阿卡纳"),
    ("小阿卡纳", "小阿卡纳"),
    ("大阿", "大阿卡纳"),
    ("小阿", "小阿卡纳"),
    ("全部", "全部"),
];

/// 本文から検出する牌阵の略称
const SPREAD_ALIASES: [(&str, &str); 4] = [
    ("时间", "时间之流"),
    ("五牌", "五牌阵"),
    ("吉普赛", "吉普赛十字"),
    ("六芒", "六芒星"),
];

/// "名前:発言" から名前部分を取り出す（全角コロン可）
pub fn parse_target_user(label: &str) -> String {
    static NAME_PREFIX: OnceLock<Regex> = OnceLock::new();
    let re = NAME_PREFIX.get_or_init(|| Regex::new(r"^([^:：]*)[:：]").expect("valid regex"));
    let name = re
        .captures(label)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(label)
        .trim();
    if name.is_empty() {
        DEFAULT_USER.to_string()
    } else {
        name.to_string()
    }
}

/// 占卜の依頼内容（未正規化）
#[derive(Debug, Clone, PartialEq)]
pub struct TarotRequest {
    pub card_type: String,
    pub spread: String,
    pub target_user: String,
}

impl TarotRequest {
    pub fn new(card_type: &str, spread: &str, target_label: &str) -> Self {
        Self {
            card_type: card_type.to_string(),
            spread: spread.to_string(),
            target_user: parse_target_user(target_label),
        }
    }

    /// 発言本文から抽牌范围・牌阵を拾う。見つからなければ既定値
    pub fn from_message(label: &str) -> Self {
        let utterance = match label.find([':', '：']) {
            Some(idx) => &label[idx..],
            None => label,
        };
        let card_type = CARD_TYPE_KEYWORDS
            .iter()
            .find(|(keyword, _)| utterance.contains(keyword))
            .map(|(_, card_type)| *card_type)
            .unwrap_or(DEFAULT_CARD_TYPE);
        let spread = SPREAD_NAMES
            .iter()
            .copied()
            .find(|name| utterance.contains(name))
            .or_else(|| {
                SPREAD_ALIASES
                    .iter()
                    .find(|(alias, _)| utterance.contains(alias))
                    .map(|(_, name)| *name)
            })
            .unwrap_or(DEFAULT_SPREAD);
        Self::new(card_type, spread, label)
    }
}

/// 送信間隔
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    pub between_images: Duration,
    pub before_interpretation: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            between_images: Duration::from_millis(500),
            before_interpretation: Duration::from_secs(1),
        }
    }
}

impl Pacing {
    pub fn none() -> Self {
        Self {
            between_images: Duration::ZERO,
            before_interpretation: Duration::ZERO,
        }
    }
}

pub struct Divination<'a> {
    pub deck: Option<&'a Deck>,
    pub spreads: &'a SpreadCatalog,
    pub adjustment: &'a AdjustmentConfig,
    pub max_reply_chars: usize,
    pub pacing: Pacing,
}

impl<'a> Divination<'a> {
    /// 占卜を実行する。検証エラーは拒否メッセージを送ってからErrを返す
    pub async fn execute<R: Rng + Send>(
        &self,
        request: &TarotRequest,
        sink: &dyn MessageSink,
        narrator: Option<&dyn Narrator>,
        rng: &mut R,
    ) -> Result<String> {
        let deck = match self.deck {
            Some(deck) => deck,
            None => {
                sink.send_text("❌ 没有可用的牌组，无法进行占卜").await?;
                return Err(TarotError::NoDeck);
            }
        };
        info!(
            "[Tarot] 占卜参数: card_type={}, formation={}, target_user={}",
            request.card_type, request.spread, request.target_user
        );

        let drawn = match draw::draw(&deck.cards, self.spreads, &request.card_type, &request.spread, rng) {
            Ok(drawn) => drawn,
            Err(e) if e.is_validation() => {
                warn!("[Tarot] 参数错误: {}", e);
                sink.send_text(&e.denial_message()).await?;
                return Err(e);
            }
            Err(e) => {
                error!("[Tarot] 抽牌失败: {}", e);
                sink.send_text("❌ 抽牌失败，请稍后再试").await?;
                return Err(e);
            }
        };

        let mut sent = 0usize;
        for card in &drawn.cards {
            match self.send_card_image(deck, card, sink).await {
                Ok(()) => {
                    sent += 1;
                    tokio::time::sleep(self.pacing.between_images).await;
                }
                Err(e) => error!("[Tarot] 发送图片失败 {}: {}", card.name, e),
            }
        }
        if sent == 0 {
            sink.send_text("❌ 卡牌图片发送失败，无法进行占卜").await?;
            return Err(TarotError::AssetMissing(deck.dir.clone()));
        }

        if self.adjustment.enable_original_text {
            sink.send_text(&original_text(&drawn.cards)).await?;
        }

        tokio::time::sleep(self.pacing.before_interpretation).await;

        let narrator = if self.adjustment.ai_interpretation { narrator } else { None };
        let text = interpret::interpret(&drawn.cards, &request.target_user, narrator, self.max_reply_chars, rng).await;
        if let Err(e) = sink.send_text(&text).await {
            error!("[Tarot] 解读发送失败: {}", e);
            sink.send_text(&interpret::basic_text(&drawn.cards, &request.target_user)).await?;
        }

        info!("[Tarot] 塔罗牌占卜执行成功");
        Ok(format!("已为{}抽取塔罗牌", request.target_user))
    }

    async fn send_card_image(&self, deck: &Deck, card: &DrawnCard, sink: &dyn MessageSink) -> Result<()> {
        let path = asset::image_path(&deck.dir, &card.name, card.is_reversed);
        let image = asset::load_image_base64(&path)?;
        sink.send_image(&image).await?;
        info!("[Tarot] 成功发送本地图片: {}", path.display());
        Ok(())
    }
}

/// カードの原文（位置・名称・正逆位・説明）
pub fn original_text(cards: &[DrawnCard]) -> String {
    cards
        .iter()
        .map(|card| {
            format!(
                "【{}】{}（{}）\n{}：{}",
                card.position_name,
                card.name,
                card.orientation_label(),
                card.position_meaning,
                card.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
