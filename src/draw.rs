// 抽牌ロジック
// 抽牌范围と牌阵の検証 → 候補IDの決定 → 非復元抽出 → 正逆位 → 位置ラベル付与

use crate::catalog::{CardCatalog, CardId, Spread, SpreadCatalog};
use crate::error::{Result, TarotError};
use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::Range;
use tracing::{debug, warn};

pub const MAJOR_ARCANA: Range<CardId> = 0..22;
pub const MINOR_ARCANA: Range<CardId> = 22..78;
pub const FULL_DECK: Range<CardId> = 0..78;

/// 抽牌范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardType {
    All,
    Major,
    Minor,
}

impl CardType {
    /// 略称・英語表記も受け付ける
    pub fn parse(input: &str) -> Result<Self> {
        match input.trim() {
            "all" | "全" | "全部" => Ok(CardType::All),
            "major" | "大" | "大阿" | "大阿卡纳" => Ok(CardType::Major),
            "minor" | "小" | "小阿" | "小阿卡纳" => Ok(CardType::Minor),
            other => Err(TarotError::InvalidCardType(other.to_string())),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CardType::All => "全部",
            CardType::Major => "大阿卡纳",
            CardType::Minor => "小阿卡纳",
        }
    }

    pub fn id_range(self) -> Range<CardId> {
        match self {
            CardType::All => FULL_DECK,
            CardType::Major => MAJOR_ARCANA,
            CardType::Minor => MINOR_ARCANA,
        }
    }

    /// 牌组が片方しか持たない場合はそちらに寄せる
    pub fn coerce(self, supported: CardType) -> CardType {
        if supported == CardType::All || self == supported {
            self
        } else {
            supported
        }
    }

    /// 牌组が宣言する対応范围（未宣言・不明は全部扱い）
    pub fn supported_by(catalog: &CardCatalog) -> CardType {
        let declared = catalog.meta.card_types.trim();
        if declared.is_empty() {
            return CardType::All;
        }
        CardType::parse(declared).unwrap_or_else(|_| {
            warn!("[Draw] 未知的牌组类型声明: {}", declared);
            CardType::All
        })
    }
}

pub const SPREAD_NAMES: [&str; 8] = [
    "单张", "圣三角", "时间之流", "四要素", "五牌阵", "吉普赛十字", "马蹄", "六芒星",
];

/// 牌阵名の略称を正式名に
pub fn canonical_spread_name(input: &str) -> &str {
    match input.trim() {
        "单" | "单张" => "单张",
        "圣" | "圣三角" => "圣三角",
        "时" | "时间" | "时间之流" => "时间之流",
        "四" | "四要素" => "四要素",
        "五" | "五牌" | "五牌阵" => "五牌阵",
        "吉" | "吉普赛" | "吉普赛十字" => "吉普赛十字",
        "马" | "马蹄" => "马蹄",
        "六" | "六芒" | "六芒星" => "六芒星",
        other => other,
    }
}

/// 牌阵ファイルに意味がない場合の既定値
fn default_meaning(spread_name: &str, idx: usize) -> &'static str {
    let meanings: &[&str] = match spread_name {
        "单张" => return "当前状况",
        "圣三角" | "时间之流" => &["过去", "现在", "未来"],
        "四要素" => &["行动", "情感", "思想", "物质"],
        "五牌阵" => &["现状", "挑战", "选择", "环境", "结果"],
        "吉普赛十字" => &["现状", "障碍", "目标", "过去", "未来"],
        "马蹄" => &["过去", "现在", "隐藏", "环境", "期望", "结果"],
        "六芒星" => &["过去", "现在", "未来", "原因", "环境", "结果"],
        _ => &[],
    };
    meanings.get(idx).copied().unwrap_or("未知")
}

pub fn position_name(spread: &Spread, idx: usize) -> String {
    spread
        .position_name(idx)
        .map(str::to_string)
        .unwrap_or_else(|| format!("位置{}", idx + 1))
}

pub fn position_meaning(spread: &Spread, spread_name: &str, idx: usize) -> String {
    spread
        .position_meaning(idx)
        .unwrap_or_else(|| default_meaning(spread_name, idx))
        .to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawnCard {
    pub position_name: String,
    pub position_meaning: String,
    pub card_id: CardId,
    pub name: String,
    pub is_reversed: bool,
    pub description: String,
}

impl DrawnCard {
    pub fn orientation_label(&self) -> &'static str {
        if self.is_reversed {
            "逆位"
        } else {
            "正位"
        }
    }
}

#[derive(Debug, Clone)]
pub struct Draw {
    pub spread_name: String,
    pub card_type: CardType,
    pub cards: Vec<DrawnCard>,
}

impl Draw {
    pub fn reversed_count(&self) -> usize {
        self.cards.iter().filter(|c| c.is_reversed).count()
    }
}

/// 候補ID（范围内かつ牌组に存在するもの）
pub fn resolve_pool(catalog: &CardCatalog, card_type: CardType) -> Result<Vec<CardId>> {
    let pool: Vec<CardId> = card_type
        .id_range()
        .filter(|id| catalog.contains(*id))
        .collect();
    if pool.is_empty() {
        return Err(TarotError::EmptyPool);
    }
    Ok(pool)
}

/// 非復元抽出。結果の並び順もランダム
pub fn sample_ids<R: Rng + ?Sized>(pool: &[CardId], count: usize, rng: &mut R) -> Result<Vec<CardId>> {
    if count > pool.len() {
        return Err(TarotError::InsufficientPool {
            requested: count,
            available: pool.len(),
        });
    }
    let mut picked: Vec<CardId> = pool.choose_multiple(rng, count).copied().collect();
    picked.shuffle(rng);
    Ok(picked)
}

/// 切牌ありなら各カード独立に1/2で逆位
pub fn assign_orientation<R: Rng + ?Sized>(ids: &[CardId], is_cut: bool, rng: &mut R) -> Vec<(CardId, bool)> {
    ids.iter()
        .map(|&id| (id, is_cut && rng.gen_bool(0.5)))
        .collect()
}

pub fn draw<R: Rng + ?Sized>(
    cards: &CardCatalog,
    spreads: &SpreadCatalog,
    card_type: &str,
    spread_name: &str,
    rng: &mut R,
) -> Result<Draw> {
    let requested = CardType::parse(card_type)?;
    let spread_name = canonical_spread_name(spread_name);
    let spread = spreads
        .get(spread_name)
        .ok_or_else(|| TarotError::InvalidSpread(spread_name.to_string()))?;

    let card_type = requested.coerce(CardType::supported_by(cards));
    if card_type != requested {
        debug!("[Draw] 抽牌范围 {} -> {}", requested.label(), card_type.label());
    }

    let pool = resolve_pool(cards, card_type)?;
    let ids = sample_ids(&pool, spread.cards_num, rng)?;
    let selected = assign_orientation(&ids, spread.is_cut, rng);
    debug!("[Draw] 抽中卡牌: {:?}", selected);

    let drawn = selected
        .into_iter()
        .enumerate()
        .map(|(idx, (card_id, is_reversed))| {
            // プールは牌组の存在IDのみなので通常は必ずある
            let record = cards.get(card_id).cloned().unwrap_or_default();
            DrawnCard {
                position_name: position_name(spread, idx),
                position_meaning: position_meaning(spread, spread_name, idx),
                card_id,
                name: record.display_name().to_string(),
                is_reversed,
                description: record.description(is_reversed).to_string(),
            }
        })
        .collect();

    Ok(Draw {
        spread_name: spread_name.to_string(),
        card_type,
        cards: drawn,
    })
}
