// 卡牌・牌阵カタログ
// tarots.json（牌组ごと）と formation.json（共通）を読み込む

use crate::error::Result;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::warn;

pub type CardId = u32;

pub const CARDS_FILE_NAME: &str = "tarots.json";
pub const SPREADS_FILE_NAME: &str = "formation.json";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogMeta {
    #[serde(default)]
    pub total_cards: usize,
    /// 対応する抽牌范围（"全部" / "大阿卡纳" / "小阿卡纳"）
    #[serde(default)]
    pub card_types: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardInfo {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "reverseDescription")]
    pub reverse_description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub info: CardInfo,
}

impl CardRecord {
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "未知"
        } else {
            &self.name
        }
    }

    pub fn description(&self, is_reversed: bool) -> &str {
        let text = if is_reversed {
            self.info.reverse_description.as_deref()
        } else {
            self.info.description.as_deref()
        };
        text.unwrap_or("暂无描述")
    }
}

#[derive(Deserialize)]
struct RawCardCatalog {
    #[serde(rename = "_meta", default)]
    meta: CatalogMeta,
    #[serde(flatten)]
    entries: BTreeMap<String, CardRecord>,
}

/// 牌组1つ分のカード定義
#[derive(Debug, Clone, Default)]
pub struct CardCatalog {
    pub meta: CatalogMeta,
    cards: BTreeMap<CardId, CardRecord>,
}

impl CardCatalog {
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: RawCardCatalog = serde_json::from_str(text)?;
        let mut cards = BTreeMap::new();
        for (key, record) in raw.entries {
            // "05" や "+6" のような非正規表記は重複の元になるので除外
            match key.parse::<CardId>() {
                Ok(id) if id.to_string() == key => {
                    cards.insert(id, record);
                }
                _ => warn!("[Catalog] 忽略非法卡牌ID: {}", key),
            }
        }
        Ok(Self { meta: raw.meta, cards })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_cards(meta: CatalogMeta, cards: impl IntoIterator<Item = (CardId, CardRecord)>) -> Self {
        Self {
            meta,
            cards: cards.into_iter().collect(),
        }
    }

    pub fn get(&self, id: CardId) -> Option<&CardRecord> {
        self.cards.get(&id)
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// ID昇順
    pub fn iter(&self) -> impl Iterator<Item = (CardId, &CardRecord)> {
        self.cards.iter().map(|(id, record)| (*id, record))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// 牌阵定義
#[derive(Debug, Clone, Deserialize)]
pub struct Spread {
    pub cards_num: usize,
    #[serde(default)]
    pub is_cut: bool,
    /// [位置名の配列, 位置の意味の配列]。欠落・不正形式を許容するため生のValueで持つ
    #[serde(default)]
    pub represent: Value,
}

impl Spread {
    pub fn position_name(&self, idx: usize) -> Option<&str> {
        self.represent_entry(0, idx)
    }

    pub fn position_meaning(&self, idx: usize) -> Option<&str> {
        self.represent_entry(1, idx)
    }

    fn represent_entry(&self, row: usize, idx: usize) -> Option<&str> {
        self.represent
            .as_array()?
            .get(row)?
            .as_array()?
            .get(idx)?
            .as_str()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct SpreadCatalog {
    spreads: BTreeMap<String, Spread>,
}

impl SpreadCatalog {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_spreads(spreads: impl IntoIterator<Item = (String, Spread)>) -> Self {
        Self {
            spreads: spreads.into_iter().collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Spread> {
        self.spreads.get(name)
    }

    pub fn len(&self) -> usize {
        self.spreads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spreads.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn card_catalog_separates_meta_and_cards() {
        let catalog = CardCatalog::from_json(
            r#"{
                "_meta": {"total_cards": 2, "card_types": "大阿卡纳"},
                "0": {"name": "愚者", "info": {"description": "新的开始", "reverseDescription": "鲁莽"}},
                "1": {"name": "魔术师"},
                "x": {"name": "bogus"}
            }"#,
        )
        .unwrap();
        assert_eq!(catalog.meta.total_cards, 2);
        assert_eq!(catalog.meta.card_types, "大阿卡纳");
        assert_eq!(catalog.len(), 2);

        let fool = catalog.get(0).unwrap();
        assert_eq!(fool.description(false), "新的开始");
        assert_eq!(fool.description(true), "鲁莽");

        let magician = catalog.get(1).unwrap();
        assert_eq!(magician.description(true), "暂无描述");
    }

    #[test]
    fn cards_iterate_in_numeric_order() {
        let catalog = CardCatalog::from_json(
            r#"{"_meta": {}, "10": {"name": "b"}, "2": {"name": "a"}}"#,
        )
        .unwrap();
        let ids: Vec<CardId> = catalog.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![2, 10]);
    }

    #[test]
    fn non_canonical_ids_are_skipped() {
        let catalog = CardCatalog::from_json(
            r#"{"5": {"name": "five"}, "05": {"name": "zero-five"}, "+6": {"name": "plus-six"}}"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(5).unwrap().name, "five");
        assert!(!catalog.contains(6));
    }

    #[test]
    fn missing_name_displays_unknown() {
        assert_eq!(CardRecord::default().display_name(), "未知");
    }

    #[test]
    fn represent_tolerates_malformed_shapes() {
        let ok = Spread {
            cards_num: 2,
            is_cut: true,
            represent: json!([["过去", "现在"], ["来源", "状态"]]),
        };
        assert_eq!(ok.position_name(1), Some("现在"));
        assert_eq!(ok.position_meaning(0), Some("来源"));
        assert_eq!(ok.position_name(2), None);

        let flat = Spread {
            cards_num: 1,
            is_cut: false,
            represent: json!(["过去", "现在"]),
        };
        assert_eq!(flat.position_name(0), None);
        assert_eq!(flat.position_meaning(0), None);

        let missing = Spread {
            cards_num: 1,
            is_cut: false,
            represent: Value::Null,
        };
        assert_eq!(missing.position_name(0), None);
    }

    #[test]
    fn spread_catalog_parses_formation_file() {
        let spreads = SpreadCatalog::from_json(
            r#"{"单张": {"cards_num": 1, "is_cut": false, "represent": [["当下"], ["当前状况"]]}}"#,
        )
        .unwrap();
        let single = spreads.get("单张").unwrap();
        assert_eq!(single.cards_num, 1);
        assert!(!single.is_cut);
        assert_eq!(single.position_name(0), Some("当下"));
    }
}
