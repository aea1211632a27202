//! Shared fixtures: an on-disk plugin directory and recording collaborators.
#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tarots::asset::image_filename;
use tarots::messaging::{MessageSink, Narrator};
use tarots::{Result, TarotError};
use tempfile::TempDir;

pub const ADMIN: &str = "10001";

pub fn config_toml(using: &str, use_cards: &[&str], extra: &str) -> String {
    let list: Vec<String> = use_cards.iter().map(|d| format!("\"{}\"", d)).collect();
    format!(
        "[permissions]\nadmin_users = [\"{}\"]\n\n[cards]\nusing_cards = \"{}\"\nuse_cards = [{}]\n\n{}",
        ADMIN,
        using,
        list.join(", "),
        extra
    )
}

pub fn card_name(id: u32) -> String {
    format!("牌{}", id)
}

/// Writes `tarot_jsons/<deck>/tarots.json` with cards `0..78` and, when
/// `with_images` is set, both orientation images for every card.
pub fn write_deck(base: &Path, deck: &str, with_images: bool) {
    let dir = base.join("tarot_jsons").join(deck);
    fs::create_dir_all(&dir).unwrap();

    let mut cards = Map::new();
    cards.insert("_meta".into(), json!({"total_cards": 78, "card_types": "全部"}));
    for id in 0..78u32 {
        cards.insert(
            id.to_string(),
            json!({
                "name": card_name(id),
                "info": {"description": format!("正{}", id), "reverseDescription": format!("逆{}", id)}
            }),
        );
        if with_images {
            for reversed in [false, true] {
                fs::write(dir.join(image_filename(&card_name(id), reversed)), b"img").unwrap();
            }
        }
    }
    fs::write(dir.join("tarots.json"), Value::Object(cards).to_string()).unwrap();
}

pub fn write_formation(base: &Path) {
    let dir = base.join("tarot_jsons");
    fs::create_dir_all(&dir).unwrap();
    let formation = json!({
        "单张": {"cards_num": 1, "is_cut": false, "represent": [["当下"], ["当前状况"]]},
        "圣三角": {"cards_num": 3, "is_cut": true, "represent": [["过去", "现在", "未来"], ["过去", "现在", "未来"]]},
        "六芒星": {"cards_num": 6, "is_cut": true}
    });
    fs::write(dir.join("formation.json"), formation.to_string()).unwrap();
}

pub fn plugin_dir(decks: &[&str], config: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for deck in decks {
        write_deck(dir.path(), deck, true);
    }
    write_formation(dir.path());
    fs::write(dir.path().join("config.toml"), config).unwrap();
    dir
}

#[derive(Default)]
pub struct RecordingSink {
    pub texts: Mutex<Vec<String>>,
    pub images: AtomicUsize,
}

impl RecordingSink {
    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }

    pub fn image_count(&self) -> usize {
        self.images.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageSink for RecordingSink {
    async fn send_text(&self, text: &str) -> Result<()> {
        self.texts.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn send_image(&self, image_base64: &str) -> Result<()> {
        assert!(!image_base64.is_empty());
        self.images.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct ScriptedNarrator {
    pub reply: std::result::Result<String, String>,
    pub calls: AtomicUsize,
}

impl ScriptedNarrator {
    pub fn ok(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: Err("service unavailable".to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Narrator for ScriptedNarrator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().map_err(TarotError::ExternalService)
    }
}
