// カード画像ファイル
// ファイル名は「表示名の数字を漢数字化 + 正位/逆位 + .jpg」

use crate::catalog::CardCatalog;
use crate::error::{Result, TarotError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const IMAGE_EXTENSION: &str = "jpg";

/// 置換は上から順に適用する（"10" は一桁の数字より先）
const NUMERAL_SUBSTITUTIONS: [(&str, &str); 10] = [
    ("ACE", "王牌"),
    ("10", "十"),
    ("2", "二"),
    ("3", "三"),
    ("4", "四"),
    ("5", "五"),
    ("6", "六"),
    ("7", "七"),
    ("8", "八"),
    ("9", "九"),
];

pub fn orientation_suffix(is_reversed: bool) -> &'static str {
    if is_reversed {
        "逆位"
    } else {
        "正位"
    }
}

pub fn image_filename(card_name: &str, is_reversed: bool) -> String {
    let cleaned = NUMERAL_SUBSTITUTIONS
        .iter()
        .fold(card_name.to_string(), |name, (from, to)| name.replace(from, to));
    format!("{}{}.{}", cleaned, orientation_suffix(is_reversed), IMAGE_EXTENSION)
}

pub fn image_path(deck_dir: &Path, card_name: &str, is_reversed: bool) -> PathBuf {
    deck_dir.join(image_filename(card_name, is_reversed))
}

/// 画像を読み込んでbase64文字列にする
pub fn load_image_base64(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(TarotError::AssetMissing(path.to_path_buf()));
    }
    let data = fs::read(path)?;
    Ok(STANDARD.encode(data))
}

/// 正位・逆位の画像が揃っていないカード名の一覧（カードID順、名前なしは対象外）
pub fn find_missing_images(catalog: &CardCatalog, deck_dir: &Path) -> Vec<String> {
    let missing: Vec<String> = catalog
        .iter()
        .filter(|(_, record)| !record.name.is_empty())
        .filter(|(_, record)| {
            [false, true]
                .into_iter()
                .any(|is_reversed| !image_path(deck_dir, &record.name, is_reversed).is_file())
        })
        .map(|(_, record)| record.name.clone())
        .collect();
    info!("[Asset] 检查完成: {}张卡牌，{}张缺少图片", catalog.len(), missing.len());
    missing
}
