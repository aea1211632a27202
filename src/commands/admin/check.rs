use crate::error::Result;
use crate::plugin::TarotsPlugin;

/// 画像の欠落を報告する
pub fn check_assets(plugin: &mut TarotsPlugin) -> Result<String> {
    let missing = plugin.check_assets()?;
    let deck_name = plugin.registry().using().unwrap_or_default();
    if missing.is_empty() {
        return Ok(format!("✅ 牌组「{}」的卡牌图片齐全", deck_name));
    }
    Ok(format!(
        "⚠️ 牌组「{}」有{}张卡牌缺少图片：\n{}",
        deck_name,
        missing.len(),
        missing.iter().map(|name| format!("• {}", name)).collect::<Vec<_>>().join("\n")
    ))
}
