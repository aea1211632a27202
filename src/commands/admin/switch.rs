use crate::error::Result;
use crate::plugin::TarotsPlugin;
use regex::Regex;
use std::sync::OnceLock;

fn deck_argument(line: &str) -> Option<&str> {
    static SWITCH: OnceLock<Regex> = OnceLock::new();
    let re = SWITCH.get_or_init(|| Regex::new(r"^/tarots\s+switch\s+(\S+)").expect("valid regex"));
    re.captures(line).and_then(|caps| caps.get(1)).map(|m| m.as_str())
}

/// 牌组を切り替える。引数なし・不明な牌组なら利用可能な一覧を返す
pub fn switch_deck(plugin: &mut TarotsPlugin, lines: &[String]) -> Result<String> {
    let available = plugin.registry().available().join("、");
    let name = match lines.first().and_then(|line| deck_argument(line)) {
        Some(name) => name.to_string(),
        None => return Ok(format!("用法: /tarots switch <牌组名>\n可用牌组: {}", available)),
    };
    plugin.switch_deck(&name)?;
    Ok(format!("✅ 已切换到牌组「{}」", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_deck_name() {
        assert_eq!(deck_argument("/tarots switch east"), Some("east"));
        assert_eq!(deck_argument("/tarots   switch  bilibili  "), Some("bilibili"));
        assert_eq!(deck_argument("/tarots switch"), None);
    }
}
