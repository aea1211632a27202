// 解読テキスト
// AI用プロンプトの組み立てと、AIが使えないときの定型文

use crate::draw::DrawnCard;
use crate::messaging::Narrator;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{error, warn};

/// 「名称（正位）」形式
pub fn card_label(card: &DrawnCard) -> String {
    format!("{}（{}）", card.name, card.orientation_label())
}

fn card_list(cards: &[DrawnCard]) -> String {
    cards.iter().map(card_label).collect::<Vec<_>>().join("、")
}

pub fn build_prompt(cards: &[DrawnCard], user: &str) -> String {
    let cards_info: String = cards.iter().map(card_label).collect();
    format!(
        "请用轻松自然的语气为{user}解读塔罗牌，保持非常简短（2-3句话）。\n\n\
         抽到的牌：{cards_info}\n\n\
         请用1句话总结牌面意思，再用1句话给出实用建议。\n\
         就像朋友聊天一样自然，不要用专业术语，不要讲大道理。\n\
         可以带点小幽默，保持温暖亲切。\n\n\
         你的解读（请控制在50字以内）："
    )
}

/// 逆位の枚数による語調
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    AllReversed,
    Mixed,
    AllUpright,
}

impl Tone {
    pub fn of(cards: &[DrawnCard]) -> Tone {
        let reversed = cards.iter().filter(|c| c.is_reversed).count();
        if reversed == 0 {
            Tone::AllUpright
        } else if reversed == cards.len() {
            Tone::AllReversed
        } else {
            Tone::Mixed
        }
    }
}

fn templates(tone: Tone, user: &str, list: &str) -> [String; 3] {
    match tone {
        Tone::AllReversed => [
            format!("🌙 哇{user}，抽到了{list}～看来最近需要放慢脚步调整一下呢！"),
            format!("🌀 {user}的牌面是{list}～能量有点特别，给自己多点耐心哦！"),
            format!("💫 抽到{list}呢{user}～最近可能有些小挑战，但都是成长的机会！"),
        ],
        Tone::Mixed => [
            format!("✨ {user}抽到了{list}～牌面有些小波动，不过问题不大！"),
            format!("🌟 为{user}抽到{list}～有些地方可能需要微调，但整体还不错！"),
            format!("🔮 {user}的塔罗牌是{list}～能量有起有伏，保持平常心就好～"),
        ],
        Tone::AllUpright => [
            format!("💖 {user}抽到了{list}～牌面能量超棒，继续保持！"),
            format!("⭐ 哇{user}，{list}～都是正位呢，最近运势不错哦！"),
            format!("🌞 {user}的塔罗牌是{list}～能量很正向，放心前进吧！"),
        ],
    }
}

/// 外部サービスを使わない定型解読
pub fn fallback_interpretation<R: Rng + ?Sized>(cards: &[DrawnCard], user: &str, rng: &mut R) -> String {
    let list = card_list(cards);
    let candidates = templates(Tone::of(cards), user, &list);
    candidates
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| basic_text(cards, user))
}

/// 最小限のメッセージ
pub fn basic_text(cards: &[DrawnCard], user: &str) -> String {
    let names: Vec<&str> = cards.iter().map(|c| c.name.as_str()).collect();
    format!("✨ 为{}抽到了：{}～愿塔罗牌给你带来好运！", user, names.join("、"))
}

/// AI解読を試み、失敗または長すぎる場合は定型文
pub async fn interpret<R: Rng + Send + ?Sized>(
    cards: &[DrawnCard],
    user: &str,
    narrator: Option<&dyn Narrator>,
    max_reply_chars: usize,
    rng: &mut R,
) -> String {
    if let Some(narrator) = narrator {
        let prompt = build_prompt(cards, user);
        match narrator.generate(&prompt).await {
            Ok(reply) => {
                let reply = reply.trim();
                let length = reply.chars().count();
                if !reply.is_empty() && length < max_reply_chars {
                    return reply.to_string();
                }
                warn!("[Interpret] AI解读过长或为空 ({}字)，使用备用解读", length);
            }
            Err(e) => error!("[Interpret] AI解读生成错误: {}", e),
        }
    }
    fallback_interpretation(cards, user, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, TarotError};
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn card(name: &str, is_reversed: bool) -> DrawnCard {
        DrawnCard {
            position_name: "位置1".into(),
            position_meaning: "当前状况".into(),
            card_id: 0,
            name: name.into(),
            is_reversed,
            description: "暂无描述".into(),
        }
    }

    struct FixedNarrator(Result<String, String>);

    #[async_trait]
    impl Narrator for FixedNarrator {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            self.0.clone().map_err(TarotError::ExternalService)
        }
    }

    #[test]
    fn tone_by_reversed_count() {
        assert_eq!(Tone::of(&[card("a", true), card("b", true)]), Tone::AllReversed);
        assert_eq!(Tone::of(&[card("a", true), card("b", false)]), Tone::Mixed);
        assert_eq!(Tone::of(&[card("a", false)]), Tone::AllUpright);
    }

    #[test]
    fn fallback_uses_matching_family() {
        let cards = vec![card("愚者", false), card("恋人", false)];
        let mut rng = StdRng::seed_from_u64(1);
        let upright: HashSet<String> =
            templates(Tone::AllUpright, "小明", "愚者（正位）、恋人（正位）").into_iter().collect();
        let mut seen = HashSet::new();
        for _ in 0..100 {
            let text = fallback_interpretation(&cards, "小明", &mut rng);
            assert!(upright.contains(&text), "{}", text);
            seen.insert(text);
        }
        assert_eq!(seen.len(), 3);
        assert!(seen.contains("⭐ 哇小明，愚者（正位）、恋人（正位）～都是正位呢，最近运势不错哦！"));
    }

    #[test]
    fn all_reversed_templates_read_as_slow_down() {
        let cards = vec![card("月亮", true)];
        let mut rng = StdRng::seed_from_u64(2);
        let seen: HashSet<String> = (0..100).map(|_| fallback_interpretation(&cards, "小明", &mut rng)).collect();
        assert!(seen.contains("🌙 哇小明，抽到了月亮（逆位）～看来最近需要放慢脚步调整一下呢！"));
        assert!(seen.contains("💫 抽到月亮（逆位）呢小明～最近可能有些小挑战，但都是成长的机会！"));
    }

    #[test]
    fn prompt_lists_cards_and_user() {
        let prompt = build_prompt(&[card("愚者", true), card("太阳", false)], "小红");
        assert!(prompt.contains("为小红解读"));
        assert!(prompt.contains("抽到的牌：愚者（逆位）太阳（正位）\n"));
        assert!(prompt.contains("可以带点小幽默，保持温暖亲切。"));
        assert!(prompt.ends_with("你的解读（请控制在50字以内）："));
    }

    #[test]
    fn basic_text_joins_names() {
        assert_eq!(
            basic_text(&[card("愚者", true), card("太阳", false)], "小红"),
            "✨ 为小红抽到了：愚者、太阳～愿塔罗牌给你带来好运！"
        );
    }

    #[tokio::test]
    async fn short_ai_reply_is_used() {
        let narrator = FixedNarrator(Ok(" 今天适合出门走走。 ".into()));
        let mut rng = StdRng::seed_from_u64(1);
        let text = interpret(&[card("愚者", false)], "小明", Some(&narrator), 100, &mut rng).await;
        assert_eq!(text, "今天适合出门走走。");
    }

    #[tokio::test]
    async fn long_or_failed_reply_falls_back() {
        let cards = [card("愚者", true)];
        let mut rng = StdRng::seed_from_u64(1);

        let long = FixedNarrator(Ok("长".repeat(100)));
        let text = interpret(&cards, "小明", Some(&long), 100, &mut rng).await;
        assert!(text.contains("愚者（逆位）"));

        let failed = FixedNarrator(Err("timeout".into()));
        let text = interpret(&cards, "小明", Some(&failed), 100, &mut rng).await;
        assert!(text.contains("愚者（逆位）"));

        let text = interpret(&cards, "小明", None, 100, &mut rng).await;
        assert!(text.contains("小明"));
    }
}
