use super::{CommandFuture, Invocation};
use crate::divination::ACTIVATION_KEYWORDS;
use crate::plugin::TarotsPlugin;

mod help;
mod tarots;

// ユーザーコマンド定義
pub struct UserCommand {
    pub name: &'static str,
    pub patterns: Vec<&'static str>,
    pub description: &'static str,
    pub detailed_help: Option<&'static str>,
    pub require_start: bool,  // コマンドが文頭にあることを要求
    pub handler: for<'a> fn(&'a TarotsPlugin, Invocation<'a>) -> CommandFuture<'a>,
}

// ユーザーコマンドテーブル
pub fn get_user_commands() -> Vec<UserCommand> {
    vec![
        UserCommand {
            name: "help",
            patterns: vec!["/tarots help", "塔罗帮助"],
            description: "显示可用命令",
            detailed_help: None,
            require_start: true,
            handler: |p, i| Box::pin(help::show_help(p, i)),
        },
        UserCommand {
            name: "tarots",
            patterns: ACTIVATION_KEYWORDS.to_vec(),
            description: "塔罗牌占卜，发送牌面图片并进行简短解读",
            detailed_help: Some(
"抽取塔罗牌并发送牌面图片，最后给出简短解读。

【抽牌范围】
全部 / 大阿卡纳 / 小阿卡纳（默认：全部）

【牌阵】
单张 / 圣三角 / 时间之流 / 四要素 / 五牌阵 / 吉普赛十字 / 马蹄 / 六芒星（默认：单张）

【例】
抽一张塔罗牌
用大阿卡纳来个圣三角占卜
塔罗牌 六芒星"
            ),
            require_start: false,
            handler: |p, i| Box::pin(tarots::tarots(p, i)),
        },
    ]
}
