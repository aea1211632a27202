use crate::error::Result;
use crate::plugin::TarotsPlugin;

mod check;
mod switch;

// 管理者コマンド定義
pub struct AdminCommand {
    pub name: &'static str,
    pub pattern: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
    pub handler: fn(&mut TarotsPlugin, &[String]) -> Result<String>,
}

// 管理者コマンドテーブル
pub fn get_admin_commands() -> Vec<AdminCommand> {
    vec![
        AdminCommand {
            name: "check",
            pattern: "/tarots check",
            usage: "/tarots check",
            description: "检查当前牌组的卡牌图片是否齐全",
            handler: |p, _| check::check_assets(p),
        },
        AdminCommand {
            name: "switch",
            pattern: "/tarots switch",
            usage: "/tarots switch <牌组名>",
            description: "切换当前使用的牌组",
            handler: switch::switch_deck,
        },
    ]
}
