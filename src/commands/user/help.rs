use crate::commands::{admin, Invocation};
use crate::error::Result;
use crate::plugin::TarotsPlugin;

// ヘルプコマンド
pub async fn show_help(plugin: &TarotsPlugin, invocation: Invocation<'_>) -> Result<()> {
    let is_admin = plugin.config().is_admin(&invocation.sender.user_id);

    // コマンド引数を抽出（help の後に特定コマンド名があるか）
    let help_arg = invocation
        .content
        .split_whitespace()
        .skip_while(|w| *w != "help" && *w != "塔罗帮助")
        .nth(1);

    if let Some(cmd_name) = help_arg {
        for cmd in super::get_user_commands() {
            if cmd.name == cmd_name || cmd.patterns.iter().any(|p| *p == cmd_name) {
                let mut reply = format!("【{}】\n\n", cmd.patterns.join(" / "));
                reply.push_str(cmd.detailed_help.unwrap_or(cmd.description));
                invocation.sink.send_text(&reply).await?;
                return Ok(());
            }
        }
        invocation
            .sink
            .send_text(&format!("命令「{}」不存在。\n发送「/tarots help」查看命令列表。", cmd_name))
            .await?;
        return Ok(());
    }

    let mut reply = String::from("【塔罗牌命令】\n");
    for cmd in super::get_user_commands() {
        reply.push_str(&format!("・{}: {}\n", cmd.patterns[0], cmd.description));
    }
    if is_admin {
        reply.push_str("\n【管理员命令】\n");
        for cmd in admin::get_admin_commands() {
            reply.push_str(&format!("・{}: {}\n", cmd.usage, cmd.description));
        }
    }
    if let Some(name) = plugin.registry().using() {
        reply.push_str(&format!("\n当前牌组: {}", name));
    }
    invocation.sink.send_text(reply.trim_end()).await?;
    Ok(())
}
