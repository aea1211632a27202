pub mod user;
pub mod admin;

use crate::error::{Result, TarotError};
use crate::messaging::{MessageSink, Narrator};
use crate::plugin::TarotsPlugin;
use std::future::Future;
use std::pin::Pin;
use tracing::{info, warn};

pub type CommandFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// 発言者
#[derive(Debug, Clone)]
pub struct Sender {
    pub user_id: String,
    /// "名前:発言" 形式のラベル
    pub label: String,
}

impl Sender {
    pub fn new(user_id: &str, name: &str, utterance: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            label: format!("{}:{}", name, utterance),
        }
    }
}

/// ユーザーコマンドに渡す呼び出し情報
#[derive(Clone, Copy)]
pub struct Invocation<'a> {
    pub sender: &'a Sender,
    pub content: &'a str,
    pub sink: &'a dyn MessageSink,
    pub narrator: Option<&'a dyn Narrator>,
}

// コマンドハンドラー（メインエントリーポイント）
pub async fn command_handler(
    plugin: &mut TarotsPlugin,
    sender: &Sender,
    content: &str,
    sink: &dyn MessageSink,
    narrator: Option<&dyn Narrator>,
) -> Result<bool> {
    let lines: Vec<String> = content.lines().map(|line| line.trim().to_string()).collect();
    let first = match lines.first() {
        Some(first) if !first.is_empty() => first.clone(),
        _ => return Ok(false),
    };

    // 管理者コマンドをチェック
    for cmd in admin::get_admin_commands() {
        if first.starts_with(cmd.pattern) {
            if !plugin.config().is_admin(&sender.user_id) {
                warn!("[Command] 权限不足: user={} command={}", sender.user_id, cmd.name);
                sink.send_text(&TarotError::PermissionDenied.denial_message()).await?;
                return Ok(true);
            }
            info!("[Command] {} by {}", cmd.name, sender.user_id);
            let reply = match (cmd.handler)(plugin, &lines) {
                Ok(reply) => reply,
                Err(e) => e.denial_message(),
            };
            sink.send_text(&reply).await?;
            return Ok(true);
        }
    }

    // ユーザーコマンドをチェック
    let invocation = Invocation {
        sender,
        content,
        sink,
        narrator,
    };
    for cmd in user::get_user_commands() {
        if cmd.name == "tarots" && !plugin.is_enabled() {
            continue;
        }
        let matched = if cmd.require_start {
            cmd.patterns.iter().any(|p| first.starts_with(p))
        } else {
            cmd.patterns.iter().any(|p| content.contains(p))
        };
        if matched {
            info!("[Command] {} by {}", cmd.name, sender.user_id);
            (cmd.handler)(plugin, invocation).await?;
            return Ok(true);
        }
    }

    Ok(false)
}
