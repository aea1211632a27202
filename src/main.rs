use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use tarots::commands::{self, Sender};
use tarots::gpt::OpenAiNarrator;
use tarots::messaging::{ConsoleSink, Narrator};
use tarots::TarotsPlugin;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

fn parse_flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|idx| args.get(idx + 1))
        .cloned()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tarots::init_tracing();
    info!("start");

    let args: Vec<String> = env::args().collect();
    let base_dir = PathBuf::from(parse_flag_value(&args, "--base").unwrap_or_else(|| ".".to_string()));
    let user_id = parse_flag_value(&args, "--user").unwrap_or_else(|| "console".to_string());
    let nickname = parse_flag_value(&args, "--name").unwrap_or_else(|| "用户".to_string());

    let mut plugin = TarotsPlugin::init(&base_dir)?;
    if !plugin.is_enabled() {
        warn!("塔罗牌功能已在配置中禁用");
    }

    let narrator = if plugin.config().adjustment.ai_interpretation {
        match OpenAiNarrator::from_config(plugin.config()) {
            Ok(narrator) => Some(narrator),
            Err(e) => {
                warn!("AI解读不可用，使用备用解读: {}", e);
                None
            }
        }
    } else {
        None
    };

    let sink = ConsoleSink;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let content = line.trim();
        if content.is_empty() {
            continue;
        }
        let sender = Sender::new(&user_id, &nickname, content);
        let narrator = narrator.as_ref().map(|n| n as &dyn Narrator);
        match commands::command_handler(&mut plugin, &sender, content, &sink, narrator).await {
            Ok(true) => {}
            Ok(false) => info!("no command matched"),
            Err(e) => error!("command error: {}", e),
        }
    }

    Ok(())
}
