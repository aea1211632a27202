use crate::commands::Invocation;
use crate::divination::TarotRequest;
use crate::error::Result;
use crate::plugin::TarotsPlugin;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info, warn};

// 塔罗牌占卜コマンド
pub async fn tarots(plugin: &TarotsPlugin, invocation: Invocation<'_>) -> Result<()> {
    let request = TarotRequest::from_message(&invocation.sender.label);
    let mut rng = StdRng::from_entropy();
    match plugin
        .divine(&request, invocation.sink, invocation.narrator, &mut rng)
        .await
    {
        Ok(summary) => info!("[Tarot] {}", summary),
        // ユーザーへの通知はdivine内で済んでいる
        Err(e) if e.is_validation() => warn!("[Tarot] 占卜被拒绝: {}", e),
        Err(e) => error!("[Tarot] 占卜失败: {}", e),
    }
    Ok(())
}
