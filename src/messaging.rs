use crate::error::Result;
use async_trait::async_trait;
use tracing::info;

/// メッセージ送信先（チャットのホスト側）
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send_text(&self, text: &str) -> Result<()>;
    async fn send_image(&self, image_base64: &str) -> Result<()>;
}

/// 解読文の生成（LLM）
#[async_trait]
pub trait Narrator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// 標準出力へ書き出す送信先
#[derive(Debug, Default)]
pub struct ConsoleSink;

#[async_trait]
impl MessageSink for ConsoleSink {
    async fn send_text(&self, text: &str) -> Result<()> {
        println!("{}", text);
        Ok(())
    }

    async fn send_image(&self, image_base64: &str) -> Result<()> {
        println!("[画像] base64 {}文字", image_base64.len());
        info!("[Console] send_image");
        Ok(())
    }
}
