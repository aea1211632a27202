use crate::config::AppConfig;
use crate::error::{Result, TarotError};
use crate::messaging::Narrator;
use async_trait::async_trait;
use dotenv::dotenv;
use openai_api_rs::v1::api::OpenAIClient;
use openai_api_rs::v1::chat_completion::{self, ChatCompletionRequest};
use std::env;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

const RETRY_DELAY_SECS: u64 = 3;

/// OpenAI chat completion による解読
#[derive(Debug, Clone)]
pub struct OpenAiNarrator {
    api_key: String,
    model: String,
    timeout_secs: u64,
    max_retries: u32,
    proxy: Option<String>,
}

impl OpenAiNarrator {
    /// APIキーは環境変数 OPEN_AI_API_KEY（.env可）
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        dotenv().ok();
        let api_key = env::var("OPEN_AI_API_KEY")
            .map_err(|_| TarotError::ExternalService("OPEN_AI_API_KEY is not set".to_string()))?;
        Ok(Self::new(api_key, config))
    }

    pub fn new(api_key: String, config: &AppConfig) -> Self {
        Self {
            api_key,
            model: config.narrator.model.clone(),
            timeout_secs: config.narrator.timeout,
            max_retries: config.narrator.max_retries.max(1),
            proxy: config.proxy_url().map(str::to_string),
        }
    }

    fn client(&self) -> Result<OpenAIClient> {
        let mut builder = OpenAIClient::builder().with_api_key(self.api_key.clone());
        if let Some(proxy) = &self.proxy {
            builder = builder.with_proxy(proxy.clone());
        }
        builder
            .build()
            .map_err(|e| TarotError::ExternalService(e.to_string()))
    }

    fn request(&self, prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest::new(
            self.model.clone(),
            vec![chat_completion::ChatCompletionMessage {
                role: chat_completion::MessageRole::user,
                content: chat_completion::Content::Text(String::from(prompt)),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            }],
        )
    }
}

#[async_trait]
impl Narrator for OpenAiNarrator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let req = self.request(prompt);
        let mut last_error: Option<String> = None;

        for attempt in 1..=self.max_retries {
            let client = self.client()?;

            match timeout(Duration::from_secs(self.timeout_secs), client.chat_completion(req.clone())).await {
                Ok(Ok(response)) => {
                    let content = response
                        .choices
                        .first()
                        .and_then(|choice| choice.message.content.clone());
                    match content {
                        Some(content) => {
                            if attempt > 1 {
                                info!("[GPT] リトライ成功 (試行 {}/{})", attempt, self.max_retries);
                            }
                            return Ok(content);
                        }
                        None => last_error = Some("No content found in response".to_string()),
                    }
                }
                Ok(Err(e)) => last_error = Some(e.to_string()),
                Err(_) => last_error = Some(format!("Timeout after {} seconds", self.timeout_secs)),
            }

            // 最後の試行でなければリトライ
            if attempt < self.max_retries {
                warn!(
                    "[GPT] エラー発生 (試行 {}/{}): {:?} - {}秒後にリトライ",
                    attempt, self.max_retries, last_error, RETRY_DELAY_SECS
                );
                tokio::time::sleep(Duration::from_secs(RETRY_DELAY_SECS)).await;
            }
        }

        Err(TarotError::ExternalService(
            last_error.unwrap_or_else(|| "Unknown error after retries".to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_come_from_config() {
        let mut config = AppConfig::default();
        config.narrator.model = "gpt-test".into();
        config.narrator.max_retries = 0;
        config.proxy.enable_proxy = true;
        config.proxy.proxy_url = "http://127.0.0.1:7890".into();

        let narrator = OpenAiNarrator::new("key".into(), &config);
        assert_eq!(narrator.model, "gpt-test");
        assert_eq!(narrator.max_retries, 1);
        assert_eq!(narrator.proxy.as_deref(), Some("http://127.0.0.1:7890"));

        let req = narrator.request("解读");
        assert_eq!(req.model, "gpt-test");
        assert_eq!(req.messages.len(), 1);
    }

    #[test]
    fn client_builds_with_proxy() {
        let mut config = AppConfig::default();
        config.proxy.enable_proxy = true;
        config.proxy.proxy_url = "http://127.0.0.1:7890".into();

        let narrator = OpenAiNarrator::new("key".into(), &config);
        assert!(narrator.client().is_ok());
    }
}
