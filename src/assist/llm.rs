use anyhow::Result;

use crate::assist::Message;
use crate::config::Config;

/// Blocking client for an OpenAI-compatible chat-completions endpoint.
///
/// The endpoint is treated as an opaque ask-for-structured-output service:
/// no retries, no backoff. Callers own the fallback when a request fails.
#[cfg(feature = "network")]
pub struct ChatClient {
    base_url: String,
    model: String,
    api_key: String,
    http: reqwest::blocking::Client,
}

#[cfg(feature = "network")]
impl ChatClient {
    /// Returns `None` when the key environment variable is unset, so the
    /// app silently runs with local fallbacks only.
    pub fn from_config(config: &Config) -> Option<Self> {
        let api_key = std::env::var(&config.assistant_key_env)
            .ok()
            .filter(|key| !key.is_empty())?;
        let http = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(20))
            .build()
            .ok()?;
        Some(Self {
            base_url: config.assistant_base_url.trim_end_matches('/').to_string(),
            model: config.assistant_model.clone(),
            api_key,
            http,
        })
    }

    /// One round trip: system prompt plus conversation, assistant text back.
    pub fn complete(&self, system: &str, messages: &[Message]) -> Result<String> {
        use anyhow::{Context, bail};

        let mut wire = vec![serde_json::json!({ "role": "system", "content": system })];
        wire.extend(messages.iter().map(|m| serde_json::to_value(m).unwrap_or_default()));

        let body = serde_json::json!({
            "model": self.model,
            "messages": wire,
            "temperature": 0.5,
            "max_tokens": 512,
        });

        let response: serde_json::Value = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .context("assistant request failed")?
            .error_for_status()
            .context("assistant rejected the request")?
            .json()
            .context("assistant returned malformed JSON")?;

        match response["choices"][0]["message"]["content"].as_str() {
            Some(content) if !content.trim().is_empty() => Ok(content.trim().to_string()),
            _ => bail!("assistant returned an empty completion"),
        }
    }
}

/// Stub for `--no-default-features` builds: never constructed, so every tool
/// takes its local fallback path.
#[cfg(not(feature = "network"))]
pub struct ChatClient;

#[cfg(not(feature = "network"))]
impl ChatClient {
    pub fn from_config(_config: &Config) -> Option<Self> {
        None
    }

    pub fn complete(&self, _system: &str, _messages: &[Message]) -> Result<String> {
        anyhow::bail!("built without network support")
    }
}

/// Pull the first JSON value of the expected bracket kind out of a model
/// reply, tolerating prose and code fences around it.
pub fn extract_json(reply: &str, open: char, close: char) -> &str {
    match (reply.find(open), reply.rfind(close)) {
        (Some(start), Some(end)) if start < end => &reply[start..=end],
        _ => reply,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_json_trims_surrounding_prose() {
        let reply = "Sure! Here you go:\n```json\n[{\"a\": 1}]\n```\nHope that helps.";
        assert_eq!(extract_json(reply, '[', ']'), "[{\"a\": 1}]");
    }

    #[test]
    fn extract_json_passes_through_plain_payloads() {
        assert_eq!(extract_json("{\"x\":2}", '{', '}'), "{\"x\":2}");
        assert_eq!(extract_json("no json here", '{', '}'), "no json here");
    }

    #[test]
    fn client_requires_the_key_env_var() {
        let mut config = Config::default();
        config.assistant_key_env = "CLOZR_TEST_KEY_THAT_IS_NOT_SET".to_string();
        assert!(ChatClient::from_config(&config).is_none());
    }
}
