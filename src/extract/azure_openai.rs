//! Azure OpenAI chat-completions client.

use crate::error::{ReportError, Result};
use crate::extract::CompletionClient;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SERVICE: &str = "completion service";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Completion client for an Azure OpenAI deployment.
pub struct AzureOpenAiClient {
    client: Client,
    endpoint: String,
    deployment: String,
    api_version: String,
    api_key: String,
}

impl AzureOpenAiClient {
    pub fn new(
        endpoint: &str,
        deployment: &str,
        api_version: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReportError::external(SERVICE, e))?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            deployment: deployment.to_string(),
            api_version: api_version.to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, self.api_version
        )
    }
}

impl CompletionClient for AzureOpenAiClient {
    fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let request = ChatRequest {
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
        };

        let response = self
            .client
            .post(self.completions_url())
            .header("api-key", &self.api_key)
            .json(&request)
            .send()
            .map_err(|e| ReportError::external(SERVICE, e))?;

        if !response.status().is_success() {
            return Err(ReportError::external(
                SERVICE,
                format!("status {}", response.status()),
            ));
        }

        let body: ChatResponse = response
            .json()
            .map_err(|e| ReportError::external(SERVICE, e))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ReportError::external(SERVICE, "response contained no choices"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_url() {
        let client = AzureOpenAiClient::new(
            "https://res.openai.azure.com/",
            "gpt-4o",
            "2024-05-01-preview",
            "key",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            client.completions_url(),
            "https://res.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-05-01-preview"
        );
    }

    #[test]
    fn test_request_serialization() {
        let request = ChatRequest {
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "sys",
                },
                ChatMessage {
                    role: "user",
                    content: "usr",
                },
            ],
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            r#"{"messages":[{"role":"system","content":"sys"},{"role":"user","content":"usr"}]}"#
        );
    }

    #[test]
    fn test_response_parsing_takes_first_choice() {
        let body = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "{\"aggrieved_name\":\"Jane\"}"}},
                {"message": {"role": "assistant", "content": "ignored"}}
            ]
        }"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        let content = parsed.choices.into_iter().next().unwrap().message.content;
        assert_eq!(content, "{\"aggrieved_name\":\"Jane\"}");
    }

    #[test]
    fn test_response_with_no_choices() {
        let parsed: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.choices.is_empty());
    }
}
