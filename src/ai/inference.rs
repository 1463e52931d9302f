use anyhow::{Context, Result};
use reqwest::Response;
use serde::{Deserialize, Serialize};

use crate::classifier::fallback::DetectionReport;

pub const CEREBRAS_API_URL: &str = "https://api.cerebras.ai/v1/chat/completions";
const SYSTEM_PROMPT: &str = r#"You identify the natural language of short user comments.
Answer with a JSON object listing the most likely languages as ISO 639-1 codes together with a percentage between 0 and 100, most likely first.
Emoji, URLs and punctuation carry no language. If no language can be identified, return an empty list.
Example: {"languages": [{"language": "ko", "percentage": 92}, {"language": "ja", "percentage": 6}]}"#;

pub fn build_request(model: String, sample: &str) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model,
        messages: vec![
            ChatMessage {
                role: "system".into(),
                content: SYSTEM_PROMPT.into(),
            },
            ChatMessage {
                role: "user".into(),
                content: sample.to_string(),
            },
        ],
        temperature: 0.0,
        top_p: 1.0,
        max_tokens: 256,
        response_format: ResponseFormat {
            r#type: "json_object".into(),
        },
    }
}

pub async fn parse_response(response: Response) -> Result<Option<DetectionReport>> {
    let completion: ChatCompletionResponse = response.json().await?;
    parse_completion(completion)
}

fn parse_completion(completion: ChatCompletionResponse) -> Result<Option<DetectionReport>> {
    let Some(choice) = completion.choices.into_iter().next() else {
        return Ok(None);
    };
    let content = choice
        .message
        .and_then(|msg| msg.content)
        .context("Cerebras response missing message content")?;

    let report: DetectionReport = serde_json::from_str(content.trim())
        .with_context(|| format!("unexpected detector payload: {content}"))?;
    Ok(Some(report))
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: i32,
    pub response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub r#type: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: Option<ChatCompletionMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionMessage {
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completion(content: Option<&str>) -> ChatCompletionResponse {
        ChatCompletionResponse {
            choices: vec![ChatChoice {
                message: Some(ChatCompletionMessage {
                    content: content.map(str::to_string),
                }),
            }],
        }
    }

    #[test]
    fn parses_language_list() {
        let report = parse_completion(completion(Some(
            r#"{"languages":[{"language":"zh-TW","percentage":81.5}]}"#,
        )))
        .unwrap()
        .unwrap();
        assert_eq!(report.languages.len(), 1);
        assert_eq!(report.languages[0].language, "zh-TW");
    }

    #[test]
    fn empty_choices_decline_to_answer() {
        let response = ChatCompletionResponse { choices: vec![] };
        assert!(parse_completion(response).unwrap().is_none());
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(parse_completion(completion(Some("not json"))).is_err());
        assert!(parse_completion(completion(None)).is_err());
    }

    #[test]
    fn request_carries_sample_as_user_message() {
        let request = build_request("model".into(), "샘플");
        assert_eq!(request.messages[1].content, "샘플");
        assert_eq!(request.response_format.r#type, "json_object");
    }
}
