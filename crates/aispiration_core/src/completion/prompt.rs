//! Prompt and request-body construction for quote generation.

use serde::Serialize;

const SYSTEM_PROMPT: &str = "你是一个专业的励志语录生成器，擅长创作简短有力、富有哲理的励志语录。";
const BASE_INSTRUCTION: &str = "生成一句简短有力的励志语录";
const FORMAT_INSTRUCTION: &str = "。不要使用引号，不要添加额外的解释，直接给出语录内容和作者（如果有）。如果是名人名言，请标注作者；如果是原创，可以不标注作者。";

/// What the user asked for: a topic and an optional tone.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuotePrompt {
    pub category: String,
    pub mood: Option<String>,
}

impl QuotePrompt {
    pub fn new(category: impl Into<String>, mood: Option<String>) -> Self {
        Self {
            category: category.into(),
            mood,
        }
    }

    /// Renders the user-role message.
    pub fn user_message(&self) -> String {
        let mut message = String::from(BASE_INSTRUCTION);

        let category = self.category.trim();
        if !category.is_empty() {
            message.push_str("，主题关于");
            message.push_str(category);
        }

        if let Some(mood) = self.mood.as_deref().map(str::trim) {
            if !mood.is_empty() {
                message.push_str("，语调是");
                message.push_str(mood);
            }
        }

        message.push_str(FORMAT_INSTRUCTION);
        message
    }

    pub fn system_message(&self) -> &'static str {
        SYSTEM_PROMPT
    }
}

/// One chat message in the completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

/// JSON body of the chat-completion POST.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatCompletionRequest {
    /// Builds the two-message (system + user) request for `prompt`.
    pub fn for_prompt(
        prompt: &QuotePrompt,
        model: impl Into<String>,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompt.system_message().to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.user_message(),
                },
            ],
            temperature,
            max_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ChatCompletionRequest, QuotePrompt};

    #[test]
    fn user_message_mentions_category_and_mood() {
        let prompt = QuotePrompt::new("成功", Some("坚定".to_string()));
        let message = prompt.user_message();
        assert!(message.starts_with("生成一句简短有力的励志语录，主题关于成功，语调是坚定。"));
    }

    #[test]
    fn blank_category_and_mood_are_skipped() {
        let prompt = QuotePrompt::new("  ", Some(" ".to_string()));
        let message = prompt.user_message();
        assert!(!message.contains("主题关于"));
        assert!(!message.contains("语调是"));
    }

    #[test]
    fn request_serializes_two_messages() {
        let request =
            ChatCompletionRequest::for_prompt(&QuotePrompt::new("生活", None), "gpt-4o-mini", 0.7, 100);
        let body = serde_json::to_value(&request).expect("request should serialize");
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 100);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert!(body["temperature"].as_f64().is_some());
    }
}
