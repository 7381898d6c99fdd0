use base64::Engine;
use serde_json::{Value, json};

use crate::error::AssistError;
use crate::types::{ChatMessage, Completion, CompletionRequest, ContentPart, TokenUsage};

/// Media type assumed for bare base64 images.
pub const DEFAULT_IMAGE_TYPE: &str = "image/png";

/// Encodes raw image bytes as a `data:` URL.
pub fn image_data_url(media_type: &str, bytes: &[u8]) -> String {
    let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{media_type};base64,{b64}")
}

/// Accepts either a `data:` URL or bare base64 and returns a `data:` URL.
pub fn normalize_image(image: &str) -> String {
    let image = image.trim();
    if image.starts_with("data:") {
        image.to_string()
    } else {
        format!("data:{DEFAULT_IMAGE_TYPE};base64,{image}")
    }
}

/// Guesses an image media type from a file extension.
pub fn media_type_for(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => DEFAULT_IMAGE_TYPE,
    }
}

fn content_part_to_json(part: &ContentPart) -> Value {
    match part {
        ContentPart::Text(text) => json!({
            "type": "text",
            "text": text
        }),
        ContentPart::ImageUrl(url) => json!({
            "type": "image_url",
            "image_url": { "url": url }
        }),
    }
}

/// Converts a message to API JSON. Text-only messages use the plain string form.
fn message_to_json(msg: &ChatMessage) -> Value {
    let content = match msg.content.as_slice() {
        [ContentPart::Text(text)] => json!(text),
        parts => Value::Array(parts.iter().map(content_part_to_json).collect()),
    };
    json!({
        "role": msg.role,
        "content": content
    })
}

/// Builds the full chat-completions request body.
pub fn build_request_body(request: &CompletionRequest) -> Value {
    let messages: Vec<Value> = request.messages.iter().map(message_to_json).collect();

    let mut body = json!({
        "model": request.model,
        "messages": messages
    });
    if let Some(max_tokens) = request.max_tokens {
        body["max_tokens"] = json!(max_tokens);
    }
    if let Some(temp) = request.temperature {
        body["temperature"] = json!(temp);
    }
    body
}

/// Parses a chat-completions response, keeping the first choice.
pub fn parse_response(response: &Value) -> Result<Completion, AssistError> {
    let choice = response
        .get("choices")
        .and_then(|c| c.get(0))
        .ok_or(AssistError::EmptyResponse)?;

    let text = match choice.get("message").and_then(|m| m.get("content")) {
        Some(Value::String(text)) => text.trim().to_string(),
        Some(Value::Array(parts)) => parts
            .iter()
            .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
            .collect::<Vec<_>>()
            .join("")
            .trim()
            .to_string(),
        _ => String::new(),
    };

    let model = response
        .get("model")
        .and_then(|m| m.as_str())
        .map(String::from);

    let finish_reason = choice
        .get("finish_reason")
        .and_then(|r| r.as_str())
        .map(String::from);

    let usage = response.get("usage").map(|u| TokenUsage {
        input_tokens: u.get("prompt_tokens").and_then(|t| t.as_u64()),
        output_tokens: u.get("completion_tokens").and_then(|t| t.as_u64()),
    });

    Ok(Completion {
        text,
        model,
        finish_reason,
        usage,
    })
}

/// Extracts the error message from a failed API response body.
pub fn error_message(body: &Value) -> String {
    body.get("error")
        .and_then(|e| e.get("message").or(Some(e)))
        .and_then(|m| m.as_str())
        .unwrap_or("Unknown error")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    #[test]
    fn test_text_message_is_plain_string() {
        let json = message_to_json(&ChatMessage::system("Be brief."));
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "Be brief.");
    }

    #[test]
    fn test_image_message_uses_parts() {
        let msg = ChatMessage::user("What is this?").with_image("data:image/png;base64,AAAA");
        let json = message_to_json(&msg);

        assert_eq!(json["role"], "user");
        assert_eq!(json["content"][0]["type"], "text");
        assert_eq!(json["content"][1]["type"], "image_url");
        assert_eq!(
            json["content"][1]["image_url"]["url"],
            "data:image/png;base64,AAAA"
        );
    }

    #[test]
    fn test_build_request_body() {
        let request = CompletionRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![ChatMessage {
                role: Role::User,
                content: vec![ContentPart::Text("Hi".to_string())],
            }],
            max_tokens: Some(50),
            temperature: None,
        };
        let body = build_request_body(&request);

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 50);
        assert!(body.get("temperature").is_none());
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_parse_response_simple() {
        let response = json!({
            "model": "gpt-4o-mini",
            "choices": [{
                "message": { "role": "assistant", "content": "  Stapler, Tape \n" },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 5 }
        });

        let parsed = parse_response(&response).unwrap();
        assert_eq!(parsed.text, "Stapler, Tape");
        assert_eq!(parsed.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(parsed.finish_reason.as_deref(), Some("stop"));
        assert_eq!(parsed.usage.unwrap().output_tokens, Some(5));
    }

    #[test]
    fn test_parse_response_null_content() {
        let response = json!({ "choices": [{ "message": { "content": null } }] });
        assert_eq!(parse_response(&response).unwrap().text, "");
    }

    #[test]
    fn test_parse_response_no_choices() {
        let response = json!({ "choices": [] });
        assert!(matches!(
            parse_response(&response),
            Err(AssistError::EmptyResponse)
        ));
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(&json!({ "error": { "message": "bad key" } })),
            "bad key"
        );
        assert_eq!(error_message(&json!({ "error": "plain" })), "plain");
        assert_eq!(error_message(&json!({})), "Unknown error");
    }

    #[test]
    fn test_images() {
        assert_eq!(image_data_url("image/jpeg", b"hi"), "data:image/jpeg;base64,aGk=");
        assert_eq!(normalize_image("aGk="), "data:image/png;base64,aGk=");
        assert_eq!(
            normalize_image(" data:image/gif;base64,aGk= "),
            "data:image/gif;base64,aGk="
        );
        assert_eq!(media_type_for("JPG"), "image/jpeg");
        assert_eq!(media_type_for("bmp"), "image/png");
    }
}
