//! Prompts for the inventory assistant.

use invenai_core::{InventoryItem, InventoryStats};

use crate::types::{ChatMessage, CompletionRequest};

pub const SUGGEST_MAX_TOKENS: u32 = 50;
pub const DESCRIBE_MAX_TOKENS: u32 = 150;
pub const RECOGNIZE_MAX_TOKENS: u32 = 300;
pub const CHAT_MAX_TOKENS: u32 = 100;

/// Items listed by name in the chat context; the rest is summarized by count.
const CHAT_CONTEXT_ITEMS: usize = 50;

pub fn suggestions(model: &str, query: &str) -> CompletionRequest {
    CompletionRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system(
                "You are a helpful assistant. Answer with a comma-separated list of item names only.",
            ),
            ChatMessage::user(format!("Provide a list of items related to: {query}")),
        ],
        max_tokens: Some(SUGGEST_MAX_TOKENS),
        temperature: None,
    }
}

pub fn description(model: &str, item_name: &str) -> CompletionRequest {
    CompletionRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system(
                "You are an assistant providing detailed descriptions and categories of inventory items. \
                 Answer in the form \"Description: ...\" followed by \"Category: ...\".",
            ),
            ChatMessage::user(format!(
                "Provide a detailed description and category of the item: {item_name}"
            )),
        ],
        max_tokens: Some(DESCRIBE_MAX_TOKENS),
        temperature: None,
    }
}

/// Vision request; `image_url` is usually a `data:` URL.
pub fn recognition(model: &str, image_url: &str) -> CompletionRequest {
    CompletionRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system(
                "You identify inventory items in photos. Answer with a JSON object with the keys \
                 \"name\", \"description\" and \"category\" and nothing else.",
            ),
            ChatMessage::user("What item is shown in this image?").with_image(image_url),
        ],
        max_tokens: Some(RECOGNIZE_MAX_TOKENS),
        temperature: Some(0.0),
    }
}

pub fn chat(model: &str, message: &str, inventory: &[InventoryItem]) -> CompletionRequest {
    let system = format!(
        "You are a helpful assistant for managing inventory.\n{}",
        inventory_summary(inventory)
    );
    CompletionRequest {
        model: model.to_string(),
        messages: vec![ChatMessage::system(system), ChatMessage::user(message)],
        max_tokens: Some(CHAT_MAX_TOKENS),
        temperature: None,
    }
}

/// Short plain-text description of the inventory for the chat system prompt.
pub fn inventory_summary(items: &[InventoryItem]) -> String {
    if items.is_empty() {
        return "The inventory is currently empty.".to_string();
    }
    let stats = InventoryStats::from_items(items);
    let mut summary = format!(
        "The inventory holds {} items ({} units in total).\n",
        stats.total_items, stats.total_quantity
    );
    for item in items.iter().take(CHAT_CONTEXT_ITEMS) {
        summary.push_str(&format!(
            "- {} x{} ({})\n",
            item.name,
            item.quantity,
            item.category_label()
        ));
    }
    if items.len() > CHAT_CONTEXT_ITEMS {
        summary.push_str(&format!(
            "... and {} more items.\n",
            items.len() - CHAT_CONTEXT_ITEMS
        ));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContentPart;
    use chrono::Utc;
    use invenai_core::{ItemDraft, ItemId};

    #[test]
    fn test_suggestions_prompt() {
        let request = suggestions("m", "office");
        assert_eq!(request.max_tokens, Some(50));
        assert_eq!(
            request.messages[1].content,
            vec![ContentPart::Text(
                "Provide a list of items related to: office".to_string()
            )]
        );
    }

    #[test]
    fn test_recognition_carries_image() {
        let request = recognition("m", "data:image/png;base64,AAAA");
        assert!(
            request.messages[1]
                .content
                .contains(&ContentPart::ImageUrl("data:image/png;base64,AAAA".to_string()))
        );
    }

    #[test]
    fn test_inventory_summary() {
        assert_eq!(inventory_summary(&[]), "The inventory is currently empty.");

        let items = vec![
            ItemDraft::new("Chair")
                .with_quantity(4)
                .into_item_with(ItemId::new("1"), Utc::now()),
        ];
        let summary = inventory_summary(&items);
        assert!(summary.contains("1 items (4 units"));
        assert!(summary.contains("- Chair x4 (Uncategorized)"));
    }

    #[test]
    fn test_chat_system_prompt() {
        let request = chat("m", "How many chairs?", &[]);
        assert_eq!(request.max_tokens, Some(100));
        match &request.messages[0].content[0] {
            ContentPart::Text(text) => {
                assert!(text.starts_with("You are a helpful assistant for managing inventory."))
            }
            _ => panic!("Expected text"),
        }
    }
}
