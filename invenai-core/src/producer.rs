//! Producers: the flows that turn user or assistant input into new items.
//!
//! Every producer yields an [`ItemDraft`]. A draft becomes an
//! [`InventoryItem`] only through [`ItemDraft::into_item`], the single place
//! where identifiers and `dateAdded` are assigned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::item::{InventoryItem, ItemId, UNCATEGORIZED, quantity};

pub const NO_DESCRIPTION: &str = "No description available";
pub const AUTOCOMPLETE_DESCRIPTION: &str = "Auto-generated description";
pub const UNKNOWN_ITEM: &str = "Unknown item";

/// Error building a draft from raw form input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("item name is required")]
    MissingName,
}

/// An item that has not been assigned an identity yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    pub description: String,
    pub quantity: u32,
    pub category: String,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            quantity: quantity::DEFAULT,
            category: String::new(),
        }
    }

    /// Manual form submit. Fields are taken as typed; quantity is coerced.
    pub fn from_form(form: &ManualForm) -> Result<Self, DraftError> {
        let name = form.name.trim();
        if name.is_empty() {
            return Err(DraftError::MissingName);
        }
        Ok(Self {
            name: name.to_string(),
            description: form.description.trim().to_string(),
            quantity: quantity::coerce_str(&form.quantity),
            category: form.category.trim().to_string(),
        })
    }

    /// Autocomplete selection: a bare name with placeholder description.
    pub fn from_suggestion(suggestion: &str) -> Self {
        Self {
            description: AUTOCOMPLETE_DESCRIPTION.to_string(),
            ..Self::new(suggestion.trim())
        }
    }

    /// Autocomplete selection enriched by a description lookup.
    pub fn from_description(name: &str, described: Described) -> Self {
        Self {
            description: described.description,
            category: described.category,
            ..Self::new(name.trim())
        }
    }

    /// Image recognition result, with defaults for anything missing.
    pub fn from_recognition(recognition: Recognition) -> Self {
        let name = non_empty(recognition.name).unwrap_or_else(|| UNKNOWN_ITEM.to_string());
        Self {
            description: non_empty(recognition.description)
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            category: non_empty(recognition.category).unwrap_or_else(|| UNCATEGORIZED.to_string()),
            ..Self::new(name)
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Assigns a fresh id and the current time.
    pub fn into_item(self) -> InventoryItem {
        self.into_item_with(ItemId::generate(), Utc::now())
    }

    /// Assigns the given identity. Used by tests and by hydration-style imports.
    pub fn into_item_with(self, id: ItemId, date_added: DateTime<Utc>) -> InventoryItem {
        InventoryItem {
            id,
            name: self.name,
            description: self.description,
            quantity: self.quantity,
            category: self.category,
            date_added,
            image_url: String::new(),
        }
    }
}

/// Raw manual form fields, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualForm {
    pub name: String,
    pub description: String,
    pub quantity: String,
    pub category: String,
}

/// Description and category extracted from a description lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Described {
    pub description: String,
    pub category: String,
}

/// Output of image recognition. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recognition {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl Recognition {
    /// Fills missing fields with the recognition defaults.
    pub fn normalized(self) -> Self {
        let draft = ItemDraft::from_recognition(self);
        Self {
            name: Some(draft.name),
            description: Some(draft.description),
            category: Some(draft.category),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Splits a suggestion completion into distinct item names.
///
/// Accepts comma separated or one-per-line lists, with or without list markers.
pub fn parse_suggestions(text: &str) -> Vec<String> {
    let mut suggestions: Vec<String> = Vec::new();
    for raw in text.split([',', '\n']) {
        let cleaned = strip_list_marker(raw.trim())
            .trim()
            .trim_matches(|c: char| c == '"' || c == '*')
            .trim_end_matches('.')
            .trim();
        if cleaned.is_empty() {
            continue;
        }
        if suggestions
            .iter()
            .any(|existing| existing.eq_ignore_ascii_case(cleaned))
        {
            continue;
        }
        suggestions.push(cleaned.to_string());
    }
    suggestions
}

fn strip_list_marker(line: &str) -> &str {
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return rest;
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return rest;
        }
    }
    line
}

const DESCRIPTION_LABEL: &str = "description:";
const CATEGORY_LABEL: &str = "category:";

/// Parses a `Description: ... Category: ...` answer.
///
/// Labels are case-insensitive and may share a line. Missing parts default to
/// [`NO_DESCRIPTION`] and [`UNCATEGORIZED`].
pub fn parse_description(text: &str) -> Described {
    let lower = text.to_ascii_lowercase();
    let desc_at = lower.find(DESCRIPTION_LABEL);
    let cat_at = lower.find(CATEGORY_LABEL);

    let description = desc_at.map(|start| {
        let from = start + DESCRIPTION_LABEL.len();
        let to = match cat_at {
            Some(cat) if cat > start => cat,
            _ => text.len(),
        };
        clean_field(&text[from..to])
    });

    let category = cat_at.map(|start| {
        let from = start + CATEGORY_LABEL.len();
        let to = match desc_at {
            Some(desc) if desc > start => desc,
            _ => text.len(),
        };
        clean_field(text[from..to].lines().next().unwrap_or(""))
    });

    Described {
        description: description
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        category: category
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| UNCATEGORIZED.to_string()),
    }
}

fn clean_field(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c: char| c == '*' || c == '"' || c.is_whitespace())
        .trim_end_matches('.')
        .trim()
        .to_string()
}

/// Parses a recognition answer: a JSON object, possibly inside a code fence
/// or surrounded by prose. Anything unparseable yields an empty recognition.
pub fn parse_recognition(text: &str) -> Recognition {
    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        return Recognition::default();
    };
    if end < start {
        return Recognition::default();
    }
    serde_json::from_str(&text[start..=end]).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn form_coerces_quantity() {
        let form = ManualForm {
            name: " Chair ".to_string(),
            description: String::new(),
            quantity: "4".to_string(),
            category: "Furniture".to_string(),
        };
        let draft = ItemDraft::from_form(&form).unwrap();
        assert_eq!(draft.name, "Chair");
        assert_eq!(draft.quantity, 4);

        let bad = ManualForm {
            quantity: "lots".to_string(),
            ..form
        };
        assert_eq!(ItemDraft::from_form(&bad).unwrap().quantity, 1);
    }

    #[test]
    fn form_requires_name() {
        let form = ManualForm {
            name: "   ".to_string(),
            ..ManualForm::default()
        };
        assert_eq!(ItemDraft::from_form(&form), Err(DraftError::MissingName));
    }

    #[test]
    fn suggestion_draft_defaults() {
        let draft = ItemDraft::from_suggestion("Stapler");
        assert_eq!(draft.description, AUTOCOMPLETE_DESCRIPTION);
        assert_eq!(draft.quantity, 1);
        assert_eq!(draft.category, "");
    }

    #[test]
    fn recognition_defaults_fill_gaps() {
        let draft = ItemDraft::from_recognition(Recognition {
            name: Some("Mug".to_string()),
            description: None,
            category: Some("  ".to_string()),
        });
        assert_eq!(draft.name, "Mug");
        assert_eq!(draft.description, NO_DESCRIPTION);
        assert_eq!(draft.category, UNCATEGORIZED);
        assert_eq!(draft.quantity, 1);

        let empty = ItemDraft::from_recognition(Recognition::default());
        assert_eq!(empty.name, UNKNOWN_ITEM);
    }

    #[test]
    fn into_item_assigns_identity_once() {
        let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let item = ItemDraft::new("Chair")
            .with_quantity(4)
            .into_item_with(ItemId::new("1"), date);
        assert_eq!(item.id.as_str(), "1");
        assert_eq!(item.date_added, date);
        assert_eq!(item.image_url, "");

        let a = ItemDraft::new("A").into_item();
        let b = ItemDraft::new("A").into_item();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn suggestions_split_and_dedupe() {
        let parsed = parse_suggestions("Stapler, Paper clips, stapler,  , Tape.");
        assert_eq!(parsed, ["Stapler", "Paper clips", "Tape"]);

        let listed = parse_suggestions("1. Hammer\n2) Nails\n- Screwdriver\n* \"Wrench\"");
        assert_eq!(listed, ["Hammer", "Nails", "Screwdriver", "Wrench"]);
    }

    #[test]
    fn description_on_separate_lines() {
        let described = parse_description(
            "Description: A four-legged wooden seat.\nCategory: Furniture",
        );
        assert_eq!(described.description, "A four-legged wooden seat");
        assert_eq!(described.category, "Furniture");
    }

    #[test]
    fn description_on_one_line_and_bold_labels() {
        let described =
            parse_description("**Category:** Office supplies\n**Description:** Binds paper.");
        assert_eq!(described.category, "Office supplies");
        assert_eq!(described.description, "Binds paper");

        let inline = parse_description("description: Small lamp. category: Lighting");
        assert_eq!(inline.description, "Small lamp");
        assert_eq!(inline.category, "Lighting");
    }

    #[test]
    fn description_defaults_when_labels_missing() {
        let described = parse_description("I am not sure what that is.");
        assert_eq!(described.description, NO_DESCRIPTION);
        assert_eq!(described.category, UNCATEGORIZED);
    }

    #[test]
    fn recognition_parses_fenced_json() {
        let text = "Here you go:\n```json\n{\"name\": \"Mug\", \"category\": \"Kitchen\"}\n```";
        let recognition = parse_recognition(text);
        assert_eq!(recognition.name.as_deref(), Some("Mug"));
        assert_eq!(recognition.category.as_deref(), Some("Kitchen"));
        assert_eq!(recognition.description, None);

        assert_eq!(parse_recognition("no json here"), Recognition::default());
        assert_eq!(parse_recognition("{broken"), Recognition::default());
    }
}
