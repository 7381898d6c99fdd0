use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Label used wherever an item has an empty category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Stable identifier for items across versions (UUID format when generated locally).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Core item in the inventory.
///
/// The wire form uses camelCase field names (`dateAdded`, `imageUrl`).
/// `quantity` accepts numbers and numeric strings on input, see [`quantity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "quantity::default", deserialize_with = "quantity::deserialize")]
    pub quantity: u32,
    #[serde(default)]
    pub category: String,
    pub date_added: DateTime<Utc>, // set once by the producer
    #[serde(default)]
    pub image_url: String,
}

impl InventoryItem {
    /// Category for display and grouping; empty categories map to [`UNCATEGORIZED`].
    pub fn category_label(&self) -> &str {
        let category = self.category.trim();
        if category.is_empty() {
            UNCATEGORIZED
        } else {
            category
        }
    }

    /// Sort key for engines without insertion order: oldest first, ties by id.
    pub fn chronological_key(&self) -> (DateTime<Utc>, &ItemId) {
        (self.date_added, &self.id)
    }
}

/// Coercion of raw quantity input into a non-negative count.
///
/// Numbers are truncated and clamped at zero. Strings are trimmed and parsed
/// with the same rules. Anything empty, unparseable or null becomes
/// [`quantity::DEFAULT`], so a malformed quantity never drops an item.
pub mod quantity {
    use std::fmt;

    use serde::Deserializer;
    use serde::de::{self, Visitor};

    pub const DEFAULT: u32 = 1;

    pub fn default() -> u32 {
        DEFAULT
    }

    pub fn coerce_str(raw: &str) -> u32 {
        let raw = raw.trim();
        if let Ok(n) = raw.parse::<i64>() {
            return coerce_i64(n);
        }
        match raw.parse::<f64>() {
            Ok(f) => coerce_f64(f),
            Err(_) => DEFAULT,
        }
    }

    pub fn coerce_i64(n: i64) -> u32 {
        n.clamp(0, i64::from(u32::MAX)) as u32
    }

    pub fn coerce_f64(f: f64) -> u32 {
        if f.is_nan() {
            DEFAULT
        } else if f <= 0.0 {
            0
        } else if f >= f64::from(u32::MAX) {
            u32::MAX
        } else {
            f.trunc() as u32
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(QuantityVisitor)
    }

    struct QuantityVisitor;

    impl<'de> Visitor<'de> for QuantityVisitor {
        type Value = u32;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a quantity as a number or numeric string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u32, E> {
            Ok(u32::try_from(v).unwrap_or(u32::MAX))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u32, E> {
            Ok(coerce_i64(v))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<u32, E> {
            Ok(coerce_f64(v))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u32, E> {
            Ok(coerce_str(v))
        }

        fn visit_bool<E: de::Error>(self, _v: bool) -> Result<u32, E> {
            Ok(DEFAULT)
        }

        fn visit_unit<E: de::Error>(self) -> Result<u32, E> {
            Ok(DEFAULT)
        }

        fn visit_none<E: de::Error>(self) -> Result<u32, E> {
            Ok(DEFAULT)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<u32, D::Error> {
            deserializer.deserialize_any(QuantityVisitor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn chair() -> InventoryItem {
        InventoryItem {
            id: ItemId::new("1"),
            name: "Chair".to_string(),
            description: String::new(),
            quantity: 4,
            category: "Furniture".to_string(),
            date_added: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            image_url: String::new(),
        }
    }

    #[test]
    fn wire_form_is_camel_case() {
        let json = serde_json::to_value(chair()).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["dateAdded"], "2024-01-01T00:00:00Z");
        assert_eq!(json["imageUrl"], "");
        assert_eq!(json["quantity"], 4);
    }

    #[test]
    fn missing_image_url_defaults_to_empty() {
        let item: InventoryItem = serde_json::from_str(
            r#"{"id":"7","name":"Lamp","description":"","quantity":1,"category":"","dateAdded":"2024-03-01T12:00:00.000Z"}"#,
        )
        .unwrap();
        assert_eq!(item.image_url, "");
        assert_eq!(item.id.as_str(), "7");
    }

    #[test]
    fn quantity_accepts_strings_and_clamps() {
        let parse = |q: &str| -> u32 {
            let json = format!(
                r#"{{"id":"1","name":"x","quantity":{q},"dateAdded":"2024-01-01T00:00:00Z"}}"#
            );
            serde_json::from_str::<InventoryItem>(&json).unwrap().quantity
        };
        assert_eq!(parse("3"), 3);
        assert_eq!(parse(r#""12""#), 12);
        assert_eq!(parse(r#"" 5 ""#), 5);
        assert_eq!(parse("-4"), 0);
        assert_eq!(parse(r#""-4""#), 0);
        assert_eq!(parse("2.9"), 2);
        assert_eq!(parse(r#""abc""#), quantity::DEFAULT);
        assert_eq!(parse(r#""""#), quantity::DEFAULT);
        assert_eq!(parse("null"), quantity::DEFAULT);
    }

    #[test]
    fn absent_quantity_uses_default() {
        let item: InventoryItem =
            serde_json::from_str(r#"{"id":"1","name":"x","dateAdded":"2024-01-01T00:00:00Z"}"#)
                .unwrap();
        assert_eq!(item.quantity, quantity::DEFAULT);
    }

    #[test]
    fn empty_category_is_uncategorized() {
        let mut item = chair();
        assert_eq!(item.category_label(), "Furniture");
        item.category = "  ".to_string();
        assert_eq!(item.category_label(), UNCATEGORIZED);
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(ItemId::generate(), ItemId::generate());
    }
}
