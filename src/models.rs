// Data shapes exchanged with the shopping service. Lists and items are
// snapshots: the CLI fetches them once per invocation, mutates fields and
// hands them back to the service to save.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named shopping list together with its items, in service order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ShoppingList {
    pub identifier: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

/// A single entry on a list. Field names follow the service's camelCase
/// wire format; `details` is what the app shows as notes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default)]
    pub checked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_match_id: Option<String>,
}

/// Payload for creating an item.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_match_id: Option<String>,
}

impl ShoppingList {
    pub fn unchecked_count(&self) -> usize {
        self.items.iter().filter(|i| !i.checked).count()
    }
}

impl Item {
    /// Friendly category name when the id is one we know, the raw id otherwise.
    pub fn category_label(&self) -> Option<String> {
        self.category_match_id.as_deref().map(|id| match Category::from_id(id) {
            Some(c) => c.name().to_string(),
            None => id.to_string(),
        })
    }
}

/// Case-insensitive comparison used for every name lookup.
pub fn names_match(candidate: &str, query: &str) -> bool {
    candidate.trim().to_lowercase() == query.trim().to_lowercase()
}

/// Built-in grocery categories. Each maps a friendly name to the grouping
/// id the service stores in `categoryMatchId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Produce,
    Meat,
    Seafood,
    Dairy,
    Bakery,
    Deli,
    Frozen,
    Canned,
    DryGoods,
    Condiments,
    Beverages,
    Snacks,
    Household,
    PersonalCare,
    Baby,
    Pets,
    Other,
}

impl Category {
    pub const ALL: [Category; 17] = [
        Category::Produce,
        Category::Meat,
        Category::Seafood,
        Category::Dairy,
        Category::Bakery,
        Category::Deli,
        Category::Frozen,
        Category::Canned,
        Category::DryGoods,
        Category::Condiments,
        Category::Beverages,
        Category::Snacks,
        Category::Household,
        Category::PersonalCare,
        Category::Baby,
        Category::Pets,
        Category::Other,
    ];

    /// Name accepted on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Category::Produce => "produce",
            Category::Meat => "meat",
            Category::Seafood => "seafood",
            Category::Dairy => "dairy",
            Category::Bakery => "bakery",
            Category::Deli => "deli",
            Category::Frozen => "frozen",
            Category::Canned => "canned",
            Category::DryGoods => "dry-goods",
            Category::Condiments => "condiments",
            Category::Beverages => "beverages",
            Category::Snacks => "snacks",
            Category::Household => "household",
            Category::PersonalCare => "personal-care",
            Category::Baby => "baby",
            Category::Pets => "pets",
            Category::Other => "other",
        }
    }

    /// Grouping id stored by the service.
    pub fn id(&self) -> &'static str {
        match self {
            Category::Frozen => "frozen-foods",
            Category::Canned => "canned-goods",
            other => other.name(),
        }
    }

    pub fn from_id(id: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.id() == id)
    }

    pub fn names() -> Vec<&'static str> {
        Category::ALL.iter().map(|c| c.name()).collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown category \"{0}\"")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.name() == wanted || c.id() == wanted)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, checked: bool) -> Item {
        Item {
            identifier: format!("id-{}", name),
            list_id: None,
            name: name.to_string(),
            quantity: None,
            details: None,
            checked,
            category_match_id: None,
        }
    }

    #[test]
    fn category_parse_ignores_case_and_accepts_ids() {
        assert_eq!("Produce".parse::<Category>(), Ok(Category::Produce));
        assert_eq!(" DAIRY ".parse::<Category>(), Ok(Category::Dairy));
        assert_eq!("frozen-foods".parse::<Category>(), Ok(Category::Frozen));
        assert_eq!("Personal-Care".parse::<Category>(), Ok(Category::PersonalCare));
    }

    #[test]
    fn unknown_category_is_rejected() {
        let err = "candy".parse::<Category>().unwrap_err();
        assert_eq!(err, UnknownCategory("candy".into()));
        assert_eq!(err.to_string(), "Unknown category \"candy\"");
    }

    #[test]
    fn ids_are_unique_and_map_back() {
        for c in Category::ALL {
            assert_eq!(Category::from_id(c.id()), Some(c));
        }
        assert_eq!(Category::from_id("nonsense"), None);
    }

    #[test]
    fn category_label_falls_back_to_raw_id() {
        let mut i = item("Milk", false);
        assert_eq!(i.category_label(), None);
        i.category_match_id = Some("canned-goods".into());
        assert_eq!(i.category_label().as_deref(), Some("canned"));
        i.category_match_id = Some("garden".into());
        assert_eq!(i.category_label().as_deref(), Some("garden"));
    }

    #[test]
    fn names_match_is_case_insensitive() {
        assert!(names_match("Whole Milk", "whole milk"));
        assert!(names_match("Crème Fraîche", "CRÈME FRAÎCHE"));
        assert!(names_match("Eggs", "  eggs "));
        assert!(!names_match("Eggs", "Egg"));
    }

    #[test]
    fn unchecked_count_skips_checked_items() {
        let list = ShoppingList {
            identifier: "l1".into(),
            name: "Groceries".into(),
            items: vec![item("Milk", false), item("Bread", true), item("Eggs", false)],
        };
        assert_eq!(list.unchecked_count(), 2);
    }

    #[test]
    fn item_reads_camel_case_wire_format() {
        let json = r#"{"identifier":"i1","listId":"l1","name":"Milk","quantity":"2",
            "details":"organic","checked":true,"categoryMatchId":"dairy"}"#;
        let parsed: Item = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.list_id.as_deref(), Some("l1"));
        assert_eq!(parsed.details.as_deref(), Some("organic"));
        assert!(parsed.checked);
        assert_eq!(parsed.category_match_id.as_deref(), Some("dairy"));

        let minimal: Item = serde_json::from_str(r#"{"identifier":"i2","name":"Salt"}"#).unwrap();
        assert!(!minimal.checked);
        assert_eq!(minimal.quantity, None);
    }
}
