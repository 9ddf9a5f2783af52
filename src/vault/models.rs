use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Id of the fallback category every credential can resolve to.
pub const OTHER_CATEGORY_ID: &str = "other";
pub const OTHER_CATEGORY_NAME: &str = "Autre";
pub const DEFAULT_ICON: &str = "📝";

/// Ids that can never be edited or deleted. Only `other` is seeded today; the rest are
/// reserved for seed categories older data may still reference.
pub const PROTECTED_CATEGORY_IDS: &[&str] = &[
    "social",
    "email",
    "finance",
    "work",
    "entertainment",
    "shopping",
    OTHER_CATEGORY_ID,
];

pub fn is_protected_category(id: &str) -> bool {
    PROTECTED_CATEGORY_IDS.contains(&id)
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub id: String,
    pub service: String,
    #[serde(default)]
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "other_category")]
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: String,
}

impl Category {
    pub fn is_builtin(&self) -> bool {
        is_protected_category(&self.id)
    }
}

/// Built-in categories, constructed in code and never persisted.
pub fn builtin_categories() -> Vec<Category> {
    vec![Category {
        id: OTHER_CATEGORY_ID.to_string(),
        name: OTHER_CATEGORY_NAME.to_string(),
        icon: DEFAULT_ICON.to_string(),
    }]
}

fn other_category() -> String {
    OTHER_CATEGORY_ID.to_string()
}

/// Raw form fields for creating or editing a credential.
#[derive(Debug, Clone, Default)]
pub struct CredentialInput {
    pub service: String,
    pub username: String,
    pub password: String,
    pub description: String,
    pub category: String,
}

/// Raw form fields for creating or editing a category.
#[derive(Debug, Clone, Default)]
pub struct CategoryInput {
    pub name: String,
    pub icon: String,
}

/// Aggregate counts shown next to the credential list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_credentials: usize,
    pub categories_in_use: usize,
}
