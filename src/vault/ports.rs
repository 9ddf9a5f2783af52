use anyhow::Result;

use super::models::{Category, Credential};

// Keys of the persisted records.
pub const PASSWORDS_KEY: &str = "passwords";
pub const CUSTOM_CATEGORIES_KEY: &str = "customCategories";
pub const DARK_MODE_KEY: &str = "darkMode";

// Randomness provider for deterministic testing.
pub trait Rng: Send + Sync {
    fn fill(&self, bytes: &mut [u8]) -> Result<()>;
}

/// Local key-value storage. `get` returns `None` when nothing was ever stored under `key`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn set(&self, key: &str, bytes: &[u8]) -> Result<()>;
}

pub trait RecordCodec: Send + Sync {
    fn encode_credentials(&self, credentials: &[Credential]) -> Result<Vec<u8>>;
    fn decode_credentials(&self, data: &[u8]) -> Result<Vec<Credential>>;
    fn encode_categories(&self, categories: &[Category]) -> Result<Vec<u8>>;
    fn decode_categories(&self, data: &[u8]) -> Result<Vec<Category>>;
    fn encode_flag(&self, value: bool) -> Result<Vec<u8>>;
    fn decode_flag(&self, data: &[u8]) -> Result<bool>;
}
