use crate::cryptography::generator::uniform_index;
use crate::vault::errors::{PersistenceError, VaultError};
use crate::vault::models::{builtin_categories, Category, Credential};
use crate::vault::ports::{
    KeyValueStore, RecordCodec, Rng, CUSTOM_CATEGORIES_KEY, DARK_MODE_KEY, PASSWORDS_KEY,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, warn};

const ID_SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

/// Everything read from storage at startup.
#[derive(Debug, Clone)]
pub struct LoadedState {
    pub credentials: Vec<Credential>,
    /// Built-in categories first, then the persisted custom ones.
    pub categories: Vec<Category>,
    pub dark_mode: bool,
    /// Records that could not be read or decoded and were replaced by their empty default.
    pub warnings: Vec<PersistenceError>,
}

/// Owns the persisted form of credentials and categories.
pub struct Store {
    kv: Arc<dyn KeyValueStore>,
    codec: Arc<dyn RecordCodec>,
    rng: Arc<dyn Rng>,
}

impl Store {
    pub fn new(
        kv: Arc<dyn KeyValueStore>,
        codec: Arc<dyn RecordCodec>,
        rng: Arc<dyn Rng>,
    ) -> Self {
        Self { kv, codec, rng }
    }

    pub fn load_all(&self) -> LoadedState {
        let mut warnings = Vec::new();

        let credentials = self
            .read_record(PASSWORDS_KEY, |b| self.codec.decode_credentials(b))
            .unwrap_or_else(|e| {
                warnings.push(e);
                None
            })
            .unwrap_or_default();

        let custom = self
            .read_record(CUSTOM_CATEGORIES_KEY, |b| self.codec.decode_categories(b))
            .unwrap_or_else(|e| {
                warnings.push(e);
                None
            })
            .unwrap_or_default();

        let dark_mode = self
            .read_record(DARK_MODE_KEY, |b| self.codec.decode_flag(b))
            .unwrap_or_else(|e| {
                warnings.push(e);
                None
            })
            .unwrap_or(true);

        for w in &warnings {
            warn!("{w}; continuing with an empty collection");
        }

        let mut categories = builtin_categories();
        categories.extend(custom.into_iter().filter(|c| !c.is_builtin()));

        debug!(
            credentials = credentials.len(),
            categories = categories.len(),
            "loaded state"
        );
        LoadedState {
            credentials,
            categories,
            dark_mode,
            warnings,
        }
    }

    fn read_record<T>(
        &self,
        key: &str,
        decode: impl Fn(&[u8]) -> anyhow::Result<T>,
    ) -> Result<Option<T>, PersistenceError> {
        let bytes = match self.kv.get(key) {
            Ok(Some(b)) if !b.is_empty() => b,
            Ok(_) => return Ok(None),
            Err(e) => {
                return Err(PersistenceError::Read {
                    key: key.to_string(),
                    reason: format!("{e:#}"),
                })
            }
        };
        decode(&bytes).map(Some).map_err(|e| PersistenceError::Decode {
            key: key.to_string(),
            reason: format!("{e:#}"),
        })
    }

    fn write_record(
        &self,
        key: &str,
        encoded: anyhow::Result<Vec<u8>>,
    ) -> Result<(), PersistenceError> {
        let to_write_err = |e: anyhow::Error| PersistenceError::Write {
            key: key.to_string(),
            reason: format!("{e:#}"),
        };
        let bytes = encoded.map_err(to_write_err)?;
        self.kv.set(key, &bytes).map_err(to_write_err)?;
        debug!(key, bytes = bytes.len(), "record written");
        Ok(())
    }

    /// Overwrite the whole persisted credential collection.
    pub fn save_credentials(&self, credentials: &[Credential]) -> Result<(), PersistenceError> {
        self.write_record(PASSWORDS_KEY, self.codec.encode_credentials(credentials))
    }

    /// Overwrite the persisted custom categories. Built-ins in `categories` are skipped.
    pub fn save_categories(&self, categories: &[Category]) -> Result<(), PersistenceError> {
        let custom: Vec<Category> = categories
            .iter()
            .filter(|c| !c.is_builtin())
            .cloned()
            .collect();
        self.write_record(CUSTOM_CATEGORIES_KEY, self.codec.encode_categories(&custom))
    }

    pub fn save_dark_mode(&self, dark_mode: bool) -> Result<(), PersistenceError> {
        self.write_record(DARK_MODE_KEY, self.codec.encode_flag(dark_mode))
    }

    /// Epoch milliseconds followed by a random base-36 suffix, redrawn while `taken` says the
    /// candidate already exists.
    pub fn generate_id(&self, taken: impl Fn(&str) -> bool) -> Result<String, VaultError> {
        loop {
            let mut id = Utc::now().timestamp_millis().to_string();
            for _ in 0..ID_SUFFIX_LEN {
                let idx = uniform_index(&*self.rng, ID_SUFFIX_ALPHABET.len())
                    .map_err(|e| VaultError::Randomness(e.to_string()))?;
                id.push(ID_SUFFIX_ALPHABET[idx] as char);
            }
            if !taken(&id) {
                return Ok(id);
            }
            debug!("generated id collided; drawing again");
        }
    }
}
