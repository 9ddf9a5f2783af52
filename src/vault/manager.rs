use crate::cryptography::generator::{PasswordGenerator, DEFAULT_LENGTH};
use crate::cryptography::strength::{classify, Strength};
use crate::vault::errors::{ValidationError, VaultError};
use crate::vault::filter::{filter_indices, CategoryFilter};
use crate::vault::models::{
    is_protected_category, Category, CategoryInput, Credential, CredentialInput, Stats,
    DEFAULT_ICON, OTHER_CATEGORY_ID, OTHER_CATEGORY_NAME,
};
use crate::vault::notify::Notification;
use crate::vault::store::Store;
use chrono::Utc;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Application state behind every presentation layer: the canonical credential and category
/// lists, the transient view state, and the filtered view derived from both.
///
/// Every mutating command stages its change on a copy, persists it, and only then commits, so
/// a failed command leaves the in-memory state untouched.
pub struct PasswordManager {
    store: Store,
    generator: PasswordGenerator,
    generator_length: usize,
    credentials: Vec<Credential>,
    categories: Vec<Category>,
    selected_category: CategoryFilter,
    search_term: String,
    dark_mode: bool,
    filtered: Vec<usize>,
    notifications: Vec<Notification>,
}

impl PasswordManager {
    pub fn open(store: Store, generator: PasswordGenerator) -> Self {
        let loaded = store.load_all();
        let notifications: Vec<Notification> = loaded
            .warnings
            .iter()
            .map(|w| {
                Notification::warning(format!("Could not load saved data ({w}); starting empty"))
            })
            .collect();

        // Dangling category ids stay as stored. Only delete_category reassigns.
        let dangling = loaded
            .credentials
            .iter()
            .filter(|c| !loaded.categories.iter().any(|cat| cat.id == c.category))
            .count();
        if dangling > 0 {
            debug!(dangling, "credentials reference unknown categories; shown as other");
        }

        let mut manager = Self {
            store,
            generator,
            generator_length: DEFAULT_LENGTH,
            credentials: loaded.credentials,
            categories: loaded.categories,
            selected_category: CategoryFilter::All,
            search_term: String::new(),
            dark_mode: loaded.dark_mode,
            filtered: Vec::new(),
            notifications,
        };
        manager.recompute();
        manager
    }

    pub fn with_generator_length(mut self, length: usize) -> Self {
        self.generator_length = length;
        self
    }

    // ===== Read side =====

    pub fn credentials(&self) -> &[Credential] {
        &self.credentials
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// The filtered view, in insertion order.
    pub fn filtered(&self) -> Vec<&Credential> {
        self.filtered.iter().map(|&i| &self.credentials[i]).collect()
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn credential(&self, id: &str) -> Option<&Credential> {
        self.credentials.iter().find(|c| c.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Look a category up by id, or by case-insensitive name.
    pub fn find_category(&self, key: &str) -> Option<&Category> {
        let key = key.trim();
        self.category(key).or_else(|| {
            let lower = key.to_lowercase();
            self.categories.iter().find(|c| c.name.to_lowercase() == lower)
        })
    }

    pub fn category_name(&self, id: &str) -> &str {
        self.category(id)
            .map(|c| c.name.as_str())
            .unwrap_or(OTHER_CATEGORY_NAME)
    }

    pub fn category_icon(&self, id: &str) -> &str {
        self.category(id).map(|c| c.icon.as_str()).unwrap_or(DEFAULT_ICON)
    }

    pub fn selected_category(&self) -> &CategoryFilter {
        &self.selected_category
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn stats(&self) -> Stats {
        let in_use: HashSet<&str> = self
            .credentials
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        Stats {
            total_credentials: self.credentials.len(),
            categories_in_use: in_use.len(),
        }
    }

    /// Pending notifications, oldest first. Draining clears the queue.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    // ===== View state =====

    pub fn set_category_filter(&mut self, filter: CategoryFilter) -> Result<(), VaultError> {
        if let CategoryFilter::Category(id) = &filter {
            if self.category(id).is_none() {
                return self.fail(VaultError::UnknownCategory(id.clone()));
            }
        }
        self.selected_category = filter;
        self.recompute();
        Ok(())
    }

    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = term.to_string();
        self.recompute();
    }

    fn recompute(&mut self) {
        self.filtered =
            filter_indices(&self.credentials, &self.selected_category, &self.search_term);
    }

    // ===== Credentials =====

    pub fn add_credential(&mut self, input: CredentialInput) -> Result<String, VaultError> {
        let input = match validate_credential(input) {
            Ok(v) => v,
            Err(e) => return self.fail(e.into()),
        };
        let id = match self.store.generate_id(|cand| self.credential(cand).is_some()) {
            Ok(id) => id,
            Err(e) => return self.fail(e),
        };
        let category = self.resolve_category(&input.category);
        let now = Utc::now();
        let credential = Credential {
            id: id.clone(),
            service: input.service,
            username: input.username,
            password: input.password,
            description: input.description,
            category,
            created_at: now,
            updated_at: now,
        };

        let mut staged = self.credentials.clone();
        staged.push(credential);
        if let Err(e) = self.store.save_credentials(&staged) {
            return self.fail(e.into());
        }
        self.credentials = staged;
        self.recompute();
        info!(%id, "credential added");
        self.notifications.push(Notification::success("Password added"));
        Ok(id)
    }

    pub fn edit_credential(&mut self, id: &str, input: CredentialInput) -> Result<(), VaultError> {
        let Some(pos) = self.credentials.iter().position(|c| c.id == id) else {
            return self.fail(VaultError::UnknownCredential(id.to_string()));
        };
        let input = match validate_credential(input) {
            Ok(v) => v,
            Err(e) => return self.fail(e.into()),
        };
        let category = self.resolve_category(&input.category);

        let mut staged = self.credentials.clone();
        let entry = &mut staged[pos];
        entry.service = input.service;
        entry.username = input.username;
        entry.password = input.password;
        entry.description = input.description;
        entry.category = category;
        entry.updated_at = Utc::now();

        if let Err(e) = self.store.save_credentials(&staged) {
            return self.fail(e.into());
        }
        self.credentials = staged;
        self.recompute();
        info!(%id, "credential updated");
        self.notifications.push(Notification::success("Password updated"));
        Ok(())
    }

    /// Returns `false` (and writes nothing) when no credential has `id`.
    pub fn delete_credential(&mut self, id: &str) -> Result<bool, VaultError> {
        if self.credential(id).is_none() {
            debug!(%id, "delete of unknown credential ignored");
            return Ok(false);
        }
        let mut staged = self.credentials.clone();
        staged.retain(|c| c.id != id);
        if let Err(e) = self.store.save_credentials(&staged) {
            return self.fail(e.into());
        }
        self.credentials = staged;
        self.recompute();
        info!(%id, "credential deleted");
        self.notifications.push(Notification::success("Password deleted"));
        Ok(true)
    }

    fn resolve_category(&self, requested: &str) -> String {
        if self.category(requested).is_some() {
            requested.to_string()
        } else {
            if !requested.is_empty() {
                debug!(requested, "unknown category; using other");
            }
            OTHER_CATEGORY_ID.to_string()
        }
    }

    // ===== Categories =====

    pub fn add_category(&mut self, input: CategoryInput) -> Result<String, VaultError> {
        let input = match validate_category(input) {
            Ok(v) => v,
            Err(e) => return self.fail(e.into()),
        };
        let id = match self.store.generate_id(|cand| self.category(cand).is_some()) {
            Ok(id) => id,
            Err(e) => return self.fail(e),
        };
        let mut staged = self.categories.clone();
        staged.push(Category {
            id: id.clone(),
            name: input.name,
            icon: input.icon,
        });
        if let Err(e) = self.store.save_categories(&staged) {
            return self.fail(e.into());
        }
        self.categories = staged;
        info!(%id, "category added");
        self.notifications.push(Notification::success("Category added"));
        Ok(id)
    }

    pub fn edit_category(&mut self, id: &str, input: CategoryInput) -> Result<(), VaultError> {
        let pos = match self.editable_category(id) {
            Ok(pos) => pos,
            Err(e) => return self.fail(e),
        };
        let input = match validate_category(input) {
            Ok(v) => v,
            Err(e) => return self.fail(e.into()),
        };
        let mut staged = self.categories.clone();
        staged[pos].name = input.name;
        staged[pos].icon = input.icon;
        if let Err(e) = self.store.save_categories(&staged) {
            return self.fail(e.into());
        }
        self.categories = staged;
        info!(%id, "category updated");
        self.notifications.push(Notification::success("Category updated"));
        Ok(())
    }

    /// Deletes a custom category and moves its credentials to `other`.
    /// Returns how many credentials were reassigned.
    pub fn delete_category(&mut self, id: &str) -> Result<usize, VaultError> {
        if let Err(e) = self.editable_category(id) {
            return self.fail(e);
        }
        let mut staged_categories = self.categories.clone();
        staged_categories.retain(|c| c.id != id);
        let mut staged_credentials = self.credentials.clone();
        let mut moved = 0usize;
        for c in staged_credentials.iter_mut().filter(|c| c.category == id) {
            c.category = OTHER_CATEGORY_ID.to_string();
            moved += 1;
        }

        if let Err(e) = self.store.save_categories(&staged_categories) {
            return self.fail(e.into());
        }
        if let Err(e) = self.store.save_credentials(&staged_credentials) {
            // Put the category record back so storage keeps matching memory.
            if let Err(restore) = self.store.save_categories(&self.categories) {
                warn!(%id, error = %restore, "could not restore categories after a failed delete");
                self.notifications.push(Notification::warning(format!(
                    "Category list on disk no longer matches entries ({restore})"
                )));
            }
            return self.fail(e.into());
        }

        self.categories = staged_categories;
        self.credentials = staged_credentials;
        if self.selected_category == CategoryFilter::Category(id.to_string()) {
            self.selected_category = CategoryFilter::All;
        }
        self.recompute();
        info!(%id, moved, "category deleted");
        self.notifications.push(Notification::success("Category deleted"));
        Ok(moved)
    }

    fn editable_category(&self, id: &str) -> Result<usize, VaultError> {
        if is_protected_category(id) {
            return Err(VaultError::ProtectedCategory(id.to_string()));
        }
        self.categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| VaultError::UnknownCategory(id.to_string()))
    }

    // ===== Password helpers =====

    pub fn generate_password(&mut self, length: Option<usize>) -> Result<String, VaultError> {
        let length = length.unwrap_or(self.generator_length);
        match self.generator.generate(length) {
            Ok(pw) => {
                self.notifications.push(Notification::success("Password generated"));
                Ok(pw)
            }
            Err(e) => self.fail(VaultError::Randomness(e.to_string())),
        }
    }

    pub fn score_password(&self, password: &str) -> Strength {
        classify(password)
    }

    /// Flip the persisted dark-mode flag and return the new value.
    pub fn toggle_theme(&mut self) -> Result<bool, VaultError> {
        let next = !self.dark_mode;
        if let Err(e) = self.store.save_dark_mode(next) {
            return self.fail(e.into());
        }
        self.dark_mode = next;
        Ok(next)
    }

    fn fail<T>(&mut self, err: VaultError) -> Result<T, VaultError> {
        debug!(error = %err, "command rejected");
        self.notifications.push(Notification::error(err.to_string()));
        Err(err)
    }
}

fn emoji_pattern() -> &'static Regex {
    static EMOJI: OnceLock<Regex> = OnceLock::new();
    EMOJI.get_or_init(|| Regex::new(r"\p{Emoji}").expect("Failed to compile emoji regex"))
}

/// Trim the free-text fields and check the required ones. The password is kept verbatim.
pub fn validate_credential(input: CredentialInput) -> Result<CredentialInput, ValidationError> {
    let service = input.service.trim().to_string();
    if service.is_empty() {
        return Err(ValidationError::MissingService);
    }
    if input.password.is_empty() {
        return Err(ValidationError::MissingPassword);
    }
    Ok(CredentialInput {
        service,
        username: input.username.trim().to_string(),
        password: input.password,
        description: input.description.trim().to_string(),
        category: input.category.trim().to_string(),
    })
}

/// An empty icon falls back to the default before the emoji check.
pub fn validate_category(input: CategoryInput) -> Result<CategoryInput, ValidationError> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(ValidationError::MissingCategoryName);
    }
    let icon = match input.icon.trim() {
        "" => DEFAULT_ICON.to_string(),
        other => other.to_string(),
    };
    if !emoji_pattern().is_match(&icon) {
        return Err(ValidationError::InvalidIcon(icon));
    }
    Ok(CategoryInput { name, icon })
}
