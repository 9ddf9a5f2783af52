use crate::config::config::Config;
use crate::cryptography::generator::{PasswordGenerator, SystemRng, DEFAULT_LENGTH};
use crate::cryptography::strength::{classify, score};
use crate::filesystem::clipboard::{
    copy_with_ttl, environment_warning, ttl_seconds, ClipboardEngine, SystemClipboardEngine,
};
use crate::filesystem::store::FileKeyValueStore;
use crate::vault::codec::JsonCodec;
use crate::vault::filter::CategoryFilter;
use crate::vault::manager::PasswordManager;
use crate::vault::models::{CategoryInput, Credential, CredentialInput};
use crate::vault::notify::{Notification, Severity};
use crate::vault::ports::{KeyValueStore, RecordCodec, Rng};
use crate::vault::store::Store;
use anyhow::{anyhow, Result};
use inquire::{Confirm, Password, Text};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::spawn_blocking;

/// Compose the default file-backed adapters for `config`.
pub fn open_manager(config: &Config) -> PasswordManager {
    let backups = config.backups.unwrap_or(2);
    let kv: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::new_with_backups(
        config.data_dir.clone(),
        backups,
    ));
    let codec: Arc<dyn RecordCodec> = Arc::new(JsonCodec);
    let rng: Arc<dyn Rng> = Arc::new(SystemRng);
    let store = Store::new(kv, codec, rng.clone());
    let length = config
        .generator_length
        .map(usize::from)
        .unwrap_or(DEFAULT_LENGTH);
    PasswordManager::open(store, PasswordGenerator::new(rng)).with_generator_length(length)
}

// Status lines go to stderr so stdout stays pipeable. Errors surface through the returned Result.
fn print_notifications(notes: &[Notification]) {
    for n in notes.iter().filter(|n| n.severity != Severity::Error) {
        eprintln!("{} {}", n.glyph(), n.message);
    }
}

// Fields for add/edit, constructed by CLI layer. `None` means "prompt" on add and
// "keep current" on edit.
#[derive(Debug, Clone, Default)]
pub struct CredentialOptions {
    pub service: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub generate: bool,
    pub length: Option<usize>,
    pub description: Option<String>,
    pub category: Option<String>,
}

pub struct Vault<'a> {
    config: &'a Config,
}

impl<'a> Vault<'a> {
    pub fn create(config: &'a Config) -> Self {
        Vault { config }
    }

    /// Open the manager on a blocking thread, run `f`, and print the notifications it queued.
    async fn run<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PasswordManager) -> Result<T> + Send + 'static,
    {
        let cfg = self.config.clone();
        let (out, notes) = spawn_blocking(move || {
            let mut manager = open_manager(&cfg);
            let out = f(&mut manager);
            (out, manager.drain_notifications())
        })
        .await
        .map_err(|_| anyhow!("task join error"))?;
        print_notifications(&notes);
        out
    }

    pub async fn handle_list(
        &self,
        category: Option<String>,
        query: Option<String>,
        json_mode: bool,
    ) -> Result<()> {
        let rows = self
            .run(move |m| {
                if let Some(key) = category.as_deref() {
                    let filter = if key == "all" {
                        CategoryFilter::All
                    } else {
                        let id = m
                            .find_category(key)
                            .map(|c| c.id.clone())
                            .unwrap_or_else(|| key.to_string());
                        CategoryFilter::Category(id)
                    };
                    m.set_category_filter(filter)?;
                }
                if let Some(q) = query.as_deref() {
                    m.set_search_term(q);
                }
                let rows: Vec<(Credential, String, String)> = m
                    .filtered()
                    .into_iter()
                    .map(|c| {
                        (
                            c.clone(),
                            m.category_icon(&c.category).to_string(),
                            m.category_name(&c.category).to_string(),
                        )
                    })
                    .collect();
                Ok(rows)
            })
            .await?;

        if json_mode {
            // Never include passwords in listings
            let items: Vec<serde_json::Value> = rows
                .iter()
                .map(|(c, _, name)| {
                    json!({
                        "id": c.id,
                        "service": c.service,
                        "username": c.username,
                        "description": c.description,
                        "category": c.category,
                        "categoryName": name,
                        "strength": classify(&c.password),
                        "createdAt": c.created_at,
                        "updatedAt": c.updated_at,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&items)?);
            return Ok(());
        }

        if rows.is_empty() {
            println!("(empty)");
            return Ok(());
        }
        for (c, icon, name) in rows {
            let user = if c.username.is_empty() { "-" } else { c.username.as_str() };
            println!(
                "{}\t{icon} {}\t{}\t{user}\t{}",
                c.id,
                name,
                c.service,
                classify(&c.password)
            );
        }
        Ok(())
    }

    pub async fn handle_show(&self, id: &str, reveal_password: bool) -> Result<()> {
        let key = id.to_string();
        let (c, icon, name) = self
            .run(move |m| {
                let c = m
                    .credential(&key)
                    .cloned()
                    .ok_or_else(|| anyhow!("entry '{}' not found", key))?;
                let icon = m.category_icon(&c.category).to_string();
                let name = m.category_name(&c.category).to_string();
                Ok((c, icon, name))
            })
            .await?;

        println!("Service:     {}", c.service);
        println!(
            "Username:    {}",
            if c.username.is_empty() { "(none)" } else { c.username.as_str() }
        );
        if reveal_password {
            println!("Password:    {}", c.password);
        } else {
            println!("Password:    ******** (use --reveal to show)");
        }
        println!("Strength:    {}", classify(&c.password));
        println!(
            "Description: {}",
            if c.description.is_empty() { "(none)" } else { c.description.as_str() }
        );
        println!("Category:    {icon} {name}");
        println!("Created:     {}", c.created_at.to_rfc3339());
        println!("Updated:     {}", c.updated_at.to_rfc3339());
        Ok(())
    }

    pub async fn handle_add(&self, opts: CredentialOptions) -> Result<()> {
        // Without --service the whole entry is prompted for; otherwise only the password is.
        let interactive = opts.service.is_none();
        let service = match opts.service.clone() {
            Some(s) => s,
            None => Text::new("Service").prompt()?,
        };
        let username = match opts.user.clone() {
            Some(u) => u,
            None if interactive => Text::new("Username (optional)").with_default("").prompt()?,
            None => String::new(),
        };
        let password = if opts.generate {
            None
        } else {
            match opts.password.clone() {
                Some(p) => Some(p),
                None => Some(Password::new("Password").prompt()?),
            }
        };
        let description = match opts.description.clone() {
            Some(d) => d,
            None if interactive => Text::new("Description (optional)").with_default("").prompt()?,
            None => String::new(),
        };
        let category = opts.category.clone().unwrap_or_default();
        let length = opts.length;

        let (id, pw) = self
            .run(move |m| {
                let password = match password {
                    Some(p) => p,
                    None => m.generate_password(length)?,
                };
                let category = m
                    .find_category(&category)
                    .map(|c| c.id.clone())
                    .unwrap_or(category);
                let id = m.add_credential(CredentialInput {
                    service,
                    username,
                    password: password.clone(),
                    description,
                    category,
                })?;
                Ok((id, password))
            })
            .await?;
        if opts.generate {
            eprintln!("🔒 Generated password strength: {} ({}/6)", classify(&pw), score(&pw));
        }
        println!("{id}");
        Ok(())
    }

    pub async fn handle_edit(&self, id: &str, opts: CredentialOptions) -> Result<()> {
        let key = id.to_string();
        self.run(move |m| {
            let current = m
                .credential(&key)
                .cloned()
                .ok_or_else(|| anyhow!("entry '{}' not found", key))?;
            let password = if opts.generate {
                m.generate_password(opts.length)?
            } else {
                opts.password.unwrap_or(current.password)
            };
            let category = match opts.category {
                Some(c) => m.find_category(&c).map(|c| c.id.clone()).unwrap_or(c),
                None => current.category,
            };
            m.edit_credential(
                &key,
                CredentialInput {
                    service: opts.service.unwrap_or(current.service),
                    username: opts.user.unwrap_or(current.username),
                    password,
                    description: opts.description.unwrap_or(current.description),
                    category,
                },
            )?;
            Ok(())
        })
        .await
    }

    pub async fn handle_rm(&self, id: &str, yes: bool) -> Result<()> {
        let key = id.to_string();
        let service = self
            .run(move |m| Ok(m.credential(&key).map(|c| c.service.clone())))
            .await?;
        let Some(service) = service else {
            println!("❌ No entry found with id '{id}'");
            return Ok(());
        };

        if !yes {
            let msg = format!("Delete entry '{service}' ?");
            let proceed = Confirm::new(&msg).with_default(false).prompt()?;
            if !proceed {
                println!("❎ Deletion cancelled.");
                return Ok(());
            }
        }

        let key = id.to_string();
        let removed = self.run(move |m| Ok(m.delete_credential(&key)?)).await?;
        if !removed {
            println!("❌ No entry found with id '{id}'");
        }
        Ok(())
    }

    pub async fn handle_copy(&self, id: &str, ttl_override: Option<u64>) -> Result<()> {
        let key = id.to_string();
        let secret = self
            .run(move |m| {
                m.credential(&key)
                    .map(|c| c.password.clone())
                    .ok_or_else(|| anyhow!("entry '{}' not found", key))
            })
            .await?;

        let ttl_secs = ttl_seconds(self.config, ttl_override);
        if let Some(warn) = environment_warning() {
            eprintln!("⚠️ {warn}");
        }
        let engine = SystemClipboardEngine::new()?;
        let engine: Arc<dyn ClipboardEngine> = Arc::new(engine);
        copy_with_ttl(engine, &secret, Duration::from_secs(ttl_secs))?;
        println!("📋 Password copied ({ttl_secs}s)");
        // Keep the process alive so the restore thread can run.
        tokio::time::sleep(Duration::from_secs(ttl_secs)).await;
        Ok(())
    }

    pub async fn handle_generate(&self, length: Option<usize>) -> Result<()> {
        let pw = self.run(move |m| Ok(m.generate_password(length)?)).await?;
        println!("{pw}");
        Ok(())
    }

    pub fn handle_strength(&self, password: &str, json_mode: bool) -> Result<()> {
        let s = score(password);
        let strength = classify(password);
        if json_mode {
            println!("{}", json!({ "score": s, "strength": strength }));
        } else {
            println!("{strength} ({s}/6)");
        }
        Ok(())
    }

    pub async fn handle_stats(&self, json_mode: bool) -> Result<()> {
        let stats = self.run(|m| Ok(m.stats())).await?;
        if json_mode {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            println!("Passwords:  {}", stats.total_credentials);
            println!("Categories: {}", stats.categories_in_use);
        }
        Ok(())
    }

    pub async fn handle_category_list(&self, json_mode: bool) -> Result<()> {
        let cats = self.run(|m| Ok(m.categories().to_vec())).await?;
        if json_mode {
            println!("{}", serde_json::to_string_pretty(&cats)?);
            return Ok(());
        }
        for c in cats {
            let tag = if c.is_builtin() { " (built-in)" } else { "" };
            println!("{}\t{} {}{tag}", c.id, c.icon, c.name);
        }
        Ok(())
    }

    pub async fn handle_category_add(&self, name: String, icon: Option<String>) -> Result<()> {
        let id = self
            .run(move |m| {
                Ok(m.add_category(CategoryInput {
                    name,
                    icon: icon.unwrap_or_default(),
                })?)
            })
            .await?;
        println!("{id}");
        Ok(())
    }

    pub async fn handle_category_edit(
        &self,
        id: &str,
        name: Option<String>,
        icon: Option<String>,
    ) -> Result<()> {
        let key = id.to_string();
        self.run(move |m| {
            let current = m
                .category(&key)
                .cloned()
                .ok_or_else(|| anyhow!("category '{}' not found", key))?;
            m.edit_category(
                &key,
                CategoryInput {
                    name: name.unwrap_or(current.name),
                    icon: icon.unwrap_or(current.icon),
                },
            )?;
            Ok(())
        })
        .await
    }

    pub async fn handle_category_rm(&self, id: &str, yes: bool) -> Result<()> {
        if !yes {
            let msg = format!("Delete category '{id}' ? Its entries move to Autre.");
            let proceed = Confirm::new(&msg).with_default(false).prompt()?;
            if !proceed {
                println!("❎ Deletion cancelled.");
                return Ok(());
            }
        }
        let key = id.to_string();
        let moved = self.run(move |m| Ok(m.delete_category(&key)?)).await?;
        if moved > 0 {
            println!("↪️ {moved} entries moved to Autre");
        }
        Ok(())
    }

    pub async fn handle_theme(&self, toggle: bool) -> Result<()> {
        let dark = self
            .run(move |m| {
                if toggle {
                    Ok(m.toggle_theme()?)
                } else {
                    Ok(m.dark_mode())
                }
            })
            .await?;
        println!("{}", if dark { "dark" } else { "light" });
        Ok(())
    }
}
