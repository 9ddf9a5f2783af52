use passkeep::cryptography::generator::{PasswordGenerator, SystemRng, ALPHABET};
use passkeep::cryptography::strength::Strength;
use passkeep::filesystem::memory::MemoryKeyValueStore;
use passkeep::vault::codec::JsonCodec;
use passkeep::vault::errors::{PersistenceError, ValidationError, VaultError};
use passkeep::vault::filter::CategoryFilter;
use passkeep::vault::manager::PasswordManager;
use passkeep::vault::models::{CategoryInput, CredentialInput, OTHER_CATEGORY_ID};
use passkeep::vault::notify::Severity;
use passkeep::vault::ports::{KeyValueStore, CUSTOM_CATEGORIES_KEY, PASSWORDS_KEY};
use passkeep::vault::store::Store;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn open(kv: &MemoryKeyValueStore) -> PasswordManager {
    let rng = Arc::new(SystemRng);
    let store = Store::new(Arc::new(kv.clone()), Arc::new(JsonCodec), rng.clone());
    PasswordManager::open(store, PasswordGenerator::new(rng))
}

fn entry(service: &str, category: &str) -> CredentialInput {
    CredentialInput {
        service: service.into(),
        username: "me@example.com".into(),
        password: "Password1".into(),
        description: String::new(),
        category: category.into(),
    }
}

#[test]
fn add_edit_delete_round_trip_through_storage() {
    let kv = MemoryKeyValueStore::new();
    let mut m = open(&kv);

    let id = m.add_credential(entry("GitHub", "")).unwrap();
    assert_eq!(m.credentials().len(), 1);
    assert_eq!(m.credential(&id).unwrap().category, OTHER_CATEGORY_ID);

    let mut changed = entry("GitHub Enterprise", "");
    changed.password = "n3w-Passw0rd!".into();
    m.edit_credential(&id, changed).unwrap();
    let c = m.credential(&id).unwrap();
    assert_eq!(c.service, "GitHub Enterprise");
    assert!(c.updated_at >= c.created_at);

    // A fresh manager over the same storage sees the edit
    let reopened = open(&kv);
    assert_eq!(reopened.credentials(), m.credentials());

    assert!(m.delete_credential(&id).unwrap());
    assert!(open(&kv).credentials().is_empty());
}

#[test]
fn insertion_order_survives_reload() {
    let kv = MemoryKeyValueStore::new();
    let mut m = open(&kv);
    for s in ["b", "a", "c"] {
        m.add_credential(entry(s, "")).unwrap();
    }
    let services: Vec<String> = open(&kv)
        .credentials()
        .iter()
        .map(|c| c.service.clone())
        .collect();
    assert_eq!(services, vec!["b", "a", "c"]);
}

#[test]
fn gaming_category_scenario() {
    let kv = MemoryKeyValueStore::new();
    let mut m = open(&kv);
    let gaming = m
        .add_category(CategoryInput {
            name: "Gaming".into(),
            icon: "🎮".into(),
        })
        .unwrap();
    assert!(!gaming.is_empty());
    assert!(m.categories().iter().any(|c| c.id == gaming && c.name == "Gaming"));

    m.add_credential(entry("Steam", &gaming)).unwrap();

    m.set_category_filter(CategoryFilter::Category(gaming.clone()))
        .unwrap();
    assert_eq!(m.filtered_len(), 1);
    m.set_category_filter(CategoryFilter::Category(OTHER_CATEGORY_ID.into()))
        .unwrap();
    assert_eq!(m.filtered_len(), 0);
}

#[test]
fn deleting_category_moves_entries_to_other() {
    let kv = MemoryKeyValueStore::new();
    let mut m = open(&kv);
    let work = m
        .add_category(CategoryInput {
            name: "Work".into(),
            icon: "💼".into(),
        })
        .unwrap();
    m.add_credential(entry("Jira", &work)).unwrap();
    m.add_credential(entry("Slack", &work)).unwrap();
    m.add_credential(entry("Bank", "")).unwrap();
    m.set_category_filter(CategoryFilter::Category(work.clone()))
        .unwrap();

    assert_eq!(m.delete_category(&work).unwrap(), 2);
    assert!(m.credentials().iter().all(|c| c.category != work));
    assert!(m
        .credentials()
        .iter()
        .all(|c| c.category == OTHER_CATEGORY_ID));
    assert!(m.category(&work).is_none());
    // The tab for the deleted category falls back to all
    assert_eq!(m.selected_category(), &CategoryFilter::All);

    let reopened = open(&kv);
    assert!(reopened.category(&work).is_none());
    assert!(reopened
        .credentials()
        .iter()
        .all(|c| c.category == OTHER_CATEGORY_ID));
}

#[test]
fn builtin_category_is_protected() {
    let kv = MemoryKeyValueStore::new();
    let mut m = open(&kv);
    let err = m.delete_category(OTHER_CATEGORY_ID).unwrap_err();
    assert_eq!(err, VaultError::ProtectedCategory(OTHER_CATEGORY_ID.into()));
    let err = m
        .edit_category(
            OTHER_CATEGORY_ID,
            CategoryInput {
                name: "Misc".into(),
                icon: "📦".into(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, VaultError::ProtectedCategory(_)));
    assert_eq!(m.category_name(OTHER_CATEGORY_ID), "Autre");
    // Built-ins are never written out
    assert!(kv.raw(CUSTOM_CATEGORIES_KEY).is_none());
}

#[test]
fn editing_unknown_id_is_an_error_and_creates_nothing() {
    let kv = MemoryKeyValueStore::new();
    let mut m = open(&kv);
    let err = m.edit_credential("nope", entry("X", "")).unwrap_err();
    assert_eq!(err, VaultError::UnknownCredential("nope".into()));
    assert!(m.credentials().is_empty());
    let notes = m.drain_notifications();
    assert_eq!(notes.last().unwrap().severity, Severity::Error);
}

#[test]
fn deleting_unknown_id_is_a_no_op() {
    let kv = MemoryKeyValueStore::new();
    let mut m = open(&kv);
    m.add_credential(entry("Mail", "")).unwrap();
    let before = kv.raw(PASSWORDS_KEY);
    assert!(!m.delete_credential("missing").unwrap());
    assert_eq!(m.credentials().len(), 1);
    assert_eq!(kv.raw(PASSWORDS_KEY), before);
}

#[test]
fn validation_failures_leave_state_untouched() {
    let kv = MemoryKeyValueStore::new();
    let mut m = open(&kv);

    let mut no_service = entry("   ", "");
    no_service.service = "   ".into();
    assert_eq!(
        m.add_credential(no_service).unwrap_err(),
        VaultError::Validation(ValidationError::MissingService)
    );
    let mut no_password = entry("Mail", "");
    no_password.password.clear();
    assert_eq!(
        m.add_credential(no_password).unwrap_err(),
        VaultError::Validation(ValidationError::MissingPassword)
    );
    assert!(matches!(
        m.add_category(CategoryInput {
            name: "Bad".into(),
            icon: "xx".into()
        }),
        Err(VaultError::Validation(ValidationError::InvalidIcon(_)))
    ));
    assert!(m.credentials().is_empty());
    assert_eq!(m.categories().len(), 1);
    assert!(kv.raw(PASSWORDS_KEY).is_none());
}

#[test]
fn failed_write_keeps_previous_state() {
    let kv = MemoryKeyValueStore::new();
    let mut m = open(&kv);
    let id = m.add_credential(entry("Mail", "")).unwrap();
    let cat = m
        .add_category(CategoryInput {
            name: "Travel".into(),
            icon: "✈️".into(),
        })
        .unwrap();

    kv.fail_writes(true);
    let err = m.add_credential(entry("Bank", "")).unwrap_err();
    assert!(matches!(
        err,
        VaultError::Persistence(PersistenceError::Write { .. })
    ));
    assert!(m.delete_credential(&id).is_err());
    assert!(m.delete_category(&cat).is_err());
    assert!(m.toggle_theme().is_err());
    assert_eq!(m.credentials().len(), 1);
    assert!(m.category(&cat).is_some());
    assert!(m.dark_mode());

    kv.fail_writes(false);
    m.add_credential(entry("Bank", "")).unwrap();
    assert_eq!(m.credentials().len(), 2);
}

#[test]
fn corrupt_storage_falls_back_to_empty_with_warning() {
    let kv = MemoryKeyValueStore::new();
    kv.insert_raw(PASSWORDS_KEY, b"{not json");
    let mut m = open(&kv);
    assert!(m.credentials().is_empty());
    let notes = m.drain_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].severity, Severity::Warning);
    // The manager stays usable
    m.add_credential(entry("Mail", "")).unwrap();
}

const LEGACY_ENTRY: &[u8] = br#"[{"id":"1","service":"Old","username":"","password":"p",
    "description":"","category":"social",
    "createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"}]"#;

#[test]
fn unresolved_category_is_displayed_as_other_but_kept() {
    let kv = MemoryKeyValueStore::new();
    kv.insert_raw(PASSWORDS_KEY, LEGACY_ENTRY);
    let mut m = open(&kv);
    let old = m.credentials()[0].clone();
    assert_eq!(old.category, "social");
    assert_eq!(m.category_name(&old.category), "Autre");
    assert_eq!(m.category_icon(&old.category), "📝");
    assert!(m.drain_notifications().is_empty());

    m.add_credential(entry("Mail", "")).unwrap();
    let reopened = open(&kv);
    assert_eq!(reopened.credential("1").unwrap().category, "social");
}

#[test]
fn unreadable_categories_do_not_cost_credentials_their_category() {
    let kv = MemoryKeyValueStore::new();
    let mut m = open(&kv);
    let work = m
        .add_category(CategoryInput {
            name: "Work".into(),
            icon: "💼".into(),
        })
        .unwrap();
    let git = m.add_credential(entry("Git", &work)).unwrap();
    let good_categories = kv.raw(CUSTOM_CATEGORIES_KEY).unwrap();

    kv.insert_raw(CUSTOM_CATEGORIES_KEY, b"{oops");
    let mut degraded = open(&kv);
    assert_eq!(degraded.category_name(&work), "Autre");
    degraded.add_credential(entry("Mail", "")).unwrap();

    kv.insert_raw(CUSTOM_CATEGORIES_KEY, &good_categories);
    let recovered = open(&kv);
    assert_eq!(recovered.credential(&git).unwrap().category, work);
    assert_eq!(recovered.category_name(&work), "Work");
}

#[test]
fn unknown_category_on_add_resolves_to_other() {
    let kv = MemoryKeyValueStore::new();
    let mut m = open(&kv);
    let id = m.add_credential(entry("Mail", "does-not-exist")).unwrap();
    assert_eq!(m.credential(&id).unwrap().category, OTHER_CATEGORY_ID);
}

#[test]
fn search_and_category_filter_compose() {
    let kv = MemoryKeyValueStore::new();
    let mut m = open(&kv);
    let social = m
        .add_category(CategoryInput {
            name: "Social".into(),
            icon: "💬".into(),
        })
        .unwrap();
    m.add_credential(entry("Mastodon", &social)).unwrap();
    m.add_credential(entry("Matrix", "")).unwrap();
    m.add_credential(entry("Bank", &social)).unwrap();

    m.set_search_term("MA");
    assert_eq!(m.filtered_len(), 2);
    m.set_category_filter(CategoryFilter::Category(social)).unwrap();
    let names: Vec<&str> = m.filtered().iter().map(|c| c.service.as_str()).collect();
    assert_eq!(names, vec!["Mastodon"]);

    assert!(m
        .set_category_filter(CategoryFilter::Category("ghost".into()))
        .is_err());
}

#[test]
fn stats_count_distinct_categories_in_use() {
    let kv = MemoryKeyValueStore::new();
    let mut m = open(&kv);
    let fun = m
        .add_category(CategoryInput {
            name: "Fun".into(),
            icon: "".into(),
        })
        .unwrap();
    assert_eq!(m.category_icon(&fun), "📝");
    m.add_credential(entry("A", "")).unwrap();
    m.add_credential(entry("B", "")).unwrap();
    m.add_credential(entry("C", &fun)).unwrap();
    let stats = m.stats();
    assert_eq!(stats.total_credentials, 3);
    assert_eq!(stats.categories_in_use, 2);
}

#[test]
fn generate_and_score_helpers() {
    let kv = MemoryKeyValueStore::new();
    let mut m = open(&kv).with_generator_length(24);
    let pw = m.generate_password(None).unwrap();
    assert_eq!(pw.len(), 24);
    assert!(pw.bytes().all(|b| ALPHABET.contains(&b)));
    assert_eq!(m.generate_password(Some(16)).unwrap().len(), 16);
    assert_eq!(m.score_password("Password1"), Strength::Medium);
}

#[test]
fn theme_toggle_persists() {
    let kv = MemoryKeyValueStore::new();
    let mut m = open(&kv);
    assert!(m.dark_mode());
    assert!(!m.toggle_theme().unwrap());
    assert!(!open(&kv).dark_mode());
}

#[test]
fn category_delete_with_failed_entry_write_changes_nothing() {
    let kv = MemoryKeyValueStore::new();
    let mut m = open(&kv);
    let work = m
        .add_category(CategoryInput {
            name: "Work".into(),
            icon: "💼".into(),
        })
        .unwrap();
    let jira = m.add_credential(entry("Jira", &work)).unwrap();
    let stored_categories = kv.raw(CUSTOM_CATEGORIES_KEY).unwrap();
    let stored_credentials = kv.raw(PASSWORDS_KEY).unwrap();
    m.drain_notifications();

    kv.fail_writes_for(PASSWORDS_KEY, true);
    let err = m.delete_category(&work).unwrap_err();
    assert!(matches!(
        err,
        VaultError::Persistence(PersistenceError::Write { .. })
    ));
    assert!(m.category(&work).is_some());
    assert_eq!(m.credential(&jira).unwrap().category, work);
    assert_eq!(kv.raw(CUSTOM_CATEGORIES_KEY).unwrap(), stored_categories);
    assert_eq!(kv.raw(PASSWORDS_KEY).unwrap(), stored_credentials);
    let notes = m.drain_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].severity, Severity::Error);

    kv.fail_writes_for(PASSWORDS_KEY, false);
    assert_eq!(m.delete_category(&work).unwrap(), 1);
}

/// Lets the first `allowed` category writes through, then refuses them; entry writes always fail.
struct FlakyCategories {
    inner: MemoryKeyValueStore,
    allowed: AtomicUsize,
}

impl KeyValueStore for FlakyCategories {
    fn get(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, bytes: &[u8]) -> anyhow::Result<()> {
        let blocked = key == PASSWORDS_KEY
            || (key == CUSTOM_CATEGORIES_KEY
                && self
                    .allowed
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                    .is_err());
        if blocked {
            anyhow::bail!("disk full");
        }
        self.inner.set(key, bytes)
    }
}

#[test]
fn failed_category_restore_is_reported() {
    let kv = MemoryKeyValueStore::new();
    let work = {
        let mut m = open(&kv);
        let work = m
            .add_category(CategoryInput {
                name: "Work".into(),
                icon: "💼".into(),
            })
            .unwrap();
        m.add_credential(entry("Jira", &work)).unwrap();
        work
    };

    let flaky = FlakyCategories {
        inner: kv.clone(),
        allowed: AtomicUsize::new(1),
    };
    let rng = Arc::new(SystemRng);
    let store = Store::new(Arc::new(flaky), Arc::new(JsonCodec), rng.clone());
    let mut m = PasswordManager::open(store, PasswordGenerator::new(rng));

    assert!(m.delete_category(&work).is_err());
    assert!(m.category(&work).is_some());
    let notes = m.drain_notifications();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].severity, Severity::Warning);
    assert!(notes[0].message.contains("no longer matches"));
    assert_eq!(notes[1].severity, Severity::Error);
}
