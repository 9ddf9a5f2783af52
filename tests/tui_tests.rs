use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use std::sync::{Arc, Mutex};

use passkeep::cryptography::generator::{PasswordGenerator, SystemRng};
use passkeep::filesystem::clipboard::ClipboardEngine;
use passkeep::filesystem::memory::MemoryKeyValueStore;
use passkeep::tui::app::{App, DeleteTarget, View};
use passkeep::tui::views::render;
use passkeep::vault::codec::JsonCodec;
use passkeep::vault::manager::PasswordManager;
use passkeep::vault::models::{CategoryInput, CredentialInput, OTHER_CATEGORY_ID};
use passkeep::vault::store::Store;

fn manager(kv: &MemoryKeyValueStore) -> PasswordManager {
    let rng = Arc::new(SystemRng);
    let store = Store::new(Arc::new(kv.clone()), Arc::new(JsonCodec), rng.clone());
    PasswordManager::open(store, PasswordGenerator::new(rng))
}

fn seeded() -> (MemoryKeyValueStore, App) {
    let kv = MemoryKeyValueStore::new();
    let mut m = manager(&kv);
    let gaming = m
        .add_category(CategoryInput {
            name: "Gaming".into(),
            icon: "🎮".into(),
        })
        .unwrap();
    for (service, pw, cat) in [
        ("alpha", "secret123", OTHER_CATEGORY_ID),
        ("beta", "Topsecret!99x", gaming.as_str()),
    ] {
        m.add_credential(CredentialInput {
            service: service.into(),
            username: "user".into(),
            password: pw.into(),
            description: String::new(),
            category: cat.into(),
        })
        .unwrap();
    }
    m.drain_notifications();
    (kv, App::new(m))
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn draw(app: &App) -> String {
    let backend = TestBackend::new(90, 14);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|f| render(f, app)).unwrap();
    let buf = terminal.backend().buffer().clone();
    let mut all = String::new();
    for y in 0..buf.area.height {
        for x in 0..buf.area.width {
            let cell = buf.cell((x, y)).unwrap();
            all.push_str(cell.symbol());
        }
        all.push('\n');
    }
    all
}

#[test]
fn list_renders_services_tabs_and_never_secrets() {
    let (_kv, app) = seeded();
    let screen = draw(&app);
    assert!(screen.contains("alpha"));
    assert!(screen.contains("beta"));
    assert!(screen.contains("All"));
    assert!(screen.contains("Gaming"));
    assert!(screen.contains("strong"));
    assert!(!screen.contains("secret123"));
    assert!(!screen.contains("Topsecret"));
}

#[test]
fn tab_switch_filters_by_category() {
    let (_kv, mut app) = seeded();
    // All -> Autre -> Gaming
    app.handle_key(key(KeyCode::Tab));
    assert_eq!(app.visible().len(), 1);
    assert_eq!(app.visible()[0].service, "alpha");
    app.handle_key(key(KeyCode::Tab));
    assert_eq!(app.visible()[0].service, "beta");
    app.handle_key(key(KeyCode::Tab));
    assert_eq!(app.tab_index(), 0);
    assert_eq!(app.visible().len(), 2);
}

#[test]
fn details_masks_until_revealed() {
    let (_kv, mut app) = seeded();
    app.handle_key(key(KeyCode::Enter)); // no clipboard in tests: warning toast
    app.handle_key(key(KeyCode::Right));
    assert_eq!(app.view, View::Details);
    let masked = draw(&app);
    assert!(masked.contains("********"));
    assert!(!masked.contains("secret123"));

    app.handle_key(key(KeyCode::Char('v')));
    assert!(draw(&app).contains("secret123"));

    app.handle_key(key(KeyCode::Char('q')));
    assert_eq!(app.view, View::List);
    assert!(!app.reveal_password);
}

#[test]
fn form_shows_live_strength_and_saves_edit() {
    let (kv, mut app) = seeded();
    app.handle_key(key(KeyCode::Char('e')));
    assert_eq!(app.view, View::CredentialForm);
    assert_eq!(app.form.editing.as_deref(), Some(app.visible()[0].id.as_str()));
    let screen = draw(&app);
    assert!(screen.contains("Edit Password"));
    assert!(screen.contains("Strength"));

    // Append to the service name and save
    app.handle_key(key(KeyCode::Char('!')));
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.view, View::List);
    assert_eq!(app.visible()[0].service, "alpha!");
    assert!(manager(&kv).credentials().iter().any(|c| c.service == "alpha!"));
}

#[test]
fn category_form_and_delete_cascade() {
    let (kv, mut app) = seeded();
    app.handle_key(key(KeyCode::Char('c')));
    assert_eq!(app.view, View::CategoryForm);
    for ch in "Travel".chars() {
        app.handle_key(key(KeyCode::Char(ch)));
    }
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.view, View::List);
    assert!(app.tab_titles().iter().any(|t| t.ends_with("Travel")));

    // Jump to the Gaming tab and delete it
    app.handle_key(key(KeyCode::Tab));
    app.handle_key(key(KeyCode::Tab));
    assert_eq!(app.current_category().unwrap().name, "Gaming");
    app.handle_key(key(KeyCode::Char('x')));
    assert_eq!(app.view, View::ConfirmDelete);
    assert!(matches!(app.pending_delete, Some(DeleteTarget::Category(_))));
    assert!(draw(&app).contains("move to Autre"));
    app.handle_key(key(KeyCode::Char('y')));

    assert_eq!(app.view, View::List);
    assert_eq!(app.tab_index(), 0);
    let reopened = manager(&kv);
    assert!(reopened.categories().iter().all(|c| c.name != "Gaming"));
    assert!(reopened
        .credentials()
        .iter()
        .all(|c| c.category == OTHER_CATEGORY_ID));
}

#[test]
fn builtin_tab_cannot_be_deleted() {
    let (_kv, mut app) = seeded();
    app.handle_key(key(KeyCode::Tab));
    app.handle_key(key(KeyCode::Char('x')));
    assert_eq!(app.view, View::List);
    assert!(app.toast_message().is_some());
}

#[test]
fn delete_credential_after_confirm() {
    let (_kv, mut app) = seeded();
    app.handle_key(key(KeyCode::Char('d')));
    app.handle_key(key(KeyCode::Char('n')));
    assert_eq!(app.visible().len(), 2);
    app.handle_key(key(KeyCode::Char('d')));
    app.handle_key(key(KeyCode::Char('y')));
    assert_eq!(app.visible().len(), 1);
    assert_eq!(app.toast_message().unwrap().message, "Password deleted");
}

#[test]
fn theme_toggle_switches_palette() {
    let (_kv, mut app) = seeded();
    assert!(app.dark_mode());
    app.handle_key(key(KeyCode::Char('t')));
    assert!(!app.dark_mode());
    // Still renders in light mode
    assert!(draw(&app).contains("Passkeep"));
}

#[derive(Default)]
struct FakeClipboard {
    contents: Mutex<Option<String>>,
}

impl ClipboardEngine for FakeClipboard {
    fn get_contents(&self) -> anyhow::Result<Option<String>> {
        Ok(self.contents.lock().unwrap().clone())
    }
    fn set_contents(&self, contents: &str) -> anyhow::Result<()> {
        *self.contents.lock().unwrap() = Some(contents.to_string());
        Ok(())
    }
}

#[test]
fn enter_copies_selected_password() {
    let (_kv, app) = seeded();
    let clip = Arc::new(FakeClipboard::default());
    let mut app = app.with_clipboard(clip.clone(), 30);
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(clip.get_contents().unwrap().as_deref(), Some("secret123"));
    assert!(app.toast_message().unwrap().message.contains("30s"));
}
