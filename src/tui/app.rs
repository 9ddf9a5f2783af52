use crate::cryptography::strength::{classify, Strength};
use crate::filesystem::clipboard::{copy_with_ttl, ClipboardEngine, DEFAULT_CLIPBOARD_TTL};
use crate::vault::filter::CategoryFilter;
use crate::vault::manager::PasswordManager;
use crate::vault::models::{Category, CategoryInput, Credential, CredentialInput, OTHER_CATEGORY_ID};
use crate::vault::notify::Notification;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use std::time::Duration;

/// Toast lifetime in ticks (~3s at the 200ms tick rate).
pub const TOAST_TICKS: u16 = 15;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Search,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum View {
    List,
    Details,
    CredentialForm,
    CategoryForm,
    ConfirmDelete,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormField {
    Service,
    Username,
    Password,
    Description,
    Category,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CategoryField {
    Name,
    Icon,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeleteTarget {
    Credential(String),
    Category(String),
}

#[derive(Clone, Debug)]
pub struct CredentialFormState {
    pub field: FormField,
    pub service: String,
    pub username: String,
    pub password: String,
    pub description: String,
    /// Index into the manager's category list.
    pub category: usize,
    /// Id of the credential being edited; `None` when adding.
    pub editing: Option<String>,
}

#[derive(Clone, Debug)]
pub struct CategoryFormState {
    pub field: CategoryField,
    pub name: String,
    pub icon: String,
    pub editing: Option<String>,
}

pub struct App {
    manager: PasswordManager,
    clipboard: Option<Arc<dyn ClipboardEngine>>,
    clipboard_ttl: u64,
    pub selected: usize,
    pub mode: Mode,
    pub view: View,
    pub reveal_password: bool,
    pub form: CredentialFormState,
    pub category_form: CategoryFormState,
    pub pending_delete: Option<DeleteTarget>,
    pub should_quit: bool,
    toast: Option<Notification>,
    toast_ticks: u16,
}

impl App {
    pub fn new(manager: PasswordManager) -> Self {
        let mut app = Self {
            manager,
            clipboard: None,
            clipboard_ttl: DEFAULT_CLIPBOARD_TTL,
            selected: 0,
            mode: Mode::Normal,
            view: View::List,
            reveal_password: false,
            form: CredentialFormState {
                field: FormField::Service,
                service: String::new(),
                username: String::new(),
                password: String::new(),
                description: String::new(),
                category: 0,
                editing: None,
            },
            category_form: CategoryFormState {
                field: CategoryField::Name,
                name: String::new(),
                icon: String::new(),
                editing: None,
            },
            pending_delete: None,
            should_quit: false,
            toast: None,
            toast_ticks: 0,
        };
        // Load warnings are shown as the first toast
        app.pull_notifications();
        app
    }

    pub fn with_clipboard(mut self, engine: Arc<dyn ClipboardEngine>, ttl_secs: u64) -> Self {
        self.clipboard = Some(engine);
        self.clipboard_ttl = ttl_secs;
        self
    }

    pub fn manager(&self) -> &PasswordManager {
        &self.manager
    }

    pub fn dark_mode(&self) -> bool {
        self.manager.dark_mode()
    }

    // ===== Derived state =====

    pub fn visible(&self) -> Vec<&Credential> {
        self.manager.filtered()
    }

    pub fn selected_credential(&self) -> Option<&Credential> {
        self.manager.filtered().get(self.selected).copied()
    }

    /// Tab titles: "All" then every category, built-ins first.
    pub fn tab_titles(&self) -> Vec<String> {
        let mut titles = vec!["All".to_string()];
        titles.extend(
            self.manager
                .categories()
                .iter()
                .map(|c| format!("{} {}", c.icon, c.name)),
        );
        titles
    }

    pub fn tab_index(&self) -> usize {
        match self.manager.selected_category() {
            CategoryFilter::All => 0,
            CategoryFilter::Category(id) => self
                .manager
                .categories()
                .iter()
                .position(|c| &c.id == id)
                .map(|i| i + 1)
                .unwrap_or(0),
        }
    }

    /// The category behind the current tab, if any.
    pub fn current_category(&self) -> Option<&Category> {
        match self.tab_index() {
            0 => None,
            i => self.manager.categories().get(i - 1),
        }
    }

    pub fn form_category(&self) -> Option<&Category> {
        self.manager.categories().get(self.form.category)
    }

    pub fn form_strength(&self) -> Option<Strength> {
        if self.form.password.is_empty() {
            None
        } else {
            Some(classify(&self.form.password))
        }
    }

    pub fn toast_message(&self) -> Option<&Notification> {
        self.toast.as_ref()
    }

    pub fn search_term(&self) -> &str {
        self.manager.search_term()
    }

    // ===== Timers =====

    pub fn tick(&mut self) {
        if self.toast_ticks > 0 {
            self.toast_ticks -= 1;
            if self.toast_ticks == 0 {
                self.toast = None;
            }
        }
    }

    pub fn toast(&mut self, note: Notification) {
        self.toast = Some(note);
        self.toast_ticks = TOAST_TICKS;
    }

    fn pull_notifications(&mut self) {
        // Only the newest is shown; earlier ones would be replaced within the same frame.
        if let Some(last) = self.manager.drain_notifications().pop() {
            self.toast(last);
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.manager.filtered_len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    // ===== Input =====

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.view {
            View::List => match self.mode {
                Mode::Normal => self.on_list_key(key),
                Mode::Search => self.on_search_key(key),
            },
            View::Details => self.on_details_key(key),
            View::CredentialForm => self.on_form_key(key),
            View::CategoryForm => self.on_category_form_key(key),
            View::ConfirmDelete => self.on_confirm_key(key),
        }
        self.pull_notifications();
        self.clamp_selection();
    }

    fn on_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.prev(),
            KeyCode::Tab => self.cycle_tab(1),
            KeyCode::BackTab => self.cycle_tab(-1),
            KeyCode::Char('/') => self.mode = Mode::Search,
            KeyCode::Right | KeyCode::Char('l') => {
                if self.selected_credential().is_some() {
                    self.reveal_password = false;
                    self.view = View::Details;
                }
            }
            KeyCode::Enter => self.copy_selected_password(),
            KeyCode::Char('a') => self.enter_add(),
            KeyCode::Char('e') => self.enter_edit(),
            KeyCode::Char('d') => self.enter_confirm_delete(),
            KeyCode::Char('c') => self.enter_add_category(),
            KeyCode::Char('C') => self.enter_edit_category(),
            KeyCode::Char('x') => self.enter_confirm_delete_category(),
            KeyCode::Char('t') => {
                let _ = self.manager.toggle_theme();
            }
            _ => {}
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.mode = Mode::Normal,
            KeyCode::Backspace => {
                let mut term = self.manager.search_term().to_string();
                term.pop();
                self.manager.set_search_term(&term);
            }
            KeyCode::Char(c) if !c.is_control() => {
                let mut term = self.manager.search_term().to_string();
                term.push(c);
                self.manager.set_search_term(&term);
                self.selected = 0;
            }
            _ => {}
        }
    }

    fn on_details_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => {
                self.view = View::List;
                self.reveal_password = false;
            }
            KeyCode::Char('v') => self.reveal_password = !self.reveal_password,
            KeyCode::Enter => self.copy_selected_password(),
            KeyCode::Char('e') => self.enter_edit(),
            KeyCode::Char('d') => self.enter_confirm_delete(),
            _ => {}
        }
    }

    fn on_form_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('g') = key.code {
                if let Ok(pw) = self.manager.generate_password(None) {
                    self.form.password = pw;
                }
            }
            return;
        }
        match key.code {
            KeyCode::Esc => self.view = View::List,
            KeyCode::Tab | KeyCode::Down => self.form.field = next_field(self.form.field),
            KeyCode::BackTab | KeyCode::Up => self.form.field = prev_field(self.form.field),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Left if self.form.field == FormField::Category => self.cycle_form_category(-1),
            KeyCode::Right if self.form.field == FormField::Category => self.cycle_form_category(1),
            KeyCode::Backspace => {
                if let Some(buf) = self.form_buffer() {
                    buf.pop();
                }
            }
            KeyCode::Char(c) if !c.is_control() => {
                if let Some(buf) = self.form_buffer() {
                    buf.push(c);
                }
            }
            _ => {}
        }
    }

    fn on_category_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.view = View::List,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
                self.category_form.field = match self.category_form.field {
                    CategoryField::Name => CategoryField::Icon,
                    CategoryField::Icon => CategoryField::Name,
                }
            }
            KeyCode::Enter => self.submit_category_form(),
            KeyCode::Backspace => {
                self.category_buffer().pop();
            }
            KeyCode::Char(c) if !c.is_control() => self.category_buffer().push(c),
            _ => {}
        }
    }

    fn on_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.pending_delete.take() {
                    Some(DeleteTarget::Credential(id)) => {
                        let _ = self.manager.delete_credential(&id);
                    }
                    Some(DeleteTarget::Category(id)) => {
                        let _ = self.manager.delete_category(&id);
                    }
                    None => {}
                }
                self.view = View::List;
            }
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.pending_delete = None;
                self.view = View::List;
            }
            _ => {}
        }
    }

    // ===== Actions =====

    pub fn next(&mut self) {
        let len = self.manager.filtered_len();
        if len == 0 {
            return;
        }
        self.selected = (self.selected + 1).min(len - 1);
    }

    pub fn prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn cycle_tab(&mut self, step: isize) {
        let count = self.manager.categories().len() as isize + 1;
        let next = (self.tab_index() as isize + step).rem_euclid(count) as usize;
        let filter = match next {
            0 => CategoryFilter::All,
            i => CategoryFilter::Category(self.manager.categories()[i - 1].id.clone()),
        };
        let _ = self.manager.set_category_filter(filter);
        self.selected = 0;
    }

    fn copy_selected_password(&mut self) {
        let Some(secret) = self.selected_credential().map(|c| c.password.clone()) else {
            return;
        };
        let note = match &self.clipboard {
            Some(engine) => match copy_with_ttl(
                engine.clone(),
                &secret,
                Duration::from_secs(self.clipboard_ttl),
            ) {
                Ok(()) => Notification::success(format!(
                    "Password copied ({}s)",
                    self.clipboard_ttl
                )),
                Err(e) => Notification::error(e.to_string()),
            },
            None => Notification::warning("Clipboard unavailable"),
        };
        self.toast(note);
    }

    fn category_position(&self, id: &str) -> usize {
        self.manager
            .categories()
            .iter()
            .position(|c| c.id == id)
            .unwrap_or(0)
    }

    pub fn enter_add(&mut self) {
        // New entries default to the category of the current tab
        let category = self
            .current_category()
            .map(|c| c.id.clone())
            .unwrap_or_else(|| OTHER_CATEGORY_ID.to_string());
        self.form = CredentialFormState {
            field: FormField::Service,
            service: String::new(),
            username: String::new(),
            password: String::new(),
            description: String::new(),
            category: self.category_position(&category),
            editing: None,
        };
        self.view = View::CredentialForm;
    }

    pub fn enter_edit(&mut self) {
        let Some(c) = self.selected_credential().cloned() else {
            return;
        };
        self.form = CredentialFormState {
            field: FormField::Service,
            service: c.service,
            username: c.username,
            password: c.password,
            description: c.description,
            category: self.category_position(&c.category),
            editing: Some(c.id),
        };
        self.view = View::CredentialForm;
    }

    fn enter_confirm_delete(&mut self) {
        if let Some(id) = self.selected_credential().map(|c| c.id.clone()) {
            self.pending_delete = Some(DeleteTarget::Credential(id));
            self.view = View::ConfirmDelete;
        }
    }

    pub fn enter_add_category(&mut self) {
        self.category_form = CategoryFormState {
            field: CategoryField::Name,
            name: String::new(),
            icon: String::new(),
            editing: None,
        };
        self.view = View::CategoryForm;
    }

    fn enter_edit_category(&mut self) {
        match self.current_category().cloned() {
            Some(c) if !c.is_builtin() => {
                self.category_form = CategoryFormState {
                    field: CategoryField::Name,
                    name: c.name,
                    icon: c.icon,
                    editing: Some(c.id),
                };
                self.view = View::CategoryForm;
            }
            Some(_) => self.toast(Notification::warning("Built-in categories cannot be edited")),
            None => {}
        }
    }

    fn enter_confirm_delete_category(&mut self) {
        match self.current_category().cloned() {
            Some(c) if !c.is_builtin() => {
                self.pending_delete = Some(DeleteTarget::Category(c.id));
                self.view = View::ConfirmDelete;
            }
            Some(_) => self.toast(Notification::warning("Built-in categories cannot be deleted")),
            None => {}
        }
    }

    fn cycle_form_category(&mut self, step: isize) {
        let count = self.manager.categories().len() as isize;
        if count == 0 {
            return;
        }
        self.form.category = (self.form.category as isize + step).rem_euclid(count) as usize;
    }

    fn form_buffer(&mut self) -> Option<&mut String> {
        match self.form.field {
            FormField::Service => Some(&mut self.form.service),
            FormField::Username => Some(&mut self.form.username),
            FormField::Password => Some(&mut self.form.password),
            FormField::Description => Some(&mut self.form.description),
            FormField::Category => None,
        }
    }

    fn category_buffer(&mut self) -> &mut String {
        match self.category_form.field {
            CategoryField::Name => &mut self.category_form.name,
            CategoryField::Icon => &mut self.category_form.icon,
        }
    }

    fn submit_form(&mut self) {
        let input = CredentialInput {
            service: self.form.service.clone(),
            username: self.form.username.clone(),
            password: self.form.password.clone(),
            description: self.form.description.clone(),
            category: self
                .form_category()
                .map(|c| c.id.clone())
                .unwrap_or_default(),
        };
        let result = match self.form.editing.clone() {
            Some(id) => self.manager.edit_credential(&id, input),
            None => self.manager.add_credential(input).map(|_| ()),
        };
        // On failure the form stays open with its contents
        if result.is_ok() {
            self.view = View::List;
        }
    }

    fn submit_category_form(&mut self) {
        let input = CategoryInput {
            name: self.category_form.name.clone(),
            icon: self.category_form.icon.clone(),
        };
        let result = match self.category_form.editing.clone() {
            Some(id) => self.manager.edit_category(&id, input),
            None => self.manager.add_category(input).map(|_| ()),
        };
        if result.is_ok() {
            self.view = View::List;
        }
    }
}

fn next_field(f: FormField) -> FormField {
    match f {
        FormField::Service => FormField::Username,
        FormField::Username => FormField::Password,
        FormField::Password => FormField::Description,
        FormField::Description => FormField::Category,
        FormField::Category => FormField::Service,
    }
}

fn prev_field(f: FormField) -> FormField {
    match f {
        FormField::Service => FormField::Category,
        FormField::Username => FormField::Service,
        FormField::Password => FormField::Username,
        FormField::Description => FormField::Password,
        FormField::Category => FormField::Description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cryptography::generator::{PasswordGenerator, SystemRng};
    use crate::filesystem::memory::MemoryKeyValueStore;
    use crate::vault::codec::JsonCodec;
    use crate::vault::store::Store;

    fn app() -> App {
        let rng = Arc::new(SystemRng);
        let store = Store::new(
            Arc::new(MemoryKeyValueStore::default()),
            Arc::new(JsonCodec),
            rng.clone(),
        );
        App::new(PasswordManager::open(store, PasswordGenerator::new(rng)))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn form_fields_cycle() {
        let mut f = FormField::Service;
        for _ in 0..5 {
            f = next_field(f);
        }
        assert_eq!(f, FormField::Service);
        assert_eq!(prev_field(FormField::Service), FormField::Category);
    }

    #[test]
    fn add_through_form_then_search() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('a')));
        assert_eq!(app.view, View::CredentialForm);
        type_str(&mut app, "GitHub");
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(KeyEvent::new(KeyCode::Char('g'), KeyModifiers::CONTROL));
        assert_eq!(app.form.password.chars().count(), 16);
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.view, View::List);
        assert_eq!(app.visible().len(), 1);
        assert_eq!(app.toast_message().unwrap().message, "Password added");

        app.handle_key(key(KeyCode::Char('/')));
        type_str(&mut app, "zzz");
        assert!(app.visible().is_empty());
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn invalid_form_stays_open() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('a')));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.view, View::CredentialForm);
        assert!(app.toast_message().is_some());
        assert!(app.visible().is_empty());
    }

    #[test]
    fn toast_expires_after_ticks() {
        let mut app = app();
        app.toast(Notification::success("hi"));
        for _ in 0..TOAST_TICKS {
            app.tick();
        }
        assert!(app.toast_message().is_none());
    }
}
