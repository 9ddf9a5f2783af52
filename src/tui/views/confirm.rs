use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::{App, DeleteTarget};
use crate::tui::theme::Theme;

pub fn render_confirm(f: &mut Frame, app: &App) {
    let theme = Theme::for_mode(app.dark_mode());
    let manager = app.manager();
    let text = match &app.pending_delete {
        Some(DeleteTarget::Credential(id)) => {
            let service = manager
                .credential(id)
                .map(|c| c.service.as_str())
                .unwrap_or("(none)");
            format!("Delete '{service}'? (y/N)")
        }
        Some(DeleteTarget::Category(id)) => {
            let in_use = manager.credentials().iter().filter(|c| &c.category == id).count();
            format!(
                "Delete category '{}'? {in_use} entries move to {}. (y/N)",
                manager.category_name(id),
                manager.category_name(crate::vault::models::OTHER_CATEGORY_ID)
            )
        }
        None => "Nothing to delete (Esc)".to_string(),
    };
    let para = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Confirm"))
        .style(theme.toast_style(crate::vault::notify::Severity::Warning));
    f.render_widget(para, f.area());
}
