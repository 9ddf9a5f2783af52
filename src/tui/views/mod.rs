pub mod category_form;
pub mod confirm;
pub mod details;
pub mod form;
pub mod list;

use crate::tui::app::{App, View};
use crate::tui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph};

pub fn render(f: &mut Frame, app: &App) {
    let theme = Theme::for_mode(app.dark_mode());
    f.render_widget(Block::default().style(theme.base_style()), f.area());
    match app.view {
        View::List => list::render_list(f, app),
        View::Details => details::render_details(f, app),
        View::CredentialForm => form::render_form(f, app),
        View::CategoryForm => category_form::render_category_form(f, app),
        View::ConfirmDelete => confirm::render_confirm(f, app),
    }
}

/// Footer line: the active toast if any, else the key hints for the view.
pub(crate) fn footer<'a>(app: &'a App, theme: &Theme, hints: &'a str) -> Paragraph<'a> {
    match app.toast_message() {
        Some(n) => Paragraph::new(format!("{} {}", n.glyph(), n.message))
            .style(theme.toast_style(n.severity)),
        None => Paragraph::new(hints).style(theme.hint_style()),
    }
}
