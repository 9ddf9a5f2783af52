use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::{App, CategoryField};
use crate::tui::theme::Theme;
use crate::tui::views::footer;
use crate::tui::views::form::field_line;

pub fn render_category_form(f: &mut Frame, app: &App) {
    let theme = Theme::for_mode(app.dark_mode());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    let title = if app.category_form.editing.is_some() {
        "Passkeep · Edit Category"
    } else {
        "Passkeep · New Category"
    };
    f.render_widget(Paragraph::new(title).style(theme.title_style()), chunks[0]);

    let block = Block::default().borders(Borders::ALL).title("Category");
    let inner_area = block.inner(chunks[1]);
    f.render_widget(block, chunks[1]);
    let inner = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(inner_area);

    let form = &app.category_form;
    f.render_widget(
        field_line("Name*", &form.name, form.field == CategoryField::Name, &theme),
        inner[0],
    );
    f.render_widget(
        field_line(
            "Icon (emoji, default 📝)",
            &form.icon,
            form.field == CategoryField::Icon,
            &theme,
        ),
        inner[1],
    );

    f.render_widget(footer(app, &theme, "Esc=cancel  Tab=switch  Enter=save"), chunks[2]);
}
