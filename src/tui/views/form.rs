use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::{App, FormField};
use crate::tui::theme::{strength_meter, Theme};
use crate::tui::views::footer;

pub(crate) fn field_line<'a>(
    label: &str,
    value: &str,
    focused: bool,
    theme: &Theme,
) -> Paragraph<'a> {
    let marker = if focused { "›" } else { " " };
    let style = if focused {
        theme.selection_style()
    } else {
        theme.normal_style()
    };
    Paragraph::new(format!("{marker} {label}: {value}")).style(style)
}

pub fn render_form(f: &mut Frame, app: &App) {
    let theme = Theme::for_mode(app.dark_mode());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Min(1),    // form
            Constraint::Length(1), // footer
        ])
        .split(f.area());

    let title = if app.form.editing.is_some() {
        "Passkeep · Edit Password"
    } else {
        "Passkeep · Add Password"
    };
    f.render_widget(Paragraph::new(title).style(theme.title_style()), chunks[0]);

    let block = Block::default().borders(Borders::ALL).title("Form");
    let inner_area = block.inner(chunks[1]);
    f.render_widget(block, chunks[1]);

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner_area);

    let form = &app.form;
    let focused = |field: FormField| form.field == field;
    let category = app
        .form_category()
        .map(|c| format!("‹ {} {} ›", c.icon, c.name))
        .unwrap_or_default();

    f.render_widget(
        field_line("Service*", &form.service, focused(FormField::Service), &theme),
        inner[0],
    );
    f.render_widget(
        field_line("Username", &form.username, focused(FormField::Username), &theme),
        inner[1],
    );
    // The password is shown while typing, as in the details view with reveal on.
    f.render_widget(
        field_line("Password*", &form.password, focused(FormField::Password), &theme),
        inner[2],
    );

    let strength_line = match app.form_strength() {
        Some(s) => Paragraph::new(format!("  Strength: {} {s}", strength_meter(s)))
            .style(theme.strength_style(s)),
        None => Paragraph::new("  Strength: -").style(theme.muted_style()),
    };
    f.render_widget(strength_line, inner[3]);
    f.render_widget(
        field_line("Description", &form.description, focused(FormField::Description), &theme),
        inner[4],
    );
    f.render_widget(
        field_line("Category", &category, focused(FormField::Category), &theme),
        inner[5],
    );

    f.render_widget(
        footer(
            app,
            &theme,
            "Esc=cancel  Tab=next field  ←/→=category  Ctrl-G=generate  Enter=save",
        ),
        chunks[2],
    );
}
