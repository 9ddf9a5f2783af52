use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::cryptography::strength::classify;
use crate::tui::app::App;
use crate::tui::theme::{strength_meter, Theme};
use crate::tui::views::footer;

pub fn render_details(f: &mut Frame, app: &App) {
    let theme = Theme::for_mode(app.dark_mode());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Min(1),    // details
            Constraint::Length(1), // footer
        ])
        .split(f.area());

    f.render_widget(
        Paragraph::new("Passkeep · Details").style(theme.title_style()),
        chunks[0],
    );

    let Some(c) = app.selected_credential() else {
        f.render_widget(Paragraph::new("(none)").style(theme.muted_style()), chunks[1]);
        return;
    };

    let or_none = |s: &str| if s.is_empty() { "(none)".to_string() } else { s.to_string() };
    let password = if app.reveal_password {
        c.password.clone()
    } else {
        "********".to_string()
    };
    let strength = classify(&c.password);
    let manager = app.manager();

    let body = vec![
        Line::from(format!("Service:     {}", c.service)),
        Line::from(format!("Username:    {}", or_none(&c.username))),
        Line::from(format!("Password:    {password}")),
        Line::from(Span::styled(
            format!("Strength:    {} {strength}", strength_meter(strength)),
            theme.strength_style(strength),
        )),
        Line::from(format!("Description: {}", or_none(&c.description))),
        Line::from(format!(
            "Category:    {} {}",
            manager.category_icon(&c.category),
            manager.category_name(&c.category)
        )),
        Line::from(Span::styled(
            format!("Created:     {}", c.created_at.format("%Y-%m-%d %H:%M")),
            theme.muted_style(),
        )),
        Line::from(Span::styled(
            format!("Updated:     {}", c.updated_at.format("%Y-%m-%d %H:%M")),
            theme.muted_style(),
        )),
    ];
    let para = Paragraph::new(body)
        .block(Block::default().borders(Borders::ALL).title("Entry"))
        .style(theme.normal_style())
        .wrap(Wrap { trim: false });
    f.render_widget(para, chunks[1]);

    f.render_widget(
        footer(app, &theme, "q=back  Enter=copy password  v=toggle password  e=edit  d=delete"),
        chunks[2],
    );
}
