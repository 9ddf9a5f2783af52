use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Tabs};

use crate::cryptography::strength::classify;
use crate::tui::app::{App, Mode};
use crate::tui::theme::{strength_meter, Theme};
use crate::tui::views::footer;

pub fn render_list(f: &mut Frame, app: &App) {
    let theme = Theme::for_mode(app.dark_mode());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title + stats
            Constraint::Length(1), // category tabs
            Constraint::Length(1), // search / hint
            Constraint::Min(1),    // list
            Constraint::Length(1), // footer/toast
        ])
        .split(f.area());

    let stats = app.manager().stats();
    let title = Line::from(vec![
        Span::styled("Passkeep", theme.title_style()),
        Span::styled(
            format!(
                "  {} passwords · {} categories",
                stats.total_credentials, stats.categories_in_use
            ),
            theme.muted_style(),
        ),
    ]);
    f.render_widget(Paragraph::new(title), chunks[0]);

    let tabs = Tabs::new(app.tab_titles())
        .select(app.tab_index())
        .style(theme.muted_style())
        .highlight_style(theme.selection_style());
    f.render_widget(tabs, chunks[1]);

    let search_label = match app.mode {
        Mode::Normal if app.search_term().is_empty() => {
            format!("Press / to search  |  {} items", app.visible().len())
        }
        Mode::Normal => format!("Filter: {}  |  {} items", app.search_term(), app.visible().len()),
        Mode::Search => format!("Search: {}", app.search_term()),
    };
    f.render_widget(Paragraph::new(search_label).style(theme.muted_style()), chunks[2]);

    // Passwords are never rendered here, only their strength
    let items: Vec<ListItem> = app
        .visible()
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let style = if i == app.selected {
                theme.selection_style()
            } else {
                theme.normal_style()
            };
            let strength = classify(&c.password);
            let user = if c.username.is_empty() {
                String::new()
            } else {
                format!("  ({})", c.username)
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{} {}{user}  ", app.manager().category_icon(&c.category), c.service),
                    style,
                ),
                Span::styled(
                    format!("{} {strength}", strength_meter(strength)),
                    theme.strength_style(strength),
                ),
            ]))
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Passwords"));
    f.render_widget(list, chunks[3]);

    f.render_widget(
        footer(
            app,
            &theme,
            "q=quit  Tab=category  /=search  a=add  e=edit  d=delete  c/C/x=category  t=theme",
        ),
        chunks[4],
    );
}
