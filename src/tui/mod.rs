pub mod app;
pub mod theme;
pub mod views;

use crate::config::config::Config;
use crate::filesystem::clipboard::{ttl_seconds, ClipboardEngine, SystemClipboardEngine};
use crate::vault::handlers::open_manager;
use anyhow::{anyhow, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::spawn_blocking;
use tracing::{info, warn};

use self::app::App;

pub async fn launch(config: &Config) -> Result<()> {
    // Load without blocking the async runtime
    let cfg = config.clone();
    let manager = spawn_blocking(move || open_manager(&cfg))
        .await
        .map_err(|_| anyhow!("task join error"))?;

    let mut app = App::new(manager);
    match SystemClipboardEngine::new() {
        Ok(engine) => {
            let engine: Arc<dyn ClipboardEngine> = Arc::new(engine);
            app = app.with_clipboard(engine, ttl_seconds(config, None));
        }
        Err(e) => warn!(error = %e, "clipboard unavailable"),
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    info!("tui started");

    let res = run_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::cursor::Show
    )?;
    terminal.show_cursor()?;
    info!("tui stopped");

    res
}

fn run_loop<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    while !app.should_quit {
        terminal.draw(|f| views::render(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::from_millis(0));

        if event::poll(timeout)? {
            if let Event::Key(k) = event::read()? {
                if k.kind == KeyEventKind::Press {
                    app.handle_key(k);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }
    Ok(())
}
