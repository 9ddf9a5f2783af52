use crate::config::config::Config;
use anyhow::{anyhow, Context, Result};
use copypasta::{ClipboardContext, ClipboardProvider};
use std::env;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_CLIPBOARD_TTL: u64 = 20;

/// Where copied passwords go. The TUI and `copy` share one engine; tests swap in a fake.
pub trait ClipboardEngine: Send + Sync + 'static {
    /// `None` when the clipboard is empty or holds something that is not text.
    fn get_contents(&self) -> Result<Option<String>>;
    fn set_contents(&self, contents: &str) -> Result<()>;
}

/// The desktop clipboard through `copypasta`.
pub struct SystemClipboardEngine {
    ctx: Mutex<ClipboardContext>,
}

impl SystemClipboardEngine {
    pub fn new() -> Result<Self> {
        let ctx = ClipboardContext::new().map_err(|e| anyhow!("clipboard unavailable: {e}"))?;
        Ok(Self {
            ctx: Mutex::new(ctx),
        })
    }

    fn context(&self) -> Result<MutexGuard<'_, ClipboardContext>> {
        self.ctx
            .lock()
            .map_err(|_| anyhow!("clipboard handle poisoned"))
    }
}

impl ClipboardEngine for SystemClipboardEngine {
    fn get_contents(&self) -> Result<Option<String>> {
        Ok(self.context()?.get_contents().ok())
    }

    fn set_contents(&self, contents: &str) -> Result<()> {
        self.context()?
            .set_contents(contents.to_owned())
            .map_err(|e| anyhow!("could not write the clipboard: {e}"))
    }
}

/// Put `password` on the clipboard, then after `ttl` put back whatever was there before.
///
/// The restore is skipped when the clipboard no longer holds `password`, so a newer copy made
/// by the user survives.
pub fn copy_with_ttl(
    engine: Arc<dyn ClipboardEngine>,
    password: &str,
    ttl: Duration,
) -> Result<()> {
    let previous = engine
        .get_contents()
        .context("reading the clipboard before copy")?;
    engine.set_contents(password)?;

    let copied = password.to_owned();
    thread::spawn(move || {
        thread::sleep(ttl);
        match engine.get_contents() {
            Ok(Some(current)) if current != copied => {
                debug!("clipboard changed since copy; leaving it alone");
                return;
            }
            Err(e) => debug!(error = %e, "clipboard unreadable before restore"),
            _ => {}
        }
        let restored = previous.as_deref().unwrap_or_default();
        if let Err(e) = engine.set_contents(restored) {
            warn!(error = %e, "could not clear the copied password from the clipboard");
        }
    });

    Ok(())
}

/// Seconds to hold a copied password: the explicit override, then config, then 20.
pub fn ttl_seconds(config: &Config, override_ttl: Option<u64>) -> u64 {
    override_ttl
        .or(config.clipboard_ttl)
        .unwrap_or(DEFAULT_CLIPBOARD_TTL)
}

fn is_ssh_session() -> bool {
    env::var_os("SSH_CONNECTION").is_some() || env::var_os("SSH_TTY").is_some()
}

#[cfg(all(target_family = "unix", not(target_os = "macos")))]
fn has_display() -> bool {
    env::var_os("DISPLAY").is_some() || env::var_os("WAYLAND_DISPLAY").is_some()
}

#[cfg(any(not(target_family = "unix"), target_os = "macos"))]
fn has_display() -> bool {
    true
}

/// A hint to print before copying when the clipboard probably will not reach the user.
pub fn environment_warning() -> Option<String> {
    if is_ssh_session() {
        Some(
            "SSH session detected; the copy may not reach your machine. Try `show --reveal`"
                .into(),
        )
    } else if !has_display() {
        Some("No graphical display found; the clipboard may be unavailable".into())
    } else {
        None
    }
}
