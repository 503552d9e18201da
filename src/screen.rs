//! Full-screen terminal session for the display.
//!
//! Entering switches to raw mode, the alternate screen and a hidden cursor.
//! Each step is recorded as it succeeds, so restoring (on drop, on panic, or
//! after a half-finished `enter`) undoes exactly what was turned on.

use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::{
    io::{self, Write},
    panic,
    sync::{
        atomic::{AtomicU8, Ordering},
        OnceLock,
    },
};

const RAW_MODE: u8 = 0b001;
const ALT_SCREEN: u8 = 0b010;
const CURSOR_HIDDEN: u8 = 0b100;

static ACTIVE: AtomicU8 = AtomicU8::new(0);
static PANIC_HOOK: OnceLock<()> = OnceLock::new();

fn mark(flag: u8) {
    ACTIVE.fetch_or(flag, Ordering::SeqCst);
}

/// Owns the full-screen session; dropping it gives the terminal back.
pub struct ScreenGuard {
    _private: (),
}

impl ScreenGuard {
    pub fn enter(stdout: &mut impl Write) -> io::Result<Self> {
        install_panic_hook();
        let guard = ScreenGuard { _private: () };
        enable_raw_mode()?;
        mark(RAW_MODE);
        execute!(stdout, EnterAlternateScreen, Clear(ClearType::All))?;
        mark(ALT_SCREEN);
        execute!(stdout, Hide)?;
        mark(CURSOR_HIDDEN);
        Ok(guard)
    }

    pub fn restore(&self) {
        restore_screen();
    }
}

impl Drop for ScreenGuard {
    fn drop(&mut self) {
        restore_screen();
    }
}

/// Undo every recorded step, in reverse order. Repeated calls are no-ops.
pub fn restore_screen() {
    let active = ACTIVE.swap(0, Ordering::SeqCst);
    if active == 0 {
        return;
    }
    let mut stdout = io::stdout();
    if active & CURSOR_HIDDEN != 0 {
        let _ = execute!(stdout, Show);
    }
    if active & ALT_SCREEN != 0 {
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
    if active & RAW_MODE != 0 {
        let _ = disable_raw_mode();
    }
    let _ = stdout.flush();
}

/// Give the terminal back and write the crash log before the default hook prints.
fn install_panic_hook() {
    PANIC_HOOK.get_or_init(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            restore_screen();
            crate::log_panic(info);
            if let Some(loc) = info.location() {
                crate::log_debug(&format!("panic at {}:{}", loc.file(), loc.line()));
            }
            previous(info);
        }));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_without_an_active_session_does_nothing() {
        restore_screen();
        restore_screen();
        assert_eq!(ACTIVE.load(Ordering::SeqCst), 0);
    }
}
