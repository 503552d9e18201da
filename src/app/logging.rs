use crate::config::AppConfig;
use std::{
    backtrace::Backtrace,
    env, fs,
    io::Write,
    panic,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, OnceLock,
    },
    time::{SystemTime, UNIX_EPOCH},
};

const LOG_MAX_BYTES: u64 = 5 * 1024 * 1024;
const CRASH_LOG_MAX_BYTES: u64 = 256 * 1024;
static LOG_ENABLED: AtomicBool = AtomicBool::new(false);
static LOG_CONTENT_ENABLED: AtomicBool = AtomicBool::new(false);
static LOG_STATE: OnceLock<Mutex<LogState>> = OnceLock::new();

/// Path to the temp log file we rotate between runs.
pub fn log_file_path() -> PathBuf {
    env::temp_dir().join("magic7ball.log")
}

/// Path to the crash log file. Always written, independent of `--logs`.
pub fn crash_log_path() -> PathBuf {
    env::temp_dir().join("magic7ball_crash.log")
}

/// Append-only file that starts over once the next write would pass `max_bytes`.
/// Shared by the debug log and the crash log.
struct CappedLog {
    path: PathBuf,
    file: fs::File,
    max_bytes: u64,
    len: u64,
}

impl CappedLog {
    fn open(path: PathBuf, max_bytes: u64) -> Option<Self> {
        let len = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .ok()?;
        let mut log = Self {
            path,
            file,
            max_bytes,
            len,
        };
        if len > max_bytes {
            log.start_over();
        }
        Some(log)
    }

    fn start_over(&mut self) {
        if let Ok(file) = fs::File::create(&self.path) {
            self.file = file;
            self.len = 0;
        }
    }

    fn append(&mut self, text: &str) {
        let added = text.len() as u64;
        if self.len.saturating_add(added) > self.max_bytes {
            self.start_over();
        }
        if self.file.write_all(text.as_bytes()).is_ok() {
            self.len = self.len.saturating_add(added);
        }
    }
}

#[derive(Default)]
struct LogState {
    debug_log: Option<CappedLog>,
}

fn log_state() -> &'static Mutex<LogState> {
    LOG_STATE.get_or_init(|| Mutex::new(LogState::default()))
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn set_logging(enabled: bool, content_enabled: bool) {
    LOG_ENABLED.store(enabled, Ordering::Relaxed);
    LOG_CONTENT_ENABLED.store(enabled && content_enabled, Ordering::Relaxed);

    let mut state = log_state()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    state.debug_log = if enabled {
        CappedLog::open(log_file_path(), LOG_MAX_BYTES)
    } else {
        None
    };
}

/// Configure logging based on CLI flags or environment.
pub fn init_logging(config: &AppConfig) {
    set_logging(config.logs && !config.no_logs, config.log_content);
}

/// Write debug messages to a temp file so the terminal display stays clean.
pub fn log_debug(msg: &str) {
    if !LOG_ENABLED.load(Ordering::Relaxed) {
        return;
    }
    let line = format!("[{}] {msg}\n", unix_timestamp());
    let mut state = log_state()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(log) = state.debug_log.as_mut() {
        log.append(&line);
    }
}

/// Write logs that carry show content (prompts, answers).
pub fn log_debug_content(msg: &str) {
    if !LOG_CONTENT_ENABLED.load(Ordering::Relaxed) {
        return;
    }
    log_debug(msg);
}

fn append_crash_entry(path: &Path, entry: &str) {
    if let Some(mut log) = CappedLog::open(path.to_path_buf(), CRASH_LOG_MAX_BYTES) {
        log.append(entry);
    }
}

/// Record a panic with its location, payload and a captured backtrace.
pub fn log_panic(info: &panic::PanicHookInfo<'_>) {
    let location = info
        .location()
        .map(|loc| format!("{}:{}", loc.file(), loc.line()))
        .unwrap_or_else(|| "unknown".to_string());
    let payload = if let Some(text) = info.payload().downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = info.payload().downcast_ref::<String>() {
        text.clone()
    } else {
        "non-string panic payload".to_string()
    };
    let entry = format!(
        "[{}] panic at {location}: {payload} (v{})\n{}\n",
        unix_timestamp(),
        env!("CARGO_PKG_VERSION"),
        Backtrace::force_capture()
    );
    append_crash_entry(&crash_log_path(), &entry);
}

/// Record an error that ended the program.
pub fn log_fatal_error(err: &anyhow::Error) {
    let entry = format!(
        "[{}] fatal error: {err:#} (v{})\n",
        unix_timestamp(),
        env!("CARGO_PKG_VERSION")
    );
    append_crash_entry(&crash_log_path(), &entry);
}

#[cfg(test)]
pub(crate) fn set_logging_for_tests(enabled: bool, content_enabled: bool) {
    set_logging(enabled, content_enabled);
}

#[cfg(test)]
pub(crate) fn append_crash_entry_for_tests(path: &Path, entry: &str) {
    append_crash_entry(path, entry);
}
