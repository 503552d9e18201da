//! Process-wide plumbing shared by the library and the binary: debug and crash logs.

mod logging;

#[cfg(test)]
pub(crate) use logging::{append_crash_entry_for_tests, set_logging_for_tests};
pub use logging::{
    crash_log_path, init_logging, log_debug, log_debug_content, log_fatal_error, log_file_path,
    log_panic,
};
