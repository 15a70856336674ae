use std::fs::{File, OpenOptions};
use std::io::Write;

/// Debug log file path (in /tmp for easy access)
pub const DEBUG_LOG_PATH: &str = "/tmp/fractree.log";
/// Debug log file permissions (owner read/write only - 0o600)
#[cfg(unix)]
const DEBUG_LOG_MODE: u32 = 0o600;

/// Debug logger for draw diagnostics.
///
/// Writes to a log file when debug mode is enabled.
pub struct DebugLogger {
    file: Option<File>,
}

impl DebugLogger {
    pub fn new(debug_enabled: bool) -> Self {
        let file = if debug_enabled { open_log() } else { None };
        Self { file }
    }

    pub fn enabled(&self) -> bool {
        self.file.is_some()
    }

    /// Write a formatted message to the log file (if enabled).
    pub fn log(&mut self, args: std::fmt::Arguments) {
        if let Some(ref mut f) = self.file {
            let _ = writeln!(f, "{}", args);
            let _ = f.flush();
        }
    }
}

fn open_log() -> Option<File> {
    let mut create = OpenOptions::new();
    create.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        create.mode(DEBUG_LOG_MODE);
    }

    // Exclusive create first, otherwise truncate the existing (user's own) file
    create
        .open(DEBUG_LOG_PATH)
        .or_else(|_| OpenOptions::new().write(true).truncate(true).open(DEBUG_LOG_PATH))
        .ok()
}

/// Convenience macro for debug logging with format args.
macro_rules! dbg_log {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log(format_args!($($arg)*))
    };
}

pub(crate) use dbg_log;
