//! Stderr backend for the `log` facade, used by the binary.
//!
//! Lines look like `[<elapsed ms> LEVEL] message`; anything above `Info`
//! also carries the source location.
//!
//! ```
//! scatsim::logger::init(log::LevelFilter::Info);
//! log::info!("Hello, world!");
//! ```

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

struct StderrLogger {
    start: Instant,
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Install the logger; later calls only adjust the level
pub fn init(level: LevelFilter) {
    let logger = LOGGER.get_or_init(|| StderrLogger { start: Instant::now() });
    let _ = log::set_logger(logger);
    log::set_max_level(level);
}

/// Format a logging message.
fn format_msg(elapsed_ms: u128, record: &Record) -> String {
    let head = format!("[{:>9} {:<5}] ", elapsed_ms, record.level().as_str());

    match record.level() {
        Level::Info => format!("{head}{}", record.args()),
        _ => {
            if let (Some(file), Some(line)) = (record.file(), record.line()) {
                format!("{head}{file}:{line}: {}", record.args())
            } else {
                format!("{head}{}", record.args())
            }
        }
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = format_msg(self.start.elapsed().as_millis(), record);
        let _ = writeln!(std::io::stderr().lock(), "{msg}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
