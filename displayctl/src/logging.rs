use colored::*;
use log::{Level, LevelFilter, Metadata, Record};

/// Minimal colored stderr logger; `-v` surfaces the HTTP conversation.
struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = match record.level() {
            Level::Error => "E".red().bold(),
            Level::Warn => "W".yellow(),
            Level::Info => "I".green(),
            Level::Debug => "D".blue(),
            Level::Trace => "T".dimmed(),
        };
        eprintln!("{} {}", level, record.args());
    }

    fn flush(&self) {}
}

pub fn init(verbose: bool) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });
}
