/// A simple stderr logger.
static LOGGER: SimpleLogger = SimpleLogger;
struct SimpleLogger;

/// Installs the logger, showing warnings only unless `verbose` is set.
pub fn init(verbose: bool) {
    if let Ok(()) = log::set_logger(&LOGGER) {
        log::set_max_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        });
    }
}

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let target = if !record.target().is_empty() {
                record.target()
            } else {
                record.module_path().unwrap_or_default()
            };

            match record.level() {
                log::Level::Error => eprintln!("Error (in {}): {}", target, record.args()),
                log::Level::Warn => eprintln!("Warning (in {}): {}", target, record.args()),
                log::Level::Info => eprintln!("Info (in {}): {}", target, record.args()),
                log::Level::Debug => eprintln!("Debug (in {}): {}", target, record.args()),
                log::Level::Trace => eprintln!("Trace (in {}): {}", target, record.args()),
            }
        }
    }

    fn flush(&self) {}
}
