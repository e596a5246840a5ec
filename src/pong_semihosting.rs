//! `log` output over semihosting, for boards attached to a debugger.

#[cfg(feature = "semihosting")]
mod logger {
    use cortex_m_semihosting::hprintln;
    use log::{LevelFilter, Log, Metadata, Record};

    struct SemihostingLogger;

    impl Log for SemihostingLogger {
        fn enabled(&self, _metadata: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            // Nothing to do if the host went away
            let _ = hprintln!("[{}] {}", record.level(), record.args());
        }

        fn flush(&self) {}
    }

    static LOGGER: SemihostingLogger = SemihostingLogger;

    pub fn init() {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Debug);
        }
    }
}

#[cfg(feature = "semihosting")]
pub use logger::init;

#[cfg(not(feature = "semihosting"))]
pub fn init() {}
