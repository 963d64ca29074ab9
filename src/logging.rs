pub use log::LevelFilter::*;

use log::LevelFilter;

/// Install the global logger. Call once per process.
pub fn setup_logging(verbosity: LevelFilter) -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .level(verbosity)
        .format(|out, message, record| out.finish(format_args!("({}) {}: {}", record.level(), record.target(), message)))
        .chain(std::io::stderr())
        .apply()
}
