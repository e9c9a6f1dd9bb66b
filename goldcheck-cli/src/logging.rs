// ============================================================================
// goldcheck-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: env_logger initialization for the goldcheck binary
//
// The core library only logs through the `log` facade; this module decides
// where records go. Lines are written to stderr as
// `<timestamp> <LEVEL> <message>`.
//
// USAGE:
// - default: info
// - --verbose: debug
// - RUST_LOG, when set, overrides both (e.g. RUST_LOG=goldcheck_core=trace)

use log::LevelFilter;
use std::io::Write;

/// Returns the current local timestamp formatted for log lines.
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

/// Initialize the logger for goldcheck.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder
        .format(|buf, record| {
            let level_str = match record.level() {
                log::Level::Error => "ERROR",
                log::Level::Warn => "WARN ",
                log::Level::Info => "INFO ",
                log::Level::Debug => "DEBUG",
                log::Level::Trace => "TRACE",
            };
            writeln!(buf, "{} {} {}", get_timestamp(), level_str, record.args())
        })
        .filter(None, level);

    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }

    // A second init (e.g. in tests) is harmless.
    let _ = builder.try_init();
    log::debug!("Logger initialized with level: {level}");
}
