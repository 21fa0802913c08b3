//! Logging setup shared by the binary and tests

use std::io::Write;

/// Initialize the logger for terminal applications.
///
/// Uses `level` unless `RUST_LOG` says otherwise, with a format that stays
/// readable when the terminal is in raw mode. When `target` is given, records
/// go there instead of stderr so they do not tear the drawn screen.
pub fn init_logger(level: log::LevelFilter, target: Option<Box<dyn Write + Send>>) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env();

    builder.format(|buf, record| {
        writeln!(
            buf,
            "\r[{} {:5} {}] {}",
            buf.timestamp(),
            record.level(),
            record.module_path().unwrap_or("unknown"),
            record.args()
        )
    });

    if let Some(target) = target {
        builder.target(env_logger::Target::Pipe(target));
    }

    // A second initialisation (tests) keeps the first logger
    let _ = builder.try_init();
}
