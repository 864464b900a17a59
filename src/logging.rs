use log::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Map `-v`/`-q` counts onto a level; info when neither is given.
pub fn level_filter(verbose: u8, quiet: u8) -> LevelFilter {
    match i16::from(verbose) - i16::from(quiet) {
        i16::MIN..=-3 => LevelFilter::Off,
        -2 => LevelFilter::Error,
        -1 => LevelFilter::Warn,
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over the flag-derived level.
pub fn init(verbose: u8, quiet: u8) {
    let level = level_filter(verbose, quiet);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase()));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
    if let Err(e) = result {
        eprintln!("logging already initialised: {e}");
    }
}
