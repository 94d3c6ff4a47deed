use log::LevelFilter;
use simplelog::{
    ColorChoice,
    ConfigBuilder,
    TermLogger,
    TerminalMode
};

/// Installs the global logger on stderr; stdout is reserved for protocol
/// traffic. A second call is a no-op.
pub fn init(level: LevelFilter) {
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .set_thread_level(LevelFilter::Off)
        .build();

    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}
