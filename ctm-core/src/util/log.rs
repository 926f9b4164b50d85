use simplelog::*;

pub fn init_simple_logger(l: log::LevelFilter) -> Result<(), log::SetLoggerError> { 
    let config = ConfigBuilder::new()
        .set_location_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_level_color(Level::Trace, Some(Color::Green))
        .set_level_color(Level::Debug, Some(Color::Cyan))
        .build();

    TermLogger::init(l, config, TerminalMode::Mixed, ColorChoice::Always)
}

/// Maps a verbosity count (as given by `--log`) to a level filter.
pub fn level_filter(verbosity: u8) -> log::LevelFilter { 
    use log::LevelFilter::*;
    match verbosity { 
        1 => Info,
        2 => Debug,
        3 => Trace,
        _ => Warn,
    }
}
