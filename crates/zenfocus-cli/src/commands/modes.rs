use zenfocus_core::{format_clock, Config, TimerMode};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Config::load()?.timer_settings();
    for mode in TimerMode::ALL {
        println!(
            "{:<12} {:<12} {}  {}",
            mode.as_str(),
            mode.label(),
            format_clock(settings.duration(mode)),
            mode.color()
        );
    }
    println!(
        "long break after every {} focus sessions",
        settings.long_break_every
    );
    Ok(())
}
