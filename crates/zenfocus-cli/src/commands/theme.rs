use clap::Subcommand;
use zenfocus_core::{ConfigPreferences, Theme};

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Print the current theme
    Show,
    /// Switch between light and dark
    Toggle,
    /// Set dark mode explicitly
    Set {
        /// true for dark, false for light
        #[arg(action = clap::ArgAction::Set)]
        dark: bool,
    },
}

pub fn run(action: ThemeAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut theme = Theme::mount(ConfigPreferences::open_default()?)?;
    match action {
        ThemeAction::Show => {}
        ThemeAction::Toggle => {
            theme.toggle()?;
        }
        ThemeAction::Set { dark } => theme.set(dark)?,
    }
    println!("{}", theme.name());
    Ok(())
}
