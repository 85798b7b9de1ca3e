use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use weatherdash_core::{
    Config, Coordinates, Dashboard, FixedLocator, Locator, QueryState, locate::locator_from_config,
    provider::provider_from_config,
};

use crate::render::render_state;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherdash", version, about = "Weather dashboard for the terminal")]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Defaults to `interactive`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Show current conditions and the daily forecast for a city.
    Show {
        /// City name, e.g. "London" or "Rio de Janeiro".
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,
    },

    /// Show weather for the current location.
    Here {
        /// Latitude to use instead of looking the location up.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude to use instead of looking the location up.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
    },

    /// Locate once, then keep prompting for cities.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let command = self.command.unwrap_or(Command::Interactive);
        tracing::debug!(?command, "running command");

        match command {
            Command::Configure => configure(),
            Command::Show { city } => {
                let dash = open_dashboard(&Config::load()?)?;
                let state = dash.query_by_name(&city.join(" ")).await;
                print_once(&state)
            }
            Command::Here { lat, lon } => {
                let config = Config::load()?;
                let dash = open_dashboard(&config)?;
                let locator: Box<dyn Locator> = match (lat, lon) {
                    (Some(lat), Some(lon)) => Box::new(FixedLocator(Coordinates::new(lat, lon))),
                    _ => locator_from_config(&config),
                };
                let state = dash.bootstrap(locator.as_ref()).await;
                print_once(&state)
            }
            Command::Interactive => interactive().await,
        }
    }
}

fn open_dashboard(config: &Config) -> anyhow::Result<Dashboard> {
    Ok(Dashboard::new(provider_from_config(config)?))
}

/// Print a one-shot result; a failed query becomes the command's error.
fn print_once(state: &QueryState) -> anyhow::Result<()> {
    if let Some(err) = state.error() {
        anyhow::bail!("{err}");
    }
    print!("{}", render_state(state));
    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let path = Config::config_file_path()?;
    // the file alone, so an env override is not written back
    let mut config = Config::load_from(&path)?;

    let key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.set_api_key(key.to_string());
    config.save_to(&path)?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn interactive() -> anyhow::Result<()> {
    let config = Config::load()?;
    let dash = open_dashboard(&config)?;

    println!("Looking up your location...");
    let state = dash.bootstrap(locator_from_config(&config).as_ref()).await;
    print!("{}", render_state(&state));

    loop {
        let state = dash.state();
        let answer = Text::new("City:")
            .with_initial_value(state.city())
            .with_help_message("Enter to search, Esc to quit")
            .prompt();

        let city = match answer {
            Ok(city) => city,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read city"),
        };

        dash.set_city(&city);
        if city.trim().is_empty() {
            continue;
        }

        println!("Loading...");
        let state = dash.query_by_name(&city).await;
        print!("{}", render_state(&state));
    }

    Ok(())
}
