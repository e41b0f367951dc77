mod commands;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use clap_derive::{Parser, Subcommand};
use flashlight_rs::DEFAULT_SETTINGS_FILE;
use flashlight_rs::logging::{self, LogFile, RotationPeriod};

#[derive(Subcommand, Debug, Clone)]
enum ContactCommands {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
    },
    List,
}

#[derive(Subcommand, Debug, Default, Clone)]
enum Commands {
    /// Interactive flashlight driven from the keyboard
    #[default]
    Run,
    /// Manage emergency contacts
    Contacts {
        #[command(subcommand)]
        command: ContactCommands,
    },
    /// Store a brightness (clamped to 0-100)
    Brightness {
        #[arg(allow_negative_numbers = true)]
        value: i32,
    },
    /// Store a light color such as #ffcc00
    Color { value: String },
    /// Print the settings document
    Show,
}

#[derive(Parser, Debug)]
struct Params {
    /// Settings file path
    #[clap(long, default_value = DEFAULT_SETTINGS_FILE)]
    settings: PathBuf,
    /// Log file path (if not set, logs go to the console)
    #[clap(long)]
    log_file: Option<PathBuf>,
    /// How often the log file rotates: minutely, hourly, daily or never
    #[clap(long, default_value = "daily")]
    log_rotation: RotationPeriod,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let params = Params::parse();
    let _log_guard = match &params.log_file {
        Some(path) => logging::init_file(&LogFile::from_path(path, params.log_rotation))?,
        None => logging::init_console(),
    };

    match params.command.clone().unwrap_or_default() {
        Commands::Run => commands::run(&params).await?,
        Commands::Contacts { command } => match command {
            ContactCommands::Add { name, phone } => {
                commands::add_contact(&params, &name, &phone).await?
            }
            ContactCommands::List => commands::list_contacts(&params).await?,
        },
        Commands::Brightness { value } => commands::set_brightness(&params, value).await?,
        Commands::Color { value } => commands::set_color(&params, &value).await?,
        Commands::Show => commands::show(&params).await?,
    }

    Ok(())
}
