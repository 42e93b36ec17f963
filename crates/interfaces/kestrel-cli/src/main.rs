use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use kestrel_cli::{commands, CliGrouping, CliPreset};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Where preferences and launcher settings are stored
    #[arg(long, global = true, env = "KESTREL_DATA_DIR")]
    data_dir: Option<Utf8PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the colors derived from a hex accent
    Accent { hex: String },
    /// Inspect or change UI preferences
    Prefs {
        #[command(subcommand)]
        command: PrefsCommands,
    },
    /// Inspect or change launcher settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    Launch {
        profile: String,
        #[arg(short, long, help = "Stay attached until the game exits")]
        wait: bool,
        #[arg(last = true)]
        args: Vec<String>,
    },
}

#[derive(Subcommand)]
enum PrefsCommands {
    Show,
    Accent { hex: String },
    Preset {
        #[arg(value_enum)]
        preset: CliPreset,
    },
    Grouping {
        #[arg(value_enum)]
        criterion: CliGrouping,
    },
    Radius { value: u32 },
}

#[derive(Subcommand)]
enum ConfigCommands {
    Show,
    /// Set one value, e.g. `config set wrapper gamemoderun`. An empty value
    /// clears optional settings.
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Only commands that touch storage resolve the platform directory.
    let explicit_dir = cli.data_dir;
    let data_dir = || kestrel_cli::resolve_data_dir(explicit_dir.as_deref());

    match cli.command {
        Commands::Accent { hex } => {
            commands::cmd_accent(&hex)?;
        }
        Commands::Prefs { command } => match command {
            PrefsCommands::Show => {
                commands::cmd_prefs_show(&data_dir()?)?;
            }
            PrefsCommands::Accent { hex } => {
                commands::cmd_prefs_accent(&data_dir()?, &hex)?;
            }
            PrefsCommands::Preset { preset } => {
                commands::cmd_prefs_preset(&data_dir()?, preset.into())?;
            }
            PrefsCommands::Grouping { criterion } => {
                commands::cmd_prefs_grouping(&data_dir()?, criterion.into())?
            }
            PrefsCommands::Radius { value } => {
                commands::cmd_prefs_radius(&data_dir()?, value)?;
            }
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                commands::cmd_config_show(&data_dir()?).await?;
            }
            ConfigCommands::Set { key, value } => {
                commands::cmd_config_set(&data_dir()?, &key, &value).await?;
            }
        },
        Commands::Launch {
            profile,
            wait,
            args,
        } => commands::cmd_launch(&data_dir()?, &profile, args, wait).await?,
    }

    Ok(())
}
