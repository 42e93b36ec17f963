use kestrel_core::LauncherConfig;
use thiserror::Error;

/// A single user edit to the launcher configuration draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigEdit {
    ConcurrentDownloads(usize),
    ConcurrentIoLimit(usize),
    DiscordPresence(bool),
    BetaChannel(bool),
    HideOnProcessStart(bool),
    GameDirectory(Option<String>),
    PreLaunchHook(Option<String>),
    WrapperCommand(Option<String>),
    PostExitHook(Option<String>),
    LaunchTemplate(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigEditError {
    #[error("unknown setting '{0}'")]
    UnknownKey(String),
    #[error("'{value}' is not a valid value for {key}")]
    InvalidValue { key: &'static str, value: String },
}

pub const CONFIG_KEYS: &[&str] = &[
    "concurrent_downloads",
    "concurrent_io_limit",
    "discord_presence",
    "beta_channel",
    "hide_on_process_start",
    "game_directory",
    "pre_launch",
    "wrapper",
    "post_exit",
    "launch_template",
];

impl ConfigEdit {
    /// Limits are not clamped here; the draft keeps what the user typed and
    /// the value is normalized on commit.
    pub fn apply(self, config: &mut LauncherConfig) {
        match self {
            ConfigEdit::ConcurrentDownloads(n) => config.concurrent_downloads = n,
            ConfigEdit::ConcurrentIoLimit(n) => config.concurrent_io_limit = n,
            ConfigEdit::DiscordPresence(on) => config.enable_discord_presence = on,
            ConfigEdit::BetaChannel(on) => config.check_beta_channel = on,
            ConfigEdit::HideOnProcessStart(on) => config.hide_on_process_start = on,
            ConfigEdit::GameDirectory(dir) => config.custom_game_directory = dir,
            ConfigEdit::PreLaunchHook(cmd) => config.hooks.pre_launch = cmd,
            ConfigEdit::WrapperCommand(cmd) => config.hooks.wrapper = cmd,
            ConfigEdit::PostExitHook(cmd) => config.hooks.post_exit = cmd,
            ConfigEdit::LaunchTemplate(t) => config.launch_template = t,
        }
    }

    /// Parses a `key value` pair as typed on the command line. An empty value
    /// clears optional settings.
    pub fn parse(key: &str, value: &str) -> Result<Self, ConfigEditError> {
        let optional = |v: &str| (!v.is_empty()).then(|| v.to_string());
        let edit = match key {
            "concurrent_downloads" => {
                ConfigEdit::ConcurrentDownloads(parse_number("concurrent_downloads", value)?)
            }
            "concurrent_io_limit" => {
                ConfigEdit::ConcurrentIoLimit(parse_number("concurrent_io_limit", value)?)
            }
            "discord_presence" => ConfigEdit::DiscordPresence(parse_flag("discord_presence", value)?),
            "beta_channel" => ConfigEdit::BetaChannel(parse_flag("beta_channel", value)?),
            "hide_on_process_start" => {
                ConfigEdit::HideOnProcessStart(parse_flag("hide_on_process_start", value)?)
            }
            "game_directory" => ConfigEdit::GameDirectory(optional(value)),
            "pre_launch" => ConfigEdit::PreLaunchHook(optional(value)),
            "wrapper" => ConfigEdit::WrapperCommand(optional(value)),
            "post_exit" => ConfigEdit::PostExitHook(optional(value)),
            "launch_template" => ConfigEdit::LaunchTemplate(value.to_string()),
            other => return Err(ConfigEditError::UnknownKey(other.to_string())),
        };
        Ok(edit)
    }
}

fn parse_number(key: &'static str, value: &str) -> Result<usize, ConfigEditError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigEditError::InvalidValue {
            key,
            value: value.to_string(),
        })
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigEditError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(ConfigEditError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}
