pub mod commands;

use camino::{Utf8Path, Utf8PathBuf};
use clap::ValueEnum;
use kestrel_core::{AccentPreset, GroupingCriterion};

/// `--data-dir` when given, the platform data directory otherwise.
pub fn resolve_data_dir(explicit: Option<&Utf8Path>) -> anyhow::Result<Utf8PathBuf> {
    let dir = match explicit {
        Some(dir) => dir.to_path_buf(),
        None => kestrel_persistence::default_data_dir()?,
    };
    tracing::debug!(%dir, "using data directory");
    Ok(dir)
}

#[derive(ValueEnum, Clone, Debug, Copy)]
pub enum CliGrouping {
    Group,
    Loader,
    GameVersion,
    LastPlayed,
}

impl From<CliGrouping> for GroupingCriterion {
    fn from(g: CliGrouping) -> Self {
        match g {
            CliGrouping::Group => GroupingCriterion::Group,
            CliGrouping::Loader => GroupingCriterion::Loader,
            CliGrouping::GameVersion => GroupingCriterion::GameVersion,
            CliGrouping::LastPlayed => GroupingCriterion::LastPlayed,
        }
    }
}

#[derive(ValueEnum, Clone, Debug, Copy)]
pub enum CliPreset {
    Blue,
    Emerald,
    Violet,
    Rose,
    Amber,
    Slate,
}

impl From<CliPreset> for AccentPreset {
    fn from(p: CliPreset) -> Self {
        match p {
            CliPreset::Blue => AccentPreset::Blue,
            CliPreset::Emerald => AccentPreset::Emerald,
            CliPreset::Violet => AccentPreset::Violet,
            CliPreset::Rose => AccentPreset::Rose,
            CliPreset::Amber => AccentPreset::Amber,
            CliPreset::Slate => AccentPreset::Slate,
        }
    }
}
