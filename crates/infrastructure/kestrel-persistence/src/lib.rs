mod api;
mod atomic;
mod codec;
mod config_file;
mod error;
mod json_store;
mod maintenance;
mod migrate;
mod paths;

pub use api::*;
pub use config_file::{JsonConfigFile, CONFIG_FILENAME};
pub use codec::{decode_record, encode_record};
pub use error::*;
pub use json_store::JsonPreferencesStore;
pub use migrate::{migrate_record, normalize_payload};
pub use paths::default_data_dir;
