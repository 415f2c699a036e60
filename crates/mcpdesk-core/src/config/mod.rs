//! Desktop client configuration: document schema, paths and tool settings.

pub mod paths;
pub mod schema;
pub mod settings;

pub use paths::{backup_dir_for, client_config_path_in, default_client_config_path};
pub use schema::{ConfigDocument, ServerEntry};
pub use settings::Settings;
