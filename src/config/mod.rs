mod settings;

pub use settings::{
    Config, ReconcileStrategy, config_path, get_api_url, load_config, load_config_from, save_config,
    save_config_to,
};
