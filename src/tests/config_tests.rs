use crate::config::{get_api_url, Config};
use crate::constants::API_URL_ENV;

// The only test in the crate that touches the process environment.
#[test]
fn test_env_overrides_config_file() {
    let config = Config {
        api_url: Some("http://from-config/api".to_string()),
        ..Default::default()
    };

    std::env::set_var(API_URL_ENV, "http://from-env/api/");
    let from_env = get_api_url(&config);
    std::env::set_var(API_URL_ENV, "   ");
    let blank_env = get_api_url(&config);
    std::env::remove_var(API_URL_ENV);

    assert_eq!(from_env, "http://from-env/api");
    assert_eq!(blank_env, "http://from-config/api");
    assert_eq!(get_api_url(&config), "http://from-config/api");
}
