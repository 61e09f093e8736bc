pub mod app_config;
pub mod read_env;
