// Public library interface for google-oauth-config
pub mod oauth;
pub mod utils;

pub use utils::app_config::{AppConfig, google_client_id};
