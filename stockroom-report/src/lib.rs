pub mod app_config;
pub mod report;

pub use app_config::Config;
