pub mod toml_config;

pub use toml_config::DateTimeConfig;
