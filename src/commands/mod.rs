pub mod export_config;
pub mod seed;
pub mod template;
pub mod update;
