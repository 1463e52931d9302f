pub mod env;
mod loader;

pub use env::{AppConfig, CerebrasConfig, DirectoryConfig, PipelineConfig};
pub use loader::load_config;
