//! Configuration module

mod blog;

pub use blog::ApiConfig;
pub use blog::BlogConfig;
pub use blog::HighlightConfig;
pub use blog::ServerConfig;
