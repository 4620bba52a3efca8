//! Helper functions for pages
//!
//! Date formatting, HTML escaping and URL handling shared by the markdown
//! renderer, the templates and the CLI.

pub mod date;
pub mod html;
pub mod url;

pub use date::*;
pub use html::*;
pub use url::*;
