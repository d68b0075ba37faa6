//! Build a static, date-grouped image gallery from a tree of HTML chat exports.

pub mod aggregate;
pub mod config;
pub mod dates;
pub mod discovery;
pub mod encoding;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod types;
pub mod utils;

pub use config::Config;
pub use error::{GalleryError, RunFailure};
pub use pipeline::Pipeline;
pub use types::*;
