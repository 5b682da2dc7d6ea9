pub mod config;
pub mod error;
pub mod markers;
pub mod output;
pub mod prompt;
pub mod session;

pub use config::*;
pub use error::*;
pub use markers::*;
pub use output::*;
pub use prompt::*;
pub use session::*;
