pub mod error;
pub mod format;
pub mod marker;
pub mod matrix;
pub mod profile;

pub use error::*;
pub use format::*;
pub use marker::*;
pub use matrix::*;
pub use profile::*;
