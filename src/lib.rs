mod buffer;
mod error;
pub mod writer;

pub use error::{Error, Result};
pub use writer::{Checkpoint, Config, OutputBuffer};
