pub mod compiler;
pub mod error;
pub mod midi;
pub mod tone;

pub use compiler::Compiler;
pub use error::Error;
