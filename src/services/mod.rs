pub mod generator;

pub use generator::{GeneratorError, ModelHandle, TextGenerator};
