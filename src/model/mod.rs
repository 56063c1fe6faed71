//! Data model for values resolved through template scopes

pub mod value;

pub use value::{Callable, NativeFn, Value};
