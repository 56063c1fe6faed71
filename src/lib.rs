//! Variable resolution and scope management for the stencil template engine
//!
//! Templates look names up (`{{ user.name }}`) against layered stores held
//! by an [`ExecutionContext`]. This crate provides those stores, the rules
//! for deriving nested contexts, identifier validation for user data, and
//! the error and logging helpers tag and filter code builds on.
//!
//! ```
//! use std::sync::Arc;
//! use stencil_scope::{Context, ExecutionContext, ScopeConfig, Template, TemplateSet};
//!
//! let set = Arc::new(TemplateSet::new("default"));
//! let tpl = Template::new("hello.html", set);
//!
//! let mut data = Context::new();
//! data.insert("name", "world");
//!
//! let root = ExecutionContext::from_context(tpl, data, &ScopeConfig::default())?;
//! let body = root.child();
//! body.private().set_value("forloop", 1);
//!
//! assert_eq!(body.resolve("name").map(|v| v.to_string()).as_deref(), Some("world"));
//! assert!(root.private().get_value("forloop").is_none());
//! # Ok::<(), stencil_scope::Error>(())
//! ```

#![warn(missing_docs)]

pub mod context;
pub mod error;
pub mod model;
pub mod store;
pub mod template;

// Re-export main types
pub use context::{Context, ExecutionContext, META_NAMESPACE, ScopeConfig};
pub use error::{Error, ErrorCause, Result, Sender};
pub use model::{Callable, Value};
pub use store::{FlatStore, ScopeView, Store, check_identifiers};
pub use template::{Template, TemplateSet, Token};

/// Engine version exposed to templates as `stencil.version`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
