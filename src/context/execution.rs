//! Per-render execution state handed to tags and filters

use super::{Context, ScopeConfig};
use crate::VERSION;
use crate::error::{Error, ErrorCause, Result, Sender};
use crate::model::Value;
use crate::store::{Store, check_identifiers};
use crate::template::{Template, Token};
use std::fmt;
use std::sync::Arc;

/// Reserved Private key exposing engine metadata (`{{ stencil.version }}`)
pub const META_NAMESPACE: &str = "stencil";

/// Everything a tag or filter can see while a template executes
///
/// The three stores differ in visibility:
///
/// - `public` is the caller's data behind a protective overlay. Writes never
///   reach the caller's store, but the same view is shared by the whole
///   render tree, so a write made in a child is seen by the parent.
/// - `private` holds engine and tag bookkeeping (loop counters and the
///   like). Each child layers its own overlay, so child writes stay
///   invisible to the parent while parent values remain readable.
/// - `shared` is one store for the entire render, used by tags to pass data
///   between each other.
///
/// Please do not write into `public` from tag code unless you mean to shadow
/// user data for the rest of the render.
#[derive(Debug)]
pub struct ExecutionContext {
    template: Arc<Template>,
    macro_depth: usize,
    max_macro_depth: usize,
    autoescape: bool,
    public: Store,
    private: Store,
    shared: Store,
}

impl ExecutionContext {
    /// Build the root context of a render over the caller's data
    ///
    /// The render gets a fresh, empty Shared store.
    pub fn new(template: Arc<Template>, user_data: Store, config: &ScopeConfig) -> Self {
        Self::new_with_shared(template, user_data, Store::flat(), config)
    }

    /// Build the root context of a render around a caller-supplied Shared store
    ///
    /// Shared can only be chosen here; every context derived from this root
    /// uses the same store.
    pub fn new_with_shared(
        template: Arc<Template>,
        user_data: Store,
        shared: Store,
        config: &ScopeConfig,
    ) -> Self {
        let private = Store::flat();
        private.set_value(META_NAMESPACE, Value::map([("version", Value::from(VERSION))]));

        log::trace!(
            "root execution context for '{}' (autoescape={})",
            template.name(),
            config.autoescape
        );

        Self {
            template,
            macro_depth: 0,
            max_macro_depth: config.max_macro_depth,
            autoescape: config.autoescape,
            public: Store::layered(&user_data),
            private,
            shared,
        }
    }

    /// Validate the context's keys, then build a root context over it
    pub fn from_context(
        template: Arc<Template>,
        context: Context,
        config: &ScopeConfig,
    ) -> Result<Self> {
        check_identifiers(context.identifiers())?;
        Ok(Self::new(template, context.into_store(), config))
    }

    /// Derive a context for a nested construct
    ///
    /// Public and Shared are the parent's handles; Private gets a fresh
    /// overlay on top of the parent's Private. The macro depth starts at zero.
    pub fn child(&self) -> Self {
        let private = Store::layered(&self.private);
        log::trace!(
            "child execution context for '{}' at private depth {}",
            self.template.name(),
            private.depth()
        );

        Self {
            template: Arc::clone(&self.template),
            macro_depth: 0,
            max_macro_depth: self.max_macro_depth,
            autoescape: self.autoescape,
            public: self.public.clone(),
            private,
            shared: self.shared.clone(),
        }
    }

    /// Derive a child that carries this context's macro depth over
    pub fn child_for_macro(&self) -> Self {
        let mut child = self.child();
        child.macro_depth = self.macro_depth;
        child
    }

    /// Record entering a macro body
    ///
    /// Fails once the configured recursion limit would be exceeded; the
    /// depth is left unchanged in that case.
    pub fn enter_macro(&mut self, token: Option<&Token>) -> Result<()> {
        if self.macro_depth >= self.max_macro_depth {
            return Err(self.build_error(
                ErrorCause::MacroDepthExceeded {
                    limit: self.max_macro_depth,
                },
                token,
            ));
        }
        self.macro_depth += 1;
        Ok(())
    }

    /// Record leaving a macro body
    pub fn leave_macro(&mut self) {
        self.macro_depth = self.macro_depth.saturating_sub(1);
    }

    /// Current number of nested macro invocations
    pub fn macro_depth(&self) -> usize {
        self.macro_depth
    }

    /// Template this context renders
    pub fn template(&self) -> &Arc<Template> {
        &self.template
    }

    /// Whether output should be escaped
    pub fn autoescape(&self) -> bool {
        self.autoescape
    }

    /// Override autoescaping for this context only
    pub fn set_autoescape(&mut self, autoescape: bool) {
        self.autoescape = autoescape;
    }

    /// Caller data, write-protected by an overlay
    pub fn public(&self) -> &Store {
        &self.public
    }

    /// Engine and tag bookkeeping, layered per nesting level
    pub fn private(&self) -> &Store {
        &self.private
    }

    /// Render-wide store shared by every context of the render
    pub fn shared(&self) -> &Store {
        &self.shared
    }

    /// Resolve a top-level name, Private first, then Public
    pub fn resolve(&self, name: &str) -> Option<Value> {
        self.private
            .get_value(name)
            .or_else(|| self.public.get_value(name))
    }

    /// Build an execution error from a message
    pub fn error(&self, message: impl Into<String>, token: Option<&Token>) -> Error {
        self.build_error(ErrorCause::Message(message.into()), token)
    }

    /// Build an execution error wrapping another error
    pub fn wrap_error(&self, cause: impl Into<anyhow::Error>, token: Option<&Token>) -> Error {
        self.build_error(ErrorCause::Other(cause.into()), token)
    }

    /// Forward a diagnostic message to the template set's log sink
    pub fn logf(&self, args: fmt::Arguments<'_>) {
        self.template.set().logf(args);
    }

    fn build_error(&self, cause: ErrorCause, token: Option<&Token>) -> Error {
        let (filename, line, column) = match token {
            Some(token) => (token.filename.clone(), token.line, token.column),
            None => (self.template.name().to_string(), 0, 0),
        };

        Error {
            template: Some(Arc::clone(&self.template)),
            filename,
            line,
            column,
            token: token.cloned(),
            sender: Sender::Execution,
            cause,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FlatStore;
    use crate::template::{TemplateSet, test_logger};
    use pretty_assertions::assert_eq;

    fn template() -> Arc<Template> {
        Template::new("index.html", Arc::new(TemplateSet::new("default")))
    }

    fn root() -> ExecutionContext {
        let data = Store::from(FlatStore::from_iter([("user", "ada")]));
        ExecutionContext::new(template(), data, &ScopeConfig::default())
    }

    #[test]
    fn test_root_exposes_engine_version() {
        let ctx = root();
        let meta = ctx.private().get_value(META_NAMESPACE).unwrap();

        assert_eq!(meta.get("version"), Some(&Value::from(VERSION)));
        assert_eq!(ctx.resolve("user"), Some(Value::from("ada")));
        assert!(ctx.autoescape());
        assert_eq!(ctx.public().depth(), 1);
        assert_eq!(ctx.private().depth(), 0);
    }

    #[test]
    fn test_private_chain_grows_with_nesting() {
        let ctx = root();
        let child = ctx.child();
        let grandchild = child.child();

        assert_eq!(grandchild.private().depth(), 2);
        assert!(grandchild.public().ptr_eq(ctx.public()));
        assert!(grandchild.shared().ptr_eq(ctx.shared()));
        assert!(Arc::ptr_eq(grandchild.template(), ctx.template()));
    }

    #[test]
    fn test_descendants_keep_the_root_shared_store() {
        let shared = Store::flat();
        let ctx = ExecutionContext::new_with_shared(
            template(),
            Store::flat(),
            shared.clone(),
            &ScopeConfig::default(),
        );

        let mut level = ctx.child();
        for _ in 0..4 {
            assert!(level.shared().ptr_eq(&shared));
            level = level.child_for_macro().child();
        }

        level.shared().set_value("cycle", 2);
        assert_eq!(ctx.shared().get_value("cycle"), Some(Value::Integer(2)));
    }

    #[test]
    fn test_resolve_prefers_private() {
        let ctx = root();
        let child = ctx.child();
        child.private().set_value("user", "loop-local");

        assert_eq!(child.resolve("user"), Some(Value::from("loop-local")));
        assert_eq!(ctx.resolve("user"), Some(Value::from("ada")));
    }

    #[test]
    fn test_macro_depth_limit() {
        let config = ScopeConfig::default().with_max_macro_depth(2);
        let mut ctx = ExecutionContext::new(template(), Store::flat(), &config);

        ctx.enter_macro(None).unwrap();
        let mut nested = ctx.child_for_macro();
        assert_eq!(nested.macro_depth(), 1);
        nested.enter_macro(None).unwrap();

        let token = Token::new("macros.html", 4, 2);
        let err = nested.enter_macro(Some(&token)).unwrap_err();
        assert_eq!(err.sender, Sender::Execution);
        assert_eq!((err.line, err.column), (4, 2));
        assert!(matches!(err.cause, ErrorCause::MacroDepthExceeded { limit: 2 }));
        assert_eq!(nested.macro_depth(), 2);

        nested.leave_macro();
        nested.leave_macro();
        nested.leave_macro();
        assert_eq!(nested.macro_depth(), 0);
        assert_eq!(ctx.child().macro_depth(), 0);
    }

    #[test]
    fn test_logf_goes_to_template_set() {
        test_logger::install();

        let set = Arc::new(TemplateSet::new("debugging").with_debug(true));
        let ctx = ExecutionContext::new(
            Template::new("page.html", set),
            Store::flat(),
            &ScopeConfig::default(),
        );
        ctx.logf(format_args!("resolved {} names", 3));

        assert!(test_logger::contains("[template set: debugging] resolved 3 names"));
    }
}
