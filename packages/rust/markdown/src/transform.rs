//! Body transforms and the ordered chain that runs them.

use std::fmt;
use std::path::Path;

use tracing::debug;

use llmsgen_shared::{LlmsGenError, Metadata, Result};

/// Side context handed to every transform step.
#[derive(Debug, Clone, Copy)]
pub struct TransformContext<'a> {
    /// The document's original frontmatter, before any remapping.
    pub frontmatter: &'a Metadata,
    /// Source path of the document being rewritten.
    pub path: &'a Path,
}

/// A single body rewriting step.
pub trait Transform {
    /// Short name used in logs and error messages.
    fn name(&self) -> &str;

    /// Rewrite `body`, returning the new body.
    fn apply(&self, body: &str, ctx: &TransformContext<'_>) -> Result<String>;
}

/// A [`Transform`] backed by a closure.
pub struct FnTransform<F> {
    name: String,
    f: F,
}

/// Wrap a closure as a named transform.
pub fn transform_fn<F>(name: impl Into<String>, f: F) -> FnTransform<F>
where
    F: Fn(&str, &TransformContext<'_>) -> Result<String>,
{
    FnTransform {
        name: name.into(),
        f,
    }
}

impl<F> Transform for FnTransform<F>
where
    F: Fn(&str, &TransformContext<'_>) -> Result<String>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, body: &str, ctx: &TransformContext<'_>) -> Result<String> {
        (self.f)(body, ctx)
    }
}

// ---------------------------------------------------------------------------
// Chain
// ---------------------------------------------------------------------------

/// Ordered transforms, applied left to right; each step sees the previous step's output.
#[derive(Default)]
pub struct TransformChain {
    steps: Vec<Box<dyn Transform>>,
}

impl TransformChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step to the end of the chain.
    pub fn push(&mut self, step: impl Transform + 'static) {
        self.steps.push(Box::new(step));
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, step: impl Transform + 'static) -> Self {
        self.push(step);
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step names in application order.
    pub fn names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run every step over `body`. The first failure aborts the chain.
    ///
    /// Errors that are not already transform errors are wrapped with the
    /// failing step's name.
    pub fn run(&self, body: &str, ctx: &TransformContext<'_>) -> Result<String> {
        let mut current = body.to_string();

        for step in &self.steps {
            current = step.apply(&current, ctx).map_err(|e| match e {
                LlmsGenError::Transform { .. } => e,
                other => LlmsGenError::transform(step.name(), other.to_string()),
            })?;
            debug!(step = step.name(), len = current.len(), "transform applied");
        }

        Ok(current)
    }
}

impl fmt::Debug for TransformChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformChain")
            .field("steps", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    fn replace(from: &'static str, to: &'static str) -> impl Transform {
        transform_fn(format!("{from}->{to}"), move |body: &str, _: &TransformContext<'_>| {
            Ok(body.replace(from, to))
        })
    }

    fn ctx(meta: &Metadata) -> TransformContext<'_> {
        TransformContext {
            frontmatter: meta,
            path: Path::new("doc.md"),
        }
    }

    #[test]
    fn steps_compose_in_order() {
        let meta = Metadata::new();
        let chain = TransformChain::new()
            .with(replace("X", "Y"))
            .with(replace("Y", "Z"));

        let out = chain.run("before X after", &ctx(&meta)).unwrap();
        assert_eq!(out, "before Z after");
        assert_eq!(chain.names(), ["X->Y", "Y->Z"]);
    }

    #[test]
    fn reversed_order_changes_result() {
        let meta = Metadata::new();
        let chain = TransformChain::new()
            .with(replace("Y", "Z"))
            .with(replace("X", "Y"));

        assert_eq!(chain.run("X", &ctx(&meta)).unwrap(), "Y");
    }

    #[test]
    fn empty_chain_is_identity() {
        let meta = Metadata::new();
        let chain = TransformChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.run("body", &ctx(&meta)).unwrap(), "body");
    }

    #[test]
    fn steps_see_frontmatter() {
        let mut meta = Metadata::new();
        meta.insert(Value::from("title"), Value::from("Hello"));

        let chain = TransformChain::new().with(transform_fn(
            "stamp",
            |body: &str, ctx: &TransformContext<'_>| {
                let title = ctx
                    .frontmatter
                    .get("title")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                Ok(format!("{title}: {body}"))
            },
        ));

        assert_eq!(chain.run("world", &ctx(&meta)).unwrap(), "Hello: world");
    }

    #[test]
    fn failure_names_step_and_stops_chain() {
        let meta = Metadata::new();
        let chain = TransformChain::new()
            .with(transform_fn("explode", |_: &str, _: &TransformContext<'_>| {
                Err(LlmsGenError::parse("no good"))
            }))
            .with(transform_fn("unreachable", |_: &str, _: &TransformContext<'_>| {
                panic!("chain continued after failure")
            }));

        let err = chain.run("body", &ctx(&meta)).unwrap_err();
        match err {
            LlmsGenError::Transform { step, message } => {
                assert_eq!(step, "explode");
                assert!(message.contains("no good"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
