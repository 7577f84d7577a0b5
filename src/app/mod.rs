//! Applications served by the gateway.
//!
//! An application receives the request context and a [`StartResponse`],
//! must call `begin_response` exactly once, and returns the response body.
//! The built-in applications are looked up by `<module>:<callable>`
//! references, e.g. `hello:app`.

pub mod environ;
pub mod hello;
pub mod static_files;

use std::sync::Arc;

use crate::config::Config;
use crate::http::body::Body;
use crate::http::context::RequestContext;
use crate::http::response::StartResponse;

pub trait Application: Send + Sync {
    fn call(&self, ctx: &RequestContext, start: &mut StartResponse) -> anyhow::Result<Body>;
}

impl<A: Application + ?Sized> Application for Arc<A> {
    fn call(&self, ctx: &RequestContext, start: &mut StartResponse) -> anyhow::Result<Body> {
        (**self).call(ctx, start)
    }
}

/// Wraps a closure as an [`Application`].
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: Fn(&RequestContext, &mut StartResponse) -> anyhow::Result<Body> + Send + Sync,
{
    FromFn { inner: f }
}

#[derive(Clone)]
pub struct FromFn<F> {
    inner: F,
}

impl<F> Application for FromFn<F>
where
    F: Fn(&RequestContext, &mut StartResponse) -> anyhow::Result<Body> + Send + Sync,
{
    fn call(&self, ctx: &RequestContext, start: &mut StartResponse) -> anyhow::Result<Body> {
        (self.inner)(ctx, start)
    }
}

/// References accepted by [`resolve`].
pub const BUILTIN: [&str; 3] = ["hello:app", "environ:app", "static:app"];

/// Resolves an application reference of the form `<module>:<callable>`.
pub fn resolve(reference: &str, cfg: &Config) -> anyhow::Result<Arc<dyn Application>> {
    let (module, callable) = reference.split_once(':').ok_or_else(|| {
        anyhow::anyhow!(
            "application reference `{}` must have the form module:callable",
            reference
        )
    })?;

    let app: Arc<dyn Application> = match (module, callable) {
        ("hello", "app") => Arc::new(hello::HelloApp),
        ("environ", "app") => Arc::new(environ::EnvironApp),
        ("static", "app") => Arc::new(static_files::StaticFiles::new(&cfg.static_files.root)),
        _ => anyhow::bail!(
            "unknown application `{}` (available: {})",
            reference,
            BUILTIN.join(", ")
        ),
    };

    tracing::info!(application = reference, "Application loaded");
    Ok(app)
}
