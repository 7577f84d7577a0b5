use crate::app::Application;
use crate::http::body::Body;
use crate::http::context::RequestContext;
use crate::http::response::{StartResponse, StatusCode};

/// Dumps the request context as `key = value` lines, sorted by key.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvironApp;

impl Application for EnvironApp {
    fn call(&self, ctx: &RequestContext, start: &mut StartResponse) -> anyhow::Result<Body> {
        let mut out = String::new();
        for key in ctx.keys() {
            if let Some(value) = ctx.get(key) {
                out.push_str(&format!("{} = {}\n", key, value));
            }
        }

        start.begin_response(
            StatusCode::Ok.to_string(),
            [
                ("Content-Type".to_string(), "text/plain".to_string()),
                ("Content-Length".to_string(), out.len().to_string()),
            ],
        )?;
        Ok(Body::from(out))
    }
}
