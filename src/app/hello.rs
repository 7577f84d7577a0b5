use crate::app::Application;
use crate::http::body::Body;
use crate::http::context::RequestContext;
use crate::http::response::{StartResponse, StatusCode};

pub const GREETING: &str = "Hello world from a simple application!\n";

/// Answers every request with a plain-text greeting.
#[derive(Debug, Clone, Copy, Default)]
pub struct HelloApp;

impl Application for HelloApp {
    fn call(&self, _ctx: &RequestContext, start: &mut StartResponse) -> anyhow::Result<Body> {
        start.begin_response(StatusCode::Ok.to_string(), [("Content-Type", "text/plain")])?;
        Ok(Body::from(GREETING))
    }
}
