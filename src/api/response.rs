use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use minijinja::Environment;
use once_cell::sync::Lazy;
use serde::Serialize;
use tracing::error as log_error;

use crate::api::models::{ErrorPage, FilePage, IndexPage};
use crate::error::Result;
use crate::upload::UploadOutcome;

// Templates are compiled into the binary and parsed once
static TEMPLATES: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.add_template("base.html", include_str!("../../templates/base.html"))
        .expect("Failed to parse base template");
    env.add_template("index.html", include_str!("../../templates/index.html"))
        .expect("Failed to parse index template");
    env.add_template("file.html", include_str!("../../templates/file.html"))
        .expect("Failed to parse file template");
    env.add_template("error.html", include_str!("../../templates/error.html"))
        .expect("Failed to parse error template");
    env
});

fn render<S: Serialize>(name: &str, context: S) -> Result<String> {
    let template = TEMPLATES.get_template(name)?;
    Ok(template.render(context)?)
}

fn page(status: StatusCode, rendered: Result<String>) -> Response {
    match rendered {
        Ok(body) => (status, Html(body)).into_response(),
        Err(err) => {
            log_error!("Template rendering failed: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

pub fn index(prompt: &str) -> Response {
    page(StatusCode::OK, render("index.html", IndexPage { prompt }))
}

pub fn success(outcome: UploadOutcome) -> Response {
    page(StatusCode::OK, render("file.html", FilePage::from(outcome)))
}

pub fn error(status: StatusCode, message: &str, prompt: Option<&str>) -> Response {
    let context = ErrorPage {
        error: message,
        status_code: status.as_u16(),
        prompt,
    };
    page(status, render("error.html", context))
}
