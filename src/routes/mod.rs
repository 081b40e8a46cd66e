use actix_web::error::{InternalError, UrlencodedError};
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use chrono::NaiveDate;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::ServerConfig;
use crate::domain::booking::IncompleteDraft;
use crate::domain::draft::BookingDraft;
use crate::services::DraftSummary;

pub mod api;
pub mod booking;
pub mod hotels;
pub mod main;
pub mod wishlist;

/// Flash message as rendered by `base.html`.
#[derive(Debug, Serialize)]
struct Alert {
    level: &'static str,
    message: String,
}

fn alert_level(level: Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        Level::Info | Level::Debug => "info",
    }
}

/// Template context shared by every page: flash alerts, the active page and
/// the booking summary sidebar.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    current_page: &str,
    server_config: &ServerConfig,
) -> Context {
    let alerts: Vec<Alert> = flash_messages
        .iter()
        .map(|message| Alert {
            level: alert_level(message.level()),
            message: message.content().to_string(),
        })
        .collect();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    context.insert("currency", &server_config.currency);
    context
}

/// Add the draft and its formatted summary to `context`.
pub fn insert_draft(context: &mut Context, draft: &BookingDraft, summary: &DraftSummary) {
    context.insert("draft", draft);
    context.insert("summary", summary);
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template {template}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// `303 See Other` to `location`, so the browser follows up with a GET.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Send the guest to the step that fills in the first missing part.
pub fn redirect_incomplete(incomplete: &IncompleteDraft) -> HttpResponse {
    let location = match incomplete.missing.first().copied() {
        Some("guest details") => "/details",
        Some("payment method") => "/payment",
        _ => "/",
    };
    FlashMessage::warning(format!("Your {incomplete}.")).send();
    redirect(location)
}

/// Today in the server's local time zone.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Turns a form that cannot be decoded into a flash message and a redirect
/// back to the page it came from.
pub fn form_error_handler(err: UrlencodedError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected form posted to {}: {err}", req.path());
    let back = req
        .headers()
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(referer_path)
        .unwrap_or("/");
    FlashMessage::error("Please check the form and try again.").send();
    InternalError::from_response(err, redirect(back)).into()
}

/// Path and query of an absolute referer URL; only local paths are used for
/// redirects.
fn referer_path(referer: &str) -> Option<&str> {
    let (_, rest) = referer.split_once("://")?;
    let path = &rest[rest.find('/')?..];
    (!path.starts_with("//")).then_some(path)
}
