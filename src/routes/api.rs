use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, Responder, get};
use serde::Serialize;

use crate::domain::draft::BookingDraft;
use crate::services::DraftSummary;
use crate::storage::{BookingContext, DraftQuery};

#[derive(Serialize)]
struct DraftSnapshot<'a> {
    draft: &'a BookingDraft,
    summary: DraftSummary,
}

#[get("/api/v1/draft")]
/// Return the current booking draft with its formatted summary as JSON.
///
/// Query parameters are merged into the draft exactly as on the HTML pages.
pub async fn api_v1_draft(req: HttpRequest, session: Session) -> impl Responder {
    let query = DraftQuery::from_query_string(req.query_string());
    let context = BookingContext::hydrate(&session, query);
    let draft = context.draft();
    HttpResponse::Ok().json(DraftSnapshot {
        draft,
        summary: DraftSummary::from_draft(draft),
    })
}
