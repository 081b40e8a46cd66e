use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::config::ServerConfig;
use crate::forms::search::SearchForm;
use crate::repository::DieselRepository;
use crate::routes::{base_context, insert_draft, redirect, render_template, today};
use crate::services::search::SearchQuery;
use crate::services::{ServiceError, search as search_service};
use crate::storage::DraftQuery;

#[get("/")]
pub async fn show_index(
    req: HttpRequest,
    params: web::Query<SearchQuery>,
    session: Session,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let draft_query = DraftQuery::from_query_string(req.query_string());
    match search_service::load_search_page(repo.get_ref(), &session, draft_query, params.0) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, "index", &server_config);
            insert_draft(&mut context, &data.draft, &data.summary);
            context.insert("hotels", &data.hotels);
            context.insert("search", &data.search);
            context.insert("wishlist", &data.wishlist);
            render_template(&tera, "main/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to load the search page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/search")]
pub async fn search(session: Session, web::Form(form): web::Form<SearchForm>) -> impl Responder {
    match search_service::submit_search(&session, form, today()) {
        Ok(outcome) => {
            FlashMessage::info(outcome.message).send();
            redirect(&outcome.redirect_to)
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to store the search: {err}");
            FlashMessage::error("Search could not be saved.").send();
            redirect("/")
        }
    }
}
