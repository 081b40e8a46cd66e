use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, insert_draft, redirect, render_template};
use crate::services::{DraftSummary, ServiceError, wishlist as wishlist_service};
use crate::storage::{BookingContext, DraftQuery};

#[get("/wishlist")]
pub async fn show_wishlist(
    session: Session,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match wishlist_service::load_wishlist_page(repo.get_ref(), &session) {
        Ok(hotels) => {
            let draft = BookingContext::hydrate(&session, DraftQuery::default())
                .draft()
                .clone();
            let mut context = base_context(&flash_messages, "wishlist", &server_config);
            insert_draft(&mut context, &draft, &DraftSummary::from_draft(&draft));
            context.insert("hotels", &hotels);
            render_template(&tera, "wishlist/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to load the wishlist: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/wishlist/{hotel_id}")]
pub async fn toggle_wishlist(
    hotel_id: web::Path<i32>,
    session: Session,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match wishlist_service::toggle(repo.get_ref(), &session, hotel_id.into_inner()) {
        Ok(outcome) => {
            FlashMessage::success(outcome.message).send();
            redirect(&outcome.redirect_to)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Hotel not found.").send();
            redirect("/wishlist")
        }
        Err(err) => {
            log::error!("Failed to update the wishlist: {err}");
            redirect("/wishlist")
        }
    }
}
