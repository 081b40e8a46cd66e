use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::config::ServerConfig;
use crate::forms::guest::GuestDetailsForm;
use crate::forms::payment::PaymentForm;
use crate::forms::promo::PromoCodeForm;
use crate::repository::DieselRepository;
use crate::routes::{
    base_context, insert_draft, redirect, redirect_incomplete, render_template, today,
};
use crate::services::{
    ServiceError, confirmation as confirmation_service, details as details_service,
    payment as payment_service, promotions as promotions_service,
};
use crate::storage::DraftQuery;

#[post("/promo")]
pub async fn apply_promo(
    session: Session,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<PromoCodeForm>,
) -> impl Responder {
    match promotions_service::apply_promo_code(repo.get_ref(), &session, form, today()) {
        Ok(outcome) => {
            FlashMessage::success(outcome.message).send();
            redirect(&outcome.redirect_to)
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&current_page(&session))
        }
        Err(err) => {
            log::error!("Failed to apply a promotion code: {err}");
            FlashMessage::error("The promotion code could not be checked.").send();
            redirect(&current_page(&session))
        }
    }
}

#[post("/promo/clear")]
pub async fn clear_promo(session: Session) -> impl Responder {
    match promotions_service::clear_promo_code(&session) {
        Ok(outcome) => {
            FlashMessage::info(outcome.message).send();
            redirect(&outcome.redirect_to)
        }
        Err(err) => {
            log::error!("Failed to clear the promotion code: {err}");
            redirect("/")
        }
    }
}

/// Property page of the draft's hotel, or the search page.
fn current_page(session: &Session) -> String {
    let context = crate::storage::BookingContext::hydrate(session, DraftQuery::default());
    crate::services::hotel_page_or_home(context.draft())
}

#[get("/details")]
pub async fn show_details(
    req: HttpRequest,
    session: Session,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let draft_query = DraftQuery::from_query_string(req.query_string());
    match details_service::load_details_page(&session, draft_query) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, "details", &server_config);
            insert_draft(&mut context, &data.draft, &data.summary);
            context.insert("guest", &data.draft.guest);
            render_template(&tera, "booking/details.html", &context)
        }
        Err(ServiceError::Incomplete(incomplete)) => redirect_incomplete(&incomplete),
        Err(err) => {
            log::error!("Failed to load the details page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/details")]
pub async fn save_details(
    session: Session,
    web::Form(form): web::Form<GuestDetailsForm>,
) -> impl Responder {
    match details_service::save_guest_details(&session, form) {
        Ok(outcome) => redirect(&outcome.redirect_to),
        Err(ServiceError::Incomplete(incomplete)) => redirect_incomplete(&incomplete),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/details")
        }
        Err(err) => {
            log::error!("Failed to save guest details: {err}");
            FlashMessage::error("Your details could not be saved.").send();
            redirect("/details")
        }
    }
}

#[get("/payment")]
pub async fn show_payment(
    req: HttpRequest,
    session: Session,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let draft_query = DraftQuery::from_query_string(req.query_string());
    match payment_service::load_payment_page(repo.get_ref(), &session, draft_query) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, "payment", &server_config);
            insert_draft(&mut context, &data.draft, &data.summary);
            context.insert("hotel_name", &data.hotel_name);
            context.insert("methods", &data.methods);
            render_template(&tera, "booking/payment.html", &context)
        }
        Err(ServiceError::Incomplete(incomplete)) => redirect_incomplete(&incomplete),
        Err(err) => {
            log::error!("Failed to load the payment page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/payment")]
pub async fn submit_payment(
    session: Session,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<PaymentForm>,
) -> impl Responder {
    match payment_service::submit_booking(
        repo.get_ref(),
        &session,
        form,
        &server_config.currency,
        today(),
    ) {
        Ok(booking) => {
            FlashMessage::success(format!("Booking {} received.", booking.reference)).send();
            redirect(&format!("/confirmation/{}", booking.reference))
        }
        Err(ServiceError::Incomplete(incomplete)) => redirect_incomplete(&incomplete),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/payment")
        }
        Err(err) => {
            log::error!("Failed to submit a booking: {err}");
            FlashMessage::error("Your booking could not be submitted. Please try again.").send();
            redirect("/payment")
        }
    }
}

#[get("/confirmation/{reference}")]
pub async fn show_confirmation(
    reference: web::Path<String>,
    session: Session,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match confirmation_service::load_confirmation(repo.get_ref(), &session, &reference) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, "confirmation", &server_config);
            context.insert("booking", &data.booking);
            context.insert("hotel_name", &data.hotel_name);
            context.insert("amounts", &data.amounts);
            context.insert("is_owner", &data.is_owner);
            context.insert("payment_label", data.booking.payment_method.label());
            render_template(&tera, "booking/confirmation.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().body("Booking not found"),
        Err(err) => {
            log::error!("Failed to load booking {reference}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
