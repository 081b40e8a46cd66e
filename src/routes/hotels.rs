use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::config::ServerConfig;
use crate::forms::rooms::{AddRoomForm, PackagesForm, UpdateRoomForm};
use crate::repository::DieselRepository;
use crate::routes::{base_context, insert_draft, redirect, render_template, today};
use crate::services::property::QuantityStep;
use crate::services::{Outcome, ServiceError, ServiceResult, property as property_service};
use crate::storage::DraftQuery;

/// Flash the outcome of a room or package change and go back.
fn finish(result: ServiceResult<Outcome>, fallback: &str, action: &str) -> HttpResponse {
    match result {
        Ok(outcome) => {
            FlashMessage::success(outcome.message).send();
            redirect(&outcome.redirect_to)
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(fallback)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("That room or package is no longer available.").send();
            redirect(fallback)
        }
        Err(err) => {
            log::error!("Failed to {action}: {err}");
            FlashMessage::error("Your selection could not be updated.").send();
            redirect(fallback)
        }
    }
}

#[get("/hotels/{hotel_id}")]
pub async fn show_hotel(
    req: HttpRequest,
    hotel_id: web::Path<i32>,
    session: Session,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let draft_query = DraftQuery::from_query_string(req.query_string());
    match property_service::load_property_page(
        repo.get_ref(),
        &session,
        hotel_id.into_inner(),
        draft_query,
        today(),
    ) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, "hotel", &server_config);
            insert_draft(&mut context, &data.draft, &data.summary);
            context.insert("hotel", &data.hotel);
            context.insert("rooms", &data.rooms);
            context.insert("packages", &data.packages);
            context.insert("meal_plans", &data.meal_plans);
            context.insert("in_wishlist", &data.in_wishlist);
            render_template(&tera, "hotels/show.html", &context)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Hotel not found.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to load the property page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/hotels/{hotel_id}/rooms")]
pub async fn add_room(
    hotel_id: web::Path<i32>,
    session: Session,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddRoomForm>,
) -> impl Responder {
    let hotel_id = hotel_id.into_inner();
    let result = property_service::add_room(repo.get_ref(), &session, hotel_id, form);
    finish(result, &format!("/hotels/{hotel_id}"), "add a room")
}

#[post("/rooms/{room_id}/update")]
pub async fn update_room(
    room_id: web::Path<u32>,
    session: Session,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<UpdateRoomForm>,
) -> impl Responder {
    let result =
        property_service::update_room(repo.get_ref(), &session, room_id.into_inner(), form);
    finish(result, "/", "update a room")
}

#[post("/rooms/{room_id}/remove")]
pub async fn remove_room(room_id: web::Path<u32>, session: Session) -> impl Responder {
    let result = property_service::remove_room(&session, room_id.into_inner());
    finish(result, "/", "remove a room")
}

#[post("/rooms/{room_id}/increment")]
pub async fn increment_room(room_id: web::Path<u32>, session: Session) -> impl Responder {
    let result = property_service::change_room_quantity(
        &session,
        room_id.into_inner(),
        QuantityStep::Increment,
    );
    finish(result, "/", "add a room")
}

#[post("/rooms/{room_id}/decrement")]
pub async fn decrement_room(room_id: web::Path<u32>, session: Session) -> impl Responder {
    let result = property_service::change_room_quantity(
        &session,
        room_id.into_inner(),
        QuantityStep::Decrement,
    );
    finish(result, "/", "take away a room")
}

/// Replace the selected packages. The checkbox list repeats `package_ids`,
/// so the raw body is decoded here instead of through `web::Form`.
#[post("/hotels/{hotel_id}/packages")]
pub async fn update_packages(
    hotel_id: web::Path<i32>,
    session: Session,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let hotel_id = hotel_id.into_inner();
    let fallback = format!("/hotels/{hotel_id}");
    let form = match PackagesForm::parse(&body) {
        Ok(form) => form,
        Err(err) => {
            log::warn!("Rejected package form: {err}");
            FlashMessage::error("Please check the form and try again.").send();
            return redirect(&fallback);
        }
    };
    let result = property_service::set_packages(repo.get_ref(), &session, hotel_id, form);
    finish(result, &fallback, "update packages")
}

#[post("/hotels/{hotel_id}/packages/{package_id}/toggle")]
pub async fn toggle_package(
    path: web::Path<(i32, i32)>,
    session: Session,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let (hotel_id, package_id) = path.into_inner();
    let result = property_service::toggle_package(repo.get_ref(), &session, hotel_id, package_id);
    finish(result, &format!("/hotels/{hotel_id}"), "toggle a package")
}
