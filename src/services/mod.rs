use serde::Serialize;
use thiserror::Error;

use crate::domain::booking::IncompleteDraft;
use crate::domain::draft::BookingDraft;
use crate::domain::pricing::format_cents;
use crate::repository::{HotelReader, RepositoryError};

pub mod confirmation;
pub mod details;
pub mod payment;
pub mod promotions;
pub mod property;
pub mod search;
pub mod wishlist;

/// Errors surfaced by page services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The requested hotel, room or booking does not exist.
    #[error("not found")]
    NotFound,
    /// User input was rejected; the message is shown to the guest.
    #[error("{0}")]
    Form(String),
    /// The draft lacks something the page needs.
    #[error(transparent)]
    Incomplete(#[from] IncompleteDraft),
    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Repository(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Result of a form submission: a flash message and where to go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub message: String,
    pub redirect_to: String,
}

impl Outcome {
    pub fn new(message: impl Into<String>, redirect_to: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            redirect_to: redirect_to.into(),
        }
    }
}

/// Where the guest should continue browsing after changing their selection.
pub(crate) fn hotel_page_or_home(draft: &BookingDraft) -> String {
    match draft.hotel_id {
        Some(hotel_id) => format!("/hotels/{hotel_id}"),
        None => "/".to_string(),
    }
}

/// Shown when the hotel of a draft or booking cannot be loaded.
pub const UNKNOWN_HOTEL_NAME: &str = "Hotel Name Unavailable";

/// Name of the hotel, or a placeholder when it cannot be loaded.
pub(crate) fn hotel_display_name<R>(repo: &R, hotel_id: Option<i32>) -> String
where
    R: HotelReader + ?Sized,
{
    let Some(hotel_id) = hotel_id else {
        return UNKNOWN_HOTEL_NAME.to_string();
    };
    match repo.get_hotel_by_id(hotel_id) {
        Ok(Some(hotel)) => hotel.name,
        Ok(None) => UNKNOWN_HOTEL_NAME.to_string(),
        Err(err) => {
            log::error!("Failed to load hotel {hotel_id}: {err}");
            UNKNOWN_HOTEL_NAME.to_string()
        }
    }
}

/// Room line of the booking summary.
#[derive(Debug, Serialize)]
pub struct RoomLineView {
    pub id: u32,
    pub room_type_id: i32,
    pub name: String,
    pub quantity: u32,
    pub occupancy: u32,
    pub meal_plan_id: Option<i32>,
    pub nightly_price: String,
    pub line_total: String,
}

/// Package line of the booking summary.
#[derive(Debug, Serialize)]
pub struct PackageLineView {
    pub id: i32,
    pub description: String,
    pub price: String,
}

/// Promotion shown in the booking summary.
#[derive(Debug, Serialize)]
pub struct PromotionView {
    pub code: String,
    pub description: String,
    pub summary: String,
    /// Whether the current stay qualifies for the discount.
    pub eligible: bool,
}

/// Formatted booking summary rendered in the sidebar of every page.
#[derive(Debug, Serialize)]
pub struct DraftSummary {
    pub nights: u32,
    pub guests: u32,
    pub rooms: Vec<RoomLineView>,
    pub packages: Vec<PackageLineView>,
    pub room_subtotal: String,
    pub package_subtotal: String,
    pub discount: String,
    pub total: String,
    pub promotion: Option<PromotionView>,
}

impl DraftSummary {
    pub fn from_draft(draft: &BookingDraft) -> Self {
        let nights = draft.nights();
        Self {
            nights,
            guests: draft.guests,
            rooms: draft
                .rooms
                .iter()
                .map(|room| RoomLineView {
                    id: room.id,
                    room_type_id: room.room_type_id,
                    name: room.name.clone(),
                    quantity: room.quantity,
                    occupancy: room.occupancy,
                    meal_plan_id: room.meal_plan_id,
                    nightly_price: format_cents(room.price_cents),
                    line_total: format_cents(
                        room.price_cents * i64::from(room.quantity) * i64::from(nights),
                    ),
                })
                .collect(),
            packages: draft
                .packages
                .iter()
                .map(|package| PackageLineView {
                    id: package.id,
                    description: package.description.clone(),
                    price: format_cents(package.price_cents),
                })
                .collect(),
            room_subtotal: format_cents(draft.totals.room_subtotal_cents),
            package_subtotal: format_cents(draft.totals.package_subtotal_cents),
            discount: format_cents(draft.totals.discount_cents),
            total: format_cents(draft.totals.total_cents),
            promotion: draft.promotion.as_ref().map(|promotion| PromotionView {
                code: promotion.code.clone(),
                description: promotion.description.clone(),
                summary: promotion.kind.summary(),
                eligible: promotion.kind.is_eligible(nights),
            }),
        }
    }
}
