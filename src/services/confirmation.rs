use serde::Serialize;

use crate::domain::booking::{Booking, BookingGuest};
use crate::domain::pricing::format_cents;
use crate::repository::{BookingReader, HotelReader};
use crate::services::{ServiceError, ServiceResult, hotel_display_name};
use crate::storage::DraftStorage;

/// Formatted money fields of a submitted booking.
#[derive(Debug, Serialize)]
pub struct BookingAmounts {
    pub room_subtotal: String,
    pub package_subtotal: String,
    pub discount: String,
    pub total: String,
}

/// Data required to render the confirmation page.
pub struct ConfirmationPageData {
    pub booking: Booking,
    pub hotel_name: String,
    pub amounts: BookingAmounts,
    /// The booking was submitted from the viewer's session.
    pub is_owner: bool,
}

/// Loads a submitted booking by its reference.
///
/// Guest contact details are blanked unless `storage` submitted the booking.
pub fn load_confirmation<R, S>(
    repo: &R,
    storage: &S,
    reference: &str,
) -> ServiceResult<ConfirmationPageData>
where
    R: BookingReader + HotelReader + ?Sized,
    S: DraftStorage + ?Sized,
{
    let reference = reference.trim().to_uppercase();
    let mut booking = repo
        .get_booking_by_reference(&reference)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let is_owner = match storage.load_last_booking() {
        Ok(last) => last.as_deref() == Some(booking.reference.as_str()),
        Err(err) => {
            log::warn!("Discarding stored booking reference: {err}");
            false
        }
    };
    if !is_owner {
        booking.guest = BookingGuest {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            nationality: String::new(),
            address: None,
        };
    }

    let amounts = BookingAmounts {
        room_subtotal: format_cents(booking.room_subtotal_cents),
        package_subtotal: format_cents(booking.package_subtotal_cents),
        discount: format_cents(booking.discount_cents),
        total: format_cents(booking.total_cents),
    };

    Ok(ConfirmationPageData {
        hotel_name: hotel_display_name(repo, Some(booking.hotel_id)),
        booking,
        amounts,
        is_owner,
    })
}
