use crate::domain::hotel::Hotel;
use crate::repository::HotelReader;
use crate::services::{Outcome, ServiceError, ServiceResult};
use crate::storage::{DraftStorage, load_wishlist, toggle_wishlist};

/// Hotels on the guest's wishlist, in the order they were added. Hotels
/// that can no longer be loaded are skipped.
pub fn load_wishlist_page<R, S>(repo: &R, storage: &S) -> ServiceResult<Vec<Hotel>>
where
    R: HotelReader + ?Sized,
    S: DraftStorage + ?Sized,
{
    let hotels = load_wishlist(storage)
        .into_iter()
        .filter_map(|hotel_id| match repo.get_hotel_by_id(hotel_id) {
            Ok(hotel) => hotel,
            Err(err) => {
                log::error!("Failed to load wishlisted hotel {hotel_id}: {err}");
                None
            }
        })
        .collect();
    Ok(hotels)
}

/// Adds the hotel to the wishlist or removes it when already there.
pub fn toggle<R, S>(repo: &R, storage: &S, hotel_id: i32) -> ServiceResult<Outcome>
where
    R: HotelReader + ?Sized,
    S: DraftStorage + ?Sized,
{
    let hotel = repo
        .get_hotel_by_id(hotel_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let message = if toggle_wishlist(storage, hotel.id) {
        format!("{} saved to your wishlist.", hotel.name)
    } else {
        format!("{} removed from your wishlist.", hotel.name)
    };
    Ok(Outcome::new(message, format!("/hotels/{}", hotel.id)))
}
