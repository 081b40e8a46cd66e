use crate::db::{DbConnection, DbPool};
use crate::domain::booking::{Booking, NewBooking};
use crate::domain::hotel::{Hotel, HotelListQuery, MealPlan, Package, RoomRate, RoomType};
use crate::domain::promotion::Promotion;

pub mod booking;
pub mod errors;
pub mod hotel;
pub mod package;
pub mod promotion;
pub mod room;

#[cfg(test)]
pub mod mock;

pub use errors::{RepositoryError, RepositoryResult};

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over hotels.
pub trait HotelReader {
    fn get_hotel_by_id(&self, id: i32) -> RepositoryResult<Option<Hotel>>;
    fn list_hotels(&self, query: HotelListQuery) -> RepositoryResult<(usize, Vec<Hotel>)>;
}

/// Read-only operations over room types, meal plans and their rates.
pub trait RoomReader {
    fn get_room_type_by_id(&self, id: i32) -> RepositoryResult<Option<RoomType>>;
    fn list_room_types(&self, hotel_id: i32) -> RepositoryResult<Vec<RoomType>>;
    fn list_room_rates(&self, hotel_id: i32) -> RepositoryResult<Vec<RoomRate>>;
    fn list_meal_plans(&self) -> RepositoryResult<Vec<MealPlan>>;
}

/// Read-only operations over add-on packages.
pub trait PackageReader {
    fn list_packages(&self, hotel_id: i32) -> RepositoryResult<Vec<Package>>;
}

/// Read-only operations over promotions.
pub trait PromotionReader {
    /// Look up a promotion by its normalised (upper-case) code.
    fn get_promotion_by_code(&self, code: &str) -> RepositoryResult<Option<Promotion>>;
}

/// Read-only operations over submitted bookings.
pub trait BookingReader {
    fn get_booking_by_reference(&self, reference: &str) -> RepositoryResult<Option<Booking>>;
}

/// Write operations over bookings.
pub trait BookingWriter {
    /// Store the booking with its room and package lines in one transaction.
    fn create_booking(&self, new_booking: &NewBooking) -> RepositoryResult<Booking>;
}
