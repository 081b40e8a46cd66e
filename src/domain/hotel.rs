use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// Hotel listed on the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    /// Unique identifier of the hotel.
    pub id: i32,
    /// Display name.
    pub name: String,
    /// City used for searching.
    pub city: String,
    /// Street address shown on the property page.
    pub address: Option<String>,
    /// Longer marketing description.
    pub description: Option<String>,
    /// Star rating, `0` when unrated.
    pub stars: i32,
    /// ISO 4217 currency code the hotel prices in.
    pub currency: String,
    /// Inactive hotels are hidden from search.
    pub is_active: bool,
    /// Timestamp for when the hotel record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the hotel record.
    pub updated_at: NaiveDateTime,
}

/// Bookable room type belonging to a hotel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomType {
    pub id: i32,
    pub hotel_id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Largest party a single room of this type accepts.
    pub max_occupancy: i32,
}

/// Board basis a rate is sold with, e.g. room only or bed & breakfast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealPlan {
    pub id: i32,
    /// Short code such as `RO`, `BB` or `HB`.
    pub code: String,
    pub name: String,
}

/// Nightly price of a room type for a meal plan and occupancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRate {
    pub id: i32,
    pub room_type_id: i32,
    pub meal_plan_id: i32,
    /// Number of guests the price is quoted for.
    pub occupancy: i32,
    /// Nightly price in the smallest currency unit.
    pub price_cents: i64,
}

/// Add-on package offered by a hotel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub id: i32,
    pub hotel_id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Flat price of the package in the smallest currency unit.
    pub price_cents: i64,
}

/// Query definition used to search hotels.
#[derive(Debug, Clone, Default)]
pub struct HotelListQuery {
    /// Optional case-insensitive substring matched against name and city.
    pub search: Option<String>,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl HotelListQuery {
    /// Construct a query matching every active hotel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter the results by a search term applied to name and city.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Find the nightly rate of `room_type_id` on `meal_plan_id` for a party of
/// `occupancy`.
///
/// An exact occupancy tier wins; otherwise the smallest tier that still fits
/// the party is used. Returns `None` when no tier fits.
pub fn rate_for(
    rates: &[RoomRate],
    room_type_id: i32,
    meal_plan_id: i32,
    occupancy: i32,
) -> Option<&RoomRate> {
    rates
        .iter()
        .filter(|rate| rate.room_type_id == room_type_id && rate.meal_plan_id == meal_plan_id)
        .filter(|rate| rate.occupancy >= occupancy)
        .min_by_key(|rate| rate.occupancy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(id: i32, meal_plan_id: i32, occupancy: i32, price_cents: i64) -> RoomRate {
        RoomRate {
            id,
            room_type_id: 1,
            meal_plan_id,
            occupancy,
            price_cents,
        }
    }

    #[test]
    fn rate_for_prefers_exact_occupancy() {
        let rates = vec![rate(1, 1, 1, 8_000), rate(2, 1, 2, 10_000), rate(3, 2, 2, 12_000)];
        assert_eq!(rate_for(&rates, 1, 1, 2).map(|r| r.id), Some(2));
        assert_eq!(rate_for(&rates, 1, 2, 2).map(|r| r.id), Some(3));
    }

    #[test]
    fn rate_for_falls_back_to_next_larger_tier() {
        let rates = vec![rate(1, 1, 2, 10_000), rate(2, 1, 4, 16_000)];
        assert_eq!(rate_for(&rates, 1, 1, 3).map(|r| r.id), Some(2));
        assert_eq!(rate_for(&rates, 1, 1, 1).map(|r| r.id), Some(1));
    }

    #[test]
    fn rate_for_returns_none_when_party_too_large() {
        let rates = vec![rate(1, 1, 2, 10_000)];
        assert!(rate_for(&rates, 1, 1, 3).is_none());
        assert!(rate_for(&rates, 9, 1, 1).is_none());
    }
}
