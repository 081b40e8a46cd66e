use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::forms::{empty_string_as_none, sanitize_inline_text};

pub const MAX_ADULTS: u32 = 10;
pub const MAX_CHILDREN: u32 = 10;
pub const MAX_ROOMS: u32 = 5;
/// Longest stay that can be booked online.
pub const MAX_NIGHTS: i64 = 30;

pub type SearchFormResult<T> = Result<T, SearchFormError>;

/// Errors that can occur while processing the search form.
#[derive(Debug, Error)]
pub enum SearchFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("check-out must be after check-in")]
    CheckOutBeforeCheckIn,
    #[error("check-in cannot be in the past")]
    CheckInInPast,
    #[error("stays are limited to {MAX_NIGHTS} nights")]
    StayTooLong,
    #[error("every room needs at least one adult")]
    MoreRoomsThanAdults,
    #[error("a party may have up to {MAX_ADULTS} adults, {MAX_CHILDREN} children and {MAX_ROOMS} rooms")]
    PartyOutOfRange,
}

/// Form payload submitted from the search bar.
#[derive(Debug, Deserialize, Validate)]
pub struct SearchForm {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[validate(range(min = 1, max = MAX_ADULTS))]
    pub adults: u32,
    #[serde(default)]
    #[validate(range(max = MAX_CHILDREN))]
    pub children: u32,
    #[validate(range(min = 1, max = MAX_ROOMS))]
    pub rooms: u32,
    /// Optional city or hotel name to search for.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub city: Option<String>,
}

/// Validated search parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaySearch {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: u32,
    pub children: u32,
    pub rooms: u32,
    pub city: Option<String>,
}

impl SearchForm {
    /// Validate the form against `today` and convert it into a stay search.
    pub fn into_stay_search(self, today: NaiveDate) -> SearchFormResult<StaySearch> {
        self.validate()?;
        check_stay(self.check_in, self.check_out, today)?;
        check_party(self.adults, self.children, self.rooms)?;

        let city = self
            .city
            .as_deref()
            .map(sanitize_inline_text)
            .filter(|value| !value.is_empty());

        Ok(StaySearch {
            check_in: self.check_in,
            check_out: self.check_out,
            adults: self.adults,
            children: self.children,
            rooms: self.rooms,
            city,
        })
    }
}

/// Check-out follows check-in and the stay is not longer than [`MAX_NIGHTS`].
pub fn check_stay_length(check_in: NaiveDate, check_out: NaiveDate) -> SearchFormResult<()> {
    if check_out <= check_in {
        return Err(SearchFormError::CheckOutBeforeCheckIn);
    }
    if (check_out - check_in).num_days() > MAX_NIGHTS {
        return Err(SearchFormError::StayTooLong);
    }
    Ok(())
}

/// Full date rules of a bookable stay as seen on `today`.
pub fn check_stay(
    check_in: NaiveDate,
    check_out: NaiveDate,
    today: NaiveDate,
) -> SearchFormResult<()> {
    check_stay_length(check_in, check_out)?;
    if check_in < today {
        return Err(SearchFormError::CheckInInPast);
    }
    Ok(())
}

/// Party size limits; every room needs at least one adult.
pub fn check_party(adults: u32, children: u32, rooms: u32) -> SearchFormResult<()> {
    if !(1..=MAX_ADULTS).contains(&adults)
        || children > MAX_CHILDREN
        || !(1..=MAX_ROOMS).contains(&rooms)
    {
        return Err(SearchFormError::PartyOutOfRange);
    }
    if rooms > adults {
        return Err(SearchFormError::MoreRoomsThanAdults);
    }
    Ok(())
}
