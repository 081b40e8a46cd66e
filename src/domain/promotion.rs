use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Discount rule carried by a promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PromotionKind {
    /// Percentage taken off the room subtotal.
    Percentage { percent: u32 },
    /// Stay `min_nights`, get `free_nights` of them free.
    FreeNights { min_nights: u32, free_nights: u32 },
}

impl PromotionKind {
    /// Whether a stay of `nights` qualifies for this rule.
    pub fn is_eligible(&self, nights: u32) -> bool {
        match *self {
            PromotionKind::Percentage { percent } => nights > 0 && percent > 0,
            PromotionKind::FreeNights {
                min_nights,
                free_nights,
            } => min_nights > 0 && free_nights > 0 && nights >= min_nights,
        }
    }

    /// Discount in cents for a stay.
    ///
    /// `nightly_rooms_cents` is the cost of one night for every selected room
    /// (price times quantity), `room_subtotal_cents` the cost of the whole
    /// stay. Packages are never discounted. Ineligible stays get `0` and the
    /// discount never exceeds the room subtotal.
    pub fn discount_cents(
        &self,
        nightly_rooms_cents: i64,
        room_subtotal_cents: i64,
        nights: u32,
    ) -> i64 {
        if !self.is_eligible(nights) || room_subtotal_cents <= 0 {
            return 0;
        }

        let discount = match *self {
            PromotionKind::Percentage { percent } => {
                let percent = i64::from(percent.min(100));
                // round half up to a whole cent
                (room_subtotal_cents * percent + 50) / 100
            }
            PromotionKind::FreeNights {
                min_nights,
                free_nights,
            } => {
                let blocks = i64::from(nights / min_nights);
                nightly_rooms_cents * i64::from(free_nights) * blocks
            }
        };

        discount.clamp(0, room_subtotal_cents)
    }

    /// Short human-readable summary used in views.
    pub fn summary(&self) -> String {
        match *self {
            PromotionKind::Percentage { percent } => format!("{percent}% off rooms"),
            PromotionKind::FreeNights {
                min_nights,
                free_nights,
            } => format!("Stay {min_nights}, get {free_nights} free"),
        }
    }
}

/// Promotion record stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    pub id: i32,
    /// Hotel the promotion is limited to, `None` for every hotel.
    pub hotel_id: Option<i32>,
    /// Code typed in by guests, stored upper-case.
    pub code: String,
    pub description: String,
    pub kind: PromotionKind,
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Promotion {
    /// Whether the code may be redeemed for `hotel_id` on `today`.
    pub fn is_redeemable(&self, hotel_id: Option<i32>, today: NaiveDate) -> bool {
        if !self.is_active {
            return false;
        }
        if self.valid_from.is_some_and(|from| today < from) {
            return false;
        }
        if self.valid_to.is_some_and(|to| today > to) {
            return false;
        }
        match self.hotel_id {
            None => true,
            Some(scope) => hotel_id == Some(scope),
        }
    }

    /// Snapshot of the promotion that is copied into a booking draft.
    pub fn to_applied(&self) -> AppliedPromotion {
        AppliedPromotion {
            code: self.code.clone(),
            description: self.description.clone(),
            kind: self.kind,
        }
    }
}

/// Resolved promotion details kept on the booking draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedPromotion {
    pub code: String,
    pub description: String,
    pub kind: PromotionKind,
}

/// Normalise a promotion code the way codes are stored.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}
