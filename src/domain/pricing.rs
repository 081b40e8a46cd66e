use serde::{Deserialize, Serialize};

use crate::domain::draft::{PackageSelection, RoomSelection};
use crate::domain::promotion::PromotionKind;

/// Derived money fields of a booking draft. All amounts are in cents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftTotals {
    pub nights: u32,
    pub room_subtotal_cents: i64,
    pub package_subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
}

/// Price a stay: rooms times nights times quantity, plus packages, minus the
/// promotion discount when the stay is eligible for it.
pub fn price_breakdown(
    rooms: &[RoomSelection],
    packages: &[PackageSelection],
    nights: u32,
    promotion: Option<&PromotionKind>,
) -> DraftTotals {
    let nightly_rooms_cents: i64 = rooms
        .iter()
        .map(|room| room.price_cents * i64::from(room.quantity))
        .sum();
    let room_subtotal_cents = nightly_rooms_cents * i64::from(nights);
    let package_subtotal_cents: i64 = packages.iter().map(|package| package.price_cents).sum();

    let discount_cents = promotion
        .map(|kind| kind.discount_cents(nightly_rooms_cents, room_subtotal_cents, nights))
        .unwrap_or(0);

    DraftTotals {
        nights,
        room_subtotal_cents,
        package_subtotal_cents,
        discount_cents,
        total_cents: room_subtotal_cents + package_subtotal_cents - discount_cents,
    }
}

/// Render an amount in cents as a decimal string, e.g. `65000` -> `"650.00"`.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}
