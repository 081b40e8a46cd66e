//! The booking draft carried through the guest journey and the pure reducer
//! that evolves it.
//!
//! Every mutation goes through [`reduce`], which returns a new snapshot with
//! the derived fields (guest count, nights, totals, stage) recomputed. A
//! transition that leaves the draft unchanged reports `changed == false` so
//! callers can skip persisting it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::booking::PaymentMethod;
use crate::domain::pricing::{DraftTotals, price_breakdown};
use crate::domain::promotion::AppliedPromotion;

pub const DEFAULT_ADULTS: u32 = 2;
pub const DEFAULT_CHILDREN: u32 = 0;
pub const DEFAULT_ROOM_COUNT: u32 = 1;
/// Most rooms a single room line may carry.
pub const MAX_ROOM_QUANTITY: u32 = 10;

/// Where the guest is in the booking journey.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DraftStatus {
    /// No rooms selected yet.
    #[default]
    Searching,
    /// At least one room is selected.
    RoomsSelected,
    /// Rooms selected and guest details complete.
    DetailsCompleted,
    /// Everything needed to submit the booking is present.
    ReadyToPay,
    /// The booking was submitted under `booking_reference`.
    Submitted,
}

/// A room type picked on the property page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSelection {
    /// Line identifier, unique within the draft.
    pub id: u32,
    pub room_type_id: i32,
    pub name: String,
    pub quantity: u32,
    /// Nightly price per room in cents.
    pub price_cents: i64,
    pub meal_plan_id: Option<i32>,
    /// Guests per room the price was quoted for.
    pub occupancy: u32,
}

impl RoomSelection {
    fn same_offer(&self, other: &NewRoomSelection) -> bool {
        self.room_type_id == other.room_type_id
            && self.meal_plan_id == other.meal_plan_id
            && self.occupancy == other.occupancy
    }
}

/// Room about to be added to the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoomSelection {
    pub room_type_id: i32,
    pub name: String,
    pub price_cents: i64,
    pub meal_plan_id: Option<i32>,
    pub occupancy: u32,
}

/// Field changes for a selected room; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomPatch {
    pub name: Option<String>,
    pub quantity: Option<u32>,
    pub price_cents: Option<i64>,
    pub meal_plan_id: Option<Option<i32>>,
    pub occupancy: Option<u32>,
}

/// An add-on package picked on the property page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSelection {
    pub id: i32,
    pub description: String,
    pub price_cents: i64,
}

/// Contact and identity fields of the lead guest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuestDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub nationality: String,
    pub address: Option<String>,
}

impl GuestDetails {
    /// Every mandatory field is filled in.
    pub fn is_complete(&self) -> bool {
        [
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.phone,
            &self.nationality,
        ]
        .iter()
        .all(|value| !value.trim().is_empty())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// In-progress reservation shared by every page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingDraft {
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub adults: u32,
    pub children: u32,
    pub room_count: u32,
    /// Derived: adults plus children.
    pub guests: u32,
    pub hotel_id: Option<i32>,
    pub rooms: Vec<RoomSelection>,
    pub packages: Vec<PackageSelection>,
    /// Code requested by the guest, possibly not resolved yet.
    pub promo_code: Option<String>,
    /// Resolved promotion the totals are computed with.
    pub promotion: Option<AppliedPromotion>,
    pub guest: GuestDetails,
    /// Derived from rooms, packages, dates and promotion.
    pub totals: DraftTotals,
    pub payment_method: Option<PaymentMethod>,
    pub booking_reference: Option<String>,
    /// Derived stage of the journey.
    pub status: DraftStatus,
}

impl Default for BookingDraft {
    fn default() -> Self {
        Self {
            check_in: None,
            check_out: None,
            adults: DEFAULT_ADULTS,
            children: DEFAULT_CHILDREN,
            room_count: DEFAULT_ROOM_COUNT,
            guests: DEFAULT_ADULTS + DEFAULT_CHILDREN,
            hotel_id: None,
            rooms: Vec::new(),
            packages: Vec::new(),
            promo_code: None,
            promotion: None,
            guest: GuestDetails::default(),
            totals: DraftTotals::default(),
            payment_method: None,
            booking_reference: None,
            status: DraftStatus::Searching,
        }
    }
}

impl BookingDraft {
    pub fn nights(&self) -> u32 {
        self.totals.nights
    }

    pub fn room(&self, id: u32) -> Option<&RoomSelection> {
        self.rooms.iter().find(|room| room.id == id)
    }

    fn room_mut(&mut self, id: u32) -> Option<&mut RoomSelection> {
        self.rooms.iter_mut().find(|room| room.id == id)
    }

    fn next_room_id(&self) -> u32 {
        self.rooms.iter().map(|room| room.id).max().unwrap_or(0) + 1
    }

    fn stage(&self) -> DraftStatus {
        if self.booking_reference.is_some() {
            DraftStatus::Submitted
        } else if self.rooms.is_empty() {
            DraftStatus::Searching
        } else if !self.guest.is_complete() {
            DraftStatus::RoomsSelected
        } else if self.payment_method.is_none() {
            DraftStatus::DetailsCompleted
        } else {
            DraftStatus::ReadyToPay
        }
    }
}

/// Shallow patch of the top-level draft fields. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftPatch {
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub adults: Option<u32>,
    pub children: Option<u32>,
    pub room_count: Option<u32>,
    pub hotel_id: Option<i32>,
    pub promo_code: Option<String>,
    pub guest: Option<GuestDetails>,
    pub payment_method: Option<PaymentMethod>,
}

impl DraftPatch {
    pub fn is_empty(&self) -> bool {
        *self == DraftPatch::default()
    }

    fn apply(self, draft: &mut BookingDraft) {
        if let Some(check_in) = self.check_in {
            draft.check_in = Some(check_in);
        }
        if let Some(check_out) = self.check_out {
            draft.check_out = Some(check_out);
        }
        if let Some(adults) = self.adults {
            draft.adults = adults;
        }
        if let Some(children) = self.children {
            draft.children = children;
        }
        if let Some(room_count) = self.room_count {
            draft.room_count = room_count;
        }
        if let Some(hotel_id) = self.hotel_id {
            select_hotel(draft, hotel_id);
        }
        if let Some(code) = self.promo_code {
            set_promo_code(draft, code);
        }
        if let Some(guest) = self.guest {
            draft.guest = guest;
        }
        if let Some(method) = self.payment_method {
            draft.payment_method = Some(method);
        }
    }
}

/// Mutations accepted by [`reduce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftAction {
    /// Shallow merge of top-level fields.
    Patch(DraftPatch),
    SetDates {
        check_in: Option<NaiveDate>,
        check_out: Option<NaiveDate>,
    },
    SetParty {
        adults: u32,
        children: u32,
        room_count: u32,
    },
    /// Switch to another hotel; rooms, packages and promotion are dropped
    /// when the hotel changes.
    SelectHotel(i32),
    AddRoom(NewRoomSelection),
    UpdateRoom {
        id: u32,
        patch: RoomPatch,
    },
    RemoveRoom(u32),
    IncrementRoom(u32),
    DecrementRoom(u32),
    TogglePackage(PackageSelection),
    SetPackages(Vec<PackageSelection>),
    ApplyPromotion(AppliedPromotion),
    ClearPromotion,
    SetGuest(GuestDetails),
    SetPaymentMethod(PaymentMethod),
    MarkSubmitted {
        reference: String,
    },
}

/// Result of a reducer step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub draft: BookingDraft,
    pub changed: bool,
}

/// Apply `action` to `current` and return the next snapshot.
pub fn reduce(current: &BookingDraft, action: DraftAction) -> Transition {
    let mut next = current.clone();

    match action {
        DraftAction::Patch(patch) => patch.apply(&mut next),
        DraftAction::SetDates {
            check_in,
            check_out,
        } => {
            next.check_in = check_in;
            next.check_out = check_out;
        }
        DraftAction::SetParty {
            adults,
            children,
            room_count,
        } => {
            next.adults = adults;
            next.children = children;
            next.room_count = room_count;
        }
        DraftAction::SelectHotel(hotel_id) => select_hotel(&mut next, hotel_id),
        DraftAction::AddRoom(room) => add_room(&mut next, room),
        DraftAction::UpdateRoom { id, patch } => {
            if let Some(room) = next.room_mut(id) {
                if let Some(name) = patch.name {
                    room.name = name;
                }
                if let Some(quantity) = patch.quantity {
                    room.quantity = quantity.clamp(1, MAX_ROOM_QUANTITY);
                }
                if let Some(price_cents) = patch.price_cents {
                    room.price_cents = price_cents;
                }
                if let Some(meal_plan_id) = patch.meal_plan_id {
                    room.meal_plan_id = meal_plan_id;
                }
                if let Some(occupancy) = patch.occupancy {
                    room.occupancy = occupancy;
                }
            }
        }
        DraftAction::RemoveRoom(id) => next.rooms.retain(|room| room.id != id),
        DraftAction::IncrementRoom(id) => {
            if let Some(room) = next.room_mut(id) {
                room.quantity = room.quantity.saturating_add(1).min(MAX_ROOM_QUANTITY);
            }
        }
        DraftAction::DecrementRoom(id) => {
            if let Some(room) = next.room_mut(id) {
                room.quantity = room.quantity.saturating_sub(1).max(1);
            }
        }
        DraftAction::TogglePackage(package) => {
            match next.packages.iter().position(|p| p.id == package.id) {
                Some(index) => {
                    next.packages.remove(index);
                }
                None => next.packages.push(package),
            }
        }
        DraftAction::SetPackages(packages) => next.packages = packages,
        DraftAction::ApplyPromotion(promotion) => {
            next.promo_code = Some(promotion.code.clone());
            next.promotion = Some(promotion);
        }
        DraftAction::ClearPromotion => {
            next.promo_code = None;
            next.promotion = None;
        }
        DraftAction::SetGuest(guest) => next.guest = guest,
        DraftAction::SetPaymentMethod(method) => next.payment_method = Some(method),
        DraftAction::MarkSubmitted { reference } => next.booking_reference = Some(reference),
    }

    recompute(&mut next);
    let changed = next != *current;
    Transition {
        draft: next,
        changed,
    }
}

/// Refresh guest count, nights, totals and stage from their inputs.
///
/// Returns whether any derived field changed; running it twice in a row
/// always returns `false` the second time.
pub fn recompute(draft: &mut BookingDraft) -> bool {
    let guests = draft.adults.saturating_add(draft.children);
    let nights = match (draft.check_in, draft.check_out) {
        (Some(check_in), Some(check_out)) => nights_between(check_in, check_out),
        _ => 0,
    };
    let totals = price_breakdown(
        &draft.rooms,
        &draft.packages,
        nights,
        draft.promotion.as_ref().map(|promotion| &promotion.kind),
    );

    let mut changed = false;
    if draft.guests != guests {
        draft.guests = guests;
        changed = true;
    }
    if draft.totals != totals {
        draft.totals = totals;
        changed = true;
    }
    let status = draft.stage();
    if draft.status != status {
        draft.status = status;
        changed = true;
    }
    changed
}

/// Whole days between the two dates, `0` unless check-out is after check-in.
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> u32 {
    let days = (check_out - check_in).num_days();
    u32::try_from(days).unwrap_or(0)
}

fn select_hotel(draft: &mut BookingDraft, hotel_id: i32) {
    if draft.hotel_id == Some(hotel_id) {
        return;
    }
    draft.hotel_id = Some(hotel_id);
    draft.rooms.clear();
    draft.packages.clear();
    draft.promotion = None;
}

fn set_promo_code(draft: &mut BookingDraft, code: String) {
    let code = crate::domain::promotion::normalize_code(&code);
    if code.is_empty() {
        draft.promo_code = None;
        draft.promotion = None;
        return;
    }
    if draft.promotion.as_ref().is_some_and(|promo| promo.code != code) {
        draft.promotion = None;
    }
    draft.promo_code = Some(code);
}

fn add_room(draft: &mut BookingDraft, room: NewRoomSelection) {
    if let Some(existing) = draft.rooms.iter_mut().find(|r| r.same_offer(&room)) {
        existing.quantity = existing.quantity.saturating_add(1).min(MAX_ROOM_QUANTITY);
        return;
    }
    let id = draft.next_room_id();
    draft.rooms.push(RoomSelection {
        id,
        room_type_id: room.room_type_id,
        name: room.name,
        quantity: 1,
        price_cents: room.price_cents,
        meal_plan_id: room.meal_plan_id,
        occupancy: room.occupancy,
    });
}
