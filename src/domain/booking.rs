use std::num::TryFromIntError;

use chrono::{NaiveDate, NaiveDateTime};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::draft::BookingDraft;

/// Characters used for booking references; no `0/O` or `1/I` look-alikes.
const REFERENCE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const REFERENCE_LEN: usize = 8;

/// How the guest settles the booking.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    PayAtHotel,
    Card,
    BankTransfer,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::PayAtHotel,
        PaymentMethod::Card,
        PaymentMethod::BankTransfer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::PayAtHotel => "pay_at_hotel",
            PaymentMethod::Card => "card",
            PaymentMethod::BankTransfer => "bank_transfer",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::PayAtHotel => "Pay at the hotel",
            PaymentMethod::Card => "Credit or debit card",
            PaymentMethod::BankTransfer => "Bank transfer",
        }
    }

    /// Status a freshly submitted booking gets for this method.
    pub fn initial_status(&self) -> BookingStatus {
        match self {
            PaymentMethod::PayAtHotel => BookingStatus::Confirmed,
            PaymentMethod::Card | PaymentMethod::BankTransfer => BookingStatus::PendingPayment,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == value.trim())
    }
}

/// Lifecycle states of a submitted booking.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Booking is guaranteed, payment is settled at the hotel.
    Confirmed,
    /// Booking awaits a card or bank payment.
    PendingPayment,
    /// Booking has been cancelled.
    Cancelled,
}

impl From<&str> for BookingStatus {
    fn from(value: &str) -> Self {
        match value {
            "confirmed" => BookingStatus::Confirmed,
            "pending_payment" => BookingStatus::PendingPayment,
            _ => BookingStatus::Cancelled,
        }
    }
}

impl From<BookingStatus> for &'static str {
    fn from(value: BookingStatus) -> Self {
        match value {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::PendingPayment => "pending_payment",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

/// Room line stored with a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRoom {
    pub room_type_id: i32,
    pub name: String,
    pub meal_plan_id: Option<i32>,
    pub occupancy: i32,
    pub quantity: i32,
    pub price_cents: i64,
}

/// Package line stored with a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingPackage {
    pub package_id: i32,
    pub description: String,
    pub price_cents: i64,
}

/// Guest contact details stored with a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingGuest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub nationality: String,
    pub address: Option<String>,
}

/// Submitted booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i32,
    /// Human-friendly reference shown to the guest.
    pub reference: String,
    pub hotel_id: i32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: i32,
    pub adults: i32,
    pub children: i32,
    pub guest: BookingGuest,
    pub payment_method: PaymentMethod,
    pub status: BookingStatus,
    pub promo_code: Option<String>,
    pub room_subtotal_cents: i64,
    pub package_subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub currency: String,
    pub rooms: Vec<BookingRoom>,
    pub packages: Vec<BookingPackage>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Parts of a draft that still need to be filled in before it can be booked.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("booking is missing: {}", .missing.join(", "))]
pub struct IncompleteDraft {
    pub missing: Vec<&'static str>,
}

/// Payload required to insert a new booking.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub reference: String,
    pub hotel_id: i32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: i32,
    pub adults: i32,
    pub children: i32,
    pub guest: BookingGuest,
    pub payment_method: PaymentMethod,
    pub status: BookingStatus,
    pub promo_code: Option<String>,
    pub room_subtotal_cents: i64,
    pub package_subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub currency: String,
    pub rooms: Vec<BookingRoom>,
    pub packages: Vec<BookingPackage>,
    pub updated_at: NaiveDateTime,
}

impl NewBooking {
    /// Build a booking payload from a complete draft.
    ///
    /// Fails listing every missing part when the draft lacks a hotel, valid
    /// dates, a representable party, rooms, guest details or a payment method.
    pub fn from_draft(
        draft: &BookingDraft,
        reference: impl Into<String>,
        currency: impl Into<String>,
    ) -> Result<Self, IncompleteDraft> {
        let mut missing = Vec::new();

        if draft.hotel_id.is_none() {
            missing.push("hotel");
        }
        let dates = match (draft.check_in, draft.check_out) {
            (Some(check_in), Some(check_out)) if check_out > check_in => {
                Some((check_in, check_out))
            }
            _ => {
                missing.push("stay dates");
                None
            }
        };
        let party = match (i32::try_from(draft.adults), i32::try_from(draft.children)) {
            (Ok(adults), Ok(children)) => Some((adults, children)),
            _ => {
                missing.push("party size");
                None
            }
        };
        let nights = match i32::try_from(draft.totals.nights) {
            Ok(nights) => Some(nights),
            Err(_) => {
                missing.push("stay dates");
                None
            }
        };
        let rooms = draft
            .rooms
            .iter()
            .map(|room| {
                Ok(BookingRoom {
                    room_type_id: room.room_type_id,
                    name: room.name.clone(),
                    meal_plan_id: room.meal_plan_id,
                    occupancy: i32::try_from(room.occupancy)?,
                    quantity: i32::try_from(room.quantity)?,
                    price_cents: room.price_cents,
                })
            })
            .collect::<Result<Vec<_>, TryFromIntError>>();
        let rooms = match rooms {
            Ok(rooms) if !rooms.is_empty() => Some(rooms),
            _ => {
                missing.push("rooms");
                None
            }
        };
        if !draft.guest.is_complete() {
            missing.push("guest details");
        }
        if draft.payment_method.is_none() {
            missing.push("payment method");
        }

        let (
            Some(hotel_id),
            Some((check_in, check_out)),
            Some((adults, children)),
            Some(nights),
            Some(rooms),
            Some(payment_method),
        ) = (
            draft.hotel_id,
            dates,
            party,
            nights,
            rooms,
            draft.payment_method,
        )
        else {
            return Err(IncompleteDraft { missing });
        };
        if !missing.is_empty() {
            return Err(IncompleteDraft { missing });
        }

        let guest = &draft.guest;
        let totals = &draft.totals;

        Ok(Self {
            reference: reference.into(),
            hotel_id,
            check_in,
            check_out,
            nights,
            adults,
            children,
            guest: BookingGuest {
                first_name: guest.first_name.clone(),
                last_name: guest.last_name.clone(),
                email: guest.email.clone(),
                phone: guest.phone.clone(),
                nationality: guest.nationality.clone(),
                address: guest.address.clone(),
            },
            payment_method,
            status: payment_method.initial_status(),
            promo_code: draft.promotion.as_ref().map(|promo| promo.code.clone()),
            room_subtotal_cents: totals.room_subtotal_cents,
            package_subtotal_cents: totals.package_subtotal_cents,
            discount_cents: totals.discount_cents,
            total_cents: totals.total_cents,
            currency: currency.into(),
            rooms,
            packages: draft
                .packages
                .iter()
                .map(|package| BookingPackage {
                    package_id: package.id,
                    description: package.description.clone(),
                    price_cents: package.price_cents,
                })
                .collect(),
            updated_at: chrono::Local::now().naive_utc(),
        })
    }
}

/// Generate a random booking reference such as `HB-7KQ2M9XD`.
pub fn generate_reference() -> String {
    let mut rng = rand::thread_rng();
    let code: String = (0..REFERENCE_LEN)
        .map(|_| {
            let index = rng.gen_range(0..REFERENCE_ALPHABET.len());
            char::from(REFERENCE_ALPHABET[index])
        })
        .collect();
    format!("HB-{code}")
}
