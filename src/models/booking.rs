use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::booking::{
    Booking as DomainBooking, BookingGuest, BookingPackage as DomainBookingPackage,
    BookingRoom as DomainBookingRoom, NewBooking as DomainNewBooking, PaymentMethod,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::bookings)]
pub struct Booking {
    pub id: i32,
    pub reference: String,
    pub hotel_id: i32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: i32,
    pub adults: i32,
    pub children: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub nationality: String,
    pub address: Option<String>,
    pub payment_method: String,
    pub status: String,
    pub promo_code: Option<String>,
    pub room_subtotal_cents: i64,
    pub package_subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub currency: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::booking_rooms)]
#[diesel(belongs_to(Booking, foreign_key = booking_id))]
pub struct BookingRoom {
    pub id: i32,
    pub booking_id: i32,
    pub room_type_id: i32,
    pub name: String,
    pub meal_plan_id: Option<i32>,
    pub occupancy: i32,
    pub quantity: i32,
    pub price_cents: i64,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::booking_packages)]
#[diesel(belongs_to(Booking, foreign_key = booking_id))]
pub struct BookingPackage {
    pub id: i32,
    pub booking_id: i32,
    pub package_id: i32,
    pub description: String,
    pub price_cents: i64,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::bookings)]
pub struct NewBooking<'a> {
    pub reference: &'a str,
    pub hotel_id: i32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: i32,
    pub adults: i32,
    pub children: i32,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub nationality: &'a str,
    pub address: Option<&'a str>,
    pub payment_method: &'a str,
    pub status: &'a str,
    pub promo_code: Option<&'a str>,
    pub room_subtotal_cents: i64,
    pub package_subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub currency: &'a str,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::booking_rooms)]
pub struct NewBookingRoom<'a> {
    pub booking_id: i32,
    pub room_type_id: i32,
    pub name: &'a str,
    pub meal_plan_id: Option<i32>,
    pub occupancy: i32,
    pub quantity: i32,
    pub price_cents: i64,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::booking_packages)]
pub struct NewBookingPackage<'a> {
    pub booking_id: i32,
    pub package_id: i32,
    pub description: &'a str,
    pub price_cents: i64,
}

impl Booking {
    /// Assemble the domain booking; `None` when the stored payment method is
    /// not one the site knows.
    pub fn into_domain(
        self,
        rooms: Vec<BookingRoom>,
        packages: Vec<BookingPackage>,
    ) -> Option<DomainBooking> {
        let payment_method = PaymentMethod::parse(&self.payment_method)?;

        Some(DomainBooking {
            id: self.id,
            reference: self.reference,
            hotel_id: self.hotel_id,
            check_in: self.check_in,
            check_out: self.check_out,
            nights: self.nights,
            adults: self.adults,
            children: self.children,
            guest: BookingGuest {
                first_name: self.first_name,
                last_name: self.last_name,
                email: self.email,
                phone: self.phone,
                nationality: self.nationality,
                address: self.address,
            },
            payment_method,
            status: self.status.as_str().into(),
            promo_code: self.promo_code,
            room_subtotal_cents: self.room_subtotal_cents,
            package_subtotal_cents: self.package_subtotal_cents,
            discount_cents: self.discount_cents,
            total_cents: self.total_cents,
            currency: self.currency,
            rooms: rooms.into_iter().map(BookingRoom::into_domain).collect(),
            packages: packages
                .into_iter()
                .map(BookingPackage::into_domain)
                .collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl BookingRoom {
    pub fn into_domain(self) -> DomainBookingRoom {
        DomainBookingRoom {
            room_type_id: self.room_type_id,
            name: self.name,
            meal_plan_id: self.meal_plan_id,
            occupancy: self.occupancy,
            quantity: self.quantity,
            price_cents: self.price_cents,
        }
    }
}

impl BookingPackage {
    pub fn into_domain(self) -> DomainBookingPackage {
        DomainBookingPackage {
            package_id: self.package_id,
            description: self.description,
            price_cents: self.price_cents,
        }
    }
}

impl<'a> From<&'a DomainNewBooking> for NewBooking<'a> {
    fn from(value: &'a DomainNewBooking) -> Self {
        Self {
            reference: value.reference.as_str(),
            hotel_id: value.hotel_id,
            check_in: value.check_in,
            check_out: value.check_out,
            nights: value.nights,
            adults: value.adults,
            children: value.children,
            first_name: value.guest.first_name.as_str(),
            last_name: value.guest.last_name.as_str(),
            email: value.guest.email.as_str(),
            phone: value.guest.phone.as_str(),
            nationality: value.guest.nationality.as_str(),
            address: value.guest.address.as_deref(),
            payment_method: value.payment_method.as_str(),
            status: value.status.into(),
            promo_code: value.promo_code.as_deref(),
            room_subtotal_cents: value.room_subtotal_cents,
            package_subtotal_cents: value.package_subtotal_cents,
            discount_cents: value.discount_cents,
            total_cents: value.total_cents,
            currency: value.currency.as_str(),
            updated_at: value.updated_at,
        }
    }
}

impl<'a> NewBookingRoom<'a> {
    pub fn from_domain(booking_id: i32, value: &'a DomainBookingRoom) -> Self {
        Self {
            booking_id,
            room_type_id: value.room_type_id,
            name: value.name.as_str(),
            meal_plan_id: value.meal_plan_id,
            occupancy: value.occupancy,
            quantity: value.quantity,
            price_cents: value.price_cents,
        }
    }
}

impl<'a> NewBookingPackage<'a> {
    pub fn from_domain(booking_id: i32, value: &'a DomainBookingPackage) -> Self {
        Self {
            booking_id,
            package_id: value.package_id,
            description: value.description.as_str(),
            price_cents: value.price_cents,
        }
    }
}
