use diesel::prelude::*;

use crate::{
    domain::booking::{Booking, NewBooking},
    models::booking::{
        Booking as DbBooking, BookingPackage as DbBookingPackage, BookingRoom as DbBookingRoom,
        NewBooking as DbNewBooking, NewBookingPackage as DbNewBookingPackage,
        NewBookingRoom as DbNewBookingRoom,
    },
    repository::{BookingReader, BookingWriter, DieselRepository, RepositoryError, RepositoryResult},
};

fn load_booking(conn: &mut SqliteConnection, booking: DbBooking) -> RepositoryResult<Booking> {
    let rooms = DbBookingRoom::belonging_to(&booking)
        .select(DbBookingRoom::as_select())
        .load::<DbBookingRoom>(conn)?;
    let packages = DbBookingPackage::belonging_to(&booking)
        .select(DbBookingPackage::as_select())
        .load::<DbBookingPackage>(conn)?;

    let id = booking.id;
    booking
        .into_domain(rooms, packages)
        .ok_or_else(|| {
            RepositoryError::InvalidData(format!("booking {id} has an unknown payment method"))
        })
}

impl BookingReader for DieselRepository {
    fn get_booking_by_reference(&self, reference: &str) -> RepositoryResult<Option<Booking>> {
        use crate::schema::bookings;

        let mut conn = self.conn()?;
        let booking = bookings::table
            .filter(bookings::reference.eq(reference))
            .first::<DbBooking>(&mut conn)
            .optional()?;

        match booking {
            Some(booking) => Ok(Some(load_booking(&mut conn, booking)?)),
            None => Ok(None),
        }
    }
}

impl BookingWriter for DieselRepository {
    fn create_booking(&self, new_booking: &NewBooking) -> RepositoryResult<Booking> {
        use crate::schema::{booking_packages, booking_rooms, bookings};

        let mut conn = self.conn()?;
        let conn: &mut SqliteConnection = &mut conn;

        conn.transaction::<Booking, RepositoryError, _>(|conn| {
            let db_new: DbNewBooking = new_booking.into();
            let booking = diesel::insert_into(bookings::table)
                .values(&db_new)
                .get_result::<DbBooking>(conn)?;

            let rooms: Vec<DbNewBookingRoom> = new_booking
                .rooms
                .iter()
                .map(|room| DbNewBookingRoom::from_domain(booking.id, room))
                .collect();
            if !rooms.is_empty() {
                diesel::insert_into(booking_rooms::table)
                    .values(&rooms)
                    .execute(conn)?;
            }

            let packages: Vec<DbNewBookingPackage> = new_booking
                .packages
                .iter()
                .map(|package| DbNewBookingPackage::from_domain(booking.id, package))
                .collect();
            if !packages.is_empty() {
                diesel::insert_into(booking_packages::table)
                    .values(&packages)
                    .execute(conn)?;
            }

            load_booking(conn, booking)
        })
    }
}
