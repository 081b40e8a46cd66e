use mockall::mock;

use super::{
    BookingReader, BookingWriter, HotelReader, PackageReader, PromotionReader, RepositoryResult,
    RoomReader,
};
use crate::domain::{
    booking::{Booking, NewBooking},
    hotel::{Hotel, HotelListQuery, MealPlan, Package, RoomRate, RoomType},
    promotion::Promotion,
};

mock! {
    pub HotelReader {}

    impl HotelReader for HotelReader {
        fn get_hotel_by_id(&self, id: i32) -> RepositoryResult<Option<Hotel>>;
        fn list_hotels(&self, query: HotelListQuery) -> RepositoryResult<(usize, Vec<Hotel>)>;
    }
}

mock! {
    pub RoomReader {}

    impl RoomReader for RoomReader {
        fn get_room_type_by_id(&self, id: i32) -> RepositoryResult<Option<RoomType>>;
        fn list_room_types(&self, hotel_id: i32) -> RepositoryResult<Vec<RoomType>>;
        fn list_room_rates(&self, hotel_id: i32) -> RepositoryResult<Vec<RoomRate>>;
        fn list_meal_plans(&self) -> RepositoryResult<Vec<MealPlan>>;
    }
}

mock! {
    pub PackageReader {}

    impl PackageReader for PackageReader {
        fn list_packages(&self, hotel_id: i32) -> RepositoryResult<Vec<Package>>;
    }
}

mock! {
    pub PromotionReader {}

    impl PromotionReader for PromotionReader {
        fn get_promotion_by_code(&self, code: &str) -> RepositoryResult<Option<Promotion>>;
    }
}

mock! {
    pub BookingReader {}

    impl BookingReader for BookingReader {
        fn get_booking_by_reference(&self, reference: &str) -> RepositoryResult<Option<Booking>>;
    }
}

mock! {
    pub BookingWriter {}

    impl BookingWriter for BookingWriter {
        fn create_booking(&self, new_booking: &NewBooking) -> RepositoryResult<Booking>;
    }
}

/// Bundles every mock so services needing several repository traits can be
/// tested against one value.
#[derive(Default)]
pub struct MockRepo {
    pub hotels: MockHotelReader,
    pub rooms: MockRoomReader,
    pub packages: MockPackageReader,
    pub promotions: MockPromotionReader,
    pub booking_reader: MockBookingReader,
    pub booking_writer: MockBookingWriter,
}

impl MockRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HotelReader for MockRepo {
    fn get_hotel_by_id(&self, id: i32) -> RepositoryResult<Option<Hotel>> {
        self.hotels.get_hotel_by_id(id)
    }

    fn list_hotels(&self, query: HotelListQuery) -> RepositoryResult<(usize, Vec<Hotel>)> {
        self.hotels.list_hotels(query)
    }
}

impl RoomReader for MockRepo {
    fn get_room_type_by_id(&self, id: i32) -> RepositoryResult<Option<RoomType>> {
        self.rooms.get_room_type_by_id(id)
    }

    fn list_room_types(&self, hotel_id: i32) -> RepositoryResult<Vec<RoomType>> {
        self.rooms.list_room_types(hotel_id)
    }

    fn list_room_rates(&self, hotel_id: i32) -> RepositoryResult<Vec<RoomRate>> {
        self.rooms.list_room_rates(hotel_id)
    }

    fn list_meal_plans(&self) -> RepositoryResult<Vec<MealPlan>> {
        self.rooms.list_meal_plans()
    }
}

impl PackageReader for MockRepo {
    fn list_packages(&self, hotel_id: i32) -> RepositoryResult<Vec<Package>> {
        self.packages.list_packages(hotel_id)
    }
}

impl PromotionReader for MockRepo {
    fn get_promotion_by_code(&self, code: &str) -> RepositoryResult<Option<Promotion>> {
        self.promotions.get_promotion_by_code(code)
    }
}

impl BookingReader for MockRepo {
    fn get_booking_by_reference(&self, reference: &str) -> RepositoryResult<Option<Booking>> {
        self.booking_reader.get_booking_by_reference(reference)
    }
}

impl BookingWriter for MockRepo {
    fn create_booking(&self, new_booking: &NewBooking) -> RepositoryResult<Booking> {
        self.booking_writer.create_booking(new_booking)
    }
}
