use diesel::prelude::*;

use crate::{
    domain::hotel::{Hotel, HotelListQuery},
    models::hotel::Hotel as DbHotel,
    repository::{DieselRepository, HotelReader, RepositoryResult},
};

impl HotelReader for DieselRepository {
    fn get_hotel_by_id(&self, id: i32) -> RepositoryResult<Option<Hotel>> {
        use crate::schema::hotels;

        let mut conn = self.conn()?;
        let hotel = hotels::table
            .find(id)
            .filter(hotels::is_active.eq(true))
            .first::<DbHotel>(&mut conn)
            .optional()?;

        Ok(hotel.map(Into::into))
    }

    fn list_hotels(&self, query: HotelListQuery) -> RepositoryResult<(usize, Vec<Hotel>)> {
        use crate::schema::hotels;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = hotels::table
                .filter(hotels::is_active.eq(true))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(term) = query
                .search
                .as_deref()
                .map(str::trim)
                .filter(|term| !term.is_empty())
            {
                let pattern = format!("%{term}%");
                items = items.filter(
                    hotels::name
                        .like(pattern.clone())
                        .or(hotels::city.like(pattern)),
                );
            }
            items
        };

        // Get the total count before applying pagination
        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();

        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset() as i64)
                .limit(pagination.per_page as i64);
        }

        let db_hotels = items
            .order((hotels::stars.desc(), hotels::name.asc()))
            .load::<DbHotel>(&mut conn)?;

        Ok((total, db_hotels.into_iter().map(Into::into).collect()))
    }
}
