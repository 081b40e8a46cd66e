use diesel::prelude::*;

use crate::{
    domain::hotel::{MealPlan, RoomRate, RoomType},
    models::hotel::{MealPlan as DbMealPlan, RoomRate as DbRoomRate, RoomType as DbRoomType},
    repository::{DieselRepository, RepositoryResult, RoomReader},
};

impl RoomReader for DieselRepository {
    fn get_room_type_by_id(&self, id: i32) -> RepositoryResult<Option<RoomType>> {
        use crate::schema::room_types;

        let mut conn = self.conn()?;
        let room_type = room_types::table
            .find(id)
            .first::<DbRoomType>(&mut conn)
            .optional()?;

        Ok(room_type.map(Into::into))
    }

    fn list_room_types(&self, hotel_id: i32) -> RepositoryResult<Vec<RoomType>> {
        use crate::schema::room_types;

        let mut conn = self.conn()?;
        let items = room_types::table
            .filter(room_types::hotel_id.eq(hotel_id))
            .order(room_types::id.asc())
            .load::<DbRoomType>(&mut conn)?;

        Ok(items.into_iter().map(Into::into).collect())
    }

    fn list_room_rates(&self, hotel_id: i32) -> RepositoryResult<Vec<RoomRate>> {
        use crate::schema::{room_rates, room_types};

        let mut conn = self.conn()?;
        let items = room_rates::table
            .inner_join(room_types::table)
            .filter(room_types::hotel_id.eq(hotel_id))
            .select(DbRoomRate::as_select())
            .order((
                room_rates::room_type_id.asc(),
                room_rates::meal_plan_id.asc(),
                room_rates::occupancy.asc(),
            ))
            .load::<DbRoomRate>(&mut conn)?;

        Ok(items.into_iter().map(Into::into).collect())
    }

    fn list_meal_plans(&self) -> RepositoryResult<Vec<MealPlan>> {
        use crate::schema::meal_plans;

        let mut conn = self.conn()?;
        let items = meal_plans::table
            .order(meal_plans::id.asc())
            .load::<DbMealPlan>(&mut conn)?;

        Ok(items.into_iter().map(Into::into).collect())
    }
}
