use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::hotel::{
    Hotel as DomainHotel, MealPlan as DomainMealPlan, Package as DomainPackage,
    RoomRate as DomainRoomRate, RoomType as DomainRoomType,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::hotels)]
pub struct Hotel {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub address: Option<String>,
    pub description: Option<String>,
    pub stars: i32,
    pub currency: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::room_types)]
#[diesel(belongs_to(Hotel, foreign_key = hotel_id))]
pub struct RoomType {
    pub id: i32,
    pub hotel_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub max_occupancy: i32,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::meal_plans)]
pub struct MealPlan {
    pub id: i32,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::room_rates)]
#[diesel(belongs_to(RoomType, foreign_key = room_type_id))]
pub struct RoomRate {
    pub id: i32,
    pub room_type_id: i32,
    pub meal_plan_id: i32,
    pub occupancy: i32,
    pub price_cents: i64,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::packages)]
#[diesel(belongs_to(Hotel, foreign_key = hotel_id))]
pub struct Package {
    pub id: i32,
    pub hotel_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
}

impl From<Hotel> for DomainHotel {
    fn from(value: Hotel) -> Self {
        Self {
            id: value.id,
            name: value.name,
            city: value.city,
            address: value.address,
            description: value.description,
            stars: value.stars,
            currency: value.currency,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<RoomType> for DomainRoomType {
    fn from(value: RoomType) -> Self {
        Self {
            id: value.id,
            hotel_id: value.hotel_id,
            name: value.name,
            description: value.description,
            max_occupancy: value.max_occupancy,
        }
    }
}

impl From<MealPlan> for DomainMealPlan {
    fn from(value: MealPlan) -> Self {
        Self {
            id: value.id,
            code: value.code,
            name: value.name,
        }
    }
}

impl From<RoomRate> for DomainRoomRate {
    fn from(value: RoomRate) -> Self {
        Self {
            id: value.id,
            room_type_id: value.room_type_id,
            meal_plan_id: value.meal_plan_id,
            occupancy: value.occupancy,
            price_cents: value.price_cents,
        }
    }
}

impl From<Package> for DomainPackage {
    fn from(value: Package) -> Self {
        Self {
            id: value.id,
            hotel_id: value.hotel_id,
            name: value.name,
            description: value.description,
            price_cents: value.price_cents,
        }
    }
}
