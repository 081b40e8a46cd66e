use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::draft::MAX_ROOM_QUANTITY;
use crate::forms::empty_string_as_none;

/// Largest party a single room line may be priced for.
pub const MAX_OCCUPANCY: u32 = 8;

pub type RoomFormResult<T> = Result<T, RoomFormError>;

/// Errors that can occur while processing room and package forms.
#[derive(Debug, Error)]
pub enum RoomFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("failed to parse form: {0}")]
    Malformed(#[from] serde::de::value::Error),
}

/// Form payload emitted when a guest picks a room rate on the property page.
#[derive(Debug, Deserialize, Validate)]
pub struct AddRoomForm {
    #[validate(range(min = 1))]
    pub room_type_id: i32,
    #[validate(range(min = 1))]
    pub meal_plan_id: i32,
    #[validate(range(min = 1, max = MAX_OCCUPANCY))]
    pub occupancy: u32,
}

impl AddRoomForm {
    pub fn validated(self) -> RoomFormResult<Self> {
        self.validate()?;
        Ok(self)
    }
}

/// Form payload emitted when changing the meal plan, occupancy or quantity
/// of a selected room. Empty fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateRoomForm {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(range(min = 1))]
    pub meal_plan_id: Option<i32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(range(min = 1, max = MAX_OCCUPANCY))]
    pub occupancy: Option<u32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(range(min = 1, max = MAX_ROOM_QUANTITY))]
    pub quantity: Option<u32>,
}

impl UpdateRoomForm {
    pub fn validated(self) -> RoomFormResult<Self> {
        self.validate()?;
        Ok(self)
    }
}

/// Checkbox list of packages; the browser repeats `package_ids` once per
/// ticked box, which is why the body is parsed with `serde_html_form`.
#[derive(Debug, Default, Deserialize)]
pub struct PackagesForm {
    #[serde(default)]
    pub package_ids: Vec<i32>,
}

impl PackagesForm {
    /// Parse an urlencoded request body, dropping duplicate ids.
    pub fn parse(body: &[u8]) -> RoomFormResult<Self> {
        let mut form: PackagesForm = serde_html_form::from_bytes(body)?;
        let mut seen = std::collections::HashSet::new();
        form.package_ids.retain(|id| seen.insert(*id));
        Ok(form)
    }
}
