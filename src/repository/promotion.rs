use diesel::prelude::*;

use crate::{
    domain::promotion::Promotion,
    models::promotion::Promotion as DbPromotion,
    repository::{DieselRepository, PromotionReader, RepositoryError, RepositoryResult},
};

impl PromotionReader for DieselRepository {
    fn get_promotion_by_code(&self, code: &str) -> RepositoryResult<Option<Promotion>> {
        use crate::schema::promotions;

        let mut conn = self.conn()?;
        let promotion = promotions::table
            .filter(promotions::code.eq(code))
            .first::<DbPromotion>(&mut conn)
            .optional()?;

        let Some(promotion) = promotion else {
            return Ok(None);
        };

        let id = promotion.id;
        match promotion.into_domain() {
            Some(promotion) => Ok(Some(promotion)),
            None => Err(RepositoryError::InvalidData(format!(
                "promotion {id} has an incomplete discount rule"
            ))),
        }
    }
}
