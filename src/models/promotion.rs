use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::promotion::{Promotion as DomainPromotion, PromotionKind};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::promotions)]
pub struct Promotion {
    pub id: i32,
    pub hotel_id: Option<i32>,
    pub code: String,
    pub description: String,
    pub kind: String,
    pub percent: Option<i32>,
    pub min_nights: Option<i32>,
    pub free_nights: Option<i32>,
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Promotion {
    /// Decode the rule columns; `None` when the row does not describe a
    /// usable rule.
    pub fn kind(&self) -> Option<PromotionKind> {
        let non_negative = |value: Option<i32>| value.and_then(|v| u32::try_from(v).ok());

        match self.kind.as_str() {
            "percentage" => Some(PromotionKind::Percentage {
                percent: non_negative(self.percent)?,
            }),
            "free_nights" => Some(PromotionKind::FreeNights {
                min_nights: non_negative(self.min_nights)?,
                free_nights: non_negative(self.free_nights)?,
            }),
            _ => None,
        }
    }

    pub fn into_domain(self) -> Option<DomainPromotion> {
        let kind = self.kind()?;
        Some(DomainPromotion {
            id: self.id,
            hotel_id: self.hotel_id,
            code: self.code,
            description: self.description,
            kind,
            valid_from: self.valid_from,
            valid_to: self.valid_to,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(kind: &str, percent: Option<i32>, min: Option<i32>, free: Option<i32>) -> Promotion {
        let now = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        Promotion {
            id: 1,
            hotel_id: None,
            code: "CODE".to_string(),
            description: String::new(),
            kind: kind.to_string(),
            percent,
            min_nights: min,
            free_nights: free,
            valid_from: None,
            valid_to: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn decodes_rule_columns() {
        assert_eq!(
            row("percentage", Some(15), None, None).kind(),
            Some(PromotionKind::Percentage { percent: 15 })
        );
        assert_eq!(
            row("free_nights", None, Some(4), Some(1)).kind(),
            Some(PromotionKind::FreeNights {
                min_nights: 4,
                free_nights: 1
            })
        );
    }

    #[test]
    fn rejects_incomplete_or_unknown_rules() {
        assert!(row("percentage", None, None, None).kind().is_none());
        assert!(row("free_nights", None, Some(4), None).kind().is_none());
        assert!(row("percentage", Some(-5), None, None).kind().is_none());
        assert!(row("bogo", Some(10), None, None).into_domain().is_none());
    }
}
