use chrono::NaiveDate;

use crate::domain::draft::DraftAction;
use crate::domain::promotion::{Promotion, PromotionKind};
use crate::forms::promo::PromoCodeForm;
use crate::repository::PromotionReader;
use crate::services::{Outcome, ServiceError, ServiceResult, hotel_page_or_home};
use crate::storage::{BookingContext, DraftQuery, DraftStorage};

/// Validates a code typed by the guest and applies it to the draft.
///
/// Unknown, expired or out-of-scope codes are rejected without touching the
/// draft. A valid code whose minimum stay is not met yet is still applied;
/// its discount starts counting once the stay is long enough.
pub fn apply_promo_code<R, S>(
    repo: &R,
    storage: &S,
    form: PromoCodeForm,
    today: NaiveDate,
) -> ServiceResult<Outcome>
where
    R: PromotionReader + ?Sized,
    S: DraftStorage + ?Sized,
{
    let code = form
        .into_code()
        .map_err(|_| ServiceError::Form("Enter a promotion code.".to_string()))?;

    let mut context = BookingContext::hydrate(storage, DraftQuery::default());
    let promotion = find_redeemable(repo, &code, context.draft().hotel_id, today)?;

    context.dispatch(DraftAction::ApplyPromotion(promotion.to_applied()));

    let nights = context.draft().nights();
    let message = match promotion.kind {
        PromotionKind::FreeNights { min_nights, .. } if !promotion.kind.is_eligible(nights) => {
            format!(
                "Code {} saved. It applies to stays of at least {min_nights} nights.",
                promotion.code
            )
        }
        _ => format!("Code {} applied: {}.", promotion.code, promotion.description),
    };

    Ok(Outcome::new(message, hotel_page_or_home(context.draft())))
}

/// Removes the promotion code and its discount from the draft.
pub fn clear_promo_code<S>(storage: &S) -> ServiceResult<Outcome>
where
    S: DraftStorage + ?Sized,
{
    let mut context = BookingContext::hydrate(storage, DraftQuery::default());
    context.dispatch(DraftAction::ClearPromotion);
    Ok(Outcome::new(
        "Promotion code removed.",
        hotel_page_or_home(context.draft()),
    ))
}

/// Resolves a code that arrived through the query string or was entered
/// before a hotel was chosen. Codes that do not resolve are left pending
/// and logged.
pub(crate) fn resolve_pending_code<R, S>(
    repo: &R,
    context: &mut BookingContext<'_, S>,
    today: NaiveDate,
) where
    R: PromotionReader + ?Sized,
    S: DraftStorage + ?Sized,
{
    let draft = context.draft();
    let Some(code) = draft.promo_code.clone() else {
        return;
    };
    if draft.promotion.is_some() {
        return;
    }

    match find_redeemable(repo, &code, draft.hotel_id, today) {
        Ok(promotion) => {
            context.dispatch(DraftAction::ApplyPromotion(promotion.to_applied()));
        }
        Err(err) => log::info!("Promotion code {code} not applied: {err}"),
    }
}

fn find_redeemable<R>(
    repo: &R,
    code: &str,
    hotel_id: Option<i32>,
    today: NaiveDate,
) -> ServiceResult<Promotion>
where
    R: PromotionReader + ?Sized,
{
    let promotion = repo
        .get_promotion_by_code(code)
        .map_err(ServiceError::from)?
        .ok_or_else(|| ServiceError::Form(format!("Promotion code {code} is not valid.")))?;

    if !promotion.is_redeemable(hotel_id, today) {
        return Err(ServiceError::Form(format!(
            "Promotion code {code} cannot be used for this stay."
        )));
    }
    Ok(promotion)
}
