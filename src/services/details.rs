use crate::domain::booking::IncompleteDraft;
use crate::domain::draft::{BookingDraft, DraftAction};
use crate::forms::guest::GuestDetailsForm;
use crate::services::{DraftSummary, Outcome, ServiceError, ServiceResult};
use crate::storage::{BookingContext, DraftQuery, DraftStorage};

/// Data required to render the personal details page.
pub struct DetailsPageData {
    pub draft: BookingDraft,
    pub summary: DraftSummary,
}

/// Loads the draft for the personal details page. Guests without a room
/// are sent back to pick one.
pub fn load_details_page<S>(storage: &S, draft_query: DraftQuery) -> ServiceResult<DetailsPageData>
where
    S: DraftStorage + ?Sized,
{
    let context = BookingContext::hydrate(storage, draft_query);
    let draft = context.draft().clone();
    require_rooms(&draft)?;

    Ok(DetailsPageData {
        summary: DraftSummary::from_draft(&draft),
        draft,
    })
}

/// Stores the lead guest's details and moves on to payment.
pub fn save_guest_details<S>(storage: &S, form: GuestDetailsForm) -> ServiceResult<Outcome>
where
    S: DraftStorage + ?Sized,
{
    let mut context = BookingContext::hydrate(storage, DraftQuery::default());
    require_rooms(context.draft())?;

    let guest = form
        .into_guest_details()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    context.dispatch(DraftAction::SetGuest(guest));

    Ok(Outcome::new("Guest details saved.", "/payment"))
}

pub(crate) fn require_rooms(draft: &BookingDraft) -> ServiceResult<()> {
    if draft.rooms.is_empty() {
        return Err(ServiceError::Incomplete(IncompleteDraft {
            missing: vec!["rooms"],
        }));
    }
    Ok(())
}
