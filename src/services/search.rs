use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::draft::{BookingDraft, DraftAction};
use crate::domain::hotel::{Hotel, HotelListQuery};
use crate::forms::empty_string_as_none;
use crate::forms::search::SearchForm;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::HotelReader;
use crate::services::{DraftSummary, Outcome, ServiceError, ServiceResult};
use crate::storage::{BookingContext, DraftQuery, DraftStorage, load_wishlist};

/// Query parameters accepted by the search page service.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// City or hotel name typed into the search bar.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub search: Option<String>,
    /// Page number requested by the user interface.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<usize>,
}

/// Data required to render the search page.
pub struct SearchPageData {
    /// Paginated list of hotels matching the search.
    pub hotels: Paginated<Hotel>,
    /// Search term echoed back to the template when present.
    pub search: Option<String>,
    pub draft: BookingDraft,
    pub summary: DraftSummary,
    /// Hotel ids on the guest's wishlist.
    pub wishlist: Vec<i32>,
}

/// Loads the hotel list for the search page.
///
/// Catalog failures are logged and render an empty result list so the
/// search bar stays usable.
pub fn load_search_page<R, S>(
    repo: &R,
    storage: &S,
    draft_query: DraftQuery,
    query: SearchQuery,
) -> ServiceResult<SearchPageData>
where
    R: HotelReader + ?Sized,
    S: DraftStorage + ?Sized,
{
    let context = BookingContext::hydrate(storage, draft_query);

    let page = query.page.unwrap_or(1).max(1);
    let mut list_query = HotelListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = query.search.as_ref() {
        list_query = list_query.search(term);
    }

    let (total, hotels) = match repo.list_hotels(list_query) {
        Ok(result) => result,
        Err(err) => {
            log::error!("Failed to list hotels: {err}");
            (0, Vec::new())
        }
    };
    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);

    let draft = context.draft().clone();
    Ok(SearchPageData {
        hotels: Paginated::new(hotels, page, total_pages),
        search: query.search,
        summary: DraftSummary::from_draft(&draft),
        draft,
        wishlist: load_wishlist(storage),
    })
}

/// Stores the stay dates and party from the search bar in the draft.
pub fn submit_search<S>(storage: &S, form: SearchForm, today: NaiveDate) -> ServiceResult<Outcome>
where
    S: DraftStorage + ?Sized,
{
    let search = form
        .into_stay_search(today)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let mut context = BookingContext::hydrate(storage, DraftQuery::default());
    context.dispatch(DraftAction::SetDates {
        check_in: Some(search.check_in),
        check_out: Some(search.check_out),
    });
    context.dispatch(DraftAction::SetParty {
        adults: search.adults,
        children: search.children,
        room_count: search.rooms,
    });

    let redirect_to = match search.city.as_deref() {
        Some(city) => match serde_html_form::to_string([("search", city)]) {
            Ok(query) => format!("/?{query}"),
            Err(err) => {
                log::warn!("Failed to encode search term `{city}`: {err}");
                "/".to_string()
            }
        },
        None => "/".to_string(),
    };
    let nights = context.draft().nights();
    Ok(Outcome::new(
        format!("Showing availability for {nights} night(s)."),
        redirect_to,
    ))
}
