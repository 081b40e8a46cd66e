//! Persistence of the booking draft between page loads.
//!
//! The draft lives in the guest's session under [`DRAFT_KEY`]. Pages build a
//! [`BookingContext`] at the start of every request: it hydrates the draft
//! from defaults, the stored copy and the page's query string (in that order
//! of increasing precedence), and writes every effective change straight
//! back to storage.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::domain::draft::{BookingDraft, DraftAction, DraftPatch, reduce};
use crate::forms::empty_string_as_none;
use crate::forms::search::{MAX_ADULTS, MAX_CHILDREN, MAX_ROOMS, check_stay_length};

pub mod session;

pub const DRAFT_KEY: &str = "booking_draft";
pub const WISHLIST_KEY: &str = "wishlist";
pub const LAST_BOOKING_KEY: &str = "last_booking";

/// Errors raised by draft storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The stored value could not be decoded.
    #[error("malformed stored value: {0}")]
    Malformed(String),
    /// The value could not be written.
    #[error("failed to store value: {0}")]
    Write(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Key/value persistence the booking journey is kept in.
pub trait DraftStorage {
    fn load_draft(&self) -> StorageResult<Option<BookingDraft>>;
    fn save_draft(&self, draft: &BookingDraft) -> StorageResult<()>;
    fn clear_draft(&self);
    fn load_wishlist(&self) -> StorageResult<Option<Vec<i32>>>;
    fn save_wishlist(&self, hotel_ids: &[i32]) -> StorageResult<()>;
    /// Reference of the booking most recently submitted from this storage.
    fn load_last_booking(&self) -> StorageResult<Option<String>>;
    fn save_last_booking(&self, reference: &str) -> StorageResult<()>;
}

/// Query parameters that may seed the draft, e.g.
/// `?check_in=2024-06-01&check_out=2024-06-04&adults=2&rooms=1`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct DraftQuery {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub check_in: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub check_out: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub adults: Option<u32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub children: Option<u32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub rooms: Option<u32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub hotel_id: Option<i32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub promo: Option<String>,
}

impl DraftQuery {
    /// Parse the raw query string, ignoring it entirely when it is malformed.
    pub fn from_query_string(query: &str) -> Self {
        match serde_qs::from_str::<DraftQuery>(query) {
            Ok(parsed) => parsed,
            Err(err) => {
                log::warn!("Ignoring malformed booking query `{query}`: {err}");
                DraftQuery::default()
            }
        }
    }

    /// Patch carrying only the parameters present in the query.
    ///
    /// Party sizes outside the search bar limits are dropped and the room
    /// count is clamped into range.
    pub fn into_patch(self) -> DraftPatch {
        DraftPatch {
            check_in: self.check_in,
            check_out: self.check_out,
            adults: self.adults.filter(|adults| (1..=MAX_ADULTS).contains(adults)),
            children: self.children.filter(|children| *children <= MAX_CHILDREN),
            room_count: self.rooms.map(|rooms| rooms.clamp(1, MAX_ROOMS)),
            hotel_id: self.hotel_id,
            promo_code: self.promo,
            ..DraftPatch::default()
        }
    }
}

/// The booking draft of the current request, bound to its storage.
pub struct BookingContext<'a, S: DraftStorage + ?Sized> {
    storage: &'a S,
    draft: BookingDraft,
}

impl<'a, S: DraftStorage + ?Sized> BookingContext<'a, S> {
    /// Merge defaults, the stored draft and `query`, then persist the result.
    ///
    /// A stored draft that cannot be decoded is logged and replaced by the
    /// defaults. Query dates that would leave a reversed or overlong stay
    /// are ignored.
    pub fn hydrate(storage: &'a S, query: DraftQuery) -> Self {
        let stored = match storage.load_draft() {
            Ok(Some(draft)) => draft,
            Ok(None) => BookingDraft::default(),
            Err(err) => {
                log::warn!("Discarding stored booking draft: {err}");
                BookingDraft::default()
            }
        };

        let patch = query.into_patch();
        let mut draft = reduce(&stored, DraftAction::Patch(patch.clone())).draft;
        let query_dates = patch.check_in.is_some() || patch.check_out.is_some();
        let invalid_stay = match (draft.check_in, draft.check_out) {
            (Some(check_in), Some(check_out)) => check_stay_length(check_in, check_out).err(),
            _ => None,
        };
        if let (true, Some(err)) = (query_dates, invalid_stay) {
            log::warn!("Ignoring booking query dates: {err}");
            let without_dates = DraftPatch {
                check_in: None,
                check_out: None,
                ..patch
            };
            draft = reduce(&stored, DraftAction::Patch(without_dates)).draft;
        }
        let context = Self { storage, draft };
        context.persist();
        context
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    /// Run `action` through the reducer and write the draft back when it
    /// changed. Returns whether it changed.
    pub fn dispatch(&mut self, action: DraftAction) -> bool {
        let transition = reduce(&self.draft, action);
        if !transition.changed {
            return false;
        }
        self.draft = transition.draft;
        self.persist();
        true
    }

    /// Shallow-merge `patch` into the draft.
    pub fn update(&mut self, patch: DraftPatch) -> bool {
        self.dispatch(DraftAction::Patch(patch))
    }

    /// Drop the draft from storage, returning the last snapshot.
    pub fn clear(self) -> BookingDraft {
        self.storage.clear_draft();
        self.draft
    }

    fn persist(&self) {
        if let Err(err) = self.storage.save_draft(&self.draft) {
            log::error!("Failed to persist booking draft: {err}");
        }
    }
}

/// Hotel ids on the guest's wishlist, empty when nothing usable is stored.
pub fn load_wishlist<S: DraftStorage + ?Sized>(storage: &S) -> Vec<i32> {
    match storage.load_wishlist() {
        Ok(ids) => ids.unwrap_or_default(),
        Err(err) => {
            log::warn!("Discarding stored wishlist: {err}");
            Vec::new()
        }
    }
}

/// Add `hotel_id` to the wishlist or remove it when already present.
/// Returns whether the hotel is on the wishlist afterwards.
pub fn toggle_wishlist<S: DraftStorage + ?Sized>(storage: &S, hotel_id: i32) -> bool {
    let mut ids = load_wishlist(storage);
    let listed = match ids.iter().position(|id| *id == hotel_id) {
        Some(index) => {
            ids.remove(index);
            false
        }
        None => {
            ids.push(hotel_id);
            true
        }
    };
    if let Err(err) = storage.save_wishlist(&ids) {
        log::error!("Failed to persist wishlist: {err}");
    }
    listed
}

/// In-process storage holding JSON strings, mirroring how the session
/// serialises values.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RefCell<HashMap<String, String>>,
    writes: Cell<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-filled with a raw value under `key`.
    pub fn with_raw(key: &str, raw: impl Into<String>) -> Self {
        let storage = Self::default();
        storage
            .values
            .borrow_mut()
            .insert(key.to_string(), raw.into());
        storage
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    fn get<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        match self.values.borrow().get(key) {
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .map_err(|err| StorageError::Malformed(err.to_string())),
            None => Ok(None),
        }
    }

    fn set<T: serde::Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()> {
        let raw = serde_json::to_string(value).map_err(|err| StorageError::Write(err.to_string()))?;
        self.values.borrow_mut().insert(key.to_string(), raw);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

impl DraftStorage for MemoryStorage {
    fn load_draft(&self) -> StorageResult<Option<BookingDraft>> {
        self.get(DRAFT_KEY)
    }

    fn save_draft(&self, draft: &BookingDraft) -> StorageResult<()> {
        self.set(DRAFT_KEY, draft)
    }

    fn clear_draft(&self) {
        self.values.borrow_mut().remove(DRAFT_KEY);
    }

    fn load_wishlist(&self) -> StorageResult<Option<Vec<i32>>> {
        self.get(WISHLIST_KEY)
    }

    fn save_wishlist(&self, hotel_ids: &[i32]) -> StorageResult<()> {
        self.set(WISHLIST_KEY, hotel_ids)
    }

    fn load_last_booking(&self) -> StorageResult<Option<String>> {
        self.get(LAST_BOOKING_KEY)
    }

    fn save_last_booking(&self, reference: &str) -> StorageResult<()> {
        self.set(LAST_BOOKING_KEY, reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::draft::NewRoomSelection;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stored(draft: &BookingDraft) -> MemoryStorage {
        MemoryStorage::with_raw(DRAFT_KEY, serde_json::to_string(draft).unwrap())
    }

    #[test]
    fn hydrate_without_anything_stored_uses_defaults_and_persists() {
        let storage = MemoryStorage::new();
        let context = BookingContext::hydrate(&storage, DraftQuery::default());

        assert_eq!(context.draft(), &BookingDraft::default());
        assert_eq!(storage.writes(), 1);
        assert!(storage.raw(DRAFT_KEY).is_some());
    }

    #[test]
    fn query_parameters_override_stored_values() {
        let mut draft = BookingDraft::default();
        draft.adults = 4;
        draft.children = 1;
        draft.check_in = Some(date(2024, 6, 1));
        draft.check_out = Some(date(2024, 6, 3));
        let storage = stored(&draft);

        let query = DraftQuery::from_query_string("adults=1&check_out=2024-06-04");
        let context = BookingContext::hydrate(&storage, query);

        let draft = context.draft();
        assert_eq!(draft.adults, 1);
        assert_eq!(draft.children, 1);
        assert_eq!(draft.check_in, Some(date(2024, 6, 1)));
        assert_eq!(draft.check_out, Some(date(2024, 6, 4)));
        assert_eq!(draft.nights(), 3);
        assert_eq!(draft.guests, 2);
    }

    #[test]
    fn malformed_stored_draft_falls_back_to_defaults() {
        let storage = MemoryStorage::with_raw(DRAFT_KEY, "{not json");
        let context = BookingContext::hydrate(&storage, DraftQuery::default());

        assert_eq!(context.draft(), &BookingDraft::default());
        let raw = storage.raw(DRAFT_KEY).unwrap();
        assert!(serde_json::from_str::<BookingDraft>(&raw).is_ok());
    }

    #[test]
    fn partial_stored_draft_is_merged_over_defaults() {
        let storage = MemoryStorage::with_raw(DRAFT_KEY, r#"{"children": 2, "hotel_id": 5}"#);
        let context = BookingContext::hydrate(&storage, DraftQuery::default());

        assert_eq!(context.draft().adults, 2);
        assert_eq!(context.draft().children, 2);
        assert_eq!(context.draft().guests, 4);
        assert_eq!(context.draft().hotel_id, Some(5));
    }

    #[test]
    fn out_of_range_party_in_query_is_dropped() {
        let storage = MemoryStorage::new();
        let query = DraftQuery::from_query_string("adults=4294967295&children=1&rooms=999");
        let context = BookingContext::hydrate(&storage, query);

        let draft = context.draft();
        assert_eq!(draft.adults, 2);
        assert_eq!(draft.children, 1);
        assert_eq!(draft.room_count, MAX_ROOMS);
        assert_eq!(draft.guests, 3);

        let query = DraftQuery::from_query_string("adults=0&children=11");
        let context = BookingContext::hydrate(&storage, query);
        assert_eq!(context.draft().adults, 2);
        assert_eq!(context.draft().children, 1);
    }

    #[test]
    fn reversed_or_overlong_query_dates_keep_stored_stay() {
        let mut draft = BookingDraft::default();
        draft.check_in = Some(date(2024, 6, 1));
        draft.check_out = Some(date(2024, 6, 4));
        let storage = stored(&draft);

        let reversed = DraftQuery::from_query_string("check_out=2024-05-20&adults=3");
        let context = BookingContext::hydrate(&storage, reversed);
        assert_eq!(context.draft().check_out, Some(date(2024, 6, 4)));
        assert_eq!(context.draft().adults, 3);
        assert_eq!(context.draft().nights(), 3);

        let overlong = DraftQuery::from_query_string("check_in=2024-06-01&check_out=2024-09-01");
        let context = BookingContext::hydrate(&storage, overlong);
        assert_eq!(context.draft().check_out, Some(date(2024, 6, 4)));
        assert_eq!(context.draft().nights(), 3);
    }

    #[test]
    fn last_booking_round_trips() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.load_last_booking().unwrap(), None);
        storage.save_last_booking("HB-ABCD2345").unwrap();
        assert_eq!(
            storage.load_last_booking().unwrap().as_deref(),
            Some("HB-ABCD2345")
        );
    }

    #[test]
    fn malformed_query_is_ignored() {
        let query = DraftQuery::from_query_string("adults=many");
        assert_eq!(query, DraftQuery::default());
    }

    #[test]
    fn empty_query_values_are_treated_as_absent() {
        let query = DraftQuery::from_query_string("check_in=&adults=3&promo=");
        assert_eq!(query.check_in, None);
        assert_eq!(query.adults, Some(3));
        assert_eq!(query.promo, None);
    }

    #[test]
    fn dispatch_writes_through_only_on_change() {
        let storage = MemoryStorage::new();
        let mut context = BookingContext::hydrate(&storage, DraftQuery::default());
        assert_eq!(storage.writes(), 1);

        let room = NewRoomSelection {
            room_type_id: 1,
            name: "Standard".to_string(),
            price_cents: 10_000,
            meal_plan_id: None,
            occupancy: 2,
        };
        assert!(context.dispatch(DraftAction::AddRoom(room)));
        assert_eq!(storage.writes(), 2);

        assert!(!context.dispatch(DraftAction::DecrementRoom(1)));
        assert_eq!(storage.writes(), 2);

        let reloaded = BookingContext::hydrate(&storage, DraftQuery::default());
        assert_eq!(reloaded.draft().rooms.len(), 1);
    }

    #[test]
    fn clear_removes_the_stored_draft() {
        let storage = MemoryStorage::new();
        let context = BookingContext::hydrate(&storage, DraftQuery::default());
        let last = context.clear();

        assert_eq!(last, BookingDraft::default());
        assert!(storage.raw(DRAFT_KEY).is_none());
    }

    #[test]
    fn wishlist_toggles_and_survives_malformed_data() {
        let storage = MemoryStorage::with_raw(WISHLIST_KEY, "oops");
        assert!(load_wishlist(&storage).is_empty());

        assert!(toggle_wishlist(&storage, 3));
        assert!(toggle_wishlist(&storage, 5));
        assert_eq!(load_wishlist(&storage), vec![3, 5]);

        assert!(!toggle_wishlist(&storage, 3));
        assert_eq!(load_wishlist(&storage), vec![5]);
    }
}
