use actix_session::Session;

use crate::domain::draft::BookingDraft;
use crate::storage::{
    DRAFT_KEY, DraftStorage, LAST_BOOKING_KEY, StorageError, StorageResult, WISHLIST_KEY,
};

impl DraftStorage for Session {
    fn load_draft(&self) -> StorageResult<Option<BookingDraft>> {
        self.get::<BookingDraft>(DRAFT_KEY)
            .map_err(|err| StorageError::Malformed(err.to_string()))
    }

    fn save_draft(&self, draft: &BookingDraft) -> StorageResult<()> {
        self.insert(DRAFT_KEY, draft)
            .map_err(|err| StorageError::Write(err.to_string()))
    }

    fn clear_draft(&self) {
        self.remove(DRAFT_KEY);
    }

    fn load_wishlist(&self) -> StorageResult<Option<Vec<i32>>> {
        self.get::<Vec<i32>>(WISHLIST_KEY)
            .map_err(|err| StorageError::Malformed(err.to_string()))
    }

    fn save_wishlist(&self, hotel_ids: &[i32]) -> StorageResult<()> {
        self.insert(WISHLIST_KEY, hotel_ids)
            .map_err(|err| StorageError::Write(err.to_string()))
    }

    fn load_last_booking(&self) -> StorageResult<Option<String>> {
        self.get::<String>(LAST_BOOKING_KEY)
            .map_err(|err| StorageError::Malformed(err.to_string()))
    }

    fn save_last_booking(&self, reference: &str) -> StorageResult<()> {
        self.insert(LAST_BOOKING_KEY, reference)
            .map_err(|err| StorageError::Write(err.to_string()))
    }
}
