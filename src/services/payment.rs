use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::booking::{
    Booking, IncompleteDraft, NewBooking, PaymentMethod, generate_reference,
};
use crate::domain::draft::{BookingDraft, DraftAction};
use crate::forms::payment::PaymentForm;
use crate::forms::search::{check_party, check_stay};
use crate::repository::{BookingWriter, HotelReader, RepositoryError};
use crate::services::details::require_rooms;
use crate::services::{DraftSummary, ServiceError, ServiceResult, hotel_display_name};
use crate::storage::{BookingContext, DraftQuery, DraftStorage};

/// Fresh references are drawn this many times before giving up on
/// collisions.
const MAX_REFERENCE_ATTEMPTS: usize = 3;

/// Payment method radio button.
#[derive(Debug, Serialize)]
pub struct PaymentMethodOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Data required to render the payment page.
pub struct PaymentPageData {
    pub draft: BookingDraft,
    pub summary: DraftSummary,
    pub hotel_name: String,
    pub methods: Vec<PaymentMethodOption>,
}

/// Loads the payment page. Rooms and guest details must be filled in.
pub fn load_payment_page<R, S>(
    repo: &R,
    storage: &S,
    draft_query: DraftQuery,
) -> ServiceResult<PaymentPageData>
where
    R: HotelReader + ?Sized,
    S: DraftStorage + ?Sized,
{
    let context = BookingContext::hydrate(storage, draft_query);
    let draft = context.draft().clone();
    require_rooms(&draft)?;
    if !draft.guest.is_complete() {
        return Err(ServiceError::Incomplete(IncompleteDraft {
            missing: vec!["guest details"],
        }));
    }

    let methods = PaymentMethod::ALL
        .into_iter()
        .map(|method| PaymentMethodOption {
            value: method.as_str(),
            label: method.label(),
            selected: draft.payment_method == Some(method),
        })
        .collect();

    Ok(PaymentPageData {
        hotel_name: hotel_display_name(repo, draft.hotel_id),
        summary: DraftSummary::from_draft(&draft),
        draft,
        methods,
    })
}

/// Submits the draft as a booking and clears it from storage.
///
/// The stay and party must still satisfy the search bar rules on `today`.
/// The booking is priced in the hotel's currency, falling back to
/// `default_currency` when the hotel cannot be loaded.
pub fn submit_booking<R, S>(
    repo: &R,
    storage: &S,
    form: PaymentForm,
    default_currency: &str,
    today: NaiveDate,
) -> ServiceResult<Booking>
where
    R: HotelReader + BookingWriter + ?Sized,
    S: DraftStorage + ?Sized,
{
    let mut context = BookingContext::hydrate(storage, DraftQuery::default());
    let method = form
        .into_payment_method()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    context.dispatch(DraftAction::SetPaymentMethod(method));
    check_bookable(context.draft(), today)?;

    let currency = match context.draft().hotel_id.map(|id| repo.get_hotel_by_id(id)) {
        Some(Ok(Some(hotel))) => hotel.currency,
        Some(Err(err)) => {
            log::error!("Failed to load hotel currency: {err}");
            default_currency.to_string()
        }
        _ => default_currency.to_string(),
    };

    let mut attempt = 0;
    let booking = loop {
        attempt += 1;
        let new_booking =
            NewBooking::from_draft(context.draft(), generate_reference(), currency.as_str())?;
        match repo.create_booking(&new_booking) {
            Ok(booking) => break booking,
            Err(RepositoryError::ConstraintViolation(detail))
                if attempt < MAX_REFERENCE_ATTEMPTS =>
            {
                log::warn!(
                    "Booking reference {} rejected ({detail}), retrying",
                    new_booking.reference
                );
            }
            Err(err) => return Err(ServiceError::from(err)),
        }
    };

    log::info!(
        "Booking {} submitted for hotel {} ({})",
        booking.reference,
        booking.hotel_id,
        method.as_str()
    );

    context.dispatch(DraftAction::MarkSubmitted {
        reference: booking.reference.clone(),
    });
    context.clear();
    if let Err(err) = storage.save_last_booking(&booking.reference) {
        log::error!("Failed to remember booking {}: {err}", booking.reference);
    }

    Ok(booking)
}

/// Dates and party of the draft still pass the search bar rules.
/// Missing dates are left to [`NewBooking::from_draft`].
fn check_bookable(draft: &BookingDraft, today: NaiveDate) -> ServiceResult<()> {
    if let (Some(check_in), Some(check_out)) = (draft.check_in, draft.check_out) {
        check_stay(check_in, check_out, today)
            .map_err(|err| ServiceError::Form(err.to_string()))?;
    }
    check_party(draft.adults, draft.children, draft.room_count)
        .map_err(|err| ServiceError::Form(err.to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::domain::booking::BookingStatus;
    use crate::domain::draft::{GuestDetails, NewRoomSelection};
    use crate::domain::hotel::Hotel;
    use crate::repository::mock::MockRepo;
    use crate::storage::{DRAFT_KEY, MemoryStorage};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2024, 5, 1)
    }

    fn fixed_datetime() -> NaiveDateTime {
        date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap()
    }

    fn hotel(id: i32) -> Hotel {
        Hotel {
            id,
            name: "Harbour View Hotel".to_string(),
            city: "Lisbon".to_string(),
            address: None,
            description: None,
            stars: 4,
            currency: "EUR".to_string(),
            is_active: true,
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    fn ready_storage() -> MemoryStorage {
        let storage = MemoryStorage::new();
        let mut context = BookingContext::hydrate(&storage, DraftQuery::default());
        context.dispatch(DraftAction::SelectHotel(1));
        context.dispatch(DraftAction::SetDates {
            check_in: Some(date(2024, 6, 1)),
            check_out: Some(date(2024, 6, 4)),
        });
        context.dispatch(DraftAction::AddRoom(NewRoomSelection {
            room_type_id: 1,
            name: "Standard Double".to_string(),
            price_cents: 10_000,
            meal_plan_id: Some(1),
            occupancy: 2,
        }));
        context.dispatch(DraftAction::SetGuest(GuestDetails {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+44 20 7946 0000".to_string(),
            nationality: "British".to_string(),
            address: None,
        }));
        storage
    }

    fn stored_booking(new_booking: &NewBooking) -> Booking {
        Booking {
            id: 1,
            reference: new_booking.reference.clone(),
            hotel_id: new_booking.hotel_id,
            check_in: new_booking.check_in,
            check_out: new_booking.check_out,
            nights: new_booking.nights,
            adults: new_booking.adults,
            children: new_booking.children,
            guest: new_booking.guest.clone(),
            payment_method: new_booking.payment_method,
            status: new_booking.status,
            promo_code: new_booking.promo_code.clone(),
            room_subtotal_cents: new_booking.room_subtotal_cents,
            package_subtotal_cents: new_booking.package_subtotal_cents,
            discount_cents: new_booking.discount_cents,
            total_cents: new_booking.total_cents,
            currency: new_booking.currency.clone(),
            rooms: new_booking.rooms.clone(),
            packages: new_booking.packages.clone(),
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    fn form(method: &str) -> PaymentForm {
        PaymentForm {
            payment_method: method.to_string(),
            accept_terms: Some("on".to_string()),
        }
    }

    #[test]
    fn payment_page_requires_guest_details() {
        let storage = MemoryStorage::new();
        let mut context = BookingContext::hydrate(&storage, DraftQuery::default());
        context.dispatch(DraftAction::AddRoom(NewRoomSelection {
            room_type_id: 1,
            name: "Standard Double".to_string(),
            price_cents: 10_000,
            meal_plan_id: None,
            occupancy: 2,
        }));

        let repo = MockRepo::new();
        let result = load_payment_page(&repo, &storage, DraftQuery::default());
        assert!(matches!(result, Err(ServiceError::Incomplete(_))));
    }

    #[test]
    fn payment_page_falls_back_to_placeholder_hotel_name() {
        let mut repo = MockRepo::new();
        repo.hotels
            .expect_get_hotel_by_id()
            .returning(|_| Err(RepositoryError::InvalidData("broken".to_string())));

        let storage = ready_storage();
        let data = load_payment_page(&repo, &storage, DraftQuery::default()).unwrap();
        assert_eq!(data.hotel_name, "Hotel Name Unavailable");
        assert_eq!(data.methods.len(), 3);
    }

    #[test]
    fn submit_booking_stores_booking_and_clears_draft() {
        let mut repo = MockRepo::new();
        repo.hotels
            .expect_get_hotel_by_id()
            .returning(|id| Ok(Some(hotel(id))));
        repo.booking_writer
            .expect_create_booking()
            .withf(|booking| {
                booking.hotel_id == 1
                    && booking.total_cents == 30_000
                    && booking.currency == "EUR"
                    && booking.reference.starts_with("HB-")
            })
            .times(1)
            .returning(|booking| Ok(stored_booking(booking)));

        let storage = ready_storage();
        let booking =
            submit_booking(&repo, &storage, form("pay_at_hotel"), "USD", today()).unwrap();

        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert!(storage.raw(DRAFT_KEY).is_none());
        assert_eq!(
            storage.load_last_booking().unwrap(),
            Some(booking.reference.clone())
        );
    }

    #[test]
    fn past_stay_is_not_submitted() {
        let mut repo = MockRepo::new();
        repo.booking_writer.expect_create_booking().never();

        let storage = ready_storage();
        let result = submit_booking(&repo, &storage, form("card"), "USD", date(2024, 6, 2));

        assert!(matches!(result, Err(ServiceError::Form(_))));
        assert!(storage.raw(DRAFT_KEY).is_some());
    }

    #[test]
    fn out_of_range_party_is_not_submitted() {
        let mut repo = MockRepo::new();
        repo.booking_writer.expect_create_booking().never();

        let storage = ready_storage();
        let mut context = BookingContext::hydrate(&storage, DraftQuery::default());
        context.dispatch(DraftAction::SetParty {
            adults: 3_000_000_000,
            children: 0,
            room_count: 999,
        });

        let result = submit_booking(&repo, &storage, form("card"), "USD", today());
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn reference_collision_is_retried() {
        let mut repo = MockRepo::new();
        repo.hotels.expect_get_hotel_by_id().returning(|_| Ok(None));
        let mut seq = mockall::Sequence::new();
        repo.booking_writer
            .expect_create_booking()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(RepositoryError::ConstraintViolation("reference".to_string())));
        repo.booking_writer
            .expect_create_booking()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|booking| Ok(stored_booking(booking)));

        let storage = ready_storage();
        let booking = submit_booking(&repo, &storage, form("card"), "USD", today()).unwrap();

        assert_eq!(booking.currency, "USD");
        assert_eq!(booking.status, BookingStatus::PendingPayment);
    }

    #[test]
    fn incomplete_draft_is_not_submitted() {
        let mut repo = MockRepo::new();
        repo.booking_writer.expect_create_booking().never();

        let storage = MemoryStorage::new();
        let result = submit_booking(&repo, &storage, form("card"), "USD", today());

        assert!(matches!(result, Err(ServiceError::Incomplete(_))));
    }

    #[test]
    fn terms_must_be_accepted() {
        let repo = MockRepo::new();
        let storage = ready_storage();
        let form = PaymentForm {
            payment_method: "card".to_string(),
            accept_terms: None,
        };

        let result = submit_booking(&repo, &storage, form, "USD", today());
        assert!(matches!(result, Err(ServiceError::Form(_))));
        assert!(storage.raw(DRAFT_KEY).is_some());
    }
}
