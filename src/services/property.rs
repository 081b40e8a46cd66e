use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::draft::{
    BookingDraft, DraftAction, MAX_ROOM_QUANTITY, NewRoomSelection, PackageSelection, RoomPatch,
};
use crate::domain::hotel::{Hotel, MealPlan, Package, RoomRate, RoomType, rate_for};
use crate::domain::pricing::format_cents;
use crate::forms::rooms::{AddRoomForm, PackagesForm, UpdateRoomForm};
use crate::repository::{HotelReader, PackageReader, PromotionReader, RoomReader};
use crate::services::promotions::resolve_pending_code;
use crate::services::{
    DraftSummary, Outcome, ServiceError, ServiceResult, hotel_page_or_home,
};
use crate::storage::{BookingContext, DraftQuery, DraftStorage, load_wishlist};

/// Price of one meal plan and occupancy tier of a room type.
#[derive(Debug, Serialize)]
pub struct RateOption {
    pub meal_plan_id: i32,
    pub meal_plan_name: String,
    pub occupancy: i32,
    /// Nightly price.
    pub price: String,
    /// Price of the whole stay, known once dates are chosen.
    pub stay_price: Option<String>,
}

/// Room type with every rate it is sold at.
#[derive(Debug, Serialize)]
pub struct RoomOffer {
    pub room_type: RoomType,
    pub rates: Vec<RateOption>,
}

/// Package offered by the hotel and whether the guest picked it.
#[derive(Debug, Serialize)]
pub struct PackageOffer {
    pub package: Package,
    pub price: String,
    pub selected: bool,
}

/// Data required to render the property page.
pub struct PropertyPageData {
    pub hotel: Hotel,
    pub rooms: Vec<RoomOffer>,
    pub packages: Vec<PackageOffer>,
    pub meal_plans: Vec<MealPlan>,
    pub draft: BookingDraft,
    pub summary: DraftSummary,
    pub in_wishlist: bool,
}

/// Direction of a room quantity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityStep {
    Increment,
    Decrement,
}

/// Loads a hotel with its rooms, rates and packages and makes it the hotel
/// of the draft.
pub fn load_property_page<R, S>(
    repo: &R,
    storage: &S,
    hotel_id: i32,
    draft_query: DraftQuery,
    today: NaiveDate,
) -> ServiceResult<PropertyPageData>
where
    R: HotelReader + RoomReader + PackageReader + PromotionReader + ?Sized,
    S: DraftStorage + ?Sized,
{
    let hotel = repo
        .get_hotel_by_id(hotel_id)
        .map_err(ServiceError::from)?
        .filter(|hotel| hotel.is_active)
        .ok_or(ServiceError::NotFound)?;

    let mut context = BookingContext::hydrate(storage, draft_query);
    context.dispatch(DraftAction::SelectHotel(hotel.id));
    resolve_pending_code(repo, &mut context, today);

    let room_types = repo.list_room_types(hotel.id).unwrap_or_else(|err| {
        log::error!("Failed to list room types of hotel {}: {err}", hotel.id);
        Vec::new()
    });
    let rates = repo.list_room_rates(hotel.id).unwrap_or_else(|err| {
        log::error!("Failed to list room rates of hotel {}: {err}", hotel.id);
        Vec::new()
    });
    let meal_plans = repo.list_meal_plans().unwrap_or_else(|err| {
        log::error!("Failed to list meal plans: {err}");
        Vec::new()
    });
    let packages = repo.list_packages(hotel.id).unwrap_or_else(|err| {
        log::error!("Failed to list packages of hotel {}: {err}", hotel.id);
        Vec::new()
    });

    let draft = context.draft().clone();
    let nights = draft.nights();

    let rooms = room_types
        .into_iter()
        .map(|room_type| {
            let rates = rate_options(&rates, &meal_plans, room_type.id, nights);
            RoomOffer { room_type, rates }
        })
        .collect();

    let packages = packages
        .into_iter()
        .map(|package| PackageOffer {
            price: format_cents(package.price_cents),
            selected: draft.packages.iter().any(|p| p.id == package.id),
            package,
        })
        .collect();

    let in_wishlist = load_wishlist(storage).contains(&hotel.id);

    Ok(PropertyPageData {
        hotel,
        rooms,
        packages,
        meal_plans,
        summary: DraftSummary::from_draft(&draft),
        draft,
        in_wishlist,
    })
}

fn rate_options(
    rates: &[RoomRate],
    meal_plans: &[MealPlan],
    room_type_id: i32,
    nights: u32,
) -> Vec<RateOption> {
    let mut options: Vec<RateOption> = rates
        .iter()
        .filter(|rate| rate.room_type_id == room_type_id)
        .map(|rate| RateOption {
            meal_plan_id: rate.meal_plan_id,
            meal_plan_name: meal_plans
                .iter()
                .find(|plan| plan.id == rate.meal_plan_id)
                .map(|plan| plan.name.clone())
                .unwrap_or_else(|| "Room only".to_string()),
            occupancy: rate.occupancy,
            price: format_cents(rate.price_cents),
            stay_price: (nights > 0).then(|| format_cents(rate.price_cents * i64::from(nights))),
        })
        .collect();
    options.sort_by_key(|option| (option.meal_plan_id, option.occupancy));
    options
}

/// Adds a room at the rate matching the chosen meal plan and occupancy.
pub fn add_room<R, S>(
    repo: &R,
    storage: &S,
    hotel_id: i32,
    form: AddRoomForm,
) -> ServiceResult<Outcome>
where
    R: RoomReader + ?Sized,
    S: DraftStorage + ?Sized,
{
    let form = form
        .validated()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let room_type = repo
        .get_room_type_by_id(form.room_type_id)
        .map_err(ServiceError::from)?
        .filter(|room_type| room_type.hotel_id == hotel_id)
        .ok_or(ServiceError::NotFound)?;
    let rate = find_rate(repo, &room_type, form.meal_plan_id, form.occupancy)?;

    let mut context = BookingContext::hydrate(storage, DraftQuery::default());
    context.dispatch(DraftAction::SelectHotel(hotel_id));
    context.dispatch(DraftAction::AddRoom(NewRoomSelection {
        room_type_id: room_type.id,
        name: room_type.name.clone(),
        price_cents: rate.price_cents,
        meal_plan_id: Some(form.meal_plan_id),
        occupancy: form.occupancy,
    }));

    Ok(Outcome::new(
        format!("{} added to your booking.", room_type.name),
        format!("/hotels/{hotel_id}"),
    ))
}

/// Changes meal plan, occupancy or quantity of a selected room, re-pricing
/// it when the rate changes.
pub fn update_room<R, S>(
    repo: &R,
    storage: &S,
    room_id: u32,
    form: UpdateRoomForm,
) -> ServiceResult<Outcome>
where
    R: RoomReader + ?Sized,
    S: DraftStorage + ?Sized,
{
    let form = form
        .validated()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let mut context = BookingContext::hydrate(storage, DraftQuery::default());
    let room = context
        .draft()
        .room(room_id)
        .cloned()
        .ok_or(ServiceError::NotFound)?;

    let mut patch = RoomPatch {
        quantity: form.quantity,
        ..RoomPatch::default()
    };

    let meal_plan_id = form.meal_plan_id.or(room.meal_plan_id);
    let occupancy = form.occupancy.unwrap_or(room.occupancy);
    if meal_plan_id != room.meal_plan_id || occupancy != room.occupancy {
        let meal_plan_id = meal_plan_id
            .ok_or_else(|| ServiceError::Form("Choose a meal plan.".to_string()))?;
        let room_type = repo
            .get_room_type_by_id(room.room_type_id)
            .map_err(ServiceError::from)?
            .ok_or(ServiceError::NotFound)?;
        let rate = find_rate(repo, &room_type, meal_plan_id, occupancy)?;

        patch.price_cents = Some(rate.price_cents);
        patch.meal_plan_id = Some(Some(meal_plan_id));
        patch.occupancy = Some(occupancy);
    }

    context.dispatch(DraftAction::UpdateRoom { id: room_id, patch });
    Ok(Outcome::new(
        "Room updated.",
        hotel_page_or_home(context.draft()),
    ))
}

/// Removes a selected room from the draft.
pub fn remove_room<S>(storage: &S, room_id: u32) -> ServiceResult<Outcome>
where
    S: DraftStorage + ?Sized,
{
    let mut context = BookingContext::hydrate(storage, DraftQuery::default());
    if context.draft().room(room_id).is_none() {
        return Err(ServiceError::NotFound);
    }
    context.dispatch(DraftAction::RemoveRoom(room_id));
    Ok(Outcome::new(
        "Room removed.",
        hotel_page_or_home(context.draft()),
    ))
}

/// Adds or takes away one room of a selected room line. The quantity never
/// drops below one; removing the line is a separate action.
pub fn change_room_quantity<S>(
    storage: &S,
    room_id: u32,
    step: QuantityStep,
) -> ServiceResult<Outcome>
where
    S: DraftStorage + ?Sized,
{
    let mut context = BookingContext::hydrate(storage, DraftQuery::default());
    if context.draft().room(room_id).is_none() {
        return Err(ServiceError::NotFound);
    }
    let action = match step {
        QuantityStep::Increment => DraftAction::IncrementRoom(room_id),
        QuantityStep::Decrement => DraftAction::DecrementRoom(room_id),
    };
    if !context.dispatch(action) && step == QuantityStep::Increment {
        return Err(ServiceError::Form(format!(
            "At most {MAX_ROOM_QUANTITY} rooms of one kind can be booked."
        )));
    }
    Ok(Outcome::new(
        "Room quantity updated.",
        hotel_page_or_home(context.draft()),
    ))
}

/// Replaces the selected packages with the ticked ones. Ids the hotel does
/// not offer are ignored.
pub fn set_packages<R, S>(
    repo: &R,
    storage: &S,
    hotel_id: i32,
    form: PackagesForm,
) -> ServiceResult<Outcome>
where
    R: PackageReader + ?Sized,
    S: DraftStorage + ?Sized,
{
    let offered = repo.list_packages(hotel_id).map_err(ServiceError::from)?;

    let selected: Vec<PackageSelection> = form
        .package_ids
        .iter()
        .filter_map(|id| {
            let package = offered.iter().find(|package| package.id == *id);
            if package.is_none() {
                log::warn!("Ignoring package {id} not offered by hotel {hotel_id}");
            }
            package
        })
        .map(package_selection)
        .collect();

    let mut context = BookingContext::hydrate(storage, DraftQuery::default());
    context.dispatch(DraftAction::SelectHotel(hotel_id));
    context.dispatch(DraftAction::SetPackages(selected));

    Ok(Outcome::new(
        "Packages updated.",
        format!("/hotels/{hotel_id}"),
    ))
}

/// Adds one package or removes it when already selected.
pub fn toggle_package<R, S>(
    repo: &R,
    storage: &S,
    hotel_id: i32,
    package_id: i32,
) -> ServiceResult<Outcome>
where
    R: PackageReader + ?Sized,
    S: DraftStorage + ?Sized,
{
    let offered = repo.list_packages(hotel_id).map_err(ServiceError::from)?;
    let package = offered
        .iter()
        .find(|package| package.id == package_id)
        .ok_or(ServiceError::NotFound)?;

    let mut context = BookingContext::hydrate(storage, DraftQuery::default());
    context.dispatch(DraftAction::SelectHotel(hotel_id));
    context.dispatch(DraftAction::TogglePackage(package_selection(package)));

    let message = if context.draft().packages.iter().any(|p| p.id == package_id) {
        format!("{} added.", package.name)
    } else {
        format!("{} removed.", package.name)
    };
    Ok(Outcome::new(message, format!("/hotels/{hotel_id}")))
}

fn package_selection(package: &Package) -> PackageSelection {
    PackageSelection {
        id: package.id,
        description: package.name.clone(),
        price_cents: package.price_cents,
    }
}

fn find_rate<R>(
    repo: &R,
    room_type: &RoomType,
    meal_plan_id: i32,
    occupancy: u32,
) -> ServiceResult<RoomRate>
where
    R: RoomReader + ?Sized,
{
    let occupancy = i32::try_from(occupancy).unwrap_or(i32::MAX);
    if occupancy > room_type.max_occupancy {
        return Err(ServiceError::Form(format!(
            "{} sleeps at most {} guests.",
            room_type.name, room_type.max_occupancy
        )));
    }

    let rates = repo
        .list_room_rates(room_type.hotel_id)
        .map_err(ServiceError::from)?;
    rate_for(&rates, room_type.id, meal_plan_id, occupancy)
        .cloned()
        .ok_or_else(|| {
            ServiceError::Form(format!(
                "No rate is available for {} with this meal plan.",
                room_type.name
            ))
        })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::repository::mock::MockRepo;
    use crate::storage::MemoryStorage;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
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

    fn room_type(id: i32, hotel_id: i32) -> RoomType {
        RoomType {
            id,
            hotel_id,
            name: "Standard Double".to_string(),
            description: None,
            max_occupancy: 3,
        }
    }

    fn rates() -> Vec<RoomRate> {
        vec![
            RoomRate {
                id: 1,
                room_type_id: 1,
                meal_plan_id: 1,
                occupancy: 2,
                price_cents: 10_000,
            },
            RoomRate {
                id: 2,
                room_type_id: 1,
                meal_plan_id: 2,
                occupancy: 2,
                price_cents: 13_000,
            },
            RoomRate {
                id: 3,
                room_type_id: 1,
                meal_plan_id: 1,
                occupancy: 3,
                price_cents: 12_500,
            },
        ]
    }

    fn packages() -> Vec<Package> {
        vec![
            Package {
                id: 1,
                hotel_id: 1,
                name: "Airport transfer".to_string(),
                description: None,
                price_cents: 4_500,
            },
            Package {
                id: 2,
                hotel_id: 1,
                name: "Spa".to_string(),
                description: None,
                price_cents: 5_000,
            },
        ]
    }

    fn catalog() -> MockRepo {
        let mut repo = MockRepo::new();
        repo.hotels
            .expect_get_hotel_by_id()
            .returning(|id| Ok(Some(hotel(id))));
        repo.rooms
            .expect_get_room_type_by_id()
            .returning(|id| Ok(Some(room_type(id, 1))));
        repo.rooms
            .expect_list_room_types()
            .returning(|hotel_id| Ok(vec![room_type(1, hotel_id)]));
        repo.rooms.expect_list_room_rates().returning(|_| Ok(rates()));
        repo.rooms.expect_list_meal_plans().returning(|| {
            Ok(vec![
                MealPlan {
                    id: 1,
                    code: "RO".to_string(),
                    name: "Room only".to_string(),
                },
                MealPlan {
                    id: 2,
                    code: "BB".to_string(),
                    name: "Bed & breakfast".to_string(),
                },
            ])
        });
        repo.packages
            .expect_list_packages()
            .returning(|_| Ok(packages()));
        repo.promotions
            .expect_get_promotion_by_code()
            .returning(|_| Ok(None));
        repo
    }

    fn current(storage: &MemoryStorage) -> BookingDraft {
        BookingContext::hydrate(storage, DraftQuery::default())
            .draft()
            .clone()
    }

    fn add_form(meal_plan_id: i32, occupancy: u32) -> AddRoomForm {
        AddRoomForm {
            room_type_id: 1,
            meal_plan_id,
            occupancy,
        }
    }

    #[test]
    fn property_page_lists_rates_and_selects_hotel() {
        let repo = catalog();
        let storage = MemoryStorage::new();
        let query =
            DraftQuery::from_query_string("check_in=2024-06-01&check_out=2024-06-04");

        let data = load_property_page(&repo, &storage, 1, query, date(2024, 5, 1)).unwrap();

        assert_eq!(data.hotel.id, 1);
        assert_eq!(data.rooms.len(), 1);
        assert_eq!(data.rooms[0].rates.len(), 3);
        assert_eq!(data.rooms[0].rates[0].meal_plan_name, "Room only");
        assert_eq!(data.rooms[0].rates[0].stay_price.as_deref(), Some("300.00"));
        assert_eq!(data.packages.len(), 2);
        assert_eq!(current(&storage).hotel_id, Some(1));
    }

    #[test]
    fn inactive_hotel_is_not_found() {
        let mut repo = MockRepo::new();
        repo.hotels.expect_get_hotel_by_id().returning(|id| {
            let mut hotel = hotel(id);
            hotel.is_active = false;
            Ok(Some(hotel))
        });

        let storage = MemoryStorage::new();
        let result =
            load_property_page(&repo, &storage, 1, DraftQuery::default(), date(2024, 5, 1));
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn adding_same_rate_twice_increments_quantity() {
        let repo = catalog();
        let storage = MemoryStorage::new();

        add_room(&repo, &storage, 1, add_form(1, 2)).unwrap();
        add_room(&repo, &storage, 1, add_form(1, 2)).unwrap();
        add_room(&repo, &storage, 1, add_form(2, 2)).unwrap();

        let draft = current(&storage);
        assert_eq!(draft.rooms.len(), 2);
        assert_eq!(draft.rooms[0].quantity, 2);
        assert_eq!(draft.rooms[0].price_cents, 10_000);
        assert_eq!(draft.rooms[1].price_cents, 13_000);
    }

    #[test]
    fn room_from_another_hotel_is_not_found() {
        let mut repo = MockRepo::new();
        repo.rooms
            .expect_get_room_type_by_id()
            .returning(|id| Ok(Some(room_type(id, 2))));

        let storage = MemoryStorage::new();
        let result = add_room(&repo, &storage, 1, add_form(1, 2));
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn party_larger_than_room_is_rejected() {
        let repo = catalog();
        let storage = MemoryStorage::new();
        let result = add_room(&repo, &storage, 1, add_form(1, 4));
        assert!(matches!(result, Err(ServiceError::Form(_))));
        assert!(current(&storage).rooms.is_empty());
    }

    #[test]
    fn updating_occupancy_reprices_the_room() {
        let repo = catalog();
        let storage = MemoryStorage::new();
        add_room(&repo, &storage, 1, add_form(1, 2)).unwrap();

        let form = UpdateRoomForm {
            occupancy: Some(3),
            ..UpdateRoomForm::default()
        };
        update_room(&repo, &storage, 1, form).unwrap();

        let draft = current(&storage);
        assert_eq!(draft.rooms[0].occupancy, 3);
        assert_eq!(draft.rooms[0].price_cents, 12_500);
    }

    #[test]
    fn updating_quantity_keeps_price() {
        let repo = catalog();
        let storage = MemoryStorage::new();
        add_room(&repo, &storage, 1, add_form(1, 2)).unwrap();

        let form = UpdateRoomForm {
            quantity: Some(3),
            ..UpdateRoomForm::default()
        };
        update_room(&repo, &storage, 1, form).unwrap();

        let draft = current(&storage);
        assert_eq!(draft.rooms[0].quantity, 3);
        assert_eq!(draft.rooms[0].price_cents, 10_000);
    }

    #[test]
    fn quantity_steps_and_removal() {
        let repo = catalog();
        let storage = MemoryStorage::new();
        add_room(&repo, &storage, 1, add_form(1, 2)).unwrap();

        change_room_quantity(&storage, 1, QuantityStep::Increment).unwrap();
        assert_eq!(current(&storage).rooms[0].quantity, 2);

        change_room_quantity(&storage, 1, QuantityStep::Decrement).unwrap();
        change_room_quantity(&storage, 1, QuantityStep::Decrement).unwrap();
        assert_eq!(current(&storage).rooms[0].quantity, 1);

        for _ in 1..MAX_ROOM_QUANTITY {
            change_room_quantity(&storage, 1, QuantityStep::Increment).unwrap();
        }
        assert!(matches!(
            change_room_quantity(&storage, 1, QuantityStep::Increment),
            Err(ServiceError::Form(_))
        ));
        assert_eq!(current(&storage).rooms[0].quantity, MAX_ROOM_QUANTITY);

        remove_room(&storage, 1).unwrap();
        assert!(current(&storage).rooms.is_empty());
        assert!(matches!(
            remove_room(&storage, 1),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn set_packages_ignores_unknown_ids() {
        let repo = catalog();
        let storage = MemoryStorage::new();

        let form = PackagesForm {
            package_ids: vec![2, 9],
        };
        set_packages(&repo, &storage, 1, form).unwrap();

        let draft = current(&storage);
        assert_eq!(draft.packages.len(), 1);
        assert_eq!(draft.packages[0].id, 2);
        assert_eq!(draft.totals.package_subtotal_cents, 5_000);
    }

    #[test]
    fn toggle_package_adds_then_removes() {
        let repo = catalog();
        let storage = MemoryStorage::new();

        let outcome = toggle_package(&repo, &storage, 1, 1).unwrap();
        assert_eq!(outcome.message, "Airport transfer added.");
        assert_eq!(current(&storage).packages.len(), 1);

        toggle_package(&repo, &storage, 1, 1).unwrap();
        assert!(current(&storage).packages.is_empty());
    }

    #[test]
    fn switching_hotel_drops_previous_selection() {
        let repo = catalog();
        let storage = MemoryStorage::new();
        add_room(&repo, &storage, 1, add_form(1, 2)).unwrap();

        load_property_page(&repo, &storage, 2, DraftQuery::default(), date(2024, 5, 1)).unwrap();

        let draft = current(&storage);
        assert_eq!(draft.hotel_id, Some(2));
        assert!(draft.rooms.is_empty());
    }
}
