// View state controller: user selections, fetched data, and the rules that
// reconcile interactions with menu fetches.

use chrono::NaiveDate;

use crate::api::{ApiError, Dish, MenuApi, Restaurant};
use crate::dates::{self, DateError};

/// Which restaurants' dishes are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestaurantFilter {
    #[default]
    All,
    Only(i64),
}

impl RestaurantFilter {
    pub fn matches(self, dish: &Dish) -> bool {
        match self {
            RestaurantFilter::All => true,
            RestaurantFilter::Only(id) => dish.restaurant_id == id,
        }
    }
}

/// Lifecycle of the menu list. Failures and empty payloads both land in
/// `Empty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuStatus {
    Empty,
    Loading,
    Loaded,
}

/// Issued for every menu request; only the most recent one may apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Stale,
}

#[derive(Debug, Clone)]
pub struct ViewState {
    date: NaiveDate,
    filter: RestaurantFilter,
    restaurants: Vec<Restaurant>,
    menu: Vec<Dish>,
    status: MenuStatus,
    latest: u64,
}

impl ViewState {
    pub fn new(today: NaiveDate) -> Self {
        ViewState {
            date: today,
            filter: RestaurantFilter::All,
            restaurants: Vec::new(),
            menu: Vec::new(),
            status: MenuStatus::Empty,
            latest: 0,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn filter(&self) -> RestaurantFilter {
        self.filter
    }

    pub fn restaurants(&self) -> &[Restaurant] {
        &self.restaurants
    }

    pub fn menu(&self) -> &[Dish] {
        &self.menu
    }

    pub fn status(&self) -> MenuStatus {
        self.status
    }

    pub fn set_restaurants(&mut self, restaurants: Vec<Restaurant>) {
        self.restaurants = restaurants;
    }

    /// Returns true when the date actually changed.
    pub fn select_date(&mut self, date: NaiveDate) -> bool {
        let changed = self.date != date;
        self.date = date;
        changed
    }

    /// Returns true when the filter actually changed.
    pub fn select_restaurant(&mut self, filter: RestaurantFilter) -> bool {
        let changed = self.filter != filter;
        self.filter = filter;
        changed
    }

    pub fn step_day(&mut self, offset: i64) -> Result<bool, DateError> {
        let date = dates::shift_days(self.date, offset)?;
        Ok(self.select_date(date))
    }

    pub fn reset_to_today(&mut self, today: NaiveDate) -> bool {
        self.select_date(today)
    }

    pub fn begin_menu_request(&mut self) -> RequestTicket {
        self.latest += 1;
        self.status = MenuStatus::Loading;
        RequestTicket(self.latest)
    }

    /// Apply a menu response. Responses to anything but the latest request
    /// are dropped. The list is always replaced wholesale: an error or an
    /// empty payload clears it.
    pub fn finish_menu_request(
        &mut self,
        ticket: RequestTicket,
        result: Result<Vec<Dish>, ApiError>,
    ) -> Outcome {
        if ticket.0 != self.latest {
            tracing::debug!(ticket = ticket.0, latest = self.latest, "dropping stale menu response");
            return Outcome::Stale;
        }
        match result {
            Ok(dishes) if !dishes.is_empty() => {
                self.menu = dishes;
                self.status = MenuStatus::Loaded;
            }
            Ok(_) => {
                tracing::info!(date = %self.date, "no menu for this day");
                self.menu.clear();
                self.status = MenuStatus::Empty;
            }
            Err(e) => {
                tracing::warn!(error = %e, date = %self.date, "no menu found or fetch failed");
                self.menu.clear();
                self.status = MenuStatus::Empty;
            }
        }
        Outcome::Applied
    }

    /// Dishes after applying the restaurant filter.
    pub fn visible_dishes(&self) -> impl Iterator<Item = &Dish> {
        let filter = self.filter;
        self.menu.iter().filter(move |d| filter.matches(d))
    }
}

/// Owns the view state and the API, and runs the fetch each interaction
/// triggers.
pub struct Controller<A> {
    api: A,
    state: ViewState,
}

impl<A: MenuApi> Controller<A> {
    pub fn new(api: A, state: ViewState) -> Self {
        Controller { api, state }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Fetch the restaurant list. On failure the list is left empty.
    pub fn load_restaurants(&mut self) {
        match self.api.fetch_restaurants() {
            Ok(list) => self.state.set_restaurants(list),
            Err(e) => {
                tracing::warn!(error = %e, "could not load restaurants");
                self.state.set_restaurants(Vec::new());
            }
        }
    }

    pub fn refresh_menu(&mut self) -> Outcome {
        let ticket = self.state.begin_menu_request();
        let result = self.api.fetch_menu(Some(self.state.date()));
        self.state.finish_menu_request(ticket, result)
    }

    /// Initial load: restaurants once, then the menu for the start date.
    pub fn start(&mut self) {
        self.load_restaurants();
        self.refresh_menu();
    }

    /// Change the restaurant filter and refetch. The filter itself is
    /// applied in [`ViewState::visible_dishes`].
    pub fn select_restaurant(&mut self, filter: RestaurantFilter) {
        if self.state.select_restaurant(filter) {
            self.refresh_menu();
        }
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        if self.state.select_date(date) {
            self.refresh_menu();
        }
    }

    pub fn step_day(&mut self, offset: i64) -> Result<(), DateError> {
        if self.state.step_day(offset)? {
            self.refresh_menu();
        }
        Ok(())
    }

    pub fn reset_to_today(&mut self) {
        if self.state.reset_to_today(dates::today()) {
            self.refresh_menu();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn dish(id: i64, restaurant_id: i64) -> Dish {
        Dish {
            id,
            name: format!("Dish {id}"),
            price: 7.5,
            date: date(14),
            restaurant_id,
            restaurant_name: None,
        }
    }

    /// Serves queued menu responses and records the dates requested.
    struct FakeApi {
        restaurants: RefCell<Option<Result<Vec<Restaurant>, ApiError>>>,
        menus: RefCell<Vec<Result<Vec<Dish>, ApiError>>>,
        requested: RefCell<Vec<Option<NaiveDate>>>,
    }

    impl FakeApi {
        fn new(menus: Vec<Result<Vec<Dish>, ApiError>>) -> Self {
            FakeApi {
                restaurants: RefCell::new(None),
                menus: RefCell::new(menus),
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    fn request_failed() -> ApiError {
        ApiError::Request {
            message: crate::api::MENU_FAILED,
            status: 500,
        }
    }

    impl MenuApi for FakeApi {
        fn fetch_restaurants(&self) -> Result<Vec<Restaurant>, ApiError> {
            self.restaurants
                .borrow_mut()
                .take()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        fn fetch_menu(&self, date: Option<NaiveDate>) -> Result<Vec<Dish>, ApiError> {
            self.requested.borrow_mut().push(date);
            let mut menus = self.menus.borrow_mut();
            if menus.is_empty() {
                Ok(Vec::new())
            } else {
                menus.remove(0)
            }
        }
    }

    #[test]
    fn starts_on_given_day_with_no_filter() {
        let state = ViewState::new(date(14));
        assert_eq!(state.date(), date(14));
        assert_eq!(state.filter(), RestaurantFilter::All);
        assert_eq!(state.status(), MenuStatus::Empty);
        assert!(state.menu().is_empty());
    }

    #[test]
    fn filter_without_matching_dish_shows_nothing() {
        let mut state = ViewState::new(date(14));
        let t = state.begin_menu_request();
        state.finish_menu_request(t, Ok(vec![dish(1, 1), dish(2, 2)]));

        state.select_restaurant(RestaurantFilter::Only(99));
        assert_eq!(state.visible_dishes().count(), 0);

        state.select_restaurant(RestaurantFilter::Only(2));
        let ids: Vec<i64> = state.visible_dishes().map(|d| d.id).collect();
        assert_eq!(ids, vec![2]);

        state.select_restaurant(RestaurantFilter::All);
        assert_eq!(state.visible_dishes().count(), 2);
    }

    #[test]
    fn empty_payload_clears_previous_menu() {
        let mut state = ViewState::new(date(14));
        let t = state.begin_menu_request();
        state.finish_menu_request(t, Ok(vec![dish(1, 1)]));
        assert_eq!(state.status(), MenuStatus::Loaded);

        let t = state.begin_menu_request();
        assert_eq!(state.status(), MenuStatus::Loading);
        state.finish_menu_request(t, Ok(Vec::new()));
        assert_eq!(state.status(), MenuStatus::Empty);
        assert!(state.menu().is_empty());
    }

    #[test]
    fn failed_fetch_resets_to_empty() {
        let mut state = ViewState::new(date(14));
        let t = state.begin_menu_request();
        state.finish_menu_request(t, Ok(vec![dish(1, 1)]));

        let t = state.begin_menu_request();
        assert_eq!(state.finish_menu_request(t, Err(request_failed())), Outcome::Applied);
        assert_eq!(state.status(), MenuStatus::Empty);
        assert!(state.menu().is_empty());
    }

    #[test]
    fn older_response_arriving_late_is_discarded() {
        let mut state = ViewState::new(date(14));
        let first = state.begin_menu_request();
        let second = state.begin_menu_request();

        assert_eq!(state.finish_menu_request(second, Ok(vec![dish(2, 1)])), Outcome::Applied);
        assert_eq!(state.finish_menu_request(first, Ok(vec![dish(1, 1)])), Outcome::Stale);
        assert_eq!(state.menu()[0].id, 2);
    }

    #[test]
    fn stepping_a_day_reports_change() {
        let mut state = ViewState::new(date(14));
        assert!(state.step_day(1).unwrap());
        assert_eq!(state.date(), date(15));
        assert!(state.step_day(-1).unwrap());
        assert_eq!(state.date(), date(14));
        assert!(!state.reset_to_today(date(14)));
    }

    #[test]
    fn controller_loads_restaurants_and_menu_on_start() {
        let api = FakeApi::new(vec![Ok(vec![dish(1, 1)])]);
        *api.restaurants.borrow_mut() = Some(Ok(vec![Restaurant {
            id: 1,
            name: "Augustiner".into(),
        }]));
        let mut controller = Controller::new(api, ViewState::new(date(14)));
        controller.start();

        assert_eq!(controller.state().restaurants().len(), 1);
        assert_eq!(controller.state().menu().len(), 1);
        assert_eq!(*controller.api.requested.borrow(), vec![Some(date(14))]);
    }

    #[test]
    fn controller_refetches_on_every_dependency_change() {
        let api = FakeApi::new(Vec::new());
        let mut controller = Controller::new(api, ViewState::new(date(14)));
        controller.step_day(1).unwrap();
        controller.select_date(date(20));
        controller.select_date(date(20));
        controller.select_restaurant(RestaurantFilter::Only(3));

        assert_eq!(
            *controller.api.requested.borrow(),
            vec![Some(date(15)), Some(date(20)), Some(date(20))]
        );
    }

    #[test]
    fn restaurant_fetch_failure_leaves_list_empty() {
        let api = FakeApi::new(Vec::new());
        *api.restaurants.borrow_mut() = Some(Err(request_failed()));
        let mut controller = Controller::new(api, ViewState::new(date(14)));
        controller.load_restaurants();
        assert!(controller.state().restaurants().is_empty());
    }

    #[test]
    fn controller_degrades_failed_menu_to_empty() {
        let api = FakeApi::new(vec![Ok(vec![dish(1, 1)]), Err(request_failed())]);
        let mut controller = Controller::new(api, ViewState::new(date(14)));
        controller.refresh_menu();
        assert_eq!(controller.state().menu().len(), 1);
        controller.step_day(1).unwrap();
        assert!(controller.state().menu().is_empty());
        assert_eq!(controller.state().status(), MenuStatus::Empty);
    }
}
