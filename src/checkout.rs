//! Checkout of the cart: customer verification, availability of every item,
//! one rental submission and reconciliation of what was actually rented.

use crate::{
    cart::Cart,
    client::{ApiError, RentalApi},
    model::{
        parse_customer_id, AvailabilityResponse, CustomerId, FilmId, InventoryId, Movie,
        RentalItem, RentalRequest, RentalResult, StoreId,
    },
    notify::Notification,
};
use futures::future::join_all;
use std::fmt::{self, Display, Formatter};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Verifying,
    CheckingAvailability,
    Submitting,
    Completed,
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unavailable {
    pub film_id: FilmId,
    pub title: String,
    pub reason: String,
}

impl Display for Unavailable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.reason)
    }
}

fn listed<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn status_label(status: &Option<u16>) -> String {
    status.map_or_else(|| "bad response".to_owned(), |status| status.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("{0}")]
    Validation(String),
    #[error("the cart is empty")]
    EmptyCart,
    #[error("customer {0} does not exist")]
    CustomerNotFound(CustomerId),
    #[error("could not verify customer {customer}: {source}")]
    Verification {
        customer: CustomerId,
        source: ApiError,
    },
    #[error("not available: {}", listed(.0))]
    Availability(Vec<Unavailable>),
    #[error("{available} of {expected} available movies came without an inventory id")]
    InconsistentState { expected: usize, available: usize },
    #[error("the rental request timed out and nothing was changed, try again")]
    Timeout,
    #[error("could not reach the rental service: {0}")]
    Connection(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("rental service failed ({}): {message}", status_label(.status))]
    Server {
        status: Option<u16>,
        message: String,
    },
}

impl CheckoutError {
    fn submission(error: ApiError) -> Self {
        match error {
            ApiError::Timeout => Self::Timeout,
            ApiError::Connection(message) => Self::Connection(message),
            ApiError::Status {
                status: 422,
                message,
            } => Self::Validation(message),
            ApiError::Status {
                status: 404,
                message,
            } => Self::NotFound(message),
            ApiError::Status { status, message } => Self::Server {
                status: Some(status),
                message,
            },
            ApiError::Decode(message) => Self::Server {
                status: None,
                message,
            },
        }
    }

    /// The one message the user sees for this abort.
    pub fn notification(&self) -> Notification {
        match self {
            Self::Validation(_)
            | Self::EmptyCart
            | Self::CustomerNotFound(_)
            | Self::Availability(_) => Notification::warning(self),
            _ => Notification::error(self),
        }
    }
}

/// Checks that the typed customer id is a positive integer.
pub fn parse_customer(input: &str) -> Result<CustomerId, CheckoutError> {
    parse_customer_id(input).map_err(|error| CheckoutError::Validation(error.to_string()))
}

/// Availability of one cart item, as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemAvailability {
    pub film_id: FilmId,
    pub title: String,
    pub available: bool,
    pub inventory_id: Option<InventoryId>,
    pub error: Option<String>,
}

impl ItemAvailability {
    fn new(movie: &Movie, response: Result<AvailabilityResponse, ApiError>) -> Self {
        let (available, inventory_id, error) = match response {
            Ok(AvailabilityResponse {
                available: Some(available),
                inventory_id,
            }) => (available, inventory_id, None),
            Ok(AvailabilityResponse { available: None, .. }) => (
                false,
                None,
                Some("malformed availability response".to_owned()),
            ),
            Err(error) => (false, None, Some(error.to_string())),
        };
        Self {
            film_id: movie.id,
            title: movie.title.clone(),
            available,
            inventory_id,
            error,
        }
    }

    fn reason(&self) -> String {
        self.error
            .clone()
            .unwrap_or_else(|| "no copy available at this store".to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedItem {
    pub film_id: FilmId,
    pub title: String,
    pub error: String,
}

impl Display for FailedItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.error)
    }
}

/// What the service actually rented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOutcome {
    pub completed: Vec<FilmId>,
    pub failed: Vec<FailedItem>,
    pub warning: Option<String>,
}

impl CheckoutOutcome {
    fn reconcile(result: RentalResult, movies: &[Movie]) -> Self {
        let title = |film_id: FilmId| {
            movies
                .iter()
                .find(|movie| movie.id == film_id)
                .map_or_else(|| format!("film {film_id}"), |movie| movie.title.clone())
        };

        let RentalResult {
            success,
            completed,
            failed,
            message,
        } = result;

        Self {
            completed: completed.into_iter().map(|rental| rental.film_id).collect(),
            failed: failed
                .into_iter()
                .map(|rental| FailedItem {
                    title: title(rental.film_id),
                    film_id: rental.film_id,
                    error: rental.error,
                })
                .collect(),
            warning: if success {
                None
            } else {
                Some(message.unwrap_or_else(|| "the service reported a failure".to_owned()))
            },
        }
    }

    /// Removes the rented movies; everything else stays for another try.
    pub fn apply(&self, cart: &mut Cart) -> usize {
        cart.remove_all(&self.completed)
    }

    pub fn notification(&self) -> Notification {
        let rented = match self.completed.len() {
            1 => "Rented 1 movie".to_owned(),
            count => format!("Rented {count} movies"),
        };
        match (&self.warning, self.failed.is_empty()) {
            (None, true) => Notification::success(rented),
            (None, false) => Notification::warning(format!(
                "{rented}; could not rent: {}",
                listed(&self.failed)
            )),
            (Some(warning), true) => Notification::warning(format!("{rented}; {warning}")),
            (Some(warning), false) => Notification::warning(format!(
                "{rented}; {warning}; could not rent: {}",
                listed(&self.failed)
            )),
        }
    }
}

/// One checkout against one store. Holds no state between runs.
#[derive(Debug)]
pub struct Checkout<'a, A: ?Sized> {
    api: &'a A,
    store: StoreId,
    stage: Stage,
}

impl<'a, A> Checkout<'a, A>
where
    A: RentalApi + ?Sized,
{
    pub const fn new(api: &'a A, store: StoreId) -> Self {
        Self {
            api,
            store,
            stage: Stage::Idle,
        }
    }

    pub const fn stage(&self) -> Stage {
        self.stage
    }

    fn enter(&mut self, stage: Stage) {
        debug!(from = ?self.stage, to = ?stage, "checkout stage");
        self.stage = stage;
    }

    /// Runs the whole checkout for `movies` (a snapshot of the cart).
    ///
    /// Input problems are reported before any request is made. The cart itself is
    /// never touched here; apply the outcome with [`CheckoutOutcome::apply`].
    pub async fn run(
        &mut self,
        customer: &str,
        movies: &[Movie],
    ) -> Result<CheckoutOutcome, CheckoutError> {
        self.stage = Stage::Idle;
        match self.try_run(customer, movies).await {
            Ok(outcome) => {
                info!(
                    completed = outcome.completed.len(),
                    failed = outcome.failed.len(),
                    "checkout completed"
                );
                self.enter(Stage::Completed);
                Ok(outcome)
            }
            Err(error) => {
                warn!(stage = ?self.stage, %error, "checkout aborted");
                self.enter(Stage::Aborted);
                Err(error)
            }
        }
    }

    async fn try_run(
        &mut self,
        customer: &str,
        movies: &[Movie],
    ) -> Result<CheckoutOutcome, CheckoutError> {
        if movies.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let customer = parse_customer(customer)?;

        self.enter(Stage::Verifying);
        self.verify(customer).await?;

        self.enter(Stage::CheckingAvailability);
        let checks = self.check_availability(movies).await;
        let request = self.plan(customer, &checks, movies.len())?;

        self.enter(Stage::Submitting);
        let result = self
            .api
            .create_rental(&request)
            .await
            .map_err(CheckoutError::submission)?;

        Ok(CheckoutOutcome::reconcile(result, movies))
    }

    async fn verify(&self, customer: CustomerId) -> Result<(), CheckoutError> {
        match self.api.customer_exists(customer).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(CheckoutError::CustomerNotFound(customer)),
            Err(source) => Err(CheckoutError::Verification { customer, source }),
        }
    }

    /// One request per movie, all awaited; a failed request never cancels the others.
    pub async fn check_availability(&self, movies: &[Movie]) -> Vec<ItemAvailability> {
        let store = self.store;
        join_all(movies.iter().map(|movie| async move {
            let response = self.api.availability(movie.id, store).await;
            ItemAvailability::new(movie, response)
        }))
        .await
    }

    fn plan(
        &self,
        customer: CustomerId,
        checks: &[ItemAvailability],
        expected: usize,
    ) -> Result<RentalRequest, CheckoutError> {
        let unavailable: Vec<_> = checks
            .iter()
            .filter(|check| !check.available)
            .map(|check| Unavailable {
                film_id: check.film_id,
                title: check.title.clone(),
                reason: check.reason(),
            })
            .collect();
        if !unavailable.is_empty() {
            return Err(CheckoutError::Availability(unavailable));
        }

        let items: Vec<_> = checks
            .iter()
            .filter_map(|check| {
                check.inventory_id.map(|inventory_id| RentalItem {
                    film_id: check.film_id,
                    inventory_id,
                })
            })
            .collect();
        if items.len() != expected {
            return Err(CheckoutError::InconsistentState {
                expected,
                available: items.len(),
            });
        }

        Ok(RentalRequest {
            customer_id: customer,
            store_id: self.store,
            items,
        })
    }
}
