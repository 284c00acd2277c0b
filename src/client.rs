use crate::model::{
    AvailabilityResponse, CustomerId, CustomerStatus, FilmId, Greeting, Movie, MovieDetails,
    MovieList, Rental, RentalId, RentalList, RentalRequest, RentalResult, ReturnRequest,
    ReturnResult, StoreId,
};
use async_trait::async_trait;
use json::json;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::{
    fmt::{Debug, Formatter},
    ops::Deref,
    time::Duration,
};
use thiserror::Error;
use tracing::{debug, trace};

macro_rules! api {
    ($api:expr, $($tt:tt)*) => {
        format!("{}/{}", $api, format!($($tt)*))
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("request timed out")]
    Timeout,
    #[error("could not reach the rental service: {0}")]
    Connection(String),
    #[error("rental service answered {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response from the rental service: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_decode() {
            Self::Decode(error.to_string())
        } else if let Some(status) = error.status() {
            Self::Status {
                status: status.as_u16(),
                message: error.to_string(),
            }
        } else {
            Self::Connection(error.to_string())
        }
    }
}

/// Everything the storefront asks of the remote rental service.
#[async_trait]
pub trait RentalApi: Send + Sync {
    async fn customer_exists(&self, customer: CustomerId) -> Result<bool, ApiError>;

    async fn movies(&self, query: &str, store: StoreId) -> Result<Vec<Movie>, ApiError>;

    async fn movie_details(&self, film: FilmId, store: StoreId) -> Result<MovieDetails, ApiError>;

    async fn availability(
        &self,
        film: FilmId,
        store: StoreId,
    ) -> Result<AvailabilityResponse, ApiError>;

    /// Submits the whole batch at once. Implementations bound this call in time.
    async fn create_rental(&self, request: &RentalRequest) -> Result<RentalResult, ApiError>;

    async fn customer_rentals(&self, customer: CustomerId) -> Result<Vec<Rental>, ApiError>;

    async fn return_rentals(&self, rentals: &[RentalId]) -> Result<ReturnResult, ApiError>;
}

pub struct Client {
    api: String,
    inner: reqwest::Client,
    rental_timeout: Duration,
}

impl Debug for Client {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Client {{ api: {}, rental_timeout: {:?}, client: reqwest::Client }}",
            self.api, self.rental_timeout
        )
    }
}

impl Deref for Client {
    type Target = reqwest::Client;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Client {
    pub const DEFAULT_API: &'static str = "http://localhost:8000";
    pub const RENTAL_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(api: &str, inner: reqwest::Client) -> Self {
        Self {
            api: api.trim().trim_end_matches('/').to_owned(),
            inner,
            rental_timeout: Self::RENTAL_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_rental_timeout(mut self, timeout: Duration) -> Self {
        self.rental_timeout = timeout;
        self
    }

    pub fn api(&self) -> &str {
        &self.api
    }

    /// Pings the service root; used to validate the base url before the storefront opens.
    pub async fn greet(&self) -> Result<Greeting, ApiError> {
        self.fetch(self.get(api!(self.api, ""))).await
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = checked(request.send().await?).await?;
        Ok(response.json().await?)
    }
}

async fn checked(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    trace!(url = %response.url(), %status, "response");
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        message: detail(&body, status),
    })
}

/// Error bodies look like `{"detail": ...}`; anything else is passed through as text.
fn detail(body: &str, status: StatusCode) -> String {
    match json::from_str::<json::Value>(body) {
        Ok(json::Value::Object(mut map)) => match map.remove("detail") {
            Some(json::Value::String(detail)) => detail,
            Some(detail) => detail.to_string(),
            None => body.trim().to_owned(),
        },
        _ if !body.trim().is_empty() => body.trim().to_owned(),
        _ => status
            .canonical_reason()
            .unwrap_or("unknown status")
            .to_owned(),
    }
}

#[async_trait]
impl RentalApi for Client {
    async fn customer_exists(&self, customer: CustomerId) -> Result<bool, ApiError> {
        debug!(customer, "verify customer");
        let status: CustomerStatus = self
            .fetch(self.get(api!(self.api, "customers/{customer}")))
            .await?;
        Ok(status.exists)
    }

    async fn movies(&self, query: &str, store: StoreId) -> Result<Vec<Movie>, ApiError> {
        debug!(query, %store, "fetch movies");
        let list: MovieList = self
            .fetch(self.get(api!(self.api, "movies")).query(&json!(
                {
                    "query": query,
                    "store_id": store,
                }
            )))
            .await?;
        Ok(list.movies)
    }

    async fn movie_details(&self, film: FilmId, store: StoreId) -> Result<MovieDetails, ApiError> {
        debug!(film, %store, "fetch movie details");
        self.fetch(
            self.get(api!(self.api, "movies/{film}/details"))
                .query(&json!({ "store_id": store })),
        )
        .await
    }

    async fn availability(
        &self,
        film: FilmId,
        store: StoreId,
    ) -> Result<AvailabilityResponse, ApiError> {
        self.fetch(
            self.get(api!(self.api, "films/{film}/availability"))
                .query(&json!({ "store_id": store })),
        )
        .await
    }

    async fn create_rental(&self, request: &RentalRequest) -> Result<RentalResult, ApiError> {
        debug!(
            customer = request.customer_id,
            store = %request.store_id,
            items = request.items.len(),
            "submit rental"
        );
        self.fetch(
            self.post(api!(self.api, "rentals"))
                .timeout(self.rental_timeout)
                .json(request),
        )
        .await
    }

    async fn customer_rentals(&self, customer: CustomerId) -> Result<Vec<Rental>, ApiError> {
        debug!(customer, "fetch active rentals");
        let list: RentalList = self
            .fetch(self.get(api!(self.api, "customers/{customer}/rentals")))
            .await?;
        Ok(list.rentals)
    }

    async fn return_rentals(&self, rentals: &[RentalId]) -> Result<ReturnResult, ApiError> {
        debug!(?rentals, "submit returns");
        self.fetch(self.post(api!(self.api, "returns")).json(&ReturnRequest {
            rental_ids: rentals.to_vec(),
        }))
        .await
    }
}
