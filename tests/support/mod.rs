#![allow(dead_code)]

use async_trait::async_trait;
use rental_store::{
    model::{
        AvailabilityResponse, CompletedRental, CustomerId, FilmId, Movie, MovieDetails, Rental,
        RentalId, RentalRequest, RentalResult, ReturnResult, StoreId,
    },
    ApiError, Cart, RentalApi,
};
use rust_decimal::Decimal;
use std::{collections::HashMap, sync::Mutex};

/// In-memory rental service. Every call is recorded by name.
#[derive(Default)]
pub struct MockApi {
    pub customers: Vec<CustomerId>,
    pub verify_error: Option<ApiError>,
    pub availability: HashMap<FilmId, Result<AvailabilityResponse, ApiError>>,
    pub rental: Option<Result<RentalResult, ApiError>>,
    pub rentals: Mutex<HashMap<CustomerId, Vec<Rental>>>,
    pub lookup_error: Option<ApiError>,
    pub return_result: Option<Result<ReturnResult, ApiError>>,

    pub calls: Mutex<Vec<String>>,
    pub submitted: Mutex<Vec<RentalRequest>>,
    pub returned: Mutex<Vec<Vec<RentalId>>>,
}

impl MockApi {
    pub fn with_customers(customers: &[CustomerId]) -> Self {
        Self {
            customers: customers.to_vec(),
            ..Self::default()
        }
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    pub fn submitted(&self) -> Vec<RentalRequest> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl RentalApi for MockApi {
    async fn customer_exists(&self, customer: CustomerId) -> Result<bool, ApiError> {
        self.record(format!("customer {customer}"));
        match &self.verify_error {
            Some(error) => Err(error.clone()),
            None => Ok(self.customers.contains(&customer)),
        }
    }

    async fn movies(&self, query: &str, store: StoreId) -> Result<Vec<Movie>, ApiError> {
        self.record(format!("movies {query:?} {}", store.0));
        Ok((1..=20).map(movie).collect())
    }

    async fn movie_details(&self, film: FilmId, store: StoreId) -> Result<MovieDetails, ApiError> {
        self.record(format!("details {film} {}", store.0));
        Ok(MovieDetails {
            movie: movie(film),
            actors: vec![],
            available: true,
            inventory_ids: vec![film * 100],
        })
    }

    async fn availability(
        &self,
        film: FilmId,
        store: StoreId,
    ) -> Result<AvailabilityResponse, ApiError> {
        self.record(format!("availability {film} {}", store.0));
        self.availability.get(&film).cloned().unwrap_or(Ok(AvailabilityResponse {
            available: Some(true),
            inventory_id: Some(film * 100),
        }))
    }

    async fn create_rental(&self, request: &RentalRequest) -> Result<RentalResult, ApiError> {
        self.record("rental");
        self.submitted.lock().unwrap().push(request.clone());
        self.rental.clone().unwrap_or_else(|| {
            Ok(RentalResult {
                success: true,
                completed: request
                    .items
                    .iter()
                    .map(|item| CompletedRental {
                        film_id: item.film_id,
                        inventory_id: Some(item.inventory_id),
                        rental_id: Some(item.film_id + 1000),
                    })
                    .collect(),
                failed: vec![],
                message: None,
            })
        })
    }

    async fn customer_rentals(&self, customer: CustomerId) -> Result<Vec<Rental>, ApiError> {
        self.record(format!("rentals {customer}"));
        if let Some(error) = &self.lookup_error {
            return Err(error.clone());
        }
        Ok(self
            .rentals
            .lock()
            .unwrap()
            .get(&customer)
            .cloned()
            .unwrap_or_default())
    }

    async fn return_rentals(&self, rentals: &[RentalId]) -> Result<ReturnResult, ApiError> {
        self.record("returns");
        self.returned.lock().unwrap().push(rentals.to_vec());
        if let Some(result) = &self.return_result {
            return result.clone();
        }
        for active in self.rentals.lock().unwrap().values_mut() {
            active.retain(|rental| !rentals.contains(&rental.rental_id));
        }
        Ok(ReturnResult {
            success: true,
            message: Some(format!("{} returns processed", rentals.len())),
            updated_count: Some(u32::try_from(rentals.len()).unwrap()),
        })
    }
}

pub fn movie(id: FilmId) -> Movie {
    Movie::new(id, format!("FILM {id}"), Decimal::new(299, 2))
}

pub fn cart(ids: &[FilmId]) -> Cart {
    let mut cart = Cart::new();
    for &id in ids {
        cart.add(movie(id));
    }
    cart
}

pub fn rental(rental_id: RentalId, film_id: FilmId) -> Rental {
    Rental {
        rental_id,
        film_id,
        title: format!("FILM {film_id}"),
        rental_date: Some("2005-05-24 22:53:30".into()),
        inventory_id: Some(film_id * 100),
    }
}
