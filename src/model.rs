use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{self, Display, Formatter};
use thiserror::Error;

pub type FilmId = u32;
pub type InventoryId = u32;
pub type RentalId = u32;
pub type CustomerId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustomerIdError {
    #[error("enter a customer id")]
    Blank,
    #[error("customer id must be a positive number, got `{0}`")]
    Invalid(String),
}

/// Typed customer ids are trimmed and must be positive integers.
pub fn parse_customer_id(input: &str) -> Result<CustomerId, CustomerIdError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CustomerIdError::Blank);
    }
    match input.parse::<CustomerId>() {
        Ok(customer) if customer > 0 => Ok(customer),
        _ => Err(CustomerIdError::Invalid(input.to_owned())),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreId(pub u32);

impl Display for StoreId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Store {}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: FilmId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub rental_rate: Decimal,

    #[serde(default)]
    pub release_year: Option<u16>,
    #[serde(default)]
    pub length: Option<u16>,
    #[serde(default)]
    pub rating: Option<String>,
}

impl Movie {
    pub fn new(id: FilmId, title: impl Into<String>, rental_rate: Decimal) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            rental_rate,
            release_year: None,
            length: None,
            rating: None,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub movie: Movie,

    #[serde(default)]
    pub actors: Vec<String>,
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub inventory_ids: Vec<InventoryId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieList {
    pub movies: Vec<Movie>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerStatus {
    pub exists: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Greeting {
    #[serde(default)]
    pub message: String,
}

/// Raw availability answer. `available` stays optional so a malformed
/// body can be told apart from a real "no".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    #[serde(default)]
    pub available: Option<bool>,
    #[serde(default)]
    pub inventory_id: Option<InventoryId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalItem {
    pub film_id: FilmId,
    pub inventory_id: InventoryId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalRequest {
    pub customer_id: CustomerId,
    pub store_id: StoreId,
    pub items: Vec<RentalItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedRental {
    pub film_id: FilmId,
    #[serde(default)]
    pub inventory_id: Option<InventoryId>,
    #[serde(default)]
    pub rental_id: Option<RentalId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedRental {
    pub film_id: FilmId,
    #[serde(default)]
    pub inventory_id: Option<InventoryId>,
    #[serde(default)]
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalResult {
    #[serde(default = "yes")]
    pub success: bool,
    #[serde(default)]
    pub completed: Vec<CompletedRental>,
    #[serde(default)]
    pub failed: Vec<FailedRental>,
    #[serde(default)]
    pub message: Option<String>,
}

const fn yes() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rental {
    pub rental_id: RentalId,
    pub film_id: FilmId,
    pub title: String,
    #[serde(default)]
    pub rental_date: Option<String>,
    #[serde(default)]
    pub inventory_id: Option<InventoryId>,
}

impl Rental {
    const DATE_FORMAT: &'static str = "%Y-%m-%d %H:%M:%S";

    pub fn rented_on(&self) -> Option<NaiveDate> {
        let raw = self.rental_date.as_deref()?;
        NaiveDateTime::parse_from_str(raw, Self::DATE_FORMAT)
            .map(|at| at.date())
            .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
            .ok()
    }

    pub fn rented_on_label(&self) -> String {
        match (self.rented_on(), &self.rental_date) {
            (Some(date), _) => date.to_string(),
            (None, Some(raw)) => raw.clone(),
            (None, None) => "unknown date".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalList {
    pub rentals: Vec<Rental>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnRequest {
    pub rental_ids: Vec<RentalId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnResult {
    #[serde(default = "yes")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub updated_count: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_id_is_trimmed_positive_integer() {
        assert_eq!(parse_customer_id(" 42 "), Ok(42));
        assert_eq!(parse_customer_id("   "), Err(CustomerIdError::Blank));
        for bad in ["abc", "0", "-3", "1.5", "4 2"] {
            assert_eq!(
                parse_customer_id(bad),
                Err(CustomerIdError::Invalid(bad.to_owned()))
            );
        }
    }

    #[test]
    fn movie_tolerates_null_description_and_float_rate() {
        let movie: Movie = json::from_str(
            r#"{"id": 7, "title": "ACADEMY DINOSAUR", "description": null,
                "release_year": 2006, "rental_rate": 0.99, "length": 86, "rating": "PG"}"#,
        )
        .unwrap();

        assert_eq!(movie.description, "");
        assert_eq!(movie.rental_rate, Decimal::new(99, 2));
        assert_eq!(movie.length, Some(86));
    }

    #[test]
    fn availability_without_flag_keeps_none() {
        let raw: AvailabilityResponse = json::from_str(r#"{"inventory_id": 12}"#).unwrap();
        assert_eq!(raw.available, None);
        assert_eq!(raw.inventory_id, Some(12));
    }

    #[test]
    fn rental_result_defaults_success() {
        let result: RentalResult =
            json::from_str(r#"{"completed": [{"film_id": 1, "rental_id": 9}]}"#).unwrap();
        assert!(result.success);
        assert!(result.failed.is_empty());
        assert_eq!(result.completed[0].rental_id, Some(9));
    }

    #[test]
    fn rental_date_label() {
        let mut rental = Rental {
            rental_id: 1,
            film_id: 2,
            title: "ALIEN CENTER".into(),
            rental_date: Some("2005-05-24 22:53:30".into()),
            inventory_id: None,
        };
        assert_eq!(rental.rented_on_label(), "2005-05-24");

        rental.rental_date = Some("yesterday".into());
        assert_eq!(rental.rented_on_label(), "yesterday");

        rental.rental_date = None;
        assert_eq!(rental.rented_on_label(), "unknown date");
    }

    #[test]
    fn store_id_is_transparent() {
        let request = RentalRequest {
            customer_id: 3,
            store_id: StoreId(2),
            items: vec![RentalItem {
                film_id: 1,
                inventory_id: 5,
            }],
        };
        assert_eq!(
            json::to_value(&request).unwrap(),
            json::json!({"customer_id": 3, "store_id": 2, "items": [{"film_id": 1, "inventory_id": 5}]})
        );
    }
}
