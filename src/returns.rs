use crate::{
    client::{ApiError, RentalApi},
    model::{parse_customer_id, CustomerId, Rental, RentalId, ReturnResult},
    notify::Notification,
};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReturnsError {
    #[error("{0}")]
    Validation(String),
    #[error("customer not found or connection error: {0}")]
    CustomerNotFound(ApiError),
    #[error("could not process the return: {0}")]
    Return(String),
}

impl ReturnsError {
    pub fn notification(&self) -> Notification {
        match self {
            Self::Validation(_) => Notification::warning(self),
            Self::CustomerNotFound(_) | Self::Return(_) => Notification::error(self),
        }
    }
}

pub fn parse_customer(input: &str) -> Result<CustomerId, ReturnsError> {
    parse_customer_id(input).map_err(|error| ReturnsError::Validation(error.to_string()))
}

/// Rentals picked for return, in click order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<RentalId>,
}

impl Selection {
    pub fn toggle(&mut self, id: RentalId) -> bool {
        if let Some(index) = self.ids.iter().position(|selected| *selected == id) {
            self.ids.remove(index);
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    pub fn contains(&self, id: RentalId) -> bool {
        self.ids.contains(&id)
    }

    /// Forgets ids that are no longer among the active rentals.
    pub fn retain_active(&mut self, rentals: &[Rental]) {
        self.ids
            .retain(|id| rentals.iter().any(|rental| rental.rental_id == *id));
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[RentalId] {
        &self.ids
    }
}

pub async fn lookup<A>(api: &A, customer: &str) -> Result<Vec<Rental>, ReturnsError>
where
    A: RentalApi + ?Sized,
{
    let customer = parse_customer(customer)?;
    let rentals = api
        .customer_rentals(customer)
        .await
        .map_err(ReturnsError::CustomerNotFound)?;
    debug!(customer, count = rentals.len(), "active rentals");
    Ok(rentals)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Returned {
    pub result: ReturnResult,
    /// Active rentals after the return; `None` when the refresh itself failed.
    pub rentals: Option<Vec<Rental>>,
}

impl Returned {
    pub fn notification(&self) -> Notification {
        match &self.result.message {
            Some(message) => Notification::success(format!("Return completed: {message}")),
            None => Notification::success("Return completed"),
        }
    }
}

/// Returns the selected rentals, then reloads the customer's active rentals.
pub async fn submit<A>(
    api: &A,
    customer: &str,
    selection: &Selection,
) -> Result<Returned, ReturnsError>
where
    A: RentalApi + ?Sized,
{
    if selection.is_empty() {
        return Err(ReturnsError::Validation(
            "select at least one movie to return".to_owned(),
        ));
    }

    let result = api
        .return_rentals(selection.ids())
        .await
        .map_err(|error| ReturnsError::Return(error.to_string()))?;
    if !result.success {
        return Err(ReturnsError::Return(
            result
                .message
                .unwrap_or_else(|| "the service rejected the return".to_owned()),
        ));
    }

    let rentals = match lookup(api, customer).await {
        Ok(rentals) => Some(rentals),
        Err(error) => {
            warn!(%error, "refresh after return failed");
            None
        }
    };
    Ok(Returned { result, rentals })
}
