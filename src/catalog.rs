use crate::{
    client::RentalApi,
    model::{Movie, StoreId},
    utils::Result,
};
use tracing::debug;

/// How many titles the store-wide sample shows when nothing is searched.
pub const SAMPLE_SIZE: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub query: String,
    pub store: StoreId,
}

impl CatalogQuery {
    pub fn new(query: &str, store: StoreId) -> Self {
        Self {
            query: query.trim().to_owned(),
            store,
        }
    }

    pub fn is_sample(&self) -> bool {
        self.query.is_empty()
    }
}

/// Fetches the catalog for a store. An empty query yields a prefix of the store sample.
pub async fn fetch<A>(api: &A, query: &CatalogQuery, sample_size: usize) -> Result<Vec<Movie>>
where
    A: RentalApi + ?Sized,
{
    let mut movies = api.movies(&query.query, query.store).await?;
    if query.is_sample() {
        movies.truncate(sample_size);
    }
    debug!(count = movies.len(), store = %query.store, "catalog fetched");
    Ok(movies)
}

/// Case-insensitive title filter applied while the user types.
pub fn filter_by_title<'a>(movies: &'a [Movie], term: &str) -> Vec<&'a Movie> {
    let term = term.trim().to_lowercase();
    movies
        .iter()
        .filter(|movie| term.is_empty() || movie.title.to_lowercase().contains(&term))
        .collect()
}
