use crate::model::{FilmId, Movie};
use rust_decimal::Decimal;

/// Movies picked for rental, in the order they were added. Unique by id.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    movies: Vec<Movie>,
    // slot freed by the last toggle-off, so toggling back lands in place
    vacated: Option<(FilmId, usize)>,
}

impl PartialEq for Cart {
    fn eq(&self, other: &Self) -> bool {
        self.movies == other.movies
    }
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the movie is already in the cart.
    pub fn add(&mut self, movie: Movie) -> bool {
        self.vacated = None;
        if self.contains(movie.id) {
            false
        } else {
            self.movies.push(movie);
            true
        }
    }

    pub fn remove(&mut self, id: FilmId) -> Option<Movie> {
        self.vacated = None;
        self.take(id).map(|(_, movie)| movie)
    }

    fn take(&mut self, id: FilmId) -> Option<(usize, Movie)> {
        let index = self.movies.iter().position(|movie| movie.id == id)?;
        Some((index, self.movies.remove(index)))
    }

    /// Adds the movie or takes it out again. Returns whether it is in the cart afterwards.
    ///
    /// Toggling the same movie twice leaves the cart exactly as it was, order included.
    pub fn toggle(&mut self, movie: Movie) -> bool {
        if let Some((index, _)) = self.take(movie.id) {
            self.vacated = Some((movie.id, index));
            return false;
        }
        match self.vacated.take() {
            Some((id, index)) if id == movie.id => {
                self.movies.insert(index.min(self.movies.len()), movie);
            }
            _ => self.movies.push(movie),
        }
        true
    }

    /// Drops every movie whose id is listed, keeping the order of the rest.
    pub fn remove_all(&mut self, ids: &[FilmId]) -> usize {
        self.vacated = None;
        let before = self.movies.len();
        self.movies.retain(|movie| !ids.contains(&movie.id));
        before - self.movies.len()
    }

    pub fn contains(&self, id: FilmId) -> bool {
        self.movies.iter().any(|movie| movie.id == id)
    }

    pub fn clear(&mut self) {
        self.vacated = None;
        self.movies.clear();
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn ids(&self) -> Vec<FilmId> {
        self.movies.iter().map(|movie| movie.id).collect()
    }

    pub fn total(&self) -> Decimal {
        self.movies.iter().map(|movie| movie.rental_rate).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn movie(id: FilmId) -> Movie {
        Movie::new(id, format!("FILM {id}"), Decimal::new(299, 2))
    }

    fn cart(ids: &[FilmId]) -> Cart {
        let mut cart = Cart::new();
        for &id in ids {
            cart.add(movie(id));
        }
        cart
    }

    #[test]
    fn add_ignores_duplicates() {
        let mut cart = cart(&[1, 2]);
        assert!(!cart.add(movie(1)));
        assert_eq!(cart.ids(), [1, 2]);
    }

    #[test]
    fn toggle_twice_restores_content_and_order() {
        for start in [vec![], vec![4], vec![1, 2, 3], vec![3, 1, 2]] {
            for id in [1, 2, 3, 9] {
                let original = cart(&start);
                let mut toggled = original.clone();
                assert_eq!(toggled.toggle(movie(id)), !start.contains(&id));
                toggled.toggle(movie(id));
                assert_eq!(toggled.ids(), original.ids(), "start {start:?}, toggled {id}");
            }
        }
    }

    #[test]
    fn toggle_back_after_other_edits_appends() {
        let mut cart = cart(&[1, 2, 3]);
        cart.toggle(movie(1));
        cart.add(movie(4));
        cart.toggle(movie(1));
        assert_eq!(cart.ids(), [2, 3, 4, 1]);
    }

    #[test]
    fn add_then_remove_restores_id_set() {
        for start in [vec![], vec![1], vec![5, 6, 7]] {
            let before: BTreeSet<_> = start.iter().copied().collect();
            for id in [1, 8] {
                let mut cart = cart(&start);
                cart.add(movie(id));
                cart.remove(id);
                let after: BTreeSet<_> = cart.ids().into_iter().collect();
                let mut expected = before.clone();
                expected.remove(&id);
                assert_eq!(after, expected);
                if !before.contains(&id) {
                    assert_eq!(after, before);
                }
            }
        }
    }

    #[test]
    fn remove_all_keeps_order_of_the_rest() {
        let mut cart = cart(&[1, 2, 3, 4]);
        assert_eq!(cart.remove_all(&[1, 3, 99]), 2);
        assert_eq!(cart.ids(), [2, 4]);
    }

    #[test]
    fn total_sums_rates() {
        let mut cart = cart(&[1, 2]);
        cart.add(Movie::new(3, "ACE GOLDFINGER", Decimal::new(499, 2)));
        assert_eq!(cart.total(), Decimal::new(1097, 2));
        cart.clear();
        assert_eq!(cart.total(), Decimal::ZERO);
    }
}
