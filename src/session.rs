use crate::{cart::Cart, catalog::CatalogQuery, checkout::CheckoutOutcome, model::StoreId};
use tracing::{debug, info};

/// Storefront state that outlives a single view: the selected store, the
/// search text and the cart.
#[derive(Debug, Clone)]
pub struct Session {
    store: StoreId,
    query: String,
    cart: Cart,
}

impl Session {
    pub fn new(store: StoreId) -> Self {
        Self {
            store,
            query: String::new(),
            cart: Cart::new(),
        }
    }

    pub const fn store(&self) -> StoreId {
        self.store
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    pub fn catalog_query(&self) -> CatalogQuery {
        CatalogQuery::new(&self.query, self.store)
    }

    /// Another store means another inventory: the cart is emptied and the
    /// catalog must be fetched again, even when the same store is picked.
    pub fn switch_store(&mut self, store: StoreId) -> CatalogQuery {
        info!(from = %self.store, to = %store, dropped = self.cart.len(), "switch store");
        self.store = store;
        self.cart.clear();
        self.catalog_query()
    }

    /// Applies a checkout that ran against `store`. A checkout for a store the
    /// session has since left leaves the current cart alone.
    pub fn settle(&mut self, store: StoreId, outcome: &CheckoutOutcome) -> usize {
        if store != self.store {
            debug!(%store, current = %self.store, "checkout settled after store switch");
            return 0;
        }
        outcome.apply(&mut self.cart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Movie;
    use rust_decimal::Decimal;

    #[test]
    fn switching_store_clears_cart_and_refetches() {
        let mut session = Session::new(StoreId(1));
        session.set_query(" alien ");
        session
            .cart_mut()
            .add(Movie::new(1, "ALIEN CENTER", Decimal::ONE));

        for store in [StoreId(2), StoreId(2), StoreId(1)] {
            let query = session.switch_store(store);
            assert!(session.cart().is_empty());
            assert_eq!(query, CatalogQuery::new("alien", store));
            assert_eq!(session.store(), store);

            session.cart_mut().add(Movie::new(2, "ALONE TRIP", Decimal::ONE));
        }
    }

    #[test]
    fn settle_removes_completed() {
        let mut session = Session::new(StoreId(1));
        for id in 1..=3 {
            session
                .cart_mut()
                .add(Movie::new(id, format!("FILM {id}"), Decimal::ONE));
        }
        let removed = session.settle(StoreId(1), &CheckoutOutcome {
            completed: vec![1, 3],
            failed: vec![],
            warning: None,
        });
        assert_eq!(removed, 2);
        assert_eq!(session.cart().ids(), [2]);
    }

    #[test]
    fn settle_ignores_checkout_from_previous_store() {
        let mut session = Session::new(StoreId(1));
        session.switch_store(StoreId(2));
        session
            .cart_mut()
            .add(Movie::new(1, "ACADEMY DINOSAUR", Decimal::ONE));

        let removed = session.settle(StoreId(1), &CheckoutOutcome {
            completed: vec![1],
            failed: vec![],
            warning: None,
        });

        assert_eq!(removed, 0);
        assert_eq!(session.cart().ids(), [1]);
    }
}
