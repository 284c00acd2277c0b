//! Storefront for a remote movie rental service: catalog, cart, checkout and returns.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod client;
pub mod config;
pub mod model;
pub mod notify;
pub mod returns;
pub mod session;
pub mod utils;

pub use cart::Cart;
pub use client::{ApiError, Client, RentalApi};
pub use config::Settings;
pub use session::Session;
