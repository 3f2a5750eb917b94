//! # GymBook Core
//!
//! Domain types shared by every GymBook crate: the slot and booking models,
//! the error taxonomy, the capacity invariant, and the store contracts that
//! the database backends implement and the transports call.

pub mod capacity;
pub mod errors;
pub mod models;
pub mod store;
