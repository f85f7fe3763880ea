//! Fanimal - Animal Shelter Donation Platform Backend
//!
//! This crate implements paid subscriptions from users to animal shelters,
//! reconciled against Stripe billing state via signed webhook events.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
