//! divvy-server — shared-bill ledger service
//!
//! HTTP service that lets a group of diners split a restaurant bill:
//! one user creates an event, others join with a short code, guests select
//! menu or custom items, selections can be locked at event / guest / item
//! granularity, and the bill view aggregates per-guest totals.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod state;
