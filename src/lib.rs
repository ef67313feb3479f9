//! Project estimator: a fixed feature catalog, a deterministic estimation
//! engine, and an append-only store of saved estimates served over HTTP.

pub mod api;
pub mod catalog;
pub mod client;
pub mod db;
pub mod estimation;
pub mod models;
