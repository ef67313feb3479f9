//! Domain models for the project estimator.
//!
//! # Core Concepts
//!
//! ## Static Data
//!
//! - [`Feature`]: A selectable unit of work from the catalog, with a
//!   [`FeatureCategory`] and per-[`Complexity`] hour multipliers.
//! - [`TechAxis`]: The four axes a [`TechStack`] is chosen along.
//!
//! ## User Input
//!
//! - [`ProjectData`]: The selection set a user builds up: features, stack,
//!   complexity tier and hourly rate.
//!
//! ## Persisted Entities
//!
//! - [`Estimate`]: An immutable snapshot of a selection set plus its totals,
//!   created from a [`NewEstimate`].

mod estimate;
mod feature;
mod tech_stack;

pub use estimate::*;
pub use feature::*;
pub use tech_stack::*;
