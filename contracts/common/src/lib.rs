//! rangevault Common Library
//!
//! Shared logic for the rangevault protocol: a pooled vault that holds
//! a concentrated-liquidity position in an AMM pool and layers a
//! collateralized-borrow leg on top of it via a lending market.
//!
//! This crate is the stateless heart of the system. It owns no
//! external handles and performs no I/O: every function here either
//! validates inputs, computes a number, or mutates a small state
//! struct handed to it by the orchestrator in `rangevault-core`.
//! Keeping the math and validation in one place means every vault
//! instance shares a single, centrally tested implementation.
//!
//! ## Modules
//!
//! - [`constants`] — tick bounds, fee caps, fixed-point precision
//! - [`errors`] — typed error enum with stable codes
//! - [`types`] — addresses, tick ranges, holder records, views
//! - [`math`] — checked share/fee/valuation arithmetic
//! - [`validation`] — range validator and guard helpers
//! - [`fees`] — managing/performance fee engine
//! - [`events`] — protocol events and the event log
//!
//! This crate is `no_std` compatible when built without the `std`
//! feature.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Re-export Vec for submodules based on feature
#[cfg(not(feature = "std"))]
pub use alloc::vec::Vec;
#[cfg(feature = "std")]
pub use std::vec::Vec;

pub mod constants;
pub mod errors;
pub mod types;
pub mod math;
pub mod validation;
pub mod fees;
pub mod events;

// Re-exports for convenience
pub use constants::*;
pub use errors::*;
pub use types::*;
pub use math::*;
pub use fees::*;
pub use events::*;
