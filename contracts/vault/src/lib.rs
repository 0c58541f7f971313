//! rangevault Core
//!
//! The vault orchestrator: a single state owner that manages a
//! concentrated-liquidity position in an AMM pool, mints and burns
//! proportional ownership shares against the vault's total underlying
//! value, and runs a collateralized-borrow leg against a lending
//! market.
//!
//! ## Core Operations
//!
//! - **mint / burn**: proportional share issuance and redemption
//!   against the live underlying valuation
//! - **updateTicks / addLiquidity / removeLiquidity / swap**: the AMM
//!   position lifecycle for the configured tick range
//! - **supplyCollateral / withdrawCollateral / mintDebt / repayDebt**:
//!   the lending-market leg, with an explicit `Amount::All` sentinel
//! - **updateFees / pullFeeFromPool / collectManager**: fee rates,
//!   trading-fee harvest and manager payout
//!
//! ## Execution Model
//!
//! Every public operation runs to completion as one atomic unit: it
//! either commits its entire state delta or fails before any
//! mutation. External calls to the AMM pool and the lending market
//! are synchronous; their failures surface verbatim and abort the
//! whole operation. A single in-flight-operation flag rejects nested
//! entry so a misbehaving collaborator cannot replay a stale
//! valuation snapshot.

pub mod external;
pub mod state;
pub mod vault;
pub mod shares;
pub mod position;
pub mod collateral;
pub mod fees;
pub mod testing;

#[cfg(test)]
mod integration_tests;

pub use external::*;
pub use state::*;
pub use vault::*;
