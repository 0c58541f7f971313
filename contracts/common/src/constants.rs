//! Protocol Constants
//!
//! All magic numbers and configuration values for the rangevault
//! protocol. Tick bounds mirror the canonical concentrated-liquidity
//! AMM grid.

/// Tick grid bounds shared by every supported AMM pool.
pub mod ticks {
    /// Lowest tick any position may start on.
    pub const MIN_TICK: i32 = -887272;

    /// Highest tick any position may end on.
    pub const MAX_TICK: i32 = 887272;
}

/// Fee configuration (basis points out of 10_000).
pub mod fees {
    /// Basis points denominator
    pub const BPS_DENOMINATOR: u64 = 10_000;

    /// Cap on the managing fee deducted from withdrawals (1%)
    pub const MAX_MANAGING_FEE_BPS: u16 = 100;

    /// Cap on the performance fee taken from harvested trading fees (100%)
    pub const MAX_PERFORMANCE_FEE_BPS: u16 = 10_000;
}

/// Fixed-point precision for prices and value conversion.
pub mod precision {
    /// One unit of price: asset1 base units per asset0 base unit,
    /// scaled by 8 decimals.
    pub const PRICE_ONE: u64 = 100_000_000;
}

/// Limits on enumeration-style reads.
pub mod limits {
    /// Maximum holder records returned by a single paginated read
    pub const MAX_HOLDER_PAGE: usize = 100;

    /// Maximum vault records returned by a single factory read
    pub const MAX_VAULT_PAGE: usize = 100;
}
