//! Error Types for the rangevault Protocol
//!
//! Typed errors with structured payloads. Every failure is
//! synchronous and terminal for the operation that raised it: the
//! caller decides whether to retry with adjusted parameters.

/// Result type alias for vault operations
pub type VaultResult<T> = Result<T, VaultError>;

/// Main error enum for all rangevault protocol errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    // ============ Range Validation Errors ============
    /// A tick lies outside the global tick bounds
    TicksOutOfRange { lower: i32, upper: i32 },

    /// A tick is not an exact multiple of the pool's tick spacing
    InvalidTicksSpacing { lower: i32, upper: i32, spacing: i32 },

    /// Lower tick is not strictly below the upper tick
    InvalidTickOrder { lower: i32, upper: i32 },

    // ============ Fee Errors ============
    /// Managing fee exceeds its cap
    InvalidManagingFee { bps: u16 },

    /// Performance fee exceeds its cap
    InvalidPerformanceFee { bps: u16 },

    // ============ Share Ledger Errors ============
    /// Zero deposit amount on mint
    InvalidCollateralAmount,

    /// Burn or transfer exceeds the holder's share balance
    InsufficientShares { available: u64, requested: u64 },

    // ============ Balance / Token Errors ============
    /// Token balance too low for the requested movement
    InsufficientBalance { available: u64, requested: u64 },

    /// Token transfer failed at the ledger level
    TransferFailed,

    // ============ Authorization / State Errors ============
    /// Caller is not the designated manager
    ManagerOnly,

    /// Operation attempted while the vault is paused
    VaultPaused,

    /// Nested entry into a vault operation
    ReentrantCall,

    /// Zero address where a real identity is required
    ZeroAddress,

    /// A position is already open at a different tick range
    PositionAlreadyOpen { lower: i32, upper: i32 },

    // ============ External Protocol Errors ============
    /// Lending market rejected a borrow: not enough borrowing power
    InsufficientBorrowPower { requested: u64, available: u64 },

    /// Lending market rejected a withdrawal: health factor would break
    HealthFactorBreach,

    /// Pool swap stopped at the price limit with zero fill
    PriceLimitReached,

    // ============ Factory Errors ============
    /// Token pair is zero or duplicate
    InvalidTokenPair,

    /// No vault registered under the given id
    VaultNotFound,

    /// A vault with this id already exists
    VaultAlreadyExists,

    /// No implementation registered under the given reference
    ImplementationNotFound,

    // ============ Math Errors ============
    /// Arithmetic overflow occurred
    Overflow,

    /// Arithmetic underflow occurred
    Underflow,

    /// Division by zero
    DivisionByZero,
}

impl VaultError {
    /// Returns a stable error code for logging/debugging
    pub fn code(&self) -> &'static str {
        match self {
            Self::TicksOutOfRange { .. } => "E001_TICKS_OUT_OF_RANGE",
            Self::InvalidTicksSpacing { .. } => "E002_INVALID_TICKS_SPACING",
            Self::InvalidTickOrder { .. } => "E003_INVALID_TICK_ORDER",
            Self::InvalidManagingFee { .. } => "E010_INVALID_MANAGING_FEE",
            Self::InvalidPerformanceFee { .. } => "E011_INVALID_PERFORMANCE_FEE",
            Self::InvalidCollateralAmount => "E020_INVALID_COLLATERAL_AMOUNT",
            Self::InsufficientShares { .. } => "E021_INSUFFICIENT_SHARES",
            Self::InsufficientBalance { .. } => "E030_INSUFFICIENT_BALANCE",
            Self::TransferFailed => "E031_TRANSFER_FAILED",
            Self::ManagerOnly => "E040_MANAGER_ONLY",
            Self::VaultPaused => "E041_VAULT_PAUSED",
            Self::ReentrantCall => "E042_REENTRANT_CALL",
            Self::ZeroAddress => "E043_ZERO_ADDRESS",
            Self::PositionAlreadyOpen { .. } => "E044_POSITION_OPEN",
            Self::InsufficientBorrowPower { .. } => "E050_INSUFFICIENT_BORROW_POWER",
            Self::HealthFactorBreach => "E051_HEALTH_FACTOR_BREACH",
            Self::PriceLimitReached => "E052_PRICE_LIMIT_REACHED",
            Self::InvalidTokenPair => "E060_INVALID_TOKEN_PAIR",
            Self::VaultNotFound => "E061_VAULT_NOT_FOUND",
            Self::VaultAlreadyExists => "E062_VAULT_ALREADY_EXISTS",
            Self::ImplementationNotFound => "E063_IMPLEMENTATION_NOT_FOUND",
            Self::Overflow => "E080_OVERFLOW",
            Self::Underflow => "E081_UNDERFLOW",
            Self::DivisionByZero => "E082_DIV_ZERO",
        }
    }

    /// Returns true if this error is recoverable (caller can fix it
    /// by adjusting parameters and retrying)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InsufficientShares { .. }
                | Self::InsufficientBalance { .. }
                | Self::InsufficientBorrowPower { .. }
                | Self::PriceLimitReached
        )
    }
}
