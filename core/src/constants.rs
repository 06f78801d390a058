/// Number of satoshis in one bitcoin
pub const SATS_PER_BITCOIN: u64 = 100_000_000;

/// Block subsidy of the genesis epoch, before any halving
pub const BASE_SUBSIDY: u64 = 50 * SATS_PER_BITCOIN;

/// Number of blocks between consecutive subsidy halvings on mainnet
pub const HALVING_INTERVAL: u64 = 210_000;

/// Number of blocks between consecutive subsidy halvings on regtest
pub const REGTEST_HALVING_INTERVAL: u64 = 150;

/// Number of halvings after which the subsidy is defined as zero.
/// Integer truncation already yields zero from halving 33 onward; this
/// bound only guards the shift itself.
pub const MAX_HALVINGS: u64 = 64;

/// Total number of satoshis the mainnet schedule ever issues.
/// Equals the first ordinal of any block past the final rewarding epoch.
pub const SAT_SUPPLY: u64 = 2_099_999_997_690_000;
