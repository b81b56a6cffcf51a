//! Atomic voucher redemption.

use tracing::{debug, info, warn};
use voucher_core::{FIELD_USES, NOT_REDEEMABLE};

use crate::config::StoreConfig;
use crate::error::VoucherError;
use crate::traits::VoucherBackend;

/// Outcome of one redemption attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redemption {
    /// One use was consumed. `remaining` is the count right after this call.
    Redeemed {
        /// Uses left after this redemption.
        remaining: u64,
    },
    /// The voucher does not exist or has no uses left. Nothing changed.
    NotRedeemable,
}

impl Redemption {
    /// Map a backend result to an outcome. Any negative value is a refusal.
    #[inline]
    pub fn from_sentinel(value: i64) -> Self {
        u64::try_from(value).map_or(Self::NotRedeemable, |remaining| Self::Redeemed { remaining })
    }

    /// The integer form: remaining uses, or `-1` when not redeemable.
    #[inline]
    #[allow(clippy::cast_possible_wrap)]
    pub fn as_sentinel(self) -> i64 {
        match self {
            Self::Redeemed { remaining } => remaining as i64,
            Self::NotRedeemable => NOT_REDEEMABLE,
        }
    }

    /// Whether a use was consumed.
    #[inline]
    pub fn is_redeemed(self) -> bool {
        matches!(self, Self::Redeemed { .. })
    }
}

/// Performs race-free check-and-decrement of a voucher's `uses` counter.
///
/// The whole check runs inside the backend as one operation, so any number
/// of engines in any number of processes may redeem the same code at once.
/// The engine itself holds no locks.
pub struct RedemptionEngine<B: VoucherBackend> {
    backend: B,
    config: StoreConfig,
}

impl<B: VoucherBackend> RedemptionEngine<B> {
    /// Create an engine with default configuration.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, StoreConfig::default())
    }

    /// Create an engine with the given configuration.
    ///
    /// Must use the same key prefix as the [`VoucherStore`](crate::VoucherStore)
    /// that created the vouchers.
    pub fn with_config(backend: B, config: StoreConfig) -> Self {
        Self { backend, config }
    }

    /// Get a reference to the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Redeem one use of `code`.
    ///
    /// Backend failures are returned as errors and never reported as
    /// [`Redemption::NotRedeemable`].
    pub async fn try_redeem(&self, code: &str) -> Result<Redemption, VoucherError> {
        let key = self.config.key_for(code);
        debug!(key = %key, "redeeming voucher");

        let value = match self.backend.decrement_if_positive(&key, FIELD_USES).await {
            Ok(value) => value,
            Err(e) => {
                warn!(code, error = %e, kind = e.kind(), "voucher redemption failed");
                return Err(e);
            }
        };
        let outcome = Redemption::from_sentinel(value);

        match outcome {
            Redemption::Redeemed { remaining } => {
                info!(code, remaining, "voucher redeemed");
            }
            Redemption::NotRedeemable => {
                info!(code, "voucher fully redeemed or does not exist");
            }
        }

        Ok(outcome)
    }

    /// Redeem one use of `code`, returning the remaining uses or `-1`.
    ///
    /// `-1` covers both an exhausted voucher and one that never existed;
    /// use [`VoucherStore::exists`](crate::VoucherStore::exists) to tell them apart.
    pub async fn redeem(&self, code: &str) -> Result<i64, VoucherError> {
        self.try_redeem(code).await.map(Redemption::as_sentinel)
    }
}

impl<B: VoucherBackend + std::fmt::Debug> std::fmt::Debug for RedemptionEngine<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedemptionEngine")
            .field("backend", &self.backend)
            .field("key_prefix", &self.config.key_prefix)
            .finish_non_exhaustive()
    }
}
