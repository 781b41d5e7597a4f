//! Stay pricing.
//!
//! Amounts are whole currency units. The breakdown is a pure function of the
//! stay dates and a [`PricingPolicy`]; nothing here is cached, callers
//! recompute it from the current draft on every read. Arithmetic saturates at
//! `u64::MAX` rather than overflowing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const NIGHTLY_RATE: u64 = 450;
pub const CLEANING_FEE: u64 = 75;
/// 8% expressed in basis points.
pub const SERVICE_FEE_BPS: u32 = 800;

const BPS_SCALE: u64 = 10_000;

/// Rates applied to a stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    pub nightly_rate: u64,
    pub cleaning_fee: u64,
    pub service_fee_bps: u32,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            nightly_rate: NIGHTLY_RATE,
            cleaning_fee: CLEANING_FEE,
            service_fee_bps: SERVICE_FEE_BPS,
        }
    }
}

/// Itemized price derived from stay length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    pub nights: u32,
    pub nightly_rate: u64,
    pub base_total: u64,
    pub cleaning_fee: u64,
    pub service_fee: u64,
    pub total: u64,
}

impl PricingPolicy {
    pub fn breakdown(
        &self,
        check_in: Option<NaiveDate>,
        check_out: Option<NaiveDate>,
    ) -> PriceBreakdown {
        let nights = nights_between(check_in, check_out);
        let base_total = u64::from(nights).saturating_mul(self.nightly_rate);
        let service_fee = self.service_fee(base_total);
        PriceBreakdown {
            nights,
            nightly_rate: self.nightly_rate,
            base_total,
            cleaning_fee: self.cleaning_fee,
            service_fee,
            total: base_total
                .saturating_add(self.cleaning_fee)
                .saturating_add(service_fee),
        }
    }

    /// Percentage fee on `base_total`, rounded half-up to a whole unit.
    pub fn service_fee(&self, base_total: u64) -> u64 {
        let scaled = u128::from(base_total) * u128::from(self.service_fee_bps);
        let fee = (scaled + u128::from(BPS_SCALE / 2)) / u128::from(BPS_SCALE);
        u64::try_from(fee).unwrap_or(u64::MAX)
    }
}

/// Breakdown under the default listing rates.
pub fn compute_breakdown(
    check_in: Option<NaiveDate>,
    check_out: Option<NaiveDate>,
) -> PriceBreakdown {
    PricingPolicy::default().breakdown(check_in, check_out)
}

/// Whole nights between the two dates; zero when either is unset or the
/// range is empty or inverted.
pub fn nights_between(check_in: Option<NaiveDate>, check_out: Option<NaiveDate>) -> u32 {
    match (check_in, check_out) {
        (Some(start), Some(end)) => {
            let days = end.signed_duration_since(start).num_days();
            u32::try_from(days.max(0)).unwrap_or(u32::MAX)
        }
        _ => 0,
    }
}
