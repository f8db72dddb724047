use festivo_shared::Money;
use serde::{Deserialize, Serialize};

const BPS_DENOMINATOR: i128 = 10_000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PricingConfig {
    /// Service charge in basis points (1000 = 10%)
    #[serde(default = "default_service_charge_bps")]
    pub service_charge_bps: u32,

    /// Tax in basis points (500 = 5%)
    #[serde(default = "default_tax_bps")]
    pub tax_bps: u32,
}

fn default_service_charge_bps() -> u32 { 1_000 }
fn default_tax_bps() -> u32 { 500 }

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            service_charge_bps: default_service_charge_bps(),
            tax_bps: default_tax_bps(),
        }
    }
}

/// Checkout price lines, all in minor units
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub package_price: Money,
    pub service_charge: Money,
    pub tax_amount: Money,
    pub total_amount: Money,
}

/// Checkout price calculator
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Break a package price into service charge, tax and total.
    ///
    /// Never fails: a missing or negative price is priced as zero.
    pub fn compute_totals(&self, package_price_minor: Option<i64>) -> PriceBreakdown {
        let price = package_price_minor.filter(|p| *p > 0).unwrap_or(0);
        let service_charge = apply_rate(price, self.config.service_charge_bps);
        let tax_amount = apply_rate(price, self.config.tax_bps);
        let total = price.saturating_add(service_charge).saturating_add(tax_amount);

        PriceBreakdown {
            package_price: Money::from_minor(price),
            service_charge: Money::from_minor(service_charge),
            tax_amount: Money::from_minor(tax_amount),
            total_amount: Money::from_minor(total),
        }
    }
}

/// round-half-up(amount * bps / 10000) on the minor unit, for amount >= 0
fn apply_rate(amount: i64, bps: u32) -> i64 {
    let scaled = i128::from(amount) * i128::from(bps);
    let rounded = (scaled + BPS_DENOMINATOR / 2) / BPS_DENOMINATOR;
    i64::try_from(rounded).unwrap_or(i64::MAX)
}
