use clap::Parser;

use crate::{
    core::tariff::Tariff,
    prelude::*,
    quantity::{cost::Cost, rate::WattHourRate},
};

#[must_use]
#[derive(Copy, Clone, Parser)]
pub struct TariffArgs {
    /// Peak grid price in euro per watt-hour.
    #[clap(long = "price-high-eur-per-wh", env = "PRICE_HIGH_EUR_PER_WH")]
    pub high: WattHourRate,

    /// Off-peak grid price in euro per watt-hour.
    #[clap(long = "price-low-eur-per-wh", env = "PRICE_LOW_EUR_PER_WH")]
    pub low: WattHourRate,

    /// Feed-in price in euro per watt-hour.
    #[clap(long = "price-sale-eur-per-wh", env = "PRICE_SALE_EUR_PER_WH")]
    pub sale: WattHourRate,

    #[clap(long = "subscription-fee-eur-per-month", env = "SUBSCRIPTION_FEE_EUR_PER_MONTH")]
    pub subscription_fee_per_month: Cost,
}

impl TariffArgs {
    pub fn tariff(self) -> Result<Tariff> {
        let tariff = Tariff::builder()
            .high(self.high)
            .low(self.low)
            .sale(self.sale)
            .subscription_fee_per_month(self.subscription_fee_per_month)
            .build()
            .context("invalid tariff")?;
        debug!(high = %tariff.high, low = %tariff.low, sale = %tariff.sale, "tariff");
        Ok(tariff)
    }
}
