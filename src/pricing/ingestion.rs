//! Pricing for managed and self-hosted data ingestion tools.
use super::tiers::Tiers;
use crate::drivers::Drivers;
use crate::units::{Dimensionless, Money, MoneyPerGigabyte};
use serde::{Deserialize, Serialize};

/// The number of days used to turn a daily row-change rate into monthly active rows
pub const DAYS_PER_MONTH: u64 = 30;

/// The number of rows covered by a MAR unit price
const ROWS_PER_PRICE_UNIT: f64 = 1000.0;

/// Monthly active rows for a given daily row-change rate, saturating at [`u64::MAX`]
pub fn monthly_active_rows(rows_changed_per_day: u64) -> u64 {
    rows_changed_per_day.saturating_mul(DAYS_PER_MONTH)
}

/// Fivetran billed on data volume, with a minimum charge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FivetranVolumeRates {
    pub per_gb: MoneyPerGigabyte,
    /// The least that will be charged for volume
    pub minimum: Money,
    pub surcharge: Money,
    pub history_per_gb: MoneyPerGigabyte,
    /// Charge per row changed per day
    pub per_row: Money,
}

/// Fivetran billed on monthly active rows (MAR)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FivetranMarRates {
    /// Price per thousand MAR, tiered by MAR
    pub price_per_thousand_rows: Tiers<Money>,
    /// The least that will be charged as a platform fee
    pub platform_minimum: Money,
    pub connectors: u32,
    pub per_connector: Money,
    /// History mode charge as a fraction of the MAR cost
    pub history_fraction: Dimensionless,
}

/// The separate charges making up a MAR-based Fivetran bill
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FivetranMarCharges {
    pub monthly_active_rows: u64,
    pub usage: Money,
    pub platform_fee: Money,
    pub history: Money,
}

impl FivetranMarCharges {
    /// The sum of all charges
    pub fn total(&self) -> Money {
        self.usage + self.platform_fee + self.history
    }
}

impl FivetranMarRates {
    /// Break the monthly bill down into its charges
    pub fn charges(&self, drivers: &Drivers) -> FivetranMarCharges {
        let mar = monthly_active_rows(drivers.rows_changed_per_day);
        let price = self.price_per_thousand_rows.lookup(mar as f64);
        let usage = Dimensionless(mar as f64 / ROWS_PER_PRICE_UNIT) * price;
        let connector_fees = Money::per_unit(self.connectors.into(), self.per_connector);
        let platform_fee = if connector_fees > self.platform_minimum {
            connector_fees
        } else {
            self.platform_minimum
        };

        FivetranMarCharges {
            monthly_active_rows: mar,
            usage,
            platform_fee,
            history: usage * self.history_fraction,
        }
    }
}

/// How Fivetran is billed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum FivetranRates {
    /// Charged by GB ingested
    Volume(FivetranVolumeRates),
    /// Charged by monthly active rows
    MonthlyActiveRows(FivetranMarRates),
}

impl FivetranRates {
    /// Monthly cost of ingestion
    pub fn cost(&self, drivers: &Drivers) -> Money {
        match self {
            Self::Volume(rates) => {
                let volume = drivers.ingestion_gb * rates.per_gb;
                let volume = if volume > rates.minimum {
                    volume
                } else {
                    rates.minimum
                };
                volume
                    + rates.surcharge
                    + drivers.ingestion_gb * rates.history_per_gb
                    + Money::per_unit(drivers.rows_changed_per_day, rates.per_row)
            }
            Self::MonthlyActiveRows(rates) => rates.charges(drivers).total(),
        }
    }
}

/// Airbyte Enterprise, self-hosted under a contract with a flat base fee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AirbyteRates {
    pub base_fee: Money,
    pub per_gb: MoneyPerGigabyte,
    /// Charge per row changed per day
    pub per_row: Money,
    pub normalisation_per_gb: MoneyPerGigabyte,
}

impl AirbyteRates {
    /// Monthly cost of ingestion
    pub fn cost(&self, drivers: &Drivers) -> Money {
        let volume = drivers.ingestion_gb;
        self.base_fee
            + volume * self.per_gb
            + Money::per_unit(drivers.rows_changed_per_day, self.per_row)
            + volume * self.normalisation_per_gb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::drivers;
    use crate::pricing::RateCard;
    use crate::units::Gigabytes;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    fn mar_rates() -> FivetranMarRates {
        match RateCard::realistic().fivetran {
            FivetranRates::MonthlyActiveRows(rates) => rates,
            FivetranRates::Volume(_) => panic!("Expected MAR pricing"),
        }
    }

    #[test]
    fn test_monthly_active_rows() {
        assert_eq!(monthly_active_rows(500_000), 15_000_000);
        assert_eq!(monthly_active_rows(0), 0);
        assert_eq!(monthly_active_rows(u64::MAX / 2), u64::MAX);
    }

    #[rstest]
    fn test_fivetran_mar_huge_row_rate(mut drivers: Drivers) {
        drivers.rows_changed_per_day = u64::MAX;
        let charges = mar_rates().charges(&drivers);
        assert_eq!(charges.monthly_active_rows, u64::MAX);
        assert!(charges.total().value().is_finite());
    }

    #[rstest]
    fn test_fivetran_mar_charges(drivers: Drivers) {
        let charges = mar_rates().charges(&drivers);
        assert_eq!(charges.monthly_active_rows, 15_000_000);
        assert_approx_eq!(Money, charges.usage, Money(10500.0), epsilon = 1e-9);
        assert_eq!(charges.platform_fee, Money(1200.0));
        assert_approx_eq!(Money, charges.history, Money(1050.0), epsilon = 1e-9);
        assert_approx_eq!(Money, charges.total(), Money(12750.0), epsilon = 1e-9);
    }

    #[rstest]
    #[case(100_000, 3000.0)] // MAR = 3M: $1.00/1k
    #[case(166_666, 4999.98)] // Just under 5M
    #[case(500_000, 10500.0)] // MAR = 15M: $0.70/1k
    #[case(1_000_000, 15000.0)] // MAR = 30M: $0.50/1k
    fn test_fivetran_mar_tiers(mut drivers: Drivers, #[case] rows: u64, #[case] usage: f64) {
        drivers.rows_changed_per_day = rows;
        let charges = mar_rates().charges(&drivers);
        assert_approx_eq!(Money, charges.usage, Money(usage), epsilon = 1e-6);
    }

    #[rstest]
    fn test_fivetran_mar_tier_boundary(mut drivers: Drivers) {
        // Crossing 5M MAR moves every row into the second tier
        drivers.rows_changed_per_day = 5_000_000 / DAYS_PER_MONTH + 1;
        let above = mar_rates().charges(&drivers);
        assert!(above.monthly_active_rows >= 5_000_000);
        assert_approx_eq!(
            Money,
            above.usage,
            Money(above.monthly_active_rows as f64 / 1000.0 * 0.7),
            epsilon = 1e-6
        );
    }

    #[rstest]
    fn test_fivetran_platform_minimum(drivers: Drivers) {
        let rates = FivetranMarRates {
            connectors: 2,
            ..mar_rates()
        };
        assert_eq!(rates.charges(&drivers).platform_fee, Money(500.0));
    }

    #[rstest]
    fn test_fivetran_volume(drivers: Drivers) {
        // max(1200*1.2, 350) + 75 + 1200*0.2 + 500000*0.000015
        let cost = RateCard::approximation().fivetran.cost(&drivers);
        assert_approx_eq!(
            Money,
            cost,
            Money(1440.0 + 75.0 + 240.0 + 7.5),
            epsilon = 1e-9
        );
    }

    #[rstest]
    fn test_fivetran_volume_minimum(mut drivers: Drivers) {
        drivers.ingestion_gb = Gigabytes(100.0);
        drivers.rows_changed_per_day = 0;
        let cost = RateCard::approximation().fivetran.cost(&drivers);
        assert_approx_eq!(Money, cost, Money(350.0 + 75.0 + 20.0), epsilon = 1e-9);
    }

    #[rstest]
    fn test_airbyte_cost(drivers: Drivers) {
        // 900 + 1200*0.3 + 500000*0.000008 + 1200*0.03
        let cost = RateCard::approximation().airbyte.cost(&drivers);
        assert_approx_eq!(Money, cost, Money(900.0 + 360.0 + 4.0 + 36.0), epsilon = 1e-9);

        // No normalisation charge
        let cost = RateCard::realistic().airbyte.cost(&drivers);
        assert_approx_eq!(Money, cost, Money(900.0 + 360.0 + 4.0), epsilon = 1e-9);
    }
}
