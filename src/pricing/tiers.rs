//! Tiered prices and per-seat licence plans shared by several vendors.
use crate::units::Money;
use anyhow::{Result, ensure};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// A value which applies while a quantity is below an upper bound
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Band<T> {
    /// Exclusive upper bound of the band
    pub below: f64,
    /// The value within the band
    pub value: T,
}

/// A step function of a quantity, e.g. a capacity fee chosen by data volume.
///
/// Bands are checked in order; a quantity equal to a band's bound falls into the next band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tiers<T> {
    /// Bands in increasing order of upper bound
    #[serde(default = "Vec::new")]
    pub bands: Vec<Band<T>>,
    /// The value for quantities beyond the last band
    pub otherwise: T,
}

impl<T: Copy> Tiers<T> {
    /// Create tiers from `(upper bound, value)` pairs and a value for everything above them
    pub fn new(bands: &[(f64, T)], otherwise: T) -> Self {
        Self {
            bands: bands
                .iter()
                .map(|&(below, value)| Band { below, value })
                .collect(),
            otherwise,
        }
    }

    /// Look up the value for the given quantity
    pub fn lookup(&self, quantity: f64) -> T {
        self.bands
            .iter()
            .find(|band| quantity < band.below)
            .map_or(self.otherwise, |band| band.value)
    }

    /// Check that the bands are in strictly increasing order
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.bands
                .iter()
                .tuple_windows()
                .all(|(a, b)| a.below < b.below),
            "Tier bands must be in strictly increasing order of upper bound"
        );

        Ok(())
    }
}

/// A licence tier which is given a fixed percentage of users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeatTier {
    /// The name of the role, e.g. "creator"
    pub role: String,
    /// Percentage of users given this role (rounded down to whole seats)
    pub percent: u64,
    /// Monthly price per seat
    pub price: Money,
}

/// A per-seat licence plan.
///
/// Users are split between the percentage tiers with integer division and anyone left over is
/// given the remainder role, so the seats always add up to the number of users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeatPlan {
    /// Tiers which take a percentage of users
    pub tiers: Vec<SeatTier>,
    /// The role given to the remaining users
    pub remainder_role: String,
    /// Monthly price per remaining seat
    pub remainder_price: Money,
}

impl SeatPlan {
    /// Number of seats in each tier, with the remainder last
    pub fn seats(&self, num_users: u64) -> Vec<u64> {
        let mut seats = self
            .tiers
            .iter()
            .map(|tier| {
                let count = u128::from(num_users) * u128::from(tier.percent) / 100;
                u64::try_from(count).unwrap_or(u64::MAX)
            })
            .collect_vec();
        let allocated = seats.iter().fold(0u64, |sum, &count| sum.saturating_add(count));
        seats.push(num_users.saturating_sub(allocated));

        seats
    }

    /// Total monthly licence cost for the given number of users
    pub fn cost(&self, num_users: u64) -> Money {
        let prices = self
            .tiers
            .iter()
            .map(|tier| tier.price)
            .chain([self.remainder_price]);

        self.seats(num_users)
            .into_iter()
            .zip(prices)
            .map(|(count, price)| Money::per_unit(count, price))
            .sum()
    }

    /// Check that the percentage tiers don't allocate more than every user
    pub fn validate(&self) -> Result<()> {
        let total: u64 = self.tiers.iter().map(|tier| tier.percent).sum();
        ensure!(
            total <= 100,
            "Seat tier percentages add up to {total}, which is more than 100"
        );

        Ok(())
    }
}
