//! Pricing for business intelligence tools.
use super::tiers::{SeatPlan, Tiers};
use crate::drivers::Drivers;
use crate::units::Money;
use serde::{Deserialize, Serialize};

/// Tableau, licensed per seat with creator, explorer and viewer roles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableauRates {
    pub seats: SeatPlan,
}

impl TableauRates {
    /// Monthly licence cost
    pub fn cost(&self, drivers: &Drivers) -> Money {
        self.seats.cost(drivers.num_users)
    }
}

/// Power BI Premium, a capacity fee plus a per-user charge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PowerBiRates {
    /// Capacity fee, tiered by the number of users
    pub capacity_fee: Tiers<Money>,
    pub per_user: Money,
}

impl PowerBiRates {
    /// Monthly cost of capacity and user licences
    pub fn cost(&self, drivers: &Drivers) -> Money {
        let users = drivers.num_users;
        self.capacity_fee.lookup(users as f64) + Money::per_unit(users, self.per_user)
    }
}

/// Amazon QuickSight, licensed per author and reader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuickSightRates {
    pub seats: SeatPlan,
}

impl QuickSightRates {
    /// Monthly licence cost
    pub fn cost(&self, drivers: &Drivers) -> Money {
        self.seats.cost(drivers.num_users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::drivers;
    use crate::pricing::{PricingProfile, RateCard};
    use rstest::rstest;

    #[rstest]
    fn test_tableau_cost(
        drivers: Drivers,
        #[values(PricingProfile::Approximation, PricingProfile::Realistic)]
        profile: PricingProfile,
    ) {
        // 50 creators, 200 explorers, 250 viewers
        let rates = RateCard::for_profile(profile).tableau;
        assert_eq!(rates.seats.seats(drivers.num_users), [50, 200, 250]);
        assert_eq!(rates.cost(&drivers), Money(15650.0));
    }

    #[rstest]
    #[case(999, 8000.0 + 999.0 * 2.0)]
    #[case(1000, 15000.0 + 1000.0 * 2.0)]
    fn test_powerbi_cost(mut drivers: Drivers, #[case] users: u64, #[case] expected: f64) {
        drivers.num_users = users;
        let rates = RateCard::realistic().powerbi;
        assert_eq!(rates.cost(&drivers), Money(expected));
    }

    #[rstest]
    fn test_quicksight_cost(drivers: Drivers) {
        // 35 authors, 465 readers
        let rates = RateCard::realistic().quicksight;
        assert_eq!(rates.seats.seats(drivers.num_users), [35, 465]);
        assert_eq!(rates.cost(&drivers), Money(35.0 * 24.0 + 465.0 * 5.0));
    }

    #[rstest]
    fn test_seats_add_up(
        #[values(0, 1, 7, 13, 99, 100, 101, 505, 12345)] users: u64,
        #[values(PricingProfile::Approximation, PricingProfile::Realistic)]
        profile: PricingProfile,
    ) {
        let rates = RateCard::for_profile(profile);
        for plan in [&rates.tableau.seats, &rates.quicksight.seats] {
            assert_eq!(plan.seats(users).iter().sum::<u64>(), users);
        }
    }
}
