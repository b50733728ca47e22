//! Usage drivers and the rules by which they grow from one month to the next.
use crate::units::{Dimensionless, Gigabytes};
use serde::{Deserialize, Serialize};
use std::iter;

/// Default monthly growth factor for data and query volumes
pub const DEFAULT_GROWTH_RATE: f64 = 1.035;

/// Default monthly growth factor for the number of users
pub const DEFAULT_USER_GROWTH_RATE: f64 = 1.01;

macro_rules! define_unit_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            <$type>::new($value)
        }
    };
}

macro_rules! define_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            $value
        }
    };
}

define_unit_param_default!(default_database_size, Gigabytes, 5000.0);
define_unit_param_default!(default_query_volume, Gigabytes, 12000.0);
define_unit_param_default!(default_ingestion_volume, Gigabytes, 1200.0);
define_param_default!(default_rows_changed_per_day, u64, 500_000);
define_param_default!(default_num_users, u64, 500);
define_param_default!(default_concurrency, u32, 8);

/// The usage quantities which drive costs in a single month.
///
/// Pricing functions only ever read these values. A new value is produced each month by the
/// [`GrowthModel`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Drivers {
    /// Size of the stored database
    #[serde(default = "default_database_size")]
    pub database_size_gb: Gigabytes,
    /// Volume of data queried per month
    #[serde(default = "default_query_volume")]
    pub query_volume_gb: Gigabytes,
    /// Volume of data ingested per month
    #[serde(default = "default_ingestion_volume")]
    pub ingestion_gb: Gigabytes,
    /// Number of rows inserted or changed per day
    #[serde(default = "default_rows_changed_per_day")]
    pub rows_changed_per_day: u64,
    /// Number of users of the platform
    #[serde(default = "default_num_users")]
    pub num_users: u64,
    /// Number of concurrently running workloads. Never grown.
    #[serde(default = "default_concurrency")]
    pub concurrency: u32,
}

impl Default for Drivers {
    fn default() -> Self {
        Self {
            database_size_gb: default_database_size(),
            query_volume_gb: default_query_volume(),
            ingestion_gb: default_ingestion_volume(),
            rows_changed_per_day: default_rows_changed_per_day(),
            num_users: default_num_users(),
            concurrency: default_concurrency(),
        }
    }
}

/// Advances [`Drivers`] by one month using fixed compounding rules
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthModel {
    /// Growth factor applied to data volumes and the row-change rate
    pub growth_rate: Dimensionless,
    /// Growth factor applied to the number of users
    pub user_growth_rate: Dimensionless,
}

impl Default for GrowthModel {
    fn default() -> Self {
        Self {
            growth_rate: Dimensionless(DEFAULT_GROWTH_RATE),
            user_growth_rate: Dimensionless(DEFAULT_USER_GROWTH_RATE),
        }
    }
}

impl GrowthModel {
    /// Produce the next month's drivers from this month's.
    ///
    /// The row-change rate is truncated after growing, whereas the number of users is rounded
    /// up, so the user count never falls and grows in whole steps.
    pub fn advance(&self, drivers: &Drivers) -> Drivers {
        let rate = self.growth_rate;
        Drivers {
            database_size_gb: drivers.database_size_gb * rate,
            query_volume_gb: drivers.query_volume_gb * rate,
            ingestion_gb: drivers.ingestion_gb * rate,
            rows_changed_per_day: (drivers.rows_changed_per_day as f64 * rate.0) as u64,
            num_users: (drivers.num_users as f64 * self.user_growth_rate.0).ceil() as u64,
            concurrency: drivers.concurrency,
        }
    }

    /// Iterate over the drivers for successive months, starting with `initial`
    pub fn iter_months(&self, initial: Drivers) -> impl Iterator<Item = Drivers> + '_ {
        iter::successors(Some(initial), move |drivers| Some(self.advance(drivers)))
    }

    /// Apply [`GrowthModel::advance`] `months` times
    pub fn advance_by(&self, drivers: &Drivers, months: u32) -> Drivers {
        (0..months).fold(*drivers, |drivers, _| self.advance(&drivers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use itertools::Itertools;
    use rstest::rstest;

    #[test]
    fn test_advance_default() {
        let next = GrowthModel::default().advance(&Drivers::default());
        assert_approx_eq!(Gigabytes, next.database_size_gb, Gigabytes(5175.0));
        assert_approx_eq!(Gigabytes, next.query_volume_gb, Gigabytes(12420.0));
        assert_approx_eq!(Gigabytes, next.ingestion_gb, Gigabytes(1242.0));
        assert_eq!(next.rows_changed_per_day, 517_500);
        assert_eq!(next.num_users, 505);
        assert_eq!(next.concurrency, 8);
    }

    #[rstest]
    #[case(1000, 1035)]
    #[case(999, 1033)] // 1033.965 truncated
    #[case(1, 1)] // 1.035 truncated
    #[case(0, 0)]
    fn test_advance_truncates_rows(#[case] rows: u64, #[case] expected: u64) {
        let drivers = Drivers {
            rows_changed_per_day: rows,
            ..Drivers::default()
        };
        let next = GrowthModel::default().advance(&drivers);
        assert_eq!(next.rows_changed_per_day, expected);
    }

    #[rstest]
    #[case(500, 505)]
    #[case(505, 511)] // 510.05 rounded up
    #[case(1, 2)] // 1.01 rounded up
    #[case(0, 0)]
    fn test_advance_rounds_users_up(#[case] users: u64, #[case] expected: u64) {
        let drivers = Drivers {
            num_users: users,
            ..Drivers::default()
        };
        let next = GrowthModel::default().advance(&drivers);
        assert_eq!(next.num_users, expected);
    }

    #[test]
    fn test_users_never_decrease() {
        let users = GrowthModel::default()
            .iter_months(Drivers::default())
            .take(120)
            .map(|drivers| drivers.num_users)
            .collect_vec();
        assert!(users.iter().tuple_windows().all(|(a, b)| b >= a));
    }

    #[test]
    fn test_concurrency_constant() {
        let model = GrowthModel::default();
        assert!(
            model
                .iter_months(Drivers::default())
                .take(60)
                .all(|drivers| drivers.concurrency == 8)
        );
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 59)]
    #[case(12, 12)]
    #[case(30, 30)]
    fn test_advance_by_regrouping(#[case] first: u32, #[case] second: u32) {
        let model = GrowthModel::default();
        let initial = Drivers::default();
        let batched = model.advance_by(&model.advance_by(&initial, first), second);
        let stepped = model
            .iter_months(initial)
            .nth((first + second) as usize)
            .unwrap();
        assert_eq!(batched, stepped);
    }

    #[test]
    fn test_iter_months_starts_with_initial() {
        let initial = Drivers::default();
        let first = GrowthModel::default().iter_months(initial).next().unwrap();
        assert_eq!(first, initial);
    }
}
