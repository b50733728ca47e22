//! This module defines the unit types used by the cost model and the arithmetic between them.
use float_cmp::{ApproxEq, F64Margin};
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{AddAssign, Div, Mul};

/// The number of gigabytes in a terabyte, as used by vendor price lists
pub const GB_PER_TB: f64 = 1024.0;

/// Represents a dimensionless quantity, e.g. a fraction or growth factor.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, derive_more::Add)]
pub struct Dimensionless(pub f64);

impl Mul for Dimensionless {
    type Output = Dimensionless;

    fn mul(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless(self.0 * rhs.0)
    }
}

impl From<f64> for Dimensionless {
    fn from(val: f64) -> Self {
        Self(val)
    }
}

impl From<Dimensionless> for f64 {
    fn from(val: Dimensionless) -> Self {
        val.0
    }
}

macro_rules! unit_struct {
    ($name:ident) => {
        /// Represents a type of quantity.
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            PartialOrd,
            Default,
            Serialize,
            Deserialize,
            derive_more::Add,
            derive_more::Sub,
        )]
        pub struct $name(pub f64);

        impl $name {
            /// Create a new instance of the unit type from an `f64` value.
            pub fn new(val: f64) -> Self {
                Self(val)
            }

            /// Return the value of the unit type as an `f64`.
            pub fn value(self) -> f64 {
                self.0
            }

            /// Whether the underlying value is finite
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self(0.0), |acc, x| acc + x)
            }
        }

        impl Mul<Dimensionless> for $name {
            type Output = $name;
            fn mul(self, rhs: Dimensionless) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl Mul<$name> for Dimensionless {
            type Output = $name;
            fn mul(self, rhs: $name) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl Div<Dimensionless> for $name {
            type Output = $name;
            fn div(self, rhs: Dimensionless) -> $name {
                $name(self.0 / rhs.0)
            }
        }

        impl ApproxEq for $name {
            type Margin = F64Margin;

            fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
                self.0.approx_eq(other.0, margin)
            }
        }
    };
}

macro_rules! impl_mul {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl Mul<$Rhs> for $Lhs {
            type Output = $Out;
            fn mul(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 * rhs.0)
            }
        }
        impl Mul<$Lhs> for $Rhs {
            type Output = $Out;
            fn mul(self, lhs: $Lhs) -> $Out {
                <$Out>::new(self.0 * lhs.0)
            }
        }
    };
}

// Base quantities
unit_struct!(Money);
unit_struct!(Gigabytes);

// Derived quantities
unit_struct!(MoneyPerGigabyte);
unit_struct!(MoneyPerTerabyte);

impl_mul!(Gigabytes, MoneyPerGigabyte, Money);

impl Mul<MoneyPerTerabyte> for Gigabytes {
    type Output = Money;

    /// Vendors quoting per TB bill on binary terabytes
    fn mul(self, rhs: MoneyPerTerabyte) -> Money {
        Money(self.terabytes() * rhs.0)
    }
}

impl Gigabytes {
    /// The quantity expressed in (binary) terabytes
    pub fn terabytes(self) -> f64 {
        self.0 / GB_PER_TB
    }
}

impl Money {
    /// Money for a whole number of units at a fixed unit price, e.g. seats or users
    pub fn per_unit(count: u64, price: Money) -> Money {
        Money(count as f64 * price.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn test_gigabytes_times_rate() {
        assert_eq!(Gigabytes(100.0) * MoneyPerGigabyte(0.5), Money(50.0));
        assert_eq!(MoneyPerGigabyte(0.5) * Gigabytes(100.0), Money(50.0));
    }

    #[test]
    fn test_gigabytes_times_terabyte_rate() {
        assert_approx_eq!(Money, Gigabytes(2048.0) * MoneyPerTerabyte(23.0), Money(46.0));
    }

    #[test]
    fn test_money_sum() {
        let total: Money = [Money(1.5), Money(2.0), Money(0.5)].into_iter().sum();
        assert_eq!(total, Money(4.0));
        assert_eq!(std::iter::empty::<Money>().sum::<Money>(), Money(0.0));
    }

    #[test]
    fn test_money_per_unit() {
        assert_eq!(Money::per_unit(50, Money(70.0)), Money(3500.0));
        assert_eq!(Money::per_unit(0, Money(70.0)), Money(0.0));
    }
}
