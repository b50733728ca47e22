//! Functionality for running the month-by-month cost projection.
use crate::drivers::Drivers;
use crate::pricing::CostComponents;
use crate::scenario::Scenario;
use crate::stack::{StackID, aggregate};
use crate::units::Money;
use log::{debug, info};

/// Everything computed for a single month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthRecord {
    /// The month index, starting from 1
    pub month: u32,
    /// The drivers used to price this month
    pub drivers: Drivers,
    /// The cost of every component
    pub costs: CostComponents,
    /// The total for each stack, in the same order as [`CostTable::stack_ids`]
    pub totals: Vec<Money>,
}

/// The result of a projection: one record per month, in month order
#[derive(Debug, Clone, PartialEq)]
pub struct CostTable {
    stack_ids: Vec<StackID>,
    months: Vec<MonthRecord>,
}

impl CostTable {
    /// The names of the stacks, in column order
    pub fn stack_ids(&self) -> &[StackID] {
        &self.stack_ids
    }

    /// The monthly records, in month order
    pub fn months(&self) -> &[MonthRecord] {
        &self.months
    }

    /// The number of months in the table
    pub fn len(&self) -> usize {
        self.months.len()
    }

    /// Whether the table has no months
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// The monthly totals for a single stack, or `None` if there is no such stack
    pub fn series(&self, stack_id: &str) -> Option<Vec<Money>> {
        let idx = self
            .stack_ids
            .iter()
            .position(|id| id.as_str() == stack_id)?;

        Some(self.months.iter().map(|record| record.totals[idx]).collect())
    }

    /// The largest total for any stack in any month
    pub fn max_total(&self) -> Option<Money> {
        self.months
            .iter()
            .flat_map(|record| record.totals.iter().copied())
            .reduce(|a, b| if b > a { b } else { a })
    }
}

/// Project costs for every month of the scenario.
///
/// Each month the drivers are priced, the costs summed into stack totals and the drivers grown
/// for the following month.
pub fn simulate(scenario: &Scenario) -> CostTable {
    let rates = &scenario.rates;
    let months = (1..=scenario.months)
        .zip(scenario.growth.iter_months(scenario.initial_drivers))
        .map(|(month, drivers)| {
            let costs = rates.price(&drivers);
            let totals = aggregate(&scenario.stacks, &costs);
            debug!("Month {month}: {drivers:?}");

            MonthRecord {
                month,
                drivers,
                costs,
                totals,
            }
        })
        .collect();

    let table = CostTable {
        stack_ids: scenario
            .stacks
            .iter()
            .map(|stack| stack.id.clone())
            .collect(),
        months,
    };
    info!(
        "Projected costs for {} stacks over {} months",
        table.stack_ids.len(),
        table.len()
    );

    table
}
