//! Stacks are named bundles of cost components which are compared against each other.
use crate::id::{define_id_getter, define_id_type};
use crate::pricing::{Component, CostComponents};
use crate::units::Money;
use anyhow::{Result, ensure};
use indexmap::{IndexMap, IndexSet, indexmap};

define_id_type! {StackID}

/// The name of the column in the output table holding the month index
pub const MONTH_COLUMN: &str = "month";

/// Stack definitions as they appear in a scenario file, in declaration order
pub type StackDefinitions = IndexMap<StackID, Vec<Component>>;

/// A named set of cost components whose costs are summed each month
#[derive(Debug, Clone, PartialEq)]
pub struct Stack {
    /// Unique name for the stack
    pub id: StackID,
    /// The components making up the stack, in declaration order
    pub components: IndexSet<Component>,
}
define_id_getter! {Stack, StackID}

impl Stack {
    /// The stack's total for the month: the sum of its components' costs
    pub fn total(&self, costs: &CostComponents) -> Money {
        self.components
            .iter()
            .map(|component| costs.get(*component))
            .sum()
    }
}

/// The stacks compared by default
pub fn default_stack_definitions() -> StackDefinitions {
    indexmap! {
        "Snowflake_Fivetran_Tableau".into() => vec![
            Component::Snowflake,
            Component::Fivetran,
            Component::Tableau,
        ],
        "Microsoft_SQL_Fabric_PowerBI".into() => vec![
            Component::SqlServer,
            Component::Fabric,
            Component::PowerBi,
        ],
        "Databricks_AirbyteEnt_Tableau".into() => vec![
            Component::Databricks,
            Component::AirbyteEnterprise,
            Component::Tableau,
        ],
        "BigQuery_AirbyteEnt_Tableau".into() => vec![
            Component::BigQuery,
            Component::AirbyteEnterprise,
            Component::Tableau,
        ],
        "AWS_RDS_Redshift_QuickSight".into() => vec![
            Component::Rds,
            Component::Redshift,
            Component::QuickSight,
        ],
    }
}

/// Check stack definitions and convert them into [`Stack`]s
pub fn build_stacks(definitions: &StackDefinitions) -> Result<Vec<Stack>> {
    ensure!(!definitions.is_empty(), "At least one stack must be defined");

    let mut stacks = Vec::with_capacity(definitions.len());
    for (id, components) in definitions {
        ensure!(
            id.as_str() != MONTH_COLUMN,
            "Stack name cannot be \"{MONTH_COLUMN}\""
        );
        ensure!(!components.is_empty(), "Stack {id} has no components");

        let unique: IndexSet<Component> = components.iter().copied().collect();
        ensure!(
            unique.len() == components.len(),
            "Stack {id} contains the same component more than once"
        );

        stacks.push(Stack {
            id: id.clone(),
            components: unique,
        });
    }

    Ok(stacks)
}

/// Compute the total for each stack, in the order given
pub fn aggregate(stacks: &[Stack], costs: &CostComponents) -> Vec<Money> {
    stacks.iter().map(|stack| stack.total(costs)).collect()
}
