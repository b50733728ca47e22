//! Pricing for databases, warehouses and analytics engines.
use super::tiers::Tiers;
use crate::drivers::Drivers;
use crate::units::{Dimensionless, Money, MoneyPerGigabyte, MoneyPerTerabyte};
use serde::{Deserialize, Serialize};

/// SQL Server on Windows, licensed per core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SqlServerRates {
    /// Monthly operating system licence fee
    pub os_licence: Money,
    /// Monthly SQL Server core licence fee
    pub core_licence: Money,
    pub storage_per_gb: MoneyPerGigabyte,
    pub backup_per_gb: MoneyPerGigabyte,
    /// Support cost per user
    pub per_user: Money,
}

impl SqlServerRates {
    /// Monthly cost of the server
    pub fn cost(&self, drivers: &Drivers) -> Money {
        let size = drivers.database_size_gb;
        self.os_licence
            + self.core_licence
            + size * self.storage_per_gb
            + size * self.backup_per_gb
            + Money::per_unit(drivers.num_users, self.per_user)
    }
}

/// A virtual warehouse which runs for a fixed number of hours each month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WarehouseProfile {
    pub credits_per_hour: f64,
    pub hours_per_month: f64,
    pub cost_per_credit: Money,
}

impl WarehouseProfile {
    /// Monthly compute cost of this warehouse
    pub fn monthly_cost(&self) -> Money {
        Dimensionless(self.credits_per_hour * self.hours_per_month) * self.cost_per_credit
    }
}

/// How Snowflake compute is billed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum SnowflakeCompute {
    /// Credits scale with the volume queried and the number of concurrent workloads
    QueryScaled {
        /// GB queried per credit used by each workload
        gb_per_credit: f64,
        credit_price: Money,
    },
    /// A fixed set of virtual warehouses
    Warehouses { warehouses: Vec<WarehouseProfile> },
}

impl SnowflakeCompute {
    fn cost(&self, drivers: &Drivers) -> Money {
        match self {
            Self::QueryScaled {
                gb_per_credit,
                credit_price,
            } => {
                let credits =
                    drivers.query_volume_gb.value() / gb_per_credit * drivers.concurrency as f64;
                Dimensionless(credits) * *credit_price
            }
            Self::Warehouses { warehouses } => warehouses
                .iter()
                .map(WarehouseProfile::monthly_cost)
                .sum(),
        }
    }
}

/// Snowflake cloud data warehouse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnowflakeRates {
    pub storage_per_tb: MoneyPerTerabyte,
    pub compute: SnowflakeCompute,
    /// Cloud services charge as a fraction of compute
    pub cloud_services_fraction: Dimensionless,
    pub per_user: Money,
}

impl SnowflakeRates {
    /// Monthly cost of storage, compute and cloud services
    pub fn cost(&self, drivers: &Drivers) -> Money {
        let storage = drivers.database_size_gb * self.storage_per_tb;
        let compute = self.compute.cost(drivers);
        let cloud_services = compute * self.cloud_services_fraction;

        storage + compute + cloud_services + Money::per_unit(drivers.num_users, self.per_user)
    }
}

/// Microsoft Fabric, billed by reserved capacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FabricRates {
    /// Capacity fee, tiered by database size in GB
    pub capacity_fee: Tiers<Money>,
    pub storage_per_gb: MoneyPerGigabyte,
    pub per_user: Money,
}

impl FabricRates {
    /// Monthly cost of capacity and storage
    pub fn cost(&self, drivers: &Drivers) -> Money {
        let size = drivers.database_size_gb;
        self.capacity_fee.lookup(size.value())
            + size * self.storage_per_gb
            + Money::per_unit(drivers.num_users, self.per_user)
    }
}

/// Databricks, billed in DBUs consumed by queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabricksRates {
    /// GB queried per DBU
    pub gb_per_unit: f64,
    pub unit_price: Money,
    pub storage_per_gb: MoneyPerGigabyte,
    pub per_user: Money,
}

impl DatabricksRates {
    /// Monthly cost of compute, storage and user support
    pub fn cost(&self, drivers: &Drivers) -> Money {
        let units = drivers.query_volume_gb.value() / self.gb_per_unit;
        Dimensionless(units) * self.unit_price
            + drivers.database_size_gb * self.storage_per_gb
            + Money::per_unit(drivers.num_users, self.per_user)
    }
}

/// Amazon RDS managed relational database on a single instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RdsRates {
    pub instance_hourly: Money,
    pub hours_per_month: f64,
    pub storage_per_gb: MoneyPerGigabyte,
    pub backup_per_gb: MoneyPerGigabyte,
    pub per_user: Money,
}

impl RdsRates {
    /// Monthly cost of the instance, storage, backups and support
    pub fn cost(&self, drivers: &Drivers) -> Money {
        let size = drivers.database_size_gb;
        self.instance_hourly * Dimensionless(self.hours_per_month)
            + size * self.storage_per_gb
            + size * self.backup_per_gb
            + Money::per_unit(drivers.num_users, self.per_user)
    }
}

/// Amazon Redshift Serverless, billed in RPU hours
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RedshiftRates {
    pub storage_per_tb: MoneyPerTerabyte,
    /// GB queried per RPU used by each workload
    pub gb_per_rpu: f64,
    pub rpu_price: Money,
}

impl RedshiftRates {
    /// Monthly cost of managed storage and serverless compute
    pub fn cost(&self, drivers: &Drivers) -> Money {
        let rpus = drivers.query_volume_gb.value() / self.gb_per_rpu * drivers.concurrency as f64;
        drivers.database_size_gb * self.storage_per_tb + Dimensionless(rpus) * self.rpu_price
    }
}

/// Google BigQuery with on-demand (pay per TB scanned) queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BigQueryRates {
    pub storage_per_tb: MoneyPerTerabyte,
    pub scan_per_tb: MoneyPerTerabyte,
}

impl BigQueryRates {
    /// Monthly cost of storage and scanned bytes
    pub fn cost(&self, drivers: &Drivers) -> Money {
        drivers.database_size_gb * self.storage_per_tb + drivers.query_volume_gb * self.scan_per_tb
    }
}
