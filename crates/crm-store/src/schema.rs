//! Arrow schema of the joined pipeline snapshot.
//!
//! Column order follows the join: deal columns, derived columns, then
//! account, team and product attributes. Every lookup attribute is nullable
//! because an unmatched key null-fills it.

use std::collections::HashMap;
use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use crm_common::SCHEMA_VERSION;

/// Schema metadata key carrying the snapshot schema version.
pub const SCHEMA_VERSION_KEY: &str = "crm.schema_version";

pub const OPPORTUNITY_ID: &str = "opportunity_id";
pub const SALES_AGENT: &str = "sales_agent";
pub const PRODUCT: &str = "product";
pub const ACCOUNT: &str = "account";
pub const DEAL_STAGE: &str = "deal_stage";
pub const ENGAGE_DATE: &str = "engage_date";
pub const CLOSE_DATE: &str = "close_date";
pub const CLOSE_VALUE: &str = "close_value";
pub const DEAL_AGE: &str = "deal_age";
pub const IS_WON: &str = "is_won";
pub const IS_LOST: &str = "is_lost";
pub const SECTOR: &str = "sector";
pub const YEAR_ESTABLISHED: &str = "year_established";
pub const REVENUE: &str = "revenue";
pub const EMPLOYEES: &str = "employees";
pub const OFFICE_LOCATION: &str = "office_location";
pub const SUBSIDIARY_OF: &str = "subsidiary_of";
pub const MANAGER: &str = "manager";
pub const REGIONAL_OFFICE: &str = "regional_office";
pub const SERIES: &str = "series";
pub const SALES_PRICE: &str = "sales_price";

/// Schema for `pipeline.parquet` and the DuckDB `pipeline` table.
pub fn pipeline_schema() -> SchemaRef {
    let metadata = HashMap::from([(
        SCHEMA_VERSION_KEY.to_string(),
        SCHEMA_VERSION.to_string(),
    )]);
    Arc::new(Schema::new_with_metadata(
        vec![
            // Deal
            Field::new(OPPORTUNITY_ID, DataType::Utf8, true),
            Field::new(SALES_AGENT, DataType::Utf8, false),
            Field::new(PRODUCT, DataType::Utf8, false),
            Field::new(ACCOUNT, DataType::Utf8, true),
            Field::new(DEAL_STAGE, DataType::Utf8, false),
            Field::new(ENGAGE_DATE, DataType::Date32, true),
            Field::new(CLOSE_DATE, DataType::Date32, true),
            Field::new(CLOSE_VALUE, DataType::Float64, true),
            // Derived
            Field::new(DEAL_AGE, DataType::Int64, true),
            Field::new(IS_WON, DataType::Int64, false),
            Field::new(IS_LOST, DataType::Int64, false),
            // Account
            Field::new(SECTOR, DataType::Utf8, true),
            Field::new(YEAR_ESTABLISHED, DataType::Int64, true),
            Field::new(REVENUE, DataType::Float64, true),
            Field::new(EMPLOYEES, DataType::Int64, true),
            Field::new(OFFICE_LOCATION, DataType::Utf8, true),
            Field::new(SUBSIDIARY_OF, DataType::Utf8, true),
            // Team
            Field::new(MANAGER, DataType::Utf8, true),
            Field::new(REGIONAL_OFFICE, DataType::Utf8, true),
            // Product
            Field::new(SERIES, DataType::Utf8, true),
            Field::new(SALES_PRICE, DataType::Float64, true),
        ],
        metadata,
    ))
}
