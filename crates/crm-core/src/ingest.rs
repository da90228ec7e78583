//! Loading the four raw tables.
//!
//! Any missing or malformed file is fatal for the run: there is no partial
//! load and no row-level recovery.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::model::{Account, Deal, Product, SalesTeam};

/// The raw tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Deals,
    Accounts,
    Products,
    Teams,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Table::Deals => write!(f, "deals"),
            Table::Accounts => write!(f, "accounts"),
            Table::Products => write!(f, "products"),
            Table::Teams => write!(f, "teams"),
        }
    }
}

/// A raw table could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{table} table not found at {}", path.display())]
    Missing { table: Table, path: PathBuf },

    #[error("failed to read {table} table {}: {source}", path.display())]
    Io {
        table: Table,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {table} table {}: {source}", path.display())]
    Malformed {
        table: Table,
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl LoadError {
    pub fn table(&self) -> Table {
        match self {
            LoadError::Missing { table, .. }
            | LoadError::Io { table, .. }
            | LoadError::Malformed { table, .. } => *table,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            LoadError::Missing { path, .. }
            | LoadError::Io { path, .. }
            | LoadError::Malformed { path, .. } => path,
        }
    }
}

impl From<LoadError> for crm_common::Error {
    fn from(err: LoadError) -> Self {
        crm_common::Error::Load {
            table: err.table().to_string(),
            path: err.path().display().to_string(),
            reason: err.to_string(),
        }
    }
}

/// Locations of the raw tables.
#[derive(Debug, Clone)]
pub struct InputPaths {
    pub deals: PathBuf,
    pub accounts: PathBuf,
    pub products: PathBuf,
    pub teams: PathBuf,
}

impl InputPaths {
    pub fn from_config(config: &crm_config::PipelineConfig) -> Self {
        Self {
            deals: config.deals_path(),
            accounts: config.accounts_path(),
            products: config.products_path(),
            teams: config.teams_path(),
        }
    }
}

/// All four raw tables in memory.
#[derive(Debug, Clone, Default)]
pub struct RawSources {
    pub deals: Vec<Deal>,
    pub accounts: Vec<Account>,
    pub products: Vec<Product>,
    pub teams: Vec<SalesTeam>,
}

impl RawSources {
    /// Load every table, failing on the first problem.
    pub fn load(paths: &InputPaths) -> Result<Self, LoadError> {
        let sources = Self {
            deals: load_table(Table::Deals, &paths.deals)?,
            accounts: load_table(Table::Accounts, &paths.accounts)?,
            products: load_table(Table::Products, &paths.products)?,
            teams: load_table(Table::Teams, &paths.teams)?,
        };
        debug!(
            deals = sources.deals.len(),
            accounts = sources.accounts.len(),
            products = sources.products.len(),
            teams = sources.teams.len(),
            "raw tables loaded"
        );
        Ok(sources)
    }
}

/// Load one CSV table from disk.
pub fn load_table<T: DeserializeOwned>(table: Table, path: &Path) -> Result<Vec<T>, LoadError> {
    if !path.is_file() {
        return Err(LoadError::Missing {
            table,
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|source| LoadError::Io {
        table,
        path: path.to_path_buf(),
        source,
    })?;
    let rows = parse_table(file).map_err(|source| LoadError::Malformed {
        table,
        path: path.to_path_buf(),
        source,
    })?;
    debug!(%table, path = %path.display(), rows = rows.len(), "table loaded");
    Ok(rows)
}

/// Parse CSV with a header row into typed records.
pub fn parse_table<T: DeserializeOwned, R: Read>(reader: R) -> Result<Vec<T>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    rdr.deserialize().collect()
}
