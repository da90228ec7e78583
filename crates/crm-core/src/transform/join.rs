//! Left joins against the lookup tables.
//!
//! Each lookup is indexed by its natural key with first-row-wins semantics,
//! so a duplicated key can never multiply deal rows. Deals with an absent key
//! or a key with no lookup row keep their own columns and get `None` for
//! every lookup attribute.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::{Account, Derived, JoinedDeal, Product, SalesTeam};

use super::DerivedDeal;

/// Key → first row with that key.
#[derive(Debug)]
pub struct LookupIndex<'a, T> {
    rows: HashMap<&'a str, &'a T>,
    duplicates: usize,
}

impl<'a, T> LookupIndex<'a, T> {
    pub fn build(table: &'static str, rows: &'a [T], key: impl Fn(&'a T) -> &'a str) -> Self {
        let mut index = HashMap::with_capacity(rows.len());
        let mut duplicates = 0;
        for row in rows {
            let k = key(row);
            if index.contains_key(k) {
                duplicates += 1;
                continue;
            }
            index.insert(k, row);
        }
        if duplicates > 0 {
            warn!(table, duplicates, "duplicate lookup keys ignored; first row kept");
        }
        Self {
            rows: index,
            duplicates,
        }
    }

    pub fn get(&self, key: Option<&str>) -> Option<&'a T> {
        key.and_then(|k| self.rows.get(k).copied())
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

/// Match counts of one join run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinStats {
    pub rows: usize,
    pub unmatched_accounts: usize,
    pub unmatched_teams: usize,
    pub unmatched_products: usize,
    pub duplicate_lookup_keys: usize,
}

/// Left-join deals to accounts, then teams, then products.
pub fn left_join(
    deals: Vec<DerivedDeal>,
    accounts: &[Account],
    teams: &[SalesTeam],
    products: &[Product],
) -> (Vec<JoinedDeal>, JoinStats) {
    let account_idx = LookupIndex::build("accounts", accounts, |a| a.account.as_str());
    let team_idx = LookupIndex::build("teams", teams, |t| t.sales_agent.as_str());
    let product_idx = LookupIndex::build("products", products, |p| p.product.as_str());

    let mut stats = JoinStats {
        rows: deals.len(),
        duplicate_lookup_keys: account_idx.duplicates()
            + team_idx.duplicates()
            + product_idx.duplicates(),
        ..Default::default()
    };

    let rows = deals
        .into_iter()
        .map(|(deal, derived): (_, Derived)| {
            let account = account_idx.get(deal.account.as_deref());
            let team = team_idx.get(Some(deal.sales_agent.as_str()));
            let product = product_idx.get(Some(deal.product.as_str()));

            let mut row = JoinedDeal::unmatched(deal, derived);
            match account {
                Some(a) => row = row.with_account(a),
                None => stats.unmatched_accounts += 1,
            }
            match team {
                Some(t) => row = row.with_team(t),
                None => stats.unmatched_teams += 1,
            }
            match product {
                Some(p) => row = row.with_product(p),
                None => stats.unmatched_products += 1,
            }
            row
        })
        .collect();

    (rows, stats)
}
