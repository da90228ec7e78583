//! Funnel aggregation: value by stage in canonical order.

use serde::Serialize;

use crate::model::{canonical_position, JoinedDeal, CANONICAL_STAGES};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelStage {
    pub stage: String,
    pub total: f64,
}

/// Sum close_value per canonical stage present in `rows`.
///
/// Stages with no rows are omitted, not zero-filled. Stages outside the
/// canonical sequence are dropped.
pub fn funnel(rows: &[&JoinedDeal]) -> Vec<FunnelStage> {
    let mut totals: [Option<f64>; CANONICAL_STAGES.len()] = [None; CANONICAL_STAGES.len()];
    for row in rows {
        if let Some(pos) = canonical_position(&row.deal_stage) {
            let slot = totals[pos].get_or_insert(0.0);
            *slot += row.close_value.unwrap_or(0.0);
        }
    }
    CANONICAL_STAGES
        .iter()
        .zip(totals)
        .filter_map(|(stage, total)| {
            total.map(|total| FunnelStage {
                stage: (*stage).to_string(),
                total,
            })
        })
        .collect()
}
