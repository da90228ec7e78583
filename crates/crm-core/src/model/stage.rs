//! Deal stage vocabulary.

/// Funnel order. Stages outside this list never appear in the funnel.
pub const CANONICAL_STAGES: [&str; 6] = [
    "Prospecting",
    "Engaging",
    "Proposal",
    "Negotiation",
    "Won",
    "Lost",
];

pub fn is_won_stage(stage: &str) -> bool {
    stage.to_lowercase() == "won"
}

pub fn is_lost_stage(stage: &str) -> bool {
    stage.to_lowercase() == "lost"
}

/// Position of `stage` in [`CANONICAL_STAGES`]; exact, case-sensitive match.
pub fn canonical_position(stage: &str) -> Option<usize> {
    CANONICAL_STAGES.iter().position(|s| *s == stage)
}
