//! Typed records for the raw tables and the joined dataset.

pub mod joined;
pub mod records;
pub mod stage;

pub use joined::{Derived, JoinedDeal};
pub use records::{Account, Deal, Product, SalesTeam};
pub use stage::{canonical_position, is_lost_stage, is_won_stage, CANONICAL_STAGES};
