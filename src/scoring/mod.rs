pub mod engine;
pub mod ladder;
pub mod tables;
pub mod verdict;

pub use engine::{calculate_score, CommentTally, Factors, ResaleScore};
pub use ladder::{Breakpoint, Ladder};
pub use verdict::Tier;
