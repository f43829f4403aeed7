pub mod load;
pub mod types;

pub use load::{expand_inputs, load_listings, parse_listings};
pub use types::{Condition, EquipmentType, Listing, ScoreInput};
