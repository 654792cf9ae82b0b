pub mod similarity;
pub mod size;

pub use similarity::{change_weight, edit_cost, score, Similarity};
pub use size::tree_size;
