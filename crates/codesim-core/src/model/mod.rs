pub mod change;
pub mod comparison;
