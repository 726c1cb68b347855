pub mod assistant;
pub mod billing;
