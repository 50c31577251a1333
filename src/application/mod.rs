pub mod collectors;
pub mod runner;
