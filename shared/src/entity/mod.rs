pub mod actions;
pub mod coins;
pub mod decision_logs;
pub mod members;
