pub mod action_queue;
pub mod ai;
pub mod calculators;
pub mod catch;
pub mod engine;
pub mod outcome;
pub mod report;
pub mod state;
pub mod stats;
pub mod turn_order;
pub mod turn_orchestrator;

#[cfg(test)]
mod tests;
