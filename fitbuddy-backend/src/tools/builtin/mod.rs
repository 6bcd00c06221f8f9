//! Deterministic domain tools bound to the specialist agents

pub mod nutrition;
pub mod training;

pub use nutrition::MaintenanceCaloriesTool;
pub use training::WorkoutPlanTool;
