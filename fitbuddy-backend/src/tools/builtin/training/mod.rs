pub mod workout_plan;

pub use workout_plan::WorkoutPlanTool;
