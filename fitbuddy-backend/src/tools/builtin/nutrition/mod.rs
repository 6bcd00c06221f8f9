pub mod maintenance_calories;

pub use maintenance_calories::MaintenanceCaloriesTool;
