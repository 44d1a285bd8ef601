pub mod flowchart;
pub mod home;
pub mod not_found;
