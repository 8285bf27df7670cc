pub mod attendance;
pub mod dashboard;
pub mod root;
pub mod workshops;
