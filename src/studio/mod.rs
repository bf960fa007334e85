pub mod app;
pub mod stage;
