pub mod app;
pub mod enable;
