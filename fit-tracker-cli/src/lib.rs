// Library exports for the fit-tracker CLI
// This allows testing of internal modules

pub mod commands;
pub mod session;
pub mod ui;
