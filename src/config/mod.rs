/// Database configuration and connection management
pub mod database;

/// Catalog seed data from the config file
pub mod catalog;

/// Application settings from the config file
pub mod settings;
