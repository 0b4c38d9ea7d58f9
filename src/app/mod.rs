pub mod keys;
pub mod logger;
pub mod models;
pub mod record;
pub mod tags;
pub mod workflow;
