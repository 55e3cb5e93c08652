//! Infrastructure adapters: Postgres repositories and telemetry.

pub mod db;
pub mod error;
pub mod telemetry;
