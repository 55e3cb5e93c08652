//! Application services: store resolution, commission resolution, pricing,
//! and the repository traits they depend on.

pub mod commissions;
pub mod error;
pub mod landing;
pub mod pricing;
pub mod repos;
pub mod stores;
