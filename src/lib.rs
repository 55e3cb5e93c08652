//! Vetrina: shared-catalog storefront core.
//!
//! Many storefronts and affiliates share one product catalog while every
//! (product, affiliate) pair can carry its own per-sale commission. This
//! crate keeps hot-path store lookups off the relational store with a
//! read-through cache addressable by durable id and by human slug, and
//! resolves the effective commission used for pricing and totals.
//!
//! The crate is embedded by storefront-rendering and admin-API surfaces;
//! it exposes services, not HTTP routes.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
