// storefront/src/lib.rs

//! HTTP storefront and admin console for the Horas shop.
//!
//! Persistence, sign-in and file storage live on the hosted platform; this
//! crate talks to it through [`platform`] and exposes the shop under
//! `/api/v1`.

pub mod config;
pub mod errors;
pub mod pipelines;
pub mod platform;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod web;
