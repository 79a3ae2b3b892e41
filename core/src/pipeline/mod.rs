// core/src/pipeline/mod.rs

//! A small step runner for multi-step writes against the hosted platform.
//!
//! A [`Pipeline`] is an ordered list of named steps. Each step has one or
//! more async handlers operating on a shared [`ContextData`], and may carry
//! a compensation that undoes its effect when a later step fails. Checkout
//! uses it for upload → order → items, admin provisioning for
//! user → role → admin record.

pub mod context_data;
pub mod control;
pub mod definition;
pub mod execution;

pub use context_data::ContextData;
pub use control::{PipelineControl, PipelineResult};
pub use definition::{Compensation, Handler, Pipeline, StepDef};
