// SPDX-License-Identifier: MIT

//! Agent development kit - the provider-facing half of the crate

pub mod agent;
pub mod error;
pub mod generation;
pub mod model;
