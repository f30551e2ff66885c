// SPDX-License-Identifier: MIT

//! linkpost-rs - LinkedIn content generation on top of a hosted language model
//!
//! - [adk] - model providers, the generation service contract, role agents and errors
//! - [linkpost] - content operations, templates, the correction workflow and the HTTP server

pub mod adk;
pub mod linkpost;
