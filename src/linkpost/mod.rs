// SPDX-License-Identifier: MIT

pub mod analytics;
pub mod config;
pub mod content;
pub mod scheduler;
pub mod server;
pub mod templates;
pub mod workflow;
