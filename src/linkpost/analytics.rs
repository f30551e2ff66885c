// SPDX-License-Identifier: MIT

//! Mock engagement numbers for a saved post

use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostAnalytics {
    pub filename: String,
    pub likes: u32,
    pub comments: u32,
    pub shares: u32,
    pub impressions: u32,
    /// Percent of impressions that interacted, two decimals
    pub engagement_rate: f64,
    pub tip: String,
}

pub fn engagement_tip(likes: u32) -> &'static str {
    if likes > 50 {
        "High engagement! Try similar topics."
    } else {
        "Consider adding a question or poll next time."
    }
}

pub fn engagement_rate(likes: u32, comments: u32, shares: u32, impressions: u32) -> f64 {
    if impressions == 0 {
        return 0.0;
    }
    let rate = f64::from(likes + comments + shares) / f64::from(impressions) * 100.0;
    (rate * 100.0).round() / 100.0
}

/// Random but plausible numbers; no real data source is consulted
pub fn mock_analytics<R: Rng + ?Sized>(filename: &str, rng: &mut R) -> PostAnalytics {
    let likes = rng.gen_range(10..=100);
    let comments = rng.gen_range(5..=50);
    let shares = rng.gen_range(1..=20);
    let impressions = rng.gen_range(500..=5000);

    PostAnalytics {
        filename: filename.to_string(),
        likes,
        comments,
        shares,
        impressions,
        engagement_rate: engagement_rate(likes, comments, shares, impressions),
        tip: engagement_tip(likes).to_string(),
    }
}
