//! Behavioral suspicion analysis
//!
//! Scores account behavior counters (messages, matches, account age) with the
//! same clamped-sum model as the profile analyzer, but from a disjoint signal
//! set that needs no content at all.

use crate::profile_analyzer::Recommendation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::debug;

const MASS_MESSAGING_WEIGHT: f64 = 0.7;
const NEW_ACCOUNT_ACTIVITY_WEIGHT: f64 = 0.8;
const NO_ENGAGEMENT_WEIGHT: f64 = 0.6;
const RAPID_MATCHING_WEIGHT: f64 = 0.5;

const SUSPICION_THRESHOLD: f64 = 0.7;

const DAY_SECONDS: u64 = 24 * 60 * 60;

/// A behavioral signal that contributed to the suspicion score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorIndicator {
    MassMessaging,
    NewAccountHighActivity,
    NoEngagement,
    RapidMatching,
}

impl fmt::Display for BehaviorIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BehaviorIndicator::MassMessaging => {
                write!(f, "many messages sent with very few matches")
            }
            BehaviorIndicator::NewAccountHighActivity => {
                write!(f, "high message volume on a brand-new account")
            }
            BehaviorIndicator::NoEngagement => {
                write!(f, "sends messages but never receives any")
            }
            BehaviorIndicator::RapidMatching => {
                write!(f, "unusually fast match accumulation")
            }
        }
    }
}

/// Result of one behavioral analysis pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorAnalysis {
    pub is_suspicious: bool,
    pub suspicion_score: f64,
    pub indicators: Vec<BehaviorIndicator>,
    pub recommendation: Recommendation,
}

/// Analyze behavior counters. Pure and infallible.
pub fn analyze_behavior(
    messages_sent: u64,
    messages_received: u64,
    matches_count: u64,
    account_age: Duration,
) -> BehaviorAnalysis {
    let mut score = 0.0;
    let mut indicators = Vec::new();
    let age_seconds = account_age.as_secs();

    if messages_sent > 100 && matches_count < 10 {
        score += MASS_MESSAGING_WEIGHT;
        indicators.push(BehaviorIndicator::MassMessaging);
    }
    if age_seconds < DAY_SECONDS && messages_sent > 50 {
        score += NEW_ACCOUNT_ACTIVITY_WEIGHT;
        indicators.push(BehaviorIndicator::NewAccountHighActivity);
    }
    if messages_received == 0 && messages_sent > 20 {
        score += NO_ENGAGEMENT_WEIGHT;
        indicators.push(BehaviorIndicator::NoEngagement);
    }
    if matches_count > 100 && age_seconds < 7 * DAY_SECONDS {
        score += RAPID_MATCHING_WEIGHT;
        indicators.push(BehaviorIndicator::RapidMatching);
    }

    let suspicion_score = score.clamp(0.0, 1.0);
    let is_suspicious = suspicion_score >= SUSPICION_THRESHOLD;
    let recommendation = if is_suspicious {
        Recommendation::FlagForReview
    } else {
        Recommendation::AllowProfile
    };

    if is_suspicious {
        debug!(
            "Behavior flagged: score {:.2}, {} indicator(s)",
            suspicion_score,
            indicators.len()
        );
    }

    BehaviorAnalysis {
        is_suspicious,
        suspicion_score,
        indicators,
        recommendation,
    }
}

/// Convenience wrapper deriving the account age from its creation timestamp.
pub fn analyze_behavior_since(
    messages_sent: u64,
    messages_received: u64,
    matches_count: u64,
    account_created_at: DateTime<Utc>,
) -> BehaviorAnalysis {
    let age = Utc::now()
        .signed_duration_since(account_created_at)
        .to_std()
        .unwrap_or_default();
    analyze_behavior(messages_sent, messages_received, matches_count, age)
}
