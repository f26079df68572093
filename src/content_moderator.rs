//! Content policy classification and scoring
//!
//! Classifies free-form text against the policy taxonomy (profanity, spam,
//! personal info, shouting, repetition) and produces a 0-100 appropriateness
//! score. All functions are pure and operate on plain text; callers typically
//! run the sanitizer first for storage and this module for policy decisions.

use crate::sanitizer::{sanitize, SanitizationLevel};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

/// A single policy violation detected in a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyViolation {
    Profanity,
    Spam,
    PersonalInfo,
    ExcessiveCaps,
    ExcessiveRepetition,
}

impl PolicyViolation {
    /// Score deduction applied when this violation is present.
    fn penalty(self) -> u32 {
        match self {
            PolicyViolation::Profanity => 40,
            PolicyViolation::Spam => 30,
            PolicyViolation::PersonalInfo => 20,
            PolicyViolation::ExcessiveCaps => 10,
            PolicyViolation::ExcessiveRepetition => 10,
        }
    }
}

/// Outcome of display-name validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameValidationResult {
    pub is_valid: bool,
    pub reason: Option<String>,
}

impl NameValidationResult {
    fn valid() -> Self {
        Self {
            is_valid: true,
            reason: None,
        }
    }

    fn invalid(reason: &str) -> Self {
        Self {
            is_valid: false,
            reason: Some(reason.to_string()),
        }
    }
}

/// Verdict for a message about to be sent: sanitized text plus the policy
/// violations the UI surfaces when the send is rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageVerdict {
    pub sanitized: String,
    pub violations: Vec<PolicyViolation>,
    pub accepted: bool,
}

const PROFANITY_WORDS: &[&str] = &[
    "fuck", "fucking", "fucker", "motherfucker", "shit", "bullshit", "ass", "asshole", "bitch",
    "bastard", "damn", "dick", "cock", "pussy", "cunt", "whore", "slut", "twat", "wanker",
    "prick", "douche", "jackass", "dumbass", "piss", "tits", "cum", "jizz", "nigger", "nigga",
    "faggot", "fag", "retard",
];

/// Case-insensitive substring markers for spam content.
const SPAM_PATTERNS: &[&str] = &[
    "http://", "https://", "www.", ".com/", "bit.ly", "tinyurl", "follow me", "add me on",
    "check out my", "subscribe to", "onlyfans", "snapchat", "snap:", "instagram", "insta:",
    "telegram", "whatsapp", "kik:", "cashapp", "cash app", "venmo", "paypal", "zelle",
    "click here", "buy now", "limited time", "act now", "free money", "make money",
    "earn money", "work from home", "get rich", "you won", "claim your prize",
    "investment opportunity", "crypto investment", "bitcoin opportunity",
];

/// Terms rejected in display names, tested as substrings of the
/// space-stripped lowercase name. Deliberately permissive.
const NAME_BLOCKLIST: &[&str] = &[
    // Sexual
    "sexy", "xxx", "porn", "nude", "naked", "escort", "hookup", "fetish", "bdsm", "horny",
    "onlyfans", "milf",
    // Scam / payment
    "cashapp", "venmo", "paypal", "bitcoin", "crypto", "forex", "sugardaddy", "sugarbaby",
    "giveaway", "free$",
    // Drugs
    "weed", "cannabis", "cocaine", "heroin", "mdma", "molly", "xanax", "dealer", "420",
    // Fake identity
    "admin", "support", "official", "verified", "moderator", "system",
];

static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{3}[-.]?\d{3}[-.]?\d{4}").expect("invalid phone regex"));

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").expect("invalid email regex")
});

static ADDRESS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b\d{1,5}\s+(?:[A-Za-z]+\s+){1,4}(?:street|st|avenue|ave|boulevard|blvd|road|rd|lane|ln|drive|dr|court|ct|circle|cir|way|place|pl|terrace|ter)\b",
    )
    .expect("invalid address regex")
});

/// True when the text carries no policy violations at all.
pub fn is_appropriate(text: &str) -> bool {
    violations(text).is_empty()
}

/// Detect all policy violations in the text, in the taxonomy's fixed order.
pub fn violations(text: &str) -> Vec<PolicyViolation> {
    let mut found = Vec::new();
    if contains_profanity(text) {
        found.push(PolicyViolation::Profanity);
    }
    if contains_spam(text) {
        found.push(PolicyViolation::Spam);
    }
    if contains_personal_info(text) {
        found.push(PolicyViolation::PersonalInfo);
    }
    if is_shouting(text) {
        found.push(PolicyViolation::ExcessiveCaps);
    }
    if has_excessive_repetition(text) {
        found.push(PolicyViolation::ExcessiveRepetition);
    }
    if !found.is_empty() {
        debug!("Text carries {} policy violation(s): {:?}", found.len(), found);
    }
    found
}

/// Appropriateness score: 100 minus a fixed deduction per detected violation,
/// floored at 0. Deductions are additive, not mutually exclusive.
pub fn content_score(text: &str) -> u32 {
    let deductions: u32 = violations(text).iter().map(|v| v.penalty()).sum();
    100u32.saturating_sub(deductions)
}

/// Word-list profanity check with a single leet-speak substitution pass.
pub fn contains_profanity(text: &str) -> bool {
    text.split_whitespace().any(is_profane_token)
}

/// Replace profane words with `*` of equal length, preserving surrounding
/// punctuation and spacing.
pub fn filter_profanity(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut token = String::new();
    for c in text.chars() {
        if c.is_whitespace() {
            push_filtered_token(&mut out, &token);
            token.clear();
            out.push(c);
        } else {
            token.push(c);
        }
    }
    push_filtered_token(&mut out, &token);
    out
}

fn push_filtered_token(out: &mut String, token: &str) {
    if token.is_empty() {
        return;
    }
    if !is_profane_token(token) {
        out.push_str(token);
        return;
    }
    // Star out the core word, keep leading/trailing punctuation.
    let chars: Vec<char> = token.chars().collect();
    let start = chars
        .iter()
        .position(|c| c.is_alphanumeric())
        .unwrap_or(0);
    let end = chars
        .iter()
        .rposition(|c| c.is_alphanumeric())
        .map(|i| i + 1)
        .unwrap_or(chars.len());
    out.extend(&chars[..start]);
    out.extend(std::iter::repeat('*').take(end - start));
    out.extend(&chars[end..]);
}

fn is_profane_token(token: &str) -> bool {
    let direct = strip_token_punctuation(&token.to_lowercase());
    if PROFANITY_WORDS.contains(&direct.as_str()) {
        return true;
    }
    let normalized = strip_token_punctuation(&leet_normalize(&token.to_lowercase()));
    PROFANITY_WORDS.contains(&normalized.as_str())
}

fn strip_token_punctuation(token: &str) -> String {
    token
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_string()
}

/// Substitution-table leet normalization. This is the only obfuscation-defeat
/// mechanism; it is not a fuzzy matcher.
fn leet_normalize(token: &str) -> String {
    token
        .chars()
        .map(|c| match c {
            '0' => 'o',
            '1' => 'i',
            '3' => 'e',
            '4' => 'a',
            '5' => 's',
            '7' => 't',
            '$' => 's',
            '@' => 'a',
            '€' => 'e',
            other => other,
        })
        .collect()
}

/// Spam check: fixed substring list or an emoji flood.
pub fn contains_spam(text: &str) -> bool {
    let lower = text.to_lowercase();
    SPAM_PATTERNS.iter().any(|p| lower.contains(p)) || emoji_count(text) > 10
}

/// Personal-info check: phone number, email address, or street address.
pub fn contains_personal_info(text: &str) -> bool {
    PHONE_REGEX.is_match(text) || EMAIL_REGEX.is_match(text) || ADDRESS_REGEX.is_match(text)
}

fn is_shouting(text: &str) -> bool {
    let letters = text.chars().filter(|c| c.is_alphabetic()).count();
    if letters < 10 {
        return false;
    }
    let uppercase = text.chars().filter(|c| c.is_uppercase()).count();
    uppercase as f64 / letters as f64 > 0.7
}

/// Any single character repeated 5+ times consecutively. Scanned by hand: the
/// regex crate has no backreferences.
fn has_excessive_repetition(text: &str) -> bool {
    let mut run = 0usize;
    let mut previous = None;
    for c in text.chars() {
        if Some(c) == previous {
            run += 1;
            if run >= 5 {
                return true;
            }
        } else {
            previous = Some(c);
            run = 1;
        }
    }
    false
}

/// Count emoji characters. Used by the spam check and by the profile
/// analyzer's bio heuristics.
pub(crate) fn emoji_count(text: &str) -> usize {
    text.chars().filter(|&c| is_emoji(c)).count()
}

fn is_emoji(c: char) -> bool {
    matches!(u32::from(c),
        0x1F300..=0x1F5FF   // symbols & pictographs
        | 0x1F600..=0x1F64F // emoticons
        | 0x1F680..=0x1F6FF // transport & map
        | 0x1F900..=0x1F9FF // supplemental symbols
        | 0x1FA70..=0x1FAFF // extended pictographs
        | 0x1F1E6..=0x1F1FF // regional indicators
        | 0x2600..=0x26FF   // misc symbols
        | 0x2700..=0x27BF   // dingbats
    )
}

/// Validate a display name. Names are short identifiers, not free text, so
/// this is a separate rule set from content scoring. Checks run in a fixed
/// order; every check is evaluated and the first failure's message is
/// returned.
pub fn validate_name(name: &str) -> NameValidationResult {
    let trimmed = name.trim();
    let stripped: String = trimmed
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let mut failures: Vec<&'static str> = Vec::new();

    if contains_profanity(trimmed)
        || PROFANITY_WORDS.contains(&stripped.as_str())
        || PROFANITY_WORDS.contains(&leet_normalize(&stripped).as_str())
    {
        failures.push("name contains inappropriate language");
    }
    if NAME_BLOCKLIST.iter().any(|term| stripped.contains(term)) {
        failures.push("name contains a blocked term");
    }
    if trimmed.chars().filter(|c| c.is_ascii_digit()).count() >= 7 {
        failures.push("name looks like a phone number");
    }
    if stripped.contains('@') || stripped.contains(".com") || stripped.contains(".net") {
        failures.push("name may not contain contact details");
    }
    if special_character_density(trimmed) > 0.3 {
        failures.push("name contains too many special characters");
    }
    if trimmed.chars().count() < 2 {
        failures.push("name is too short");
    }
    if trimmed.chars().count() > 50 {
        failures.push("name is too long");
    }

    match failures.first() {
        Some(reason) => {
            debug!("Rejecting name: {}", reason);
            NameValidationResult::invalid(reason)
        }
        None => NameValidationResult::valid(),
    }
}

fn special_character_density(name: &str) -> f64 {
    let total = name.chars().count();
    if total == 0 {
        return 0.0;
    }
    let special = name
        .chars()
        .filter(|c| !c.is_alphabetic() && !c.is_whitespace())
        .count();
    special as f64 / total as f64
}

/// Messaging-flow composition: sanitize at Standard level, then reject the
/// send on profanity or personal info, surfacing the full violation list.
pub fn check_message(text: &str) -> MessageVerdict {
    let sanitized = sanitize(text, SanitizationLevel::Standard);
    let violations = violations(&sanitized);
    let accepted = !violations
        .iter()
        .any(|v| matches!(v, PolicyViolation::Profanity | PolicyViolation::PersonalInfo));
    if !accepted {
        debug!("Rejecting message send: {:?}", violations);
    }
    MessageVerdict {
        sanitized,
        violations,
        accepted,
    }
}
