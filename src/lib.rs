pub mod behavior_analyzer;
pub mod content_moderator;
pub mod photo_metadata;
pub mod profile_analyzer;
pub mod sanitizer;

#[cfg(test)]
mod tests;

pub use behavior_analyzer::{
    analyze_behavior, analyze_behavior_since, BehaviorAnalysis, BehaviorIndicator,
};
pub use content_moderator::{
    check_message, contains_personal_info, contains_profanity, contains_spam, content_score,
    filter_profanity, is_appropriate, validate_name, violations, MessageVerdict,
    NameValidationResult, PolicyViolation,
};
pub use photo_metadata::{read_photo_info, PhotoInfo};
pub use profile_analyzer::{
    AnalyzerConfig, DefaultPhotoChecks, FakeIndicator, FakeProfileAnalysis, FakeProfileAnalyzer,
    PhotoAnalysisProvider, PhotoSnapshot, ProfileSnapshot, Recommendation,
};
pub use sanitizer::{encode, normalize_email, sanitize, EncodingContext, SanitizationLevel};
