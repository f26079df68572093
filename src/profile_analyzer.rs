//! Fake profile analysis
//!
//! Scores how likely a profile snapshot (photos + bio + name + metadata) is
//! fake, bot-operated, or a scam account. Photo-level sub-checks are supplied
//! by a pluggable provider so the scoring core stays independent of any
//! vision backend; every provider call is bounded by a timeout and failures
//! count as "not flagged".

use crate::content_moderator::emoji_count;
use crate::photo_metadata::read_photo_info;
use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

type BoxError = Box<dyn Error + Send + Sync>;

// Indicator weights. These are compatibility constants: downstream moderation
// queues were tuned against them, so they must not drift.
const NO_PHOTOS_WEIGHT: f64 = 0.8;
const LOW_PHOTO_COUNT_WEIGHT: f64 = 0.4;
const STOCK_PHOTO_WEIGHT: f64 = 0.6;
const PROFESSIONAL_PHOTO_WEIGHT: f64 = 0.3;
const INCONSISTENT_FACES_WEIGHT: f64 = 0.7;
const HIGH_QUALITY_WEIGHT: f64 = 0.2;
const EMPTY_BIO_WEIGHT: f64 = 0.6;
const SHORT_BIO_WEIGHT: f64 = 0.3;
const GENERIC_BIO_WEIGHT: f64 = 0.5;
const BIO_LINK_WEIGHT: f64 = 0.4;
const BIO_PAYMENT_WEIGHT: f64 = 0.8;
const EXCESSIVE_EMOJI_WEIGHT: f64 = 0.4;
const BOT_TEXT_WEIGHT: f64 = 0.7;
const SINGLE_WORD_NAME_WEIGHT: f64 = 0.2;
const SHORT_NAME_WEIGHT: f64 = 0.6;
const UNIFORM_CASE_NAME_WEIGHT: f64 = 0.3;
const NUMERIC_NAME_WEIGHT: f64 = 0.4;
const SUSPICIOUS_NAME_WEIGHT: f64 = 0.9;
const INCOMPLETE_PROFILE_WEIGHT: f64 = 0.5;

/// The summed sub-scores are always divided by this, independent of how many
/// checks were applicable to the profile. Kept as-is for behavioral
/// compatibility; a recalibration candidate.
const SCORE_DIVISOR: f64 = 4.0;

const FACE_CONSISTENCY_FLOOR: f64 = 0.5;
const IMAGE_QUALITY_CEILING: f64 = 0.95;
const PROFESSIONAL_PIXEL_THRESHOLD: u64 = 12_000_000;
const MIN_BIO_LENGTH: usize = 20;
const DEFAULT_IMAGE_QUALITY: f64 = 0.8;

const GENERIC_BIO_PHRASES: &[&str] = &[
    "love to travel",
    "live laugh love",
    "looking for fun",
    "here for a good time",
    "ask me anything",
    "just ask",
    "dm me",
    "new here",
    "love to laugh",
    "fun loving",
    "easy going",
    "go with the flow",
];

const BIO_LINK_PATTERNS: &[&str] = &[
    "instagram", "insta:", "snapchat", "snap:", "telegram", "whatsapp", "onlyfans", "kik:",
    "http://", "https://", "www.", ".com",
];

const BIO_PAYMENT_KEYWORDS: &[&str] = &[
    "cashapp", "cash app", "venmo", "paypal", "zelle", "bitcoin", "crypto", "sugar daddy",
    "sugar baby", "send money", "gift cards",
];

const SUSPICIOUS_NAME_KEYWORDS: &[&str] = &["fake", "test", "bot", "scam", "spam"];

const BOT_SPECIAL_CHARS: &str = "!@#$%^&*()";

/// What the moderation queue should do with a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    AllowProfile,
    FlagForReview,
    /// Declared for forward compatibility; no current rule produces it.
    AutoBlock,
}

/// A signal that contributed to the suspicion score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FakeIndicator {
    NoPhotos,
    LowPhotoCount,
    StockPhoto { index: usize },
    ProfessionalPhoto { index: usize },
    InconsistentFaces,
    SuspiciouslyHighQuality,
    EmptyBio,
    ShortBio,
    GenericBio,
    BioExternalLink,
    BioPaymentKeyword,
    ExcessiveEmoji,
    BotLikeText,
    SingleWordName,
    ShortName,
    UniformCaseName,
    NumericName,
    SuspiciousNameKeyword,
    IncompleteProfile,
}

impl fmt::Display for FakeIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FakeIndicator::NoPhotos => write!(f, "profile has no photos"),
            FakeIndicator::LowPhotoCount => write!(f, "profile has fewer than two photos"),
            FakeIndicator::StockPhoto { index } => {
                write!(f, "photo {} appears to be a stock photo", index + 1)
            }
            FakeIndicator::ProfessionalPhoto { index } => {
                write!(f, "photo {} looks professionally shot", index + 1)
            }
            FakeIndicator::InconsistentFaces => {
                write!(f, "faces are inconsistent across photos")
            }
            FakeIndicator::SuspiciouslyHighQuality => {
                write!(f, "photos are suspiciously high quality")
            }
            FakeIndicator::EmptyBio => write!(f, "bio is empty"),
            FakeIndicator::ShortBio => write!(f, "bio is very short"),
            FakeIndicator::GenericBio => write!(f, "bio is made of generic phrases"),
            FakeIndicator::BioExternalLink => write!(f, "bio links to an external handle"),
            FakeIndicator::BioPaymentKeyword => write!(f, "bio mentions a payment service"),
            FakeIndicator::ExcessiveEmoji => write!(f, "bio is mostly emoji"),
            FakeIndicator::BotLikeText => write!(f, "bio text looks bot-generated"),
            FakeIndicator::SingleWordName => write!(f, "name is a single word"),
            FakeIndicator::ShortName => write!(f, "name is too short"),
            FakeIndicator::UniformCaseName => write!(f, "name has uniform casing"),
            FakeIndicator::NumericName => write!(f, "name contains digits"),
            FakeIndicator::SuspiciousNameKeyword => {
                write!(f, "name contains a suspicious keyword")
            }
            FakeIndicator::IncompleteProfile => write!(f, "profile is largely incomplete"),
        }
    }
}

/// A single profile photo, reduced to the facts the analyzer needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub width: u32,
    pub height: u32,
}

impl PhotoSnapshot {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            id: None,
            width,
            height,
        }
    }

    /// Build a snapshot from raw image bytes via header inspection.
    pub fn from_bytes(data: &[u8]) -> Result<Self, BoxError> {
        let info = read_photo_info(data)?;
        Ok(Self {
            id: None,
            width: info.width,
            height: info.height,
        })
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Immutable view of a profile at analysis time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    #[serde(default)]
    pub photos: Vec<PhotoSnapshot>,
    #[serde(default)]
    pub bio: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Result of one analysis pass. Never mutated; callers re-run the analysis on
/// new data rather than patching a prior result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FakeProfileAnalysis {
    pub is_suspicious: bool,
    pub suspicion_score: f64,
    pub indicators: Vec<FakeIndicator>,
    pub recommendation: Recommendation,
}

/// Pluggable photo sub-checks. Implementations backed by a network or model
/// call should expect to be raced against the analyzer's timeout; returning
/// an error is always safe and counts as "not flagged".
#[async_trait]
pub trait PhotoAnalysisProvider: Send + Sync {
    async fn is_stock_photo(&self, photo: &PhotoSnapshot) -> Result<bool, BoxError>;

    async fn is_professional_photo(&self, photo: &PhotoSnapshot) -> Result<bool, BoxError>;

    /// Similarity of faces across the photo set, in [0,1]. Only consulted
    /// when the profile has two or more photos.
    async fn face_consistency(&self, photos: &[PhotoSnapshot]) -> Result<f64, BoxError>;

    /// Technical quality estimate for one photo, in [0,1].
    async fn image_quality(&self, photo: &PhotoSnapshot) -> Result<f64, BoxError>;
}

/// Neutral default checks: nothing is stock, professional means a very large
/// pixel count, faces are consistent, quality sits below the alert ceiling.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPhotoChecks;

#[async_trait]
impl PhotoAnalysisProvider for DefaultPhotoChecks {
    async fn is_stock_photo(&self, _photo: &PhotoSnapshot) -> Result<bool, BoxError> {
        Ok(false)
    }

    async fn is_professional_photo(&self, photo: &PhotoSnapshot) -> Result<bool, BoxError> {
        Ok(photo.pixel_count() > PROFESSIONAL_PIXEL_THRESHOLD)
    }

    async fn face_consistency(&self, _photos: &[PhotoSnapshot]) -> Result<f64, BoxError> {
        Ok(1.0)
    }

    async fn image_quality(&self, _photo: &PhotoSnapshot) -> Result<f64, BoxError> {
        Ok(DEFAULT_IMAGE_QUALITY)
    }
}

/// Analyzer configuration.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Normalized score at and above which a profile is suspicious
    pub suspicion_threshold: f64,
    /// Upper bound on each pluggable check call
    pub check_timeout: Duration,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            suspicion_threshold: 0.7,
            check_timeout: Duration::from_secs(5),
        }
    }
}

/// Stateless scorer over profile snapshots.
#[derive(Clone)]
pub struct FakeProfileAnalyzer {
    provider: Arc<dyn PhotoAnalysisProvider>,
    config: AnalyzerConfig,
}

impl fmt::Debug for FakeProfileAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeProfileAnalyzer")
            .field("config", &self.config)
            .finish()
    }
}

impl Default for FakeProfileAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeProfileAnalyzer {
    pub fn new() -> Self {
        Self::with_provider(Arc::new(DefaultPhotoChecks), AnalyzerConfig::default())
    }

    pub fn with_provider(provider: Arc<dyn PhotoAnalysisProvider>, config: AnalyzerConfig) -> Self {
        Self { provider, config }
    }

    /// Analyze one profile snapshot. Infallible: missing fields simply skip
    /// their checks, and provider failures are treated as neutral.
    pub async fn analyze_profile(&self, profile: &ProfileSnapshot) -> FakeProfileAnalysis {
        let mut indicators = Vec::new();

        let photo_score = self.photo_score(&profile.photos, &mut indicators).await;
        let bio_score = bio_score(&profile.bio, &mut indicators);
        let name_score = name_score(&profile.name, &mut indicators);
        let completeness_score = completeness_score(profile, &mut indicators);

        let total = photo_score + bio_score + name_score + completeness_score;
        let suspicion_score = (total / SCORE_DIVISOR).clamp(0.0, 1.0);
        let is_suspicious = suspicion_score >= self.config.suspicion_threshold;
        let recommendation = if is_suspicious {
            Recommendation::FlagForReview
        } else {
            Recommendation::AllowProfile
        };

        if is_suspicious {
            debug!(
                "Profile '{}' flagged: score {:.2}, {} indicator(s)",
                profile.name,
                suspicion_score,
                indicators.len()
            );
        }

        FakeProfileAnalysis {
            is_suspicious,
            suspicion_score,
            indicators,
            recommendation,
        }
    }

    /// Photo checks. Per-photo sub-checks fan out concurrently and rejoin in
    /// photo order so indicator messages keep their original indices.
    async fn photo_score(
        &self,
        photos: &[PhotoSnapshot],
        indicators: &mut Vec<FakeIndicator>,
    ) -> f64 {
        let mut score = 0.0;

        if photos.is_empty() {
            score += NO_PHOTOS_WEIGHT;
            indicators.push(FakeIndicator::NoPhotos);
        }
        if photos.len() <= 1 {
            score += LOW_PHOTO_COUNT_WEIGHT;
            indicators.push(FakeIndicator::LowPhotoCount);
        }
        if photos.is_empty() {
            return score;
        }

        let limit = self.config.check_timeout;
        let per_photo = join_all(photos.iter().enumerate().map(|(index, photo)| {
            let provider = Arc::clone(&self.provider);
            async move {
                let stock =
                    bounded_check(limit, "stock-photo", false, provider.is_stock_photo(photo))
                        .await;
                let professional = bounded_check(
                    limit,
                    "professional-photo",
                    false,
                    provider.is_professional_photo(photo),
                )
                .await;
                let quality = bounded_check(limit, "image-quality", None, async {
                    provider.image_quality(photo).await.map(Some)
                })
                .await;
                (index, stock, professional, quality)
            }
        }))
        .await;

        let mut quality_samples = Vec::with_capacity(photos.len());
        for (index, stock, professional, quality) in per_photo {
            if stock {
                score += STOCK_PHOTO_WEIGHT;
                indicators.push(FakeIndicator::StockPhoto { index });
            }
            if professional {
                score += PROFESSIONAL_PHOTO_WEIGHT;
                indicators.push(FakeIndicator::ProfessionalPhoto { index });
            }
            if let Some(q) = quality {
                quality_samples.push(q);
            }
        }

        if photos.len() >= 2 {
            let consistency = bounded_check(
                limit,
                "face-consistency",
                1.0,
                self.provider.face_consistency(photos),
            )
            .await;
            if consistency < FACE_CONSISTENCY_FLOOR {
                score += INCONSISTENT_FACES_WEIGHT;
                indicators.push(FakeIndicator::InconsistentFaces);
            }
        }

        if !quality_samples.is_empty() {
            let average = quality_samples.iter().sum::<f64>() / quality_samples.len() as f64;
            if average > IMAGE_QUALITY_CEILING {
                score += HIGH_QUALITY_WEIGHT;
                indicators.push(FakeIndicator::SuspiciouslyHighQuality);
            }
        }

        score
    }
}

/// Run a pluggable check with a deadline; errors and timeouts yield the
/// neutral value so the analyzer itself can never hang or fail.
async fn bounded_check<T, F>(limit: Duration, what: &str, neutral: T, check: F) -> T
where
    F: Future<Output = Result<T, BoxError>>,
{
    match timeout(limit, check).await {
        Ok(Ok(value)) => value,
        Ok(Err(e)) => {
            warn!("{} check failed, treating as not flagged: {}", what, e);
            neutral
        }
        Err(_) => {
            warn!("{} check timed out after {:?}", what, limit);
            neutral
        }
    }
}

fn bio_score(bio: &str, indicators: &mut Vec<FakeIndicator>) -> f64 {
    let bio = bio.trim();
    let mut score = 0.0;

    if bio.is_empty() {
        score += EMPTY_BIO_WEIGHT;
        indicators.push(FakeIndicator::EmptyBio);
    } else if bio.chars().count() < MIN_BIO_LENGTH {
        score += SHORT_BIO_WEIGHT;
        indicators.push(FakeIndicator::ShortBio);
    }

    let lower = bio.to_lowercase();

    let generic = GENERIC_BIO_PHRASES
        .iter()
        .filter(|phrase| lower.contains(*phrase))
        .count();
    if generic >= 3 {
        score += GENERIC_BIO_WEIGHT;
        indicators.push(FakeIndicator::GenericBio);
    }

    if BIO_LINK_PATTERNS.iter().any(|p| lower.contains(p)) {
        score += BIO_LINK_WEIGHT;
        indicators.push(FakeIndicator::BioExternalLink);
    }

    if BIO_PAYMENT_KEYWORDS.iter().any(|p| lower.contains(p)) {
        score += BIO_PAYMENT_WEIGHT;
        indicators.push(FakeIndicator::BioPaymentKeyword);
    }

    let char_count = bio.chars().count();
    if emoji_count(bio) > char_count / 2 {
        score += EXCESSIVE_EMOJI_WEIGHT;
        indicators.push(FakeIndicator::ExcessiveEmoji);
    }

    if char_count > 0 {
        let special = bio.chars().filter(|c| BOT_SPECIAL_CHARS.contains(*c)).count();
        if special as f64 / char_count as f64 > 0.3 {
            score += BOT_TEXT_WEIGHT;
            indicators.push(FakeIndicator::BotLikeText);
        }
    }

    score
}

fn name_score(name: &str, indicators: &mut Vec<FakeIndicator>) -> f64 {
    let name = name.trim();
    let mut score = 0.0;

    if !name.contains(' ') {
        score += SINGLE_WORD_NAME_WEIGHT;
        indicators.push(FakeIndicator::SingleWordName);
    }
    if name.chars().count() < 2 {
        score += SHORT_NAME_WEIGHT;
        indicators.push(FakeIndicator::ShortName);
    }
    if !name.is_empty() && (name == name.to_uppercase() || name == name.to_lowercase()) {
        score += UNIFORM_CASE_NAME_WEIGHT;
        indicators.push(FakeIndicator::UniformCaseName);
    }
    if name.chars().any(|c| c.is_ascii_digit()) {
        score += NUMERIC_NAME_WEIGHT;
        indicators.push(FakeIndicator::NumericName);
    }

    let lower = name.to_lowercase();
    for keyword in SUSPICIOUS_NAME_KEYWORDS {
        if lower.contains(keyword) {
            score += SUSPICIOUS_NAME_WEIGHT;
            indicators.push(FakeIndicator::SuspiciousNameKeyword);
            break;
        }
    }

    score
}

fn completeness_score(profile: &ProfileSnapshot, indicators: &mut Vec<FakeIndicator>) -> f64 {
    let location_missing = profile
        .location
        .as_deref()
        .map(|l| l.trim().is_empty())
        .unwrap_or(true);
    let missing = [
        profile.photos.is_empty(),
        profile.bio.trim().is_empty(),
        location_missing,
    ]
    .into_iter()
    .filter(|&m| m)
    .count();

    if missing >= 2 {
        indicators.push(FakeIndicator::IncompleteProfile);
        INCOMPLETE_PROFILE_WEIGHT
    } else {
        0.0
    }
}
