use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use content_safety::{
    analyze_behavior, content_score, sanitize, validate_name, violations, AnalyzerConfig,
    DefaultPhotoChecks, FakeProfileAnalyzer, ProfileSnapshot, SanitizationLevel,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "content-safety",
    version = "0.1.0",
    about = "Sanitize text, check content policy, and score profiles for fake-account signals"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LevelArg {
    Basic,
    Standard,
    Strict,
}

impl From<LevelArg> for SanitizationLevel {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Basic => SanitizationLevel::Basic,
            LevelArg::Standard => SanitizationLevel::Standard,
            LevelArg::Strict => SanitizationLevel::Strict,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sanitize text (from the argument or stdin) at the given level
    Sanitize {
        text: Option<String>,

        #[arg(short, long, value_enum, default_value_t = LevelArg::Standard)]
        level: LevelArg,
    },

    /// Report policy violations and the appropriateness score for text
    Moderate {
        text: Option<String>,
    },

    /// Validate a display name against the name rule set
    ValidateName {
        name: String,
    },

    /// Score behavior counters for bot-like activity
    Behavior {
        #[arg(long, default_value = "0")]
        sent: u64,

        #[arg(long, default_value = "0")]
        received: u64,

        #[arg(long, default_value = "0")]
        matches: u64,

        /// Account age in days
        #[arg(long, default_value = "30")]
        age_days: u64,
    },

    /// Analyze a JSON array of profile snapshots for fake-profile signals
    AnalyzeProfiles {
        /// Path to the profiles JSON file
        input: PathBuf,

        /// Number of concurrent analyses
        #[arg(short, long, default_value = "10")]
        concurrency: usize,

        /// Pluggable-check timeout in seconds
        #[arg(short, long, default_value = "5")]
        timeout: u64,

        /// Print the full analyses as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct ModerationReport {
    violations: Vec<content_safety::PolicyViolation>,
    score: u32,
    appropriate: bool,
}

fn setup_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,content_safety=debug"));

    fmt()
        .with_env_filter(env_filter)
        .with_timer(fmt::time::SystemTime)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_level(true)
        .init();
}

/// Use the positional argument when given, otherwise read stdin to EOF.
fn text_or_stdin(text: Option<String>) -> Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read text from stdin")?;
            Ok(buffer)
        }
    }
}

async fn analyze_profiles(
    input: PathBuf,
    concurrency: usize,
    timeout: Duration,
    json: bool,
) -> Result<()> {
    let raw = std::fs::read_to_string(&input)
        .with_context(|| format!("Failed to read profiles from {:?}", input))?;
    let profiles: Vec<ProfileSnapshot> =
        serde_json::from_str(&raw).context("Profiles file is not a JSON array of snapshots")?;

    info!("Analyzing {} profiles from {:?}", profiles.len(), input);

    if profiles.is_empty() {
        info!("No profiles to analyze");
        return Ok(());
    }

    let analyzer = FakeProfileAnalyzer::with_provider(
        Arc::new(DefaultPhotoChecks),
        AnalyzerConfig {
            check_timeout: timeout,
            ..AnalyzerConfig::default()
        },
    );

    let progress_bar = ProgressBar::new(profiles.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template(
                "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} profiles ({percent}%) ({eta})",
            )?
            .progress_chars("#>-"),
    );

    let mut flagged_count = 0u64;
    let mut results = Vec::with_capacity(profiles.len());

    // Process profiles in batches
    let chunks: Vec<Vec<ProfileSnapshot>> = profiles
        .chunks(concurrency.max(1))
        .map(|chunk| chunk.to_vec())
        .collect();

    for chunk in chunks {
        let mut handles = vec![];

        for profile in chunk {
            let analyzer = analyzer.clone();
            handles.push(tokio::spawn(async move {
                let analysis = analyzer.analyze_profile(&profile).await;
                (profile, analysis)
            }));
        }

        for handle in handles {
            let (profile, analysis) = handle
                .await
                .context("Analysis task panicked")?;
            progress_bar.inc(1);
            if analysis.is_suspicious {
                flagged_count += 1;
                progress_bar.println(format!(
                    "⚠ {} scored {:.2}: {}",
                    profile.name,
                    analysis.suspicion_score,
                    analysis
                        .indicators
                        .iter()
                        .map(|i| i.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                ));
            }
            results.push(analysis);
        }
    }

    progress_bar.finish_with_message("Analysis complete");

    info!(
        "Analyzed {} profiles: {} allowed, {} flagged for review",
        results.len(),
        results.len() as u64 - flagged_count,
        flagged_count
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    setup_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Sanitize { text, level } => {
            let text = text_or_stdin(text)?;
            println!("{}", sanitize(&text, level.into()));
        }
        Command::Moderate { text } => {
            let text = text_or_stdin(text)?;
            let found = violations(&text);
            let report = ModerationReport {
                appropriate: found.is_empty(),
                score: content_score(&text),
                violations: found,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::ValidateName { name } => {
            let result = validate_name(&name);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Behavior {
            sent,
            received,
            matches,
            age_days,
        } => {
            let age = Duration::from_secs(age_days * 24 * 60 * 60);
            let analysis = analyze_behavior(sent, received, matches, age);
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        }
        Command::AnalyzeProfiles {
            input,
            concurrency,
            timeout,
            json,
        } => {
            analyze_profiles(input, concurrency, Duration::from_secs(timeout), json).await?;
        }
    }

    Ok(())
}
