mod config;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use feed_model::{ContentItem, FeedItem, InteractionState, KeywordFilter, SourceType, Snapshot};
use generator::{FeedGenerator, resolve_interaction_states};
use pipeline::{FilterEngine, FilterRule};
use pipeline::filters::{DurationRule, KeywordRule, SourceTypeRule};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// feedgen - Personalized feed generator
#[derive(Parser)]
#[command(name = "feedgen")]
#[command(about = "Build personalized content feeds from a subscription snapshot", long_about = None)]
struct Cli {
    /// Path to the snapshot directory (sources.json, content.json, interactions.json)
    #[arg(short, long, default_value = "data/snapshot")]
    data_dir: PathBuf,

    /// TOML file with feed preferences (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a feed
    Generate {
        /// Number of feed items to print
        #[arg(long, default_value = "50")]
        limit: usize,

        /// Show source, age and interaction state for each item
        #[arg(long)]
        explain: bool,

        /// Seed the random source for a reproducible feed
        #[arg(long)]
        seed: Option<u64>,

        /// Print the feed as JSON instead of a list
        #[arg(long)]
        json: bool,

        /// Also apply the duration, keyword and source-type rules from the preferences
        #[arg(long)]
        apply_rules: bool,
    },

    /// Show which items a set of rules would filter, and why
    Filter {
        /// Keyword to mute (repeatable)
        #[arg(long = "keyword")]
        keywords: Vec<String>,

        /// Treat keywords as substring patterns (`*` is stripped)
        #[arg(long)]
        wildcard: bool,

        /// Match keywords case-sensitively
        #[arg(long)]
        case_sensitive: bool,

        /// Filter items shorter than this many seconds
        #[arg(long)]
        min_duration: Option<u32>,

        /// Filter items longer than this many seconds
        #[arg(long)]
        max_duration: Option<u32>,

        /// Allowed source type (repeatable); all types allowed when omitted
        #[arg(long = "allow-type")]
        allow_types: Vec<SourceType>,
    },

    /// List subscribed sources with item counts
    Sources,

    /// Run benchmark to test performance
    Benchmark {
        /// Number of feeds to generate
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent generations
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let preferences = config::load_preferences(cli.config.as_deref())?;

    let start = Instant::now();
    let snapshot = Arc::new(
        Snapshot::load_from_dir(&cli.data_dir)
            .with_context(|| format!("Failed to load snapshot from {}", cli.data_dir.display()))?,
    );
    eprintln!("{} Loaded snapshot in {:?}", "✓".green(), start.elapsed());

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Generate {
            limit,
            explain,
            seed,
            json,
            apply_rules,
        } => handle_generate(&snapshot, &preferences, limit, explain, seed, json, apply_rules)?,
        Commands::Filter {
            keywords,
            wildcard,
            case_sensitive,
            min_duration,
            max_duration,
            allow_types,
        } => {
            let filters: Vec<KeywordFilter> = keywords
                .into_iter()
                .map(|keyword| KeywordFilter {
                    keyword,
                    wildcard,
                    case_sensitive,
                })
                .collect();
            let engine = build_engine(&filters, min_duration, max_duration, &allow_types)?;
            handle_filter(&snapshot, &engine);
        }
        Commands::Sources => handle_sources(&snapshot),
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(snapshot, preferences, requests, concurrent).await?,
    }

    Ok(())
}

/// Handle the 'generate' command
fn handle_generate(
    snapshot: &Snapshot,
    preferences: &feed_model::FeedPreferences,
    limit: usize,
    explain: bool,
    seed: Option<u64>,
    json: bool,
    apply_rules: bool,
) -> Result<()> {
    let generator = build_generator(preferences, apply_rules)?;

    let mut feed = match seed {
        Some(seed) => generator.generate_with(
            &snapshot.sources,
            &snapshot.content,
            preferences,
            &snapshot.interactions,
            Utc::now(),
            &mut StdRng::seed_from_u64(seed),
        ),
        None => generator.generate(
            &snapshot.sources,
            &snapshot.content,
            preferences,
            &snapshot.interactions,
        ),
    };
    resolve_interaction_states(&mut feed, &snapshot.interaction_index());
    feed.truncate(limit);

    if json {
        println!("{}", serde_json::to_string_pretty(&feed)?);
    } else {
        print_feed(&feed, explain);
    }
    Ok(())
}

/// The generator used by both `generate` and `benchmark`
fn build_generator(preferences: &feed_model::FeedPreferences, apply_rules: bool) -> Result<FeedGenerator> {
    let mut generator = FeedGenerator::new().skip_muted_sources();
    if apply_rules {
        let engine = FilterEngine::from_preferences(preferences)
            .context("Failed to build rules from preferences")?;
        generator = generator.with_filter_engine(engine);
    }
    Ok(generator)
}

/// Build a FilterEngine from command-line rule options
fn build_engine(
    keywords: &[KeywordFilter],
    min_duration: Option<u32>,
    max_duration: Option<u32>,
    allow_types: &[SourceType],
) -> Result<FilterEngine> {
    let mut engine = FilterEngine::new();

    let duration = DurationRule::new(min_duration, max_duration);
    if !duration.is_unbounded() {
        engine = engine.add_rule(duration);
    }

    for filter in keywords {
        let rule = KeywordRule::from_filter(filter)
            .with_context(|| format!("Invalid keyword '{}'", filter.keyword))?;
        engine = engine.add_rule(rule);
    }

    if !allow_types.is_empty() {
        engine = engine.add_rule(SourceTypeRule::new(allow_types.iter().copied()));
    }

    Ok(engine)
}

/// Handle the 'filter' command
fn handle_filter(snapshot: &Snapshot, engine: &FilterEngine) {
    if engine.is_empty() {
        println!("{}", "No rules given, nothing would be filtered.".yellow());
        return;
    }

    println!(
        "{}",
        format!("Evaluating {} items against {} rules:", snapshot.content.len(), engine.len())
            .bold()
            .blue()
    );

    let mut filtered = 0;
    for item in &snapshot.content {
        let result = engine.evaluate(item);
        if !result.is_filtered {
            continue;
        }
        filtered += 1;
        println!("{} {}", "✗".red(), item.title);
        for (rule, reason) in result.matched_rules.iter().zip(&result.reasons) {
            println!("    {} {}", format!("[{}]", rule.name()).dimmed(), reason);
        }
    }

    println!(
        "\n{} filtered, {} kept",
        filtered.to_string().red(),
        (snapshot.content.len() - filtered).to_string().green()
    );
}

/// Handle the 'sources' command
fn handle_sources(snapshot: &Snapshot) {
    let mut counts: HashMap<(&str, SourceType), usize> = HashMap::new();
    for item in &snapshot.content {
        *counts.entry((item.source_id.as_str(), item.source_type)).or_insert(0) += 1;
    }

    println!("{}", "Subscribed sources:".bold().blue());
    for source in &snapshot.sources {
        let count = counts
            .get(&(source.source_id.as_str(), source.source_type))
            .copied()
            .unwrap_or(0);
        let muted = if source.is_muted { " (muted)".yellow().to_string() } else { String::new() };
        println!(
            "{}{} [{}] {} items{}",
            "• ".green(),
            source.display_name,
            source.source_type,
            count,
            muted
        );
    }
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    snapshot: Arc<Snapshot>,
    preferences: feed_model::FeedPreferences,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    let generator = Arc::new(build_generator(&preferences, false)?);
    let preferences = Arc::new(preferences);
    let limiter = Arc::new(tokio::sync::Semaphore::new(concurrent.max(1)));

    let wall_clock = Instant::now();

    // Generation is CPU-bound, so each request runs on the blocking pool
    let mut handles = vec![];
    for _ in 0..requests {
        let permit = limiter.clone().acquire_owned().await?;
        let generator = generator.clone();
        let snapshot = snapshot.clone();
        let preferences = preferences.clone();
        let handle = tokio::task::spawn_blocking(move || {
            let start = Instant::now();
            let feed = generator.generate(
                &snapshot.sources,
                &snapshot.content,
                &preferences,
                &snapshot.interactions,
            );
            drop(permit);
            (start.elapsed(), feed.len())
        });
        handles.push(handle);
    }

    let mut timings: Vec<Duration> = vec![];
    let mut total_items = 0;
    for handle in handles {
        let (elapsed, items) = handle.await?;
        timings.push(elapsed);
        total_items += items;
    }
    let total_time = wall_clock.elapsed();

    if timings.is_empty() {
        println!("No requests made.");
        return Ok(());
    }

    let busy_time: Duration = timings.iter().sum();
    let avg_latency = busy_time / (timings.len() as u32);
    timings.sort();
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f32 / total_time.as_secs_f32();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} feeds/second", throughput);
    println!("Average feed length: {:.1}", total_items as f32 / requests as f32);

    Ok(())
}

/// Helper function to format and print a feed
fn print_feed(feed: &[FeedItem], explain: bool) {
    println!("{}", "Your feed:".bold().blue());
    if feed.is_empty() {
        println!("{}", "Nothing new. Check back later.".yellow());
        return;
    }

    let now = Utc::now();
    for entry in feed {
        let badge = if entry.is_new { " NEW".green().bold().to_string() } else { String::new() };
        println!(
            "{}. {}{} - {}",
            (entry.position + 1).to_string().green(),
            entry.content.title,
            badge,
            entry.source_display_name.cyan()
        );
        if explain {
            println!("   {}", describe(&entry.content, now));
            if let Some(state) = &entry.interaction_state {
                println!("   State: {}", describe_state(state));
            }
        }
    }
}

fn describe(item: &ContentItem, now: chrono::DateTime<Utc>) -> String {
    let age_days = now.signed_duration_since(item.published_at).num_days();
    let duration = item
        .duration
        .map(|secs| format!("{}:{:02}", secs / 60, secs % 60))
        .unwrap_or_else(|| "?".to_string());
    format!(
        "{} | published {} days ago | length {} | {}",
        item.source_type, age_days, duration, item.url
    )
}

fn describe_state(state: &InteractionState) -> String {
    match state {
        InteractionState::NeverSeen => "never seen".to_string(),
        InteractionState::DismissedTemp { will_return_at } => {
            format!("deferred until {}", will_return_at.format("%Y-%m-%d %H:%M"))
        }
        InteractionState::Saved { collection } => match collection {
            Some(name) => format!("saved to {}", name),
            None => "saved".to_string(),
        },
        InteractionState::Watched { at } => format!("watched {}", at.format("%Y-%m-%d")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feed_model::{ContentSource, FeedPreferences};

    fn snapshot() -> Snapshot {
        let sources = vec![
            ContentSource {
                source_id: "open".to_string(),
                source_type: SourceType::Rss,
                display_name: "Open".to_string(),
                is_muted: false,
            },
            ContentSource {
                source_id: "hush".to_string(),
                source_type: SourceType::Rss,
                display_name: "Hush".to_string(),
                is_muted: true,
            },
        ];
        let content = (0..10)
            .map(|i| {
                let source = if i % 2 == 0 { "open" } else { "hush" };
                ContentItem::new(format!("c{}", i), format!("Post {}", i), source, SourceType::Rss, Utc::now())
            })
            .collect();
        Snapshot {
            sources,
            content,
            interactions: vec![],
        }
    }

    #[test]
    fn test_generator_skips_muted_sources_with_and_without_rules() {
        let snapshot = snapshot();
        let preferences = FeedPreferences::default();

        for apply_rules in [false, true] {
            let generator = build_generator(&preferences, apply_rules).unwrap();
            let feed = generator.generate(
                &snapshot.sources,
                &snapshot.content,
                &preferences,
                &snapshot.interactions,
            );
            assert!(!feed.is_empty());
            assert!(feed.iter().all(|entry| entry.content.source_id == "open"));
        }
    }
}
