use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use care_guides::{FuzzyGuideMatcher, GuideSource};
use care_labels::{resolve_conflicts, ConflictGroup, LabelCanonicalizer, VisionOwned};
use care_rules::RuleStore;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "care")]
#[command(about = "Garment-care text analysis over OCR tokens, labels, and guide documents", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Override the rule-source document path
    #[arg(long, global = true)]
    rules: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Match OCR tokens against the compiled care-rule table
    Analyze(AnalyzeArgs),

    /// Canonicalize classifier labels and resolve contradictions
    Labels(LabelsArgs),

    /// Fuzzy-match a stain or material query against a guide document
    Guide(GuideArgs),

    /// Report rule-source candidates and the loaded rule count
    #[command(name = "rules-snapshot")]
    RulesSnapshot,
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Raw recognized-text tokens
    #[arg(required = true)]
    tokens: Vec<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct LabelsArgs {
    /// Labels as `label` or `label:confidence` (confidence defaults to 1.0)
    #[arg(required = true)]
    labels: Vec<String>,

    /// Codes the visual classifier owns; text-derived duplicates are dropped
    #[arg(long, value_delimiter = ',')]
    vision_owned: Vec<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct GuideArgs {
    /// Free-text stain or material query
    query: String,

    /// Path to the guide document (JSON, any supported shape)
    #[arg(long)]
    file: PathBuf,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Serialize)]
struct LabelsOutput {
    codes: Vec<String>,
    dropped_as_vision_owned: Vec<String>,
}

#[derive(Serialize)]
struct GuideOutput<T: Serialize> {
    query: String,
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    guide: Option<T>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let store = match &cli.rules {
        Some(path) => RuleStore::from_candidates(vec![path.clone()]),
        None => RuleStore::load(),
    };

    match cli.command {
        Commands::Analyze(args) => run_analyze(args, &store),
        Commands::Labels(args) => run_labels(args),
        Commands::Guide(args) => run_guide(args),
        Commands::RulesSnapshot => run_snapshot(&store),
    }
}

fn run_analyze(args: AnalyzeArgs, store: &RuleStore) -> Result<()> {
    let hits = store.table().analyze(&args.tokens);
    print_json(&hits, args.pretty)
}

fn run_labels(args: LabelsArgs) -> Result<()> {
    let scored: Vec<(String, f32)> = args
        .labels
        .iter()
        .map(|raw| parse_label(raw))
        .collect::<Result<_>>()?;

    let canonicalizer = LabelCanonicalizer::with_default_vocabulary();
    let mut canonical: Vec<(String, f32)> = Vec::new();
    for (label, confidence) in &scored {
        if let Some(code) = canonicalizer.canonicalize(label) {
            if !canonical.iter().any(|(have, _)| have.as_str() == code) {
                canonical.push((code.to_string(), *confidence));
            }
        }
    }

    let groups: Vec<ConflictGroup> = care_labels::default_conflict_groups();
    let resolved = resolve_conflicts(&canonical, &groups);

    let owned_refs: Vec<&str> = args.vision_owned.iter().map(String::as_str).collect();
    let owned = VisionOwned::new(&owned_refs);
    let codes: Vec<String> = resolved.iter().map(|(code, _)| code.clone()).collect();
    let kept = owned.filter(&codes);
    let dropped: Vec<String> = codes
        .iter()
        .filter(|code| !kept.contains(*code))
        .cloned()
        .collect();

    print_json(
        &LabelsOutput {
            codes: kept,
            dropped_as_vision_owned: dropped,
        },
        args.pretty,
    )
}

fn run_guide(args: GuideArgs) -> Result<()> {
    let json = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read guide document {}", args.file.display()))?;
    let source = GuideSource::from_json_str(&json)
        .with_context(|| format!("guide document {} is not valid JSON", args.file.display()))?;

    let matcher = FuzzyGuideMatcher::new();
    let guide = matcher.find(&args.query, &source);
    let found = guide.is_some();
    print_json(
        &GuideOutput {
            query: args.query,
            found,
            guide,
        },
        args.pretty,
    )
}

fn run_snapshot(store: &RuleStore) -> Result<()> {
    print_json(&store.snapshot(), true)
}

fn parse_label(raw: &str) -> Result<(String, f32)> {
    match raw.rsplit_once(':') {
        Some((label, confidence)) if !label.is_empty() => {
            let parsed: f32 = confidence
                .parse()
                .with_context(|| format!("invalid confidence in {raw:?}"))?;
            Ok((label.to_string(), parsed))
        }
        _ => Ok((raw.to_string(), 1.0)),
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{output}");
    Ok(())
}
