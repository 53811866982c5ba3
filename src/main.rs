//! minds-pipeline CLI
//!
//! Run with: cargo run -- analyze sources.json
//!
//! `analyze` reads a JSON array of extracted sources, runs the full
//! analyzer council, and prints a report (or the raw report JSON).
//! `graph` prints the execution layering; `health` the per-Mind health.

use anyhow::{bail, Context, Result};
use minds_pipeline::{
    print_report, ContentGenerator, ExtractedData, GeneratorConfig, HttpGenerator, MindRegistry,
    NoopGenerator, Orchestrator, PipelineOptions,
};
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 {
        match args[1].as_str() {
            "analyze" => {
                let path = args
                    .get(2)
                    .filter(|a| !a.starts_with("--"))
                    .context("Usage: minds analyze <sources.json> [flags]")?;
                let json_output = args.iter().any(|a| a == "--json");
                let session = args
                    .iter()
                    .find_map(|a| a.strip_prefix("--session="))
                    .map(str::to_string);
                let options = parse_options(&args[3..])?;
                return run_analyze(Path::new(path), options, json_output, session).await;
            }
            "graph" => return run_graph(),
            "health" => return run_health(),
            _ => {}
        }
    }

    print_usage();
    Ok(())
}

fn print_usage() {
    println!("minds-pipeline - dependency-ordered personality analysis");
    println!();
    println!("USAGE:");
    println!("  minds analyze <sources.json> [--json] [--min-quality=N] [--session=ID]");
    println!("                [--duplicate-threshold=X] [--include-low-quality] [--generator]");
    println!("  minds graph     print the dependency layering");
    println!("  minds health    print per-Mind health after initialization");
    println!();
    println!("Input: a JSON array of extracted sources, e.g.");
    println!(r#"  [{{"id":"s1","source_type":"chat","content":"..."}}]"#);
}

/// Flag parsing onto the option defaults. Unknown flags are rejected
/// so a typo never silently runs with defaults.
fn parse_options(args: &[String]) -> Result<PipelineOptions> {
    let mut options = PipelineOptions::default();
    for arg in args.iter().filter(|a| a.starts_with("--")) {
        if let Some(value) = arg.strip_prefix("--min-quality=") {
            options.min_quality_score = value
                .parse()
                .with_context(|| format!("bad --min-quality value: {value}"))?;
        } else if let Some(value) = arg.strip_prefix("--duplicate-threshold=") {
            options.duplicate_threshold = value
                .parse()
                .with_context(|| format!("bad --duplicate-threshold value: {value}"))?;
        } else if arg == "--include-low-quality" {
            options.include_low_quality = true;
        } else if arg == "--generator" {
            options.use_generator = true;
        } else if arg != "--json" && !arg.starts_with("--session=") {
            bail!("unknown flag: {arg}");
        }
    }
    Ok(options)
}

fn load_sources(path: &Path) -> Result<Vec<ExtractedData>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let sources: Vec<ExtractedData> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of sources", path.display()))?;
    Ok(sources)
}

async fn run_analyze(
    path: &Path,
    options: PipelineOptions,
    json_output: bool,
    session: Option<String>,
) -> Result<()> {
    let sources = load_sources(path)?;

    let generator: Arc<dyn ContentGenerator> = if options.use_generator {
        Arc::new(HttpGenerator::new(GeneratorConfig::default()))
    } else {
        Arc::new(NoopGenerator)
    };

    let orchestrator = Orchestrator::new(MindRegistry::with_default_minds(), options, generator)
        .map_err(|e| anyhow::anyhow!("pipeline setup failed: {e}"))?;

    let report = orchestrator
        .run_with_session(sources, session)
        .await
        .map_err(|e| anyhow::anyhow!("pipeline rejected the input: {e}"))?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.failure.is_some() {
        std::process::exit(1);
    }
    Ok(())
}

fn run_graph() -> Result<()> {
    let registry = MindRegistry::with_default_minds();
    let layers = registry
        .execution_layers()
        .map_err(|e| anyhow::anyhow!("invalid dependency graph: {e}"))?;

    println!("Execution layers (members of a layer may run concurrently):");
    for (depth, layer) in layers.iter().enumerate() {
        let names: Vec<String> = layer.iter().map(|id| id.to_string()).collect();
        println!("   {}: {}", depth, names.join(", "));
    }
    println!();
    for mind in registry.minds() {
        let deps: Vec<String> = mind.dependencies().iter().map(|d| d.to_string()).collect();
        let deps = if deps.is_empty() {
            "(none)".to_string()
        } else {
            deps.join(", ")
        };
        println!("   {:20} depends on {}", mind.id().to_string(), deps);
    }
    Ok(())
}

fn run_health() -> Result<()> {
    let orchestrator = Orchestrator::new(
        MindRegistry::with_default_minds(),
        PipelineOptions::default(),
        Arc::new(NoopGenerator),
    )
    .map_err(|e| anyhow::anyhow!("pipeline setup failed: {e}"))?;

    for health in orchestrator.health() {
        let status = if health.healthy { "healthy" } else { "unhealthy" };
        match &health.error {
            Some(error) => println!(
                "   {:20} {status}  last error: {error}",
                health.mind_id.to_string()
            ),
            None => println!("   {:20} {status}", health.mind_id.to_string()),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn flags_override_the_defaults() {
        let options = parse_options(&args(&[
            "--min-quality=55",
            "--duplicate-threshold=0.9",
            "--include-low-quality",
            "--session=run-42",
            "--json",
        ]))
        .unwrap();
        assert_eq!(options.min_quality_score, 55);
        assert_eq!(options.duplicate_threshold, 0.9);
        assert!(options.include_low_quality);
        assert!(!options.use_generator);
    }

    #[test]
    fn unknown_flags_are_rejected() {
        let err = parse_options(&args(&["--min-qualty=55"])).unwrap_err();
        assert!(err.to_string().contains("unknown flag"));
    }

    #[test]
    fn sources_load_from_a_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id":"s1","source_type":"chat","content":"hello there"}}]"#
        )
        .unwrap();

        let sources = load_sources(file.path()).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].id, "s1");
    }

    #[test]
    fn malformed_input_names_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = load_sources(file.path()).unwrap_err();
        assert!(err.to_string().contains("JSON array"));
    }
}
