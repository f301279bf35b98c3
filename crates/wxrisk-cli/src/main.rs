//! wxrisk - flight weather risk assessment CLI
//!
//! ## Commands
//!
//! - `assess`: score one `RiskInputs` JSON document
//! - `batch`: score many documents concurrently, one NDJSON line each
//! - `policy`: print the effective engine configuration as TOML

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, Level};

use wxrisk_core::{
    aggregate_with_config, assess, AssessmentStatus, EngineConfig, RiskInputs, RiskProfile,
    RiskTier,
};

#[derive(Parser)]
#[command(name = "wxrisk")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Flight weather risk assessment", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Engine policy file (TOML); defaults apply when omitted
    #[arg(long, global = true, env = "WXRISK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess one RiskInputs JSON document
    Assess {
        /// Path to the inputs file
        file: PathBuf,

        /// Override the document's risk profile
        #[arg(short, long)]
        profile: Option<RiskProfile>,

        /// Include messaging and digest in the output
        #[arg(long)]
        messaging: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Assess many documents concurrently, printing one JSON line per file
    Batch {
        /// Paths to inputs files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Override every document's risk profile
        #[arg(short, long)]
        profile: Option<RiskProfile>,
    },

    /// Print the effective engine configuration
    Policy,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    wxrisk_core::init_tracing(cli.json, level);
    debug!(version = wxrisk_core::VERSION, "wxrisk starting");

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Assess {
            file,
            profile,
            messaging,
            pretty,
        } => {
            let output = cmd_assess(&config, &file, profile, messaging, pretty)?;
            println!("{}", output);
            Ok(())
        }
        Commands::Batch { files, profile } => {
            let records = cmd_batch(Arc::new(config), files, profile).await;
            for record in &records {
                println!("{}", serde_json::to_string(record)?);
            }
            let failed = records.iter().filter(|r| r.is_failure()).count();
            if failed > 0 {
                anyhow::bail!("{} of {} assessments failed", failed, records.len());
            }
            Ok(())
        }
        Commands::Policy => {
            print!("{}", cmd_policy(&config)?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config: {:?}", path)),
        None => Ok(EngineConfig::default()),
    }
}

fn read_inputs(path: &Path, profile: Option<RiskProfile>) -> Result<RiskInputs> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read inputs file: {:?}", path))?;
    let mut inputs: RiskInputs =
        serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {:?}", path))?;
    if let Some(profile) = profile {
        inputs.risk_profile = profile;
    }
    Ok(inputs)
}

fn cmd_assess(
    config: &EngineConfig,
    file: &Path,
    profile: Option<RiskProfile>,
    messaging: bool,
    pretty: bool,
) -> Result<String> {
    let inputs = read_inputs(file, profile)?;
    let rendered = if messaging {
        let assessment = assess(&inputs, config).context("Assessment failed")?;
        to_json(&assessment, pretty)?
    } else {
        to_json(&aggregate_with_config(&inputs, config), pretty)?
    };
    Ok(rendered)
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(rendered)
}

/// One NDJSON line of `wxrisk batch` output.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum BatchRecord {
    #[serde(rename_all = "camelCase")]
    Assessed {
        file: String,
        overall_score: u8,
        tier: RiskTier,
        status: AssessmentStatus,
        digest: String,
    },
    Failed {
        file: String,
        error: String,
    },
}

impl BatchRecord {
    fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

fn assess_file(config: &EngineConfig, path: &Path, profile: Option<RiskProfile>) -> BatchRecord {
    let file = path.display().to_string();
    let outcome = read_inputs(path, profile)
        .and_then(|inputs| assess(&inputs, config).context("Assessment failed"));
    match outcome {
        Ok(assessment) => BatchRecord::Assessed {
            file,
            overall_score: assessment.result.overall_score,
            tier: assessment.result.tier,
            status: assessment.result.status,
            digest: assessment.digest,
        },
        Err(err) => BatchRecord::Failed {
            file,
            error: format!("{:#}", err),
        },
    }
}

/// Assess every file on the blocking pool; records keep argument order.
async fn cmd_batch(
    config: Arc<EngineConfig>,
    files: Vec<PathBuf>,
    profile: Option<RiskProfile>,
) -> Vec<BatchRecord> {
    let handles: Vec<_> = files
        .into_iter()
        .map(|path| {
            let config = Arc::clone(&config);
            let label = path.display().to_string();
            let handle =
                tokio::task::spawn_blocking(move || assess_file(&config, &path, profile));
            (label, handle)
        })
        .collect();

    let mut records = Vec::with_capacity(handles.len());
    for (file, handle) in handles {
        let record = match handle.await {
            Ok(record) => record,
            Err(err) => BatchRecord::Failed {
                file,
                error: format!("assessment task failed: {}", err),
            },
        };
        records.push(record);
    }
    records
}

fn cmd_policy(config: &EngineConfig) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to render config as TOML")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const LOW_CEILING: &str = r#"{
        "now": "2026-01-15T18:00:00Z",
        "metar": {
            "station": "KSEA",
            "rawText": "KSEA 151753Z 18008KT 2SM BR OVC004 07/06 A2998",
            "wind": { "directionDeg": 180, "speedKt": 8 },
            "visibilitySm": 2,
            "clouds": [ { "code": "OVC", "baseFtAgl": 400 } ]
        }
    }"#;

    fn write_inputs(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_cli_parses_assess_flags() {
        let cli = Cli::try_parse_from([
            "wxrisk",
            "--verbose",
            "assess",
            "inputs.json",
            "--profile",
            "conservative",
            "--messaging",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Assess {
                file,
                profile,
                messaging,
                pretty,
            } => {
                assert_eq!(file, PathBuf::from("inputs.json"));
                assert_eq!(profile, Some(RiskProfile::Conservative));
                assert!(messaging);
                assert!(!pretty);
            }
            _ => panic!("expected assess"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_profile() {
        let result = Cli::try_parse_from(["wxrisk", "assess", "x.json", "--profile", "reckless"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_batch_requires_files() {
        assert!(Cli::try_parse_from(["wxrisk", "batch"]).is_err());
        assert!(Cli::try_parse_from(["wxrisk", "batch", "a.json", "b.json"]).is_ok());
    }

    #[test]
    fn test_cmd_assess_outputs_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_inputs(dir.path(), "ksea.json", LOW_CEILING);

        let output = cmd_assess(&EngineConfig::default(), &path, None, false, false).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["overallScore"], 100);
        assert_eq!(value["tier"], "high_disruption");
        assert_eq!(value["status"], "ok");
        assert_eq!(value["riskProfile"], "standard");
        assert_eq!(value["factorBreakdown"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn test_cmd_assess_with_messaging_and_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_inputs(dir.path(), "ksea.json", LOW_CEILING);

        let output = cmd_assess(
            &EngineConfig::default(),
            &path,
            Some(RiskProfile::Aggressive),
            true,
            true,
        )
        .unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["result"]["riskProfile"], "aggressive");
        assert_eq!(value["digest"].as_str().unwrap().len(), 64);
        assert!(value["messaging"]["plainTextSummary"]
            .as_str()
            .unwrap()
            .starts_with("Ceiling Clouds"));
    }

    #[test]
    fn test_cmd_assess_reports_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_inputs(dir.path(), "broken.json", "{ not json");
        let err = cmd_assess(&EngineConfig::default(), &path, None, false, false).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON"));
    }

    #[tokio::test]
    async fn test_cmd_batch_keeps_argument_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_inputs(dir.path(), "a.json", LOW_CEILING);
        let missing = dir.path().join("missing.json");
        let empty = write_inputs(dir.path(), "c.json", r#"{ "now": "2026-01-15T18:00:00Z" }"#);

        let records = cmd_batch(
            Arc::new(EngineConfig::default()),
            vec![first.clone(), missing.clone(), empty.clone()],
            None,
        )
        .await;

        assert_eq!(records.len(), 3);
        let lines: Vec<Value> = records
            .iter()
            .map(|r| serde_json::to_value(r).unwrap())
            .collect();
        assert_eq!(lines[0]["file"], first.display().to_string());
        assert_eq!(lines[0]["tier"], "high_disruption");
        assert_eq!(lines[1]["file"], missing.display().to_string());
        assert!(lines[1]["error"]
            .as_str()
            .unwrap()
            .contains("Failed to read inputs file"));
        assert_eq!(lines[2]["status"], "insufficient_data");
        assert_eq!(lines[2]["overallScore"], 0);
        assert_eq!(records.iter().filter(|r| r.is_failure()).count(), 1);
    }

    #[test]
    fn test_cmd_policy_round_trips() {
        let rendered = cmd_policy(&EngineConfig::default()).unwrap();
        assert!(rendered.contains("secondary_weight"));
        let parsed = EngineConfig::from_toml_str(&rendered).unwrap();
        assert_eq!(parsed, EngineConfig::default());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wxrisk.toml");
        std::fs::write(&path, "[aggregation]\nsecondary_weight = 0.5\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.aggregation.secondary_weight, 0.5);
        assert_eq!(load_config(None).unwrap(), EngineConfig::default());
    }
}
