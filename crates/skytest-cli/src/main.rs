//! skytest - cluster-run simulation tests
//!
//! The `skytest` command submits a drone-simulation test specification as a
//! Kubernetes job, waits for it to finish, and downloads the produced
//! simulation logs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};

use skytest_cluster::{ClusterSettings, K8sAgent};
use skytest_core::spec::TestSpec;

#[derive(Parser)]
#[command(name = "skytest")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run drone-simulation tests as cluster jobs", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a test job, wait for completion, and collect its logs
    Run {
        /// Path to the YAML test specification
        #[arg(short, long)]
        spec: PathBuf,

        /// Job identifier (a timestamp is generated when omitted)
        #[arg(long)]
        id: Option<String>,

        /// Worker replica count override
        #[arg(long)]
        count: Option<u32>,

        /// Remote output directory override
        #[arg(long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    skytest_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Run {
            spec,
            id,
            count,
            output,
        } => cmd_run(&spec, id, count, output).await,
    }
}

async fn cmd_run(
    spec_path: &PathBuf,
    id: Option<String>,
    count: Option<u32>,
    output: Option<String>,
) -> Result<()> {
    let text = std::fs::read_to_string(spec_path)
        .with_context(|| format!("Failed to read test spec {}", spec_path.display()))?;
    let mut spec: TestSpec = serde_yaml::from_str(&text)
        .with_context(|| format!("Failed to parse test spec {}", spec_path.display()))?;

    if let Some(id) = id {
        spec.agent.id = Some(id);
    }
    if let Some(count) = count {
        spec.agent.count = count;
    }
    if let Some(output) = output {
        spec.agent.path = Some(output);
    }

    let agent = K8sAgent::kubectl(ClusterSettings::from_env());
    let results = agent.run(&mut spec).await?;

    let job_id = spec.agent.id.as_deref().unwrap_or("");
    info!(job_id = %job_id, count = results.len(), "test finished");
    println!("job {job_id}: {} simulation log(s)", results.len());
    for result in &results {
        println!("  {}", result.log_file().display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_args() {
        let cli = Cli::parse_from([
            "skytest", "run", "--spec", "test.yaml", "--id", "job-9", "--count", "4",
        ]);
        match cli.command {
            Commands::Run {
                spec, id, count, ..
            } => {
                assert_eq!(spec, PathBuf::from("test.yaml"));
                assert_eq!(id.as_deref(), Some("job-9"));
                assert_eq!(count, Some(4));
            }
        }
    }

    #[test]
    fn test_spec_yaml_parses() {
        let yaml = r#"
simulation:
  simulator: gazebo
  headless: true
agent:
  engine: k8s
  count: 3
  path: /srv/skytest/jobs/demo
"#;
        let spec: TestSpec = serde_yaml::from_str(yaml).expect("parse spec");
        assert_eq!(spec.agent.count, 3);
        assert!(spec.agent.id.is_none());
    }
}
