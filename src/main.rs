mod aws;
mod cli;
mod config;
mod dashboard;
mod error;
mod model;
mod resolver;
mod ui;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use aws::{AwsSettings, GlueClient, GlueJobSource, StateMachineSource, StepFunctionsClient};
use cli::{Cli, Command};
use config::DashConfig;
use dashboard::Dashboard;

fn init_tracing(verbose: bool) {
    let default = if verbose { "gluedash=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_config(cli: &Cli) -> Result<DashConfig> {
    let mut config = match &cli.config {
        Some(path) => DashConfig::load_from(path, true)?,
        None => DashConfig::load()?,
    };
    if let Some(region) = &cli.region {
        config.region = Some(region.clone());
    }
    if let Some(prefix) = &cli.filter {
        config.filter.prefix = Some(prefix.clone());
    }
    Ok(config)
}

fn resolve_file(path: &Path, json: bool) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let jobs = resolver::extract_glue_jobs_from_str(&text)
        .with_context(|| format!("failed to resolve {}", path.display()))?;
    if json {
        ui::print_json(&jobs)?;
    } else {
        ui::print_names("Glue jobs", &jobs);
    }
    Ok(())
}

async fn run<S, G>(
    command: &Command,
    json: bool,
    config: &DashConfig,
    region: &str,
    dashboard: &Dashboard<S, G>,
) -> Result<()>
where
    S: StateMachineSource,
    G: GlueJobSource,
{
    match command {
        Command::StateMachines => {
            let rows = ui::spin("Resolving state machines...", dashboard.state_machines()).await?;
            if json {
                ui::print_json(&rows)?;
            } else {
                ui::print_state_machines(&rows);
            }
        }
        Command::Jobs => {
            let report = ui::spin("Resolving Glue jobs...", dashboard.glue_jobs()).await?;
            if json {
                ui::print_json(&report)?;
            } else {
                ui::print_jobs(&report);
            }
        }
        Command::Runs { job, limit } => {
            let limit = limit.unwrap_or(config.max_runs);
            let runs = ui::spin(
                &format!("Fetching runs of {job}..."),
                dashboard.job_runs(job, limit),
            )
            .await?;
            if json {
                ui::print_json(&runs)?;
            } else {
                ui::print_job_runs(job, &runs);
            }
        }
        Command::UsedBy { job } => {
            let machines = ui::spin(
                "Resolving state machines...",
                dashboard.state_machines_using_job(job),
            )
            .await?;
            if json {
                ui::print_json(&machines)?;
            } else {
                ui::print_names(&format!("State machines starting {job}"), &machines);
            }
        }
        Command::Describe { state_machine } => {
            let arn = config.state_machine_arn(state_machine, region)?;
            let report = ui::spin("Describing state machine...", dashboard.describe(&arn)).await?;
            if json {
                ui::print_json(&report)?;
            } else {
                ui::print_describe(&report);
            }
        }
        Command::Resolve { file } => resolve_file(file, json)?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;

    if let Command::Resolve { file } = &cli.command {
        return resolve_file(file, cli.json);
    }

    let settings = AwsSettings::load(config.region.as_deref()).await?;
    tracing::debug!(region = %settings.region, filter = %config.filter, "loaded settings");

    let timeouts = config.timeouts();
    let states = match &config.states_endpoint {
        Some(endpoint) => StepFunctionsClient::with_endpoint(&settings, timeouts, endpoint)?,
        None => StepFunctionsClient::new(&settings, timeouts)?,
    };
    let glue = match &config.glue_endpoint {
        Some(endpoint) => GlueClient::with_endpoint(&settings, timeouts, endpoint)?,
        None => GlueClient::new(&settings, timeouts)?,
    };
    let dashboard = Dashboard::new(states, glue, config.filter.clone());

    run(&cli.command, cli.json, &config, &settings.region, &dashboard).await
}
