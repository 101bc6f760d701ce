mod cli;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use clap::Parser;
use corelib::{InkChannel, Order, PaperKind, Printer, Weights};
use scheduler::{EngineConfig, SchedulerEngine};

use cli::{parse_deltas, Cli, Command};

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = fs::read_to_string(path).map_err(|e| anyhow::anyhow!("reading {}: {e}", path.display()))?;
    serde_json::from_str(&raw).map_err(|e| anyhow::anyhow!("parsing {}: {e}", path.display()))
}

fn build_engine(fleet_path: &Path, weights_path: Option<&Path>) -> anyhow::Result<SchedulerEngine> {
    let fleet: Vec<Printer> = load_json(fleet_path)?;
    let weights: Option<Weights> = weights_path.map(load_json).transpose()?;
    Ok(SchedulerEngine::construct(fleet, weights, EngineConfig::from_env())?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    common::init_logger("printfleet-cli");

    let cli = Cli::parse();
    let engine = build_engine(&cli.fleet, cli.weights.as_deref())?;

    match cli.command {
        Command::Schedule { order, order_id, priority } => {
            let order: Order = load_json(&order)?;
            let result = engine.schedule_order(order, order_id, priority, None).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Command::Cancel { order_id, printer_id } => {
            let cancelled = engine.cancel_order(&order_id, printer_id.as_deref());
            println!("{{\"cancelled\": {cancelled}}}");
        }

        Command::Update { printer_id, paper, ink } => {
            let paper_delta: Option<BTreeMap<PaperKind, i64>> = if paper.is_empty() {
                None
            } else {
                Some(parse_deltas::<i64>(&paper)?.into_iter().map(|(k, v)| (PaperKind::new(k), v)).collect())
            };

            let ink_delta: Option<BTreeMap<InkChannel, f64>> = if ink.is_empty() {
                None
            } else {
                Some(parse_deltas::<f64>(&ink)?.into_iter().map(|(k, v)| (InkChannel::new(k), v)).collect())
            };

            engine.update_resources(&printer_id, paper_delta, ink_delta)?;
            let status = engine.printer_status(&printer_id)?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }

        Command::SetOnline { printer_id, online } => {
            engine.set_online(&printer_id, online)?;
            let status = engine.printer_status(&printer_id)?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }

        Command::Status { printer_id } => {
            let status = engine.printer_status(&printer_id)?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }

        Command::SystemStatus => {
            let status = engine.system_status();
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }

    Ok(())
}
