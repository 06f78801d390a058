use crate::args::{Args, Subcommand, parse_args};
use crate::error::{CliError, CliResult};
use bitcoin::{BlockHash, OutPoint};
use env_logger::Env;
use log::{debug, error, info, warn};
use ordtrace_core::{Interval, Params, SubsidySchedule};
use ordtrace_node::{DynNodeClient, NodeClient, NodeConfig};
use ordtrace_track::{ProvenanceTracker, TrackSession};
use serde::Serialize;
use std::process;
use triggered::Listener;

mod args;
mod error;

fn main() {
    let args = parse_args();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.loglevel.as_str())).init();
    if let Err(err) = run(args) {
        error!("{}", err);
        process::exit(1);
    }
}

fn run(args: Args) -> CliResult<()> {
    let params = Params::from(args.network);
    debug!("connecting to {}", args.node.describe());
    let client = args.node.connect()?;

    let (trigger, shutdown) = triggered::trigger();
    ctrlc::set_handler(move || {
        warn!("interrupt received, aborting");
        trigger.trigger();
    })?;

    match args.command {
        Subcommand::Trace { outpoint, range } => trace(client, &params, shutdown, outpoint, range),
        Subcommand::Audit { from, to } => audit(client, &params, &shutdown, from, to),
        Subcommand::Status => status(client, &args.node),
    }
}

fn trace(
    client: DynNodeClient,
    params: &Params,
    shutdown: Listener,
    outpoint: OutPoint,
    range: Option<Interval>,
) -> CliResult<()> {
    let tracker = ProvenanceTracker::new(client, params).with_shutdown(shutdown);
    let mut session = TrackSession::seed(outpoint, range);
    if let Err(err) = tracker.run(&mut session) {
        let progress = session.progress();
        warn!(
            "aborted with {} of {} satoshis resolved, {} items pending",
            progress.resolved,
            progress.target.map(|target| target.to_string()).unwrap_or_else(|| "?".to_owned()),
            progress.pending_items
        );
        return Err(err.into());
    }
    println!("{}", serde_json::to_string_pretty(session.segments())?);
    Ok(())
}

/// Walks a window of blocks and checks that the transaction each block lists
/// first is structurally a coinbase, reporting its reward against the
/// scheduled subsidy along the way.
fn audit(client: DynNodeClient, params: &Params, shutdown: &Listener, from: u64, to: u64) -> CliResult<()> {
    let schedule = SubsidySchedule::new(params);
    let mut mismatches = 0u64;
    for height in from..=to {
        if shutdown.is_triggered() {
            return Err(CliError::Interrupted);
        }
        let hash = client.get_block_hash(height)?;
        let block = client.get_block(&hash)?;
        let Some(txid) = block.coinbase_txid().copied() else {
            warn!("block {} at height {} lists no transactions", hash, height);
            mismatches += 1;
            continue;
        };
        let tx = client.get_transaction(&txid)?;
        if !tx.is_coin_base() {
            warn!("first transaction {} at height {} is not structurally a coinbase", txid, height);
            mismatches += 1;
            continue;
        }
        let reward: u64 = tx.output.iter().map(|output| output.value).sum();
        let subsidy = schedule.subsidy(height);
        debug!("height {}: coinbase {} claims {} satoshis, {} of them fees", height, txid, reward, reward.saturating_sub(subsidy));
        if reward < subsidy {
            info!("height {}: coinbase claims {} satoshis, below the {} subsidy", height, reward, subsidy);
        }
    }
    let blocks = to - from + 1;
    if mismatches > 0 {
        return Err(CliError::AuditFailed { blocks, mismatches });
    }
    info!("audited {} blocks, every coinbase structurally sound", blocks);
    Ok(())
}

#[derive(Serialize)]
struct StatusReport {
    backend: String,
    tip_height: u64,
    tip_hash: BlockHash,
}

fn status(client: DynNodeClient, node: &NodeConfig) -> CliResult<()> {
    let tip_height = client.get_block_count()?;
    let tip_hash = client.get_block_hash(tip_height)?;
    let report = StatusReport { backend: node.describe(), tip_height, tip_hash };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
