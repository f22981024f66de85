use anyhow::{Context, Result};
use clap::Parser;
use graphlens_app::{GraphSession, Notice, ViewerSettings};
use graphlens_core::{GroupBy, LayoutMode, NodeId};
use graphlens_events::Event;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Validate a graph document and print the frame a renderer would draw.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Graph JSON to import. Reads stdin when neither this nor --sample is given
    #[arg(short, long, conflicts_with = "sample")]
    file: Option<PathBuf>,

    /// Load the sample graph (bundled, or `sample_path` from the config)
    #[arg(long)]
    sample: bool,

    /// Viewer settings JSON
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Case-insensitive search over id, label and type
    #[arg(short, long)]
    search: Option<String>,

    /// Hide a node type (repeatable)
    #[arg(long, value_name = "TYPE")]
    hide: Vec<String>,

    /// none, type or group
    #[arg(long, default_value_t = GroupBy::default())]
    group_by: GroupBy,

    /// cose, concentric, grid or circle
    #[arg(long, default_value_t = LayoutMode::default())]
    layout: LayoutMode,

    /// Mark a node as selected
    #[arg(long, value_name = "ID")]
    select: Option<String>,

    /// Print graph statistics instead of the render frame
    #[arg(long)]
    stats: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

/// Rejections are reported on stderr by `run`; the session's own warning for
/// them would repeat it.
const DEFAULT_LOG_FILTER: &str = "warn,graphlens_app=error";

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let imported = run(args, io::stdin().lock(), io::stdout().lock(), io::stderr().lock())?;
    Ok(if imported {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Import, apply the view flags and write JSON to `out`. Returns `false` when
/// the import was rejected; every violation has then been written to `err`.
fn run(
    args: Args,
    mut input: impl Read,
    mut out: impl Write,
    mut err: impl Write,
) -> Result<bool> {
    let settings = match &args.config {
        Some(path) => ViewerSettings::load(path)?,
        None => ViewerSettings::default(),
    };
    let mut session = GraphSession::new(settings);

    if args.sample {
        session.load_configured_sample();
    } else if let Some(path) = &args.file {
        let (_, reader) = session.import_file(path);
        reader
            .join()
            .map_err(|_| anyhow::anyhow!("graph reader thread panicked"))?;
    } else {
        let mut text = String::new();
        input
            .read_to_string(&mut text)
            .context("failed to read graph JSON from stdin")?;
        session.import_text(&text);
    }
    session.pump();

    let failures: Vec<Notice> = session
        .take_notices()
        .into_iter()
        .filter(Notice::is_error)
        .collect();
    if !failures.is_empty() {
        for notice in &failures {
            writeln!(err, "error: {}", notice.message())?;
            if let Notice::Error { details, .. } = notice {
                for line in details {
                    writeln!(err, "  - {line}")?;
                }
            }
        }
        return Ok(false);
    }

    for node_type in &args.hide {
        if !session.store().filters().is_known(node_type) {
            tracing::warn!(node_type = %node_type, "no nodes of this type");
        }
        session.publish(Event::SetFilter {
            node_type: node_type.clone(),
            visible: false,
        });
    }
    session.publish(Event::SetGroupBy(args.group_by));
    session.publish(Event::SetLayout(args.layout));
    if let Some(term) = args.search {
        session.publish(Event::SetSearchTerm(term));
    }
    if let Some(id) = args.select {
        session.publish(Event::SelectNode(Some(NodeId::new(id))));
    }
    session.pump();

    let output = if args.stats {
        serde_json::to_value(session.store().stats())?
    } else {
        serde_json::to_value(session.render())?
    };
    if args.pretty {
        serde_json::to_writer_pretty(&mut out, &output)?;
    } else {
        serde_json::to_writer(&mut out, &output)?;
    }
    writeln!(out)?;
    Ok(true)
}
