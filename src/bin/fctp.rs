use std::io::{self, BufWriter, Write};
use std::process;

use anyhow::{Context, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ctp_rs::RecordArray;
use ctp_rs::combis::{Endpoint, StepBound, pathway_space};
use ctp_rs::select::select_front;
use ctp_rs::sort::sort_inplace;
use ctp_rs::uniq::all_rows_unique;

/// Use mimalloc as the global allocator.
/// 2-3x faster than glibc malloc for small allocations.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const TOOL_NAME: &str = "fctp";

/// 256KB output buffer: one pathway per line, many short writes.
const OUTPUT_BUF_SIZE: usize = 256 * 1024;

#[derive(Parser)]
#[command(
    name = "fctp",
    about = "Enumerate coherence transfer pathways, optionally moving wanted ones to the front.",
    after_help = "Pathways are printed one per line, coherence orders separated by spaces.\n\
        START and END accept a single order, a comma-separated list, or 'all'\n\
        to range over the neighbouring interior bound.\n\n\
        Set RUST_LOG=debug for diagnostics on standard error.",
    version
)]
struct Cli {
    /// Number of pulse blocks (orders per pathway)
    #[arg(short = 'n', long = "blocks", value_name = "N")]
    blocks: usize,

    /// Maximum coherence order for every interior step
    #[arg(short = 'p', long = "pmax", value_name = "P", conflicts_with = "pmax_steps")]
    pmax: Option<i32>,

    /// Comma-separated maximum coherence order per interior step
    #[arg(long = "pmax-steps", value_name = "LIST")]
    pmax_steps: Option<String>,

    /// Coherence order(s) before the first block
    #[arg(long = "start", value_name = "START", default_value = "0", allow_hyphen_values = true)]
    start: String,

    /// Coherence order(s) after the last block
    #[arg(long = "end", value_name = "END", default_value = "-1", allow_hyphen_values = true)]
    end: String,

    /// Wanted pathway (comma-separated orders); may be repeated
    #[arg(short = 'w', long = "want", value_name = "PATHWAY", allow_hyphen_values = true)]
    wanted: Vec<String>,

    /// Sort pathways ascending before selecting
    #[arg(short = 's', long = "sort")]
    sort: bool,

    /// Only print the number of pathways
    #[arg(short = 'c', long = "count")]
    count: bool,
}

fn parse_orders(s: &str) -> anyhow::Result<Vec<i32>> {
    s.split(',')
        .map(|part| {
            part.trim()
                .parse::<i32>()
                .with_context(|| format!("invalid coherence order '{}'", part))
        })
        .collect()
}

fn parse_endpoint(s: &str) -> anyhow::Result<Endpoint<i32>> {
    if s == "all" {
        return Ok(Endpoint::Ranged);
    }
    let orders = parse_orders(s)?;
    match orders.as_slice() {
        [single] => Ok(Endpoint::Fixed(*single)),
        _ => Ok(Endpoint::List(orders)),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn write_pathways(out: &mut impl Write, pathways: &RecordArray<i32>) -> io::Result<()> {
    let mut buf = itoa::Buffer::new();
    for row in pathways.rows() {
        for (k, &order) in row.iter().enumerate() {
            if k > 0 {
                out.write_all(b" ")?;
            }
            out.write_all(buf.format(order).as_bytes())?;
        }
        out.write_all(b"\n")?;
    }
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let bound = match (cli.pmax, cli.pmax_steps) {
        (Some(p), None) => StepBound::Shared(p),
        (None, Some(list)) => {
            StepBound::PerStep(parse_orders(&list).context("invalid --pmax-steps")?)
        }
        (None, None) => StepBound::Shared(1),
        (Some(_), Some(_)) => bail!("--pmax and --pmax-steps are mutually exclusive"),
    };
    let start = parse_endpoint(&cli.start).context("invalid --start")?;
    let end = parse_endpoint(&cli.end).context("invalid --end")?;

    let mut pathways = pathway_space(cli.blocks, &bound, &start, &end)
        .context("failed to enumerate pathways")?;
    if cli.sort {
        sort_inplace(&mut pathways);
    }
    if !cli.wanted.is_empty() {
        let rows = cli
            .wanted
            .iter()
            .map(|w| parse_orders(w))
            .collect::<anyhow::Result<Vec<_>>>()
            .context("invalid --want")?;
        let wanted = RecordArray::from_rows(&rows).context("invalid --want")?;
        if !all_rows_unique(&wanted) {
            tracing::warn!("wanted pathways contain duplicates");
        }
        pathways = select_front(&pathways, &wanted).context("failed to select wanted pathways")?;
    }

    let stdout = io::stdout();
    let mut out = BufWriter::with_capacity(OUTPUT_BUF_SIZE, stdout.lock());
    let written = if cli.count {
        writeln!(out, "{}", pathways.len()).and_then(|_| out.flush())
    } else {
        write_pathways(&mut out, &pathways).and_then(|_| out.flush())
    };
    match written {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(e) => Err(e).context("write error"),
    }
}

fn main() {
    ctp_rs::common::reset_sigpipe();
    init_logging();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{}: {:#}", TOOL_NAME, e);
        process::exit(1);
    }
}
