use anyhow::Context;
use clap::Parser;
use glx_dispatch::{RequestTable, RESERVED_REQUESTS};
use log::info;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Generates the C dispatch stubs for GLX requests that are routed by
/// screen, context tag or XID.
#[derive(Debug, Parser)]
#[command(name = "gen", version, about)]
struct Args {
    /// Write to OUTFILE instead of stdout ("-" is stdout).
    #[arg(short, long, value_name = "OUTFILE", default_value = "-")]
    output: PathBuf,

    /// Print the request table instead of generating C.
    #[arg(long)]
    list: bool,
}

fn list(table: &RequestTable) -> String {
    let mut out = String::new();
    for desc in table {
        out += &format!(
            "{} {} {} {}\n",
            desc.name(),
            desc.method(),
            desc.member(),
            desc.error().name()
        );
    }
    for name in RESERVED_REQUESTS {
        out += &format!("{name} reserved\n");
    }
    out
}

fn write_out(path: &Path, text: &str) -> anyhow::Result<()> {
    if path == Path::new("-") {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(text.as_bytes()).context("write stdout")?;
        stdout.flush().context("flush stdout")?;
        info!("wrote {} bytes to stdout", text.len());
    } else {
        std::fs::write(path, text).with_context(|| format!("write {}", path.display()))?;
        info!("wrote {} bytes to {}", text.len(), path.display());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let table = RequestTable::glx().context("build GLX request table")?;
    let text = if args.list {
        list(&table)
    } else {
        info!("generating {} dispatch functions", table.len());
        glx_dispatch::program(&table)
    };
    write_out(&args.output, &text)
}
