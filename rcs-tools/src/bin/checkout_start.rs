//! Reconstructs the earliest revision on a `,v` file's trunk and writes it
//! to stdout.

use std::{fs, io::Write, path::PathBuf};

use anyhow::Context;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
struct Opt {
    #[structopt(help = "path to the ,v file")]
    path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();
    pretty_env_logger::init();

    let bytes = fs::read(&opt.path)
        .with_context(|| format!("reading {}", opt.path.display()))?;
    let rcs = comma_v::parse(&bytes).with_context(|| format!("parsing {}", opt.path.display()))?;

    let head = rcs.get_head().context("file has no head revision")?;
    let start = rcs_tools::trunk_start(&rcs, head)?;
    log::debug!("head is {}, trunk start is {}", head, start);

    let text = rcs.checkout(&start)?;
    std::io::stdout().write_all(&text)?;

    Ok(())
}
