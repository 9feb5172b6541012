//! Joins two `,v` histories end to end: file `a`'s newest trunk revision
//! must hold the same text as file `b`'s oldest trunk revision, and the
//! result is a single file whose trunk is `a`'s history followed by `b`'s,
//! with `b`'s revisions renumbered to continue where `a` left off.

use std::{fs, io::Write, path::PathBuf};

use anyhow::Context;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
struct Opt {
    #[structopt(help = "path to the older file, A")]
    a: PathBuf,

    #[structopt(help = "path to the newer file, B, continuing A's content")]
    b: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();
    pretty_env_logger::init();

    let a_bytes = fs::read(&opt.a).with_context(|| format!("reading {}", opt.a.display()))?;
    let mut a = comma_v::parse(&a_bytes).with_context(|| format!("parsing {}", opt.a.display()))?;

    let b_bytes = fs::read(&opt.b).with_context(|| format!("reading {}", opt.b.display()))?;
    let b = comma_v::parse(&b_bytes).with_context(|| format!("parsing {}", opt.b.display()))?;

    rcs_tools::join(&mut a, &b)?;

    std::io::stdout().write_all(&comma_v::emit(&a))?;
    Ok(())
}
