//! Promotes a branch to be the file's new trunk: the branch tip becomes the
//! new head, and the old trunk head is demoted to a diff hanging off the
//! branch, exactly where the branch used to fork from it.
//!
//! This only handles a branch forking directly off the current head, which
//! is the case `rcsfile(5)` users actually hit when they decide mid-series
//! that an experimental branch should have been the main line all along.
//! A branch forking further back on the trunk, with trunk history above the
//! fork point, would need that upper segment re-rooted as a new branch of
//! its own; this tool doesn't attempt that.

use std::{fs, io::Write, path::PathBuf};

use anyhow::Context;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
struct Opt {
    #[structopt(help = "path to the ,v file")]
    path: PathBuf,

    #[structopt(help = "revision at the tip of the branch to promote")]
    branch_tip: String,
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();
    pretty_env_logger::init();

    let bytes = fs::read(&opt.path).with_context(|| format!("reading {}", opt.path.display()))?;
    let mut rcs = comma_v::parse(&bytes).with_context(|| format!("parsing {}", opt.path.display()))?;

    let branch_tip: comma_v::Num = opt.branch_tip.parse()?;
    rcs_tools::pivot_branch(&mut rcs, &branch_tip)?;

    std::io::stdout().write_all(&comma_v::emit(&rcs))?;
    Ok(())
}
