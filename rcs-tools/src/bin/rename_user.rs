//! Rewrites every delta's `author` field that matches one user name to
//! another, leaving everything else about the file untouched.

use std::{fs, io::Write, path::PathBuf};

use anyhow::Context;
use comma_v::types::Id;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
struct Opt {
    #[structopt(help = "path to the ,v file")]
    path: PathBuf,

    #[structopt(help = "author name to replace")]
    old_user: String,

    #[structopt(help = "replacement author name")]
    new_user: String,
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();
    pretty_env_logger::init();

    let bytes = fs::read(&opt.path)
        .with_context(|| format!("reading {}", opt.path.display()))?;
    let mut rcs = comma_v::parse(&bytes).with_context(|| format!("parsing {}", opt.path.display()))?;

    let old = Id(opt.old_user.into_bytes());
    let new = Id(opt.new_user.into_bytes());

    let mut renamed = 0;
    rcs.map_deltas(|revision, mut delta| {
        if delta.get_author() == &old {
            log::debug!("renaming author of {}", revision);
            delta.set_author(new.clone());
            renamed += 1;
        }
        (revision.clone(), delta)
    });
    log::info!("renamed {} delta(s)", renamed);

    std::io::stdout().write_all(&comma_v::emit(&rcs))?;
    Ok(())
}
