use std::path::Path;

use anyhow::{Context, Result};

use workforce_lens::data::loader;
use workforce_lens::session::Session;
use workforce_lens::shell;

fn main() -> Result<()> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .context("usage: workforce-lens <employees.csv>")?;
    let dataset = loader::load_path(Path::new(&path))
        .with_context(|| format!("loading {path}"))?;

    shell::run(Session::new(dataset))
}
