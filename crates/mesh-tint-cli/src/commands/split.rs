//! Split conversion: one GLB per geometry, results as JSON on stdout.

use std::path::Path;

use anyhow::{Context, Result};

use crate::output;

pub fn run(input: &Path, prefix: &Path, category: &str, quiet: bool) -> Result<()> {
    let records = mesh_tint::split_convert(input, prefix, category)
        .with_context(|| format!("splitting {} into {}-*.glb", input.display(), prefix.display()))?;

    output::json(&records)?;
    output::success(
        &format!("{} -> {} file(s)", input.display(), records.len()),
        quiet,
    );
    Ok(())
}
