//! Whole-file conversion: one input, one GLB.

use std::path::Path;

use anyhow::{Context, Result};

use crate::output;

pub fn run(input: &Path, output_path: &Path, category: &str, quiet: bool) -> Result<()> {
    mesh_tint::convert(input, output_path, category)
        .with_context(|| format!("converting {} to {}", input.display(), output_path.display()))?;

    output::success(
        &format!(
            "{} -> {} ({})",
            input.display(),
            output_path.display(),
            mesh_tint::resolve_color(category)
        ),
        quiet,
    );
    Ok(())
}
