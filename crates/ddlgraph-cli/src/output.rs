use std::io::Write;
use std::path::Path;

use ddlgraph_core::Script;
use ddlgraph_diff::write_tree;

use crate::CliError;

/// Write the script to one file per object under `out_dir`, or to stdout.
pub fn emit_script(script: &Script, out_dir: Option<&Path>) -> Result<(), CliError> {
    match out_dir {
        Some(dir) => {
            let written = write_tree(dir, script)?;
            tracing::info!(
                event = "script_written",
                dir = %dir.display(),
                files = written.len()
            );
        }
        None => write_stdout(&script.to_text())?,
    }
    Ok(())
}

pub fn write_stdout(text: &str) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
