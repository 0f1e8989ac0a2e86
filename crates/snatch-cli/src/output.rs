use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Emit a result as pretty JSON: to `path` when given, otherwise stdout.
///
/// Creates the parent directory of `path` if needed.
pub fn emit<T: Serialize>(value: &T, path: Option<&str>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;

    match path {
        Some(path) => {
            let path = Path::new(path);
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(dir)?;
            }
            fs::write(path, &json).with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = json.len(), "Wrote JSON result");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }

    Ok(())
}
