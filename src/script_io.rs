use std::path::{Path, PathBuf};

/// Write the generated script to `path`.
pub fn save_script(text: &str, path: &Path) -> Result<(), String> {
    std::fs::write(path, text).map_err(|e| format!("Failed to save script: {e}"))
}

/// Write the script as `file_name` inside `dir`, creating `dir` if needed.
pub fn save_script_in(text: &str, dir: &Path, file_name: &str) -> Result<PathBuf, String> {
    std::fs::create_dir_all(dir).map_err(|e| format!("Failed to create {}: {e}", dir.display()))?;
    let path = dir.join(file_name);
    save_script(text, &path)?;
    Ok(path)
}
