use anyhow::{anyhow, Context, Result};
use std::path::Path;

/// Default scan target when none is given.
pub fn home_directory() -> Result<String> {
    dirs::home_dir()
        .map(|p| p.to_string_lossy().to_string())
        .ok_or_else(|| anyhow!("failed to resolve the home directory"))
}

/// Reveal `path` in the platform file browser.
pub fn reveal_in_file_browser(path: &str) -> Result<()> {
    use std::process::Command;

    #[cfg(target_os = "macos")]
    {
        Command::new("open")
            .arg("-R")
            .arg(path)
            .spawn()
            .with_context(|| format!("failed to reveal {path}"))?;
        Ok(())
    }

    #[cfg(target_os = "windows")]
    {
        Command::new("explorer")
            .arg(format!("/select,{path}"))
            .spawn()
            .with_context(|| format!("failed to reveal {path}"))?;
        Ok(())
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        // No selection support; open the containing directory.
        let parent = Path::new(path)
            .parent()
            .unwrap_or_else(|| Path::new("/"));
        Command::new("xdg-open")
            .arg(parent)
            .spawn()
            .with_context(|| format!("failed to open {}", parent.display()))?;
        Ok(())
    }
}

/// Move `path` to the trash rather than deleting it outright.
pub fn move_to_trash(path: &str) -> Result<()> {
    trash::delete(Path::new(path)).with_context(|| format!("failed to trash {path}"))
}
