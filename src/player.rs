use std::process::{Command, Stdio};
use tracing::info;

use crate::error::BrowseError;

/// Hands a playable URL to an external player. Playback runs detached from the browser.
pub trait PlayerLauncher: Send {
  fn launch(&self, playback_url: &str) -> Result<(), BrowseError>;
}

/// Launches `mpv` (or any compatible program) as a detached child process.
#[derive(Debug, Clone)]
pub struct MpvLauncher {
  program: String,
  args: Vec<String>,
}

impl MpvLauncher {
  pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
    Self { program: program.into(), args }
  }
}

impl PlayerLauncher for MpvLauncher {
  fn launch(&self, playback_url: &str) -> Result<(), BrowseError> {
    let mut child = Command::new(&self.program)
      .args(&self.args)
      .arg(playback_url)
      .stdin(Stdio::null())
      .stdout(Stdio::null())
      .stderr(Stdio::null())
      .spawn()
      .map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
          BrowseError::Launch(format!(
            "{} not found. Install it with: brew install mpv (macOS) or apt install mpv (Linux)",
            self.program
          ))
        } else {
          BrowseError::Launch(format!("failed to spawn {}: {}", self.program, e))
        }
      })?;
    info!(program = %self.program, url = %playback_url, pid = child.id(), "player: launched");

    // Reap the child in a background thread to avoid zombie processes.
    std::thread::spawn(move || {
      let _ = child.wait();
    });
    Ok(())
  }
}
