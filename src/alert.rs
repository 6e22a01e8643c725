//! Alert delivery for sustained bad posture.
//!
//! The tracker only decides *when* to alert. An [`AlertSink`] decides how.
//! Playback failures are reported to the caller, which logs and carries on.

use crate::{Error, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Receiver of posture alerts
pub trait AlertSink {
    /// Deliver one alert
    ///
    /// # Errors
    ///
    /// Returns an error if the alert could not be delivered
    fn alert(&mut self) -> Result<()>;

    /// Sink name for logging
    fn name(&self) -> &str;
}

/// Writes alerts to the log only
#[derive(Debug, Default)]
pub struct LogAlert {
    count: u64,
}

impl LogAlert {
    /// Alerts delivered so far
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }
}

impl AlertSink for LogAlert {
    fn alert(&mut self) -> Result<()> {
        self.count += 1;
        warn!("Bad posture! Sit up straight (alert #{})", self.count);
        Ok(())
    }

    fn name(&self) -> &str {
        "LogAlert"
    }
}

/// Plays a sound file through an external audio player
///
/// The player is spawned and not waited on, so a slow player never stalls
/// the frame loop.
#[derive(Debug, Clone)]
pub struct SoundAlert {
    player: String,
    args: Vec<String>,
    sound_file: PathBuf,
}

impl SoundAlert {
    /// Play `sound_file` with `player`, passing `args` before the file name
    pub fn new<P: AsRef<Path>>(player: impl Into<String>, args: Vec<String>, sound_file: P) -> Self {
        Self {
            player: player.into(),
            args,
            sound_file: sound_file.as_ref().to_path_buf(),
        }
    }

    /// Use the platform's stock command-line player at the given volume (0.0 - 1.0)
    pub fn with_system_player<P: AsRef<Path>>(sound_file: P, volume: f32) -> Self {
        let (player, args) = system_player(volume);
        Self::new(player, args, sound_file)
    }

    /// Sound file played on each alert
    #[must_use]
    pub fn sound_file(&self) -> &Path {
        &self.sound_file
    }
}

impl AlertSink for SoundAlert {
    fn alert(&mut self) -> Result<()> {
        if !self.sound_file.exists() {
            return Err(Error::Audio(format!(
                "Alert sound not found: {}",
                self.sound_file.display()
            )));
        }

        debug!("Playing {} with {}", self.sound_file.display(), self.player);
        Command::new(&self.player)
            .args(&self.args)
            .arg(&self.sound_file)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Audio(format!("Failed to launch {}: {e}", self.player)))?;

        Ok(())
    }

    fn name(&self) -> &str {
        "SoundAlert"
    }
}

/// Stock audio player and volume arguments for the current platform
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // volume is clamped to 0..=1
pub fn system_player(volume: f32) -> (String, Vec<String>) {
    let volume = volume.clamp(0.0, 1.0);
    if cfg!(target_os = "macos") {
        ("afplay".to_string(), vec!["-v".to_string(), format!("{volume:.2}")])
    } else {
        // paplay volume is linear with 65536 = 100%
        let scaled = (volume * 65536.0) as u32;
        ("paplay".to_string(), vec![format!("--volume={scaled}")])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_alert_counts() {
        let mut sink = LogAlert::default();
        sink.alert().unwrap();
        sink.alert().unwrap();
        assert_eq!(sink.count(), 2);
        assert_eq!(sink.name(), "LogAlert");
    }

    #[test]
    fn test_sound_alert_missing_file() {
        let mut sink = SoundAlert::new("true", Vec::new(), "does/not/exist.mp3");
        assert!(matches!(sink.alert(), Err(Error::Audio(_))));
    }

    #[test]
    fn test_system_player_clamps_volume() {
        let (_, args) = system_player(3.0);
        assert!(!args.is_empty());
        if !cfg!(target_os = "macos") {
            assert_eq!(args[0], "--volume=65536");
        }
    }
}
