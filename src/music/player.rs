use super::celebration::CelebrationTrack;
use super::media::MediaClip;
use super::melody::play_melody_fallback;
use crate::error::AudioError;
use crate::platform::AudioSystem;
use crate::stage::StageCommand;
use crate::state::PlaybackState;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Volume the song settles at
pub const SONG_VOLUME: f32 = 0.9;

/// Fade-in used by the music button
pub const FADE_IN: Duration = Duration::from_millis(1500);

pub const MISSING_SONG_MESSAGE: &str = "💡 Add a birthday_song.wav file to the folder to play music!";
pub const PLAY_LABEL: &str = "🎵 Play Birthday Song";
pub const PAUSE_LABEL: &str = "⏸️ Pause Song";

/// How the song should enter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// From the top at full volume
    Restart,
    /// From where it stopped, fading in from silence
    FadeIn,
}

/// Result of the two-stage play strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// The song file is playing
    Primary,
    /// The song was rejected and the synthesized melody took over
    Fallback,
    /// Neither could be started
    Silent,
}

/// Result of the music button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Playing,
    Paused,
    /// The song could not be started; the user should be told
    Unavailable,
}

/// Owns the song, its playback state and the celebration loop handle
pub struct Player {
    song: Option<PathBuf>,
    clip: Option<Arc<MediaClip>>,
    state: PlaybackState,
    retry_pending: bool,
    celebration: CelebrationTrack,
    seed: u64,
}

impl Player {
    pub fn new(song: Option<PathBuf>, seed: u64) -> Self {
        Self {
            song,
            clip: None,
            state: PlaybackState::NotStarted,
            retry_pending: false,
            celebration: CelebrationTrack::new(),
            seed,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn has_song(&self) -> bool {
        self.song.is_some()
    }

    /// A blocked start is waiting for the next key press or click
    pub fn retry_pending(&self) -> bool {
        self.retry_pending
    }

    pub fn celebration_playing(&self) -> bool {
        self.celebration.is_playing()
    }

    /// Label for the music button
    pub fn label(&self) -> &'static str {
        match self.state {
            PlaybackState::Playing => PAUSE_LABEL,
            PlaybackState::NotStarted | PlaybackState::Paused => PLAY_LABEL,
        }
    }

    fn ensure_loaded(&mut self, system: &AudioSystem) -> Result<(), AudioError> {
        if self.clip.is_some() {
            return Ok(());
        }
        let path = self.song.as_ref().ok_or(AudioError::NoSong)?;
        let clip = Arc::new(MediaClip::load(path)?);
        system.engine().send(StageCommand::LoadMedia(clip.clone()))?;
        self.clip = Some(clip);
        Ok(())
    }

    /// Start the song file
    pub fn play_primary(&mut self, system: &mut AudioSystem, entry: Entry) -> Result<(), AudioError> {
        self.ensure_loaded(system)?;
        system.resume()?;

        let engine = system.engine();
        match entry {
            Entry::Restart => engine.send(StageCommand::PlayMedia {
                restart: true,
                volume: SONG_VOLUME,
            })?,
            Entry::FadeIn => {
                engine.send(StageCommand::PlayMedia {
                    restart: false,
                    volume: 0.0,
                })?;
                engine.send(StageCommand::FadeMedia {
                    target: SONG_VOLUME,
                    seconds: FADE_IN.as_secs_f32(),
                })?;
            }
        }

        self.state = PlaybackState::Playing;
        self.retry_pending = false;
        Ok(())
    }

    /// Try the song; on any rejection play the synthesized melody instead.
    ///
    /// A blocked device also arms a retry of the song on the next interaction.
    pub fn play_with_fallback(&mut self, system: &mut AudioSystem) -> PlaybackOutcome {
        match self.play_primary(system, Entry::Restart) {
            Ok(()) => {
                log::info!("Birthday song playing");
                PlaybackOutcome::Primary
            }
            Err(err) => {
                if matches!(err, AudioError::Blocked(_)) {
                    self.retry_pending = true;
                }
                log::warn!("Song unavailable ({}), using fallback melody", err);
                match play_melody_fallback(system) {
                    Some(_) => PlaybackOutcome::Fallback,
                    None => PlaybackOutcome::Silent,
                }
            }
        }
    }

    /// Called on every key press or click; retries a blocked start once armed
    pub fn retry_on_interaction(&mut self, system: &mut AudioSystem) -> bool {
        if !self.retry_pending {
            return false;
        }
        match self.play_primary(system, Entry::Restart) {
            Ok(()) => {
                log::info!("Birthday song started after retry");
                true
            }
            Err(err) => {
                log::debug!("Retry still blocked: {}", err);
                false
            }
        }
    }

    /// Music button: fade in when stopped, pause when playing
    pub fn toggle(&mut self, system: &mut AudioSystem) -> ToggleOutcome {
        if self.state == PlaybackState::Playing {
            if let Err(err) = system.engine().send(StageCommand::PauseMedia) {
                log::warn!("Failed to pause song: {}", err);
            }
            self.state = PlaybackState::Paused;
            return ToggleOutcome::Paused;
        }

        match self.play_primary(system, Entry::FadeIn) {
            Ok(()) => ToggleOutcome::Playing,
            Err(err) => {
                log::warn!("Music toggle failed: {}", err);
                ToggleOutcome::Unavailable
            }
        }
    }

    /// Start the drum loop unless it is already playing
    pub fn play_celebration_loop(&mut self, system: &mut AudioSystem, now: Duration) -> bool {
        self.seed = self.seed.wrapping_add(1);
        self.celebration.start(system, now, self.seed)
    }

    /// Per-frame upkeep: release the loop handle and notice when the song ended
    pub fn poll(&mut self, system: &AudioSystem, now: Duration) {
        self.celebration.poll(now);

        if self.state == PlaybackState::Playing && system.is_running() {
            let stage = system.engine().stage_mut();
            if !stage.has_pending_commands() && !stage.media_playing() {
                log::debug!("Song finished");
                self.state = PlaybackState::Paused;
            }
        }
    }
}
