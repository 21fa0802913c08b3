use birthday_card::music::{melody_duration, play_melody_fallback, CelebrationTrack, PlaybackOutcome, Player, ToggleOutcome, TRACK_LIFETIME};
use birthday_card::platform::{AudioOutput, AudioSystem};
use birthday_card::stage::Stage;
use birthday_card::state::PlaybackState;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Device that opens but refuses to start, like a browser blocking autoplay
struct BlockedOutput {
    allow_start: Arc<Mutex<bool>>,
    active: bool,
}

impl AudioOutput for BlockedOutput {
    fn initialize(&mut self, _sample_rate: f32) -> Result<(), anyhow::Error> {
        Ok(())
    }
    fn connect(&mut self, _stage: Arc<Mutex<Stage>>) -> Result<(), anyhow::Error> {
        Ok(())
    }
    fn start(&mut self) -> Result<(), anyhow::Error> {
        if *self.allow_start.lock().unwrap() {
            self.active = true;
            Ok(())
        } else {
            Err(anyhow::anyhow!("play() request was blocked"))
        }
    }
    fn stop(&mut self) -> Result<(), anyhow::Error> {
        self.active = false;
        Ok(())
    }
    fn sample_rate(&self) -> f32 {
        22050.0
    }
    fn is_active(&self) -> bool {
        self.active
    }
}

/// Device that is not there at all
struct MissingOutput;

impl AudioOutput for MissingOutput {
    fn initialize(&mut self, _sample_rate: f32) -> Result<(), anyhow::Error> {
        Err(anyhow::anyhow!("Default output device is not available"))
    }
    fn connect(&mut self, _stage: Arc<Mutex<Stage>>) -> Result<(), anyhow::Error> {
        Err(anyhow::anyhow!("Device not initialized"))
    }
    fn start(&mut self) -> Result<(), anyhow::Error> {
        Err(anyhow::anyhow!("Device not initialized"))
    }
    fn stop(&mut self) -> Result<(), anyhow::Error> {
        Ok(())
    }
    fn sample_rate(&self) -> f32 {
        44100.0
    }
    fn is_active(&self) -> bool {
        false
    }
}

fn write_song(dir: &Path) -> PathBuf {
    let path = dir.join("birthday_song.wav");
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for i in 0..8000 {
        let value = ((i as f32 * 0.05).sin() * 8000.0) as i16;
        writer.write_sample(value).unwrap();
        writer.write_sample(value).unwrap();
    }
    writer.finalize().unwrap();
    path
}

#[test]
fn test_melody_without_a_device_does_not_panic() {
    let mut system = AudioSystem::new(Box::new(MissingOutput));
    assert!(!system.is_available());
    assert_eq!(play_melody_fallback(&mut system), None);
    // Twice, for good measure
    assert_eq!(play_melody_fallback(&mut system), None);
}

#[test]
fn test_melody_schedules_on_a_silent_device() {
    let mut system = AudioSystem::silent();
    let seconds = play_melody_fallback(&mut system).unwrap();
    assert!((seconds - melody_duration()).abs() < 1e-3);
    assert!(system.is_running());

    // Rendering by hand produces sound
    let mut buffer = vec![0.0f32; 4096];
    system.engine().render(&mut buffer);
    assert!(buffer.iter().any(|sample| sample.abs() > 1e-4));
}

#[test]
fn test_song_file_plays_first() {
    let dir = TempDir::new().unwrap();
    let song = write_song(dir.path());
    let mut system = AudioSystem::silent();
    let mut player = Player::new(Some(song), 5);

    assert_eq!(player.play_with_fallback(&mut system), PlaybackOutcome::Primary);
    assert_eq!(player.state(), PlaybackState::Playing);

    assert_eq!(player.toggle(&mut system), ToggleOutcome::Paused);
    assert_eq!(player.state(), PlaybackState::Paused);
    assert_eq!(player.toggle(&mut system), ToggleOutcome::Playing);
}

#[test]
fn test_missing_song_falls_back_to_the_melody() {
    let dir = TempDir::new().unwrap();
    let mut system = AudioSystem::silent();
    let mut player = Player::new(Some(dir.path().join("birthday_song.wav")), 5);

    assert_eq!(player.play_with_fallback(&mut system), PlaybackOutcome::Fallback);
    assert_eq!(player.state(), PlaybackState::NotStarted);
    assert!(!player.retry_pending());
    assert_eq!(player.toggle(&mut system), ToggleOutcome::Unavailable);
}

#[test]
fn test_blocked_song_is_retried_on_interaction() {
    let dir = TempDir::new().unwrap();
    let song = write_song(dir.path());
    let allow_start = Arc::new(Mutex::new(false));
    let mut system = AudioSystem::new(Box::new(BlockedOutput {
        allow_start: allow_start.clone(),
        active: false,
    }));
    let mut player = Player::new(Some(song), 5);

    assert_eq!(player.play_with_fallback(&mut system), PlaybackOutcome::Fallback);
    assert!(player.retry_pending());
    assert!(!player.retry_on_interaction(&mut system));

    *allow_start.lock().unwrap() = true;
    assert!(player.retry_on_interaction(&mut system));
    assert!(!player.retry_pending());
    assert_eq!(player.state(), PlaybackState::Playing);
}

#[test]
fn test_celebration_loop_is_exclusive() {
    let mut system = AudioSystem::silent();
    let mut track = CelebrationTrack::new();

    assert!(track.start(&mut system, Duration::ZERO, 1));
    assert!(!track.start(&mut system, Duration::from_secs(5), 2));

    track.poll(TRACK_LIFETIME - Duration::from_millis(1));
    assert!(track.is_playing());
    track.poll(TRACK_LIFETIME);
    assert!(!track.is_playing());

    assert!(track.start(&mut system, TRACK_LIFETIME, 3));
}

#[test]
fn test_celebration_loop_without_a_device() {
    let mut system = AudioSystem::new(Box::new(MissingOutput));
    let mut track = CelebrationTrack::new();
    assert!(!track.start(&mut system, Duration::ZERO, 1));
    assert!(!track.is_playing());
}
