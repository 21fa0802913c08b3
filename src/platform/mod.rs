/// Platform abstraction for audio output
/// This module provides a unified interface for audio playback across different platforms
/// (native CPAL, or a silent sink when no device should be used).
use crate::error::AudioError;
use crate::score::Score;
use crate::stage::{ContextId, Stage, StageCommand};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Default rate used before a device reports its own
pub const DEFAULT_SAMPLE_RATE: f32 = 44100.0;

/// Trait for platform-specific audio output implementations
pub trait AudioOutput {
    /// Initialize the audio output with the given sample rate
    fn initialize(&mut self, sample_rate: f32) -> Result<(), anyhow::Error>;

    /// Build the stream that pulls samples from `stage`
    fn connect(&mut self, stage: Arc<Mutex<Stage>>) -> Result<(), anyhow::Error>;

    /// Start the audio stream
    fn start(&mut self) -> Result<(), anyhow::Error>;

    /// Stop the audio stream
    fn stop(&mut self) -> Result<(), anyhow::Error>;

    /// Get the current sample rate
    fn sample_rate(&self) -> f32;

    /// Check if the audio output is active
    fn is_active(&self) -> bool;

    /// Whether a stream pulls samples from the stage on its own
    fn pulls_samples(&self) -> bool {
        true
    }
}

/// Output that accepts everything and plays nothing.
///
/// Used for `--mute` and in tests; the stage can still be rendered by hand
/// through [`AudioEngine::render`].
pub struct SilentOutput {
    sample_rate: f32,
    is_active: bool,
}

impl SilentOutput {
    pub fn new() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            is_active: false,
        }
    }
}

impl Default for SilentOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioOutput for SilentOutput {
    fn initialize(&mut self, sample_rate: f32) -> Result<(), anyhow::Error> {
        self.sample_rate = sample_rate;
        Ok(())
    }

    fn connect(&mut self, _stage: Arc<Mutex<Stage>>) -> Result<(), anyhow::Error> {
        Ok(())
    }

    fn start(&mut self) -> Result<(), anyhow::Error> {
        self.is_active = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), anyhow::Error> {
        self.is_active = false;
        Ok(())
    }

    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn pulls_samples(&self) -> bool {
        false
    }
}

/// Shared handle on the stage, cloneable across threads
#[derive(Clone)]
pub struct AudioEngine {
    stage: Arc<Mutex<Stage>>,
    sample_rate: f32,
    rendered_frames: Arc<Mutex<u64>>,
}

impl AudioEngine {
    /// Create a new audio engine with the given sample rate
    pub fn new(sample_rate: f32) -> Self {
        Self {
            stage: Arc::new(Mutex::new(Stage::new(sample_rate))),
            sample_rate,
            rendered_frames: Arc::new(Mutex::new(0)),
        }
    }

    /// Get the stage for use with audio output
    pub fn stage(&self) -> Arc<Mutex<Stage>> {
        self.stage.clone()
    }

    /// Get the current sample rate
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Lock the stage, surfacing poisoning as an error
    pub fn try_stage(&self) -> Result<MutexGuard<'_, Stage>, AudioError> {
        self.stage.lock().map_err(|_| AudioError::Poisoned)
    }

    /// Lock the stage for read-only queries; a poisoned stage is still readable
    pub fn stage_mut(&self) -> MutexGuard<'_, Stage> {
        self.stage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a command for the audio thread
    pub fn send(&self, command: StageCommand) -> Result<(), AudioError> {
        self.try_stage()?.enqueue(command);
        Ok(())
    }

    /// Render the stage directly into `output`, for outputs that do not pull
    /// samples themselves (tests, offline checks)
    pub fn render(&self, output: &mut [f32]) {
        let mut frames = self.rendered_frames.lock().unwrap_or_else(PoisonError::into_inner);
        let mut stage = self.stage_mut();
        for sample in output.iter_mut() {
            *sample = stage.tick(*frames);
            *frames += 1;
        }
    }
}

/// Lifecycle of an audio context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Suspended,
    Running,
    Closed,
}

/// Main-thread handle on one batch of scheduled sound
pub struct AudioContext {
    id: ContextId,
    engine: AudioEngine,
    state: ContextState,
}

impl AudioContext {
    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    pub(crate) fn mark_running(&mut self) {
        if self.state == ContextState::Suspended {
            self.state = ContextState::Running;
        }
    }

    /// Hand `score` to the audio thread. Works in the suspended state too; the
    /// voices start once the output pulls samples.
    pub fn schedule(&mut self, score: Score) -> Result<f32, AudioError> {
        if self.state == ContextState::Closed {
            return Err(AudioError::OutputUnavailable("context already closed".into()));
        }
        let duration = score.duration();
        self.engine.send(StageCommand::StartContext { id: self.id, score })?;
        Ok(duration)
    }

    /// Stop every voice of this context immediately
    pub fn close(&mut self) {
        if self.state == ContextState::Closed {
            return;
        }
        if let Err(err) = self.engine.send(StageCommand::CloseContext(self.id)) {
            log::warn!("Failed to close audio context {}: {}", self.id, err);
        }
        self.state = ContextState::Closed;
    }
}

/// An output device together with the engine feeding it
pub struct AudioSystem {
    engine: AudioEngine,
    output: Box<dyn AudioOutput>,
    available: bool,
    next_context_id: ContextId,
}

impl AudioSystem {
    /// Initialize `output` and connect it to a fresh engine.
    ///
    /// A device that fails to initialize leaves the system unavailable rather
    /// than failing; every later audio request falls through to its fallback.
    pub fn new(mut output: Box<dyn AudioOutput>) -> Self {
        let mut engine = AudioEngine::new(DEFAULT_SAMPLE_RATE);
        let available = match output.initialize(DEFAULT_SAMPLE_RATE) {
            Ok(()) => {
                engine = AudioEngine::new(output.sample_rate());
                match output.connect(engine.stage()) {
                    Ok(()) => true,
                    Err(err) => {
                        log::warn!("Audio stream could not be created: {:#}", err);
                        false
                    }
                }
            }
            Err(err) => {
                log::warn!("Audio output unavailable: {:#}", err);
                false
            }
        };

        Self {
            engine,
            output,
            available,
            next_context_id: 1,
        }
    }

    /// System backed by [`SilentOutput`]
    pub fn silent() -> Self {
        Self::new(Box::new(SilentOutput::new()))
    }

    pub fn engine(&self) -> &AudioEngine {
        &self.engine
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn is_running(&self) -> bool {
        self.available && self.output.is_active()
    }

    /// Create a context; it starts suspended when the stream is not running yet
    pub fn create_context(&mut self) -> Result<AudioContext, AudioError> {
        if !self.available {
            return Err(AudioError::OutputUnavailable("no audio device".into()));
        }
        let id = self.next_context_id;
        self.next_context_id += 1;
        let state = if self.output.is_active() {
            ContextState::Running
        } else {
            ContextState::Suspended
        };
        Ok(AudioContext {
            id,
            engine: self.engine.clone(),
            state,
        })
    }

    /// Start the output stream
    pub fn resume(&mut self) -> Result<(), AudioError> {
        if !self.available {
            return Err(AudioError::OutputUnavailable("no audio device".into()));
        }
        if self.output.is_active() {
            return Ok(());
        }
        self.output
            .start()
            .map_err(|err| AudioError::Blocked(format!("{:#}", err)))
    }

    /// Resume the stream on behalf of a context
    pub fn resume_context(&mut self, context: &mut AudioContext) -> Result<(), AudioError> {
        self.resume()?;
        context.mark_running();
        Ok(())
    }

    /// Stop the output stream
    pub fn suspend(&mut self) {
        if let Err(err) = self.output.stop() {
            log::warn!("Failed to stop audio output: {:#}", err);
        }
    }

    /// Per-frame upkeep. Nothing drains the stage behind an output that never
    /// pulls samples, so its commands are settled here.
    pub fn pump(&mut self) {
        if self.available && !self.output.pulls_samples() {
            self.engine.stage_mut().settle();
        }
    }
}

// Platform-specific implementations
#[cfg(feature = "native")]
pub mod cpal_output;

// Re-export platform-specific types
#[cfg(feature = "native")]
pub use self::cpal_output::CpalOutput;
