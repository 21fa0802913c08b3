use crate::effects::{BrickWallLimiter, Effect};
use crate::music::media::MediaClip;
use crate::score::Score;
use std::collections::VecDeque;
use std::sync::Arc;

/// Seconds a context stays alive after its last voice ends
pub const CONTEXT_RELEASE_MARGIN: f32 = 1.0;

pub type ContextId = u64;

/// Requests from the main thread, applied at the start of the next audio tick
pub enum StageCommand {
    StartContext { id: ContextId, score: Score },
    CloseContext(ContextId),
    LoadMedia(Arc<MediaClip>),
    PlayMedia { restart: bool, volume: f32 },
    FadeMedia { target: f32, seconds: f32 },
    PauseMedia,
}

/// Seconds between two stream frames, measured exactly before narrowing to
/// `f32`. Absolute stream time loses sub-sample precision in `f32` within an
/// hour, so only offsets inside a context or fade are ever narrowed.
fn seconds_between(from: u64, to: u64, sample_rate: f32) -> f32 {
    (to.saturating_sub(from) as f64 / sample_rate as f64) as f32
}

struct RunningContext {
    id: ContextId,
    score: Score,
    start_frame: u64,
    close_frame: u64,
}

#[derive(Clone, Copy, Debug)]
struct Fade {
    from: f32,
    to: f32,
    start_frame: u64,
    seconds: f32,
}

struct MediaVoice {
    clip: Arc<MediaClip>,
    // Position in clip samples
    position: f64,
    playing: bool,
    volume: f32,
    fade: Option<Fade>,
}

impl MediaVoice {
    fn current_volume(&mut self, frame: u64, sample_rate: f32) -> f32 {
        if let Some(fade) = self.fade {
            let progress = if fade.seconds <= 0.0 {
                1.0
            } else {
                (seconds_between(fade.start_frame, frame, sample_rate) / fade.seconds).clamp(0.0, 1.0)
            };
            self.volume = fade.from + (fade.to - fade.from) * progress;
            if progress >= 1.0 {
                self.fade = None;
            }
        }
        self.volume.clamp(0.0, 1.0)
    }
}

/// Audio-thread mixer: running synth contexts plus the optional song
pub struct Stage {
    pub sample_rate: f32,
    pub limiter: BrickWallLimiter,
    contexts: Vec<RunningContext>,
    commands: VecDeque<StageCommand>,
    media: Option<MediaVoice>,
    // Stream position in frames
    frame: u64,
}

impl Stage {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            limiter: BrickWallLimiter::new(1.0), // Default threshold at 1.0 to prevent clipping
            contexts: Vec::new(),
            commands: VecDeque::new(),
            media: None,
            frame: 0,
        }
    }

    /// Queue a command for the next tick
    pub fn enqueue(&mut self, command: StageCommand) {
        self.commands.push_back(command);
    }

    pub fn active_contexts(&self) -> usize {
        self.contexts.len()
    }

    /// True while commands wait for the next tick
    pub fn has_pending_commands(&self) -> bool {
        !self.commands.is_empty()
    }

    pub fn media_playing(&self) -> bool {
        self.media.as_ref().map(|m| m.playing).unwrap_or(false)
    }

    pub fn media_volume(&self) -> Option<f32> {
        self.media.as_ref().map(|m| m.volume)
    }

    /// Apply queued commands and drop every synth voice without rendering.
    ///
    /// For outputs that never pull samples: the song keeps its play state
    /// while scheduled scores are released instead of piling up.
    pub fn settle(&mut self) {
        self.apply_commands();
        self.contexts.clear();
    }

    fn apply_commands(&mut self) {
        let frame = self.frame;
        while let Some(command) = self.commands.pop_front() {
            match command {
                StageCommand::StartContext { id, score } => {
                    let lifetime = (score.duration() + CONTEXT_RELEASE_MARGIN) as f64 * self.sample_rate as f64;
                    log::debug!(
                        "Context {} starts at frame {} with {} voices ({:.2}s)",
                        id,
                        frame,
                        score.len(),
                        score.duration()
                    );
                    self.contexts.push(RunningContext {
                        id,
                        score,
                        start_frame: frame,
                        close_frame: frame + lifetime.ceil() as u64,
                    });
                }
                StageCommand::CloseContext(id) => {
                    self.contexts.retain(|ctx| ctx.id != id);
                }
                StageCommand::LoadMedia(clip) => {
                    self.media = Some(MediaVoice {
                        clip,
                        position: 0.0,
                        playing: false,
                        volume: 0.9,
                        fade: None,
                    });
                }
                StageCommand::PlayMedia { restart, volume } => {
                    if let Some(media) = &mut self.media {
                        if restart || media.position >= media.clip.samples.len() as f64 {
                            media.position = 0.0;
                        }
                        media.volume = volume;
                        media.fade = None;
                        media.playing = true;
                    }
                }
                StageCommand::FadeMedia { target, seconds } => {
                    if let Some(media) = &mut self.media {
                        media.fade = Some(Fade {
                            from: media.volume,
                            to: target,
                            start_frame: frame,
                            seconds,
                        });
                    }
                }
                StageCommand::PauseMedia => {
                    if let Some(media) = &mut self.media {
                        media.playing = false;
                    }
                }
            }
        }
    }

    /// Render the sample at stream position `frame`
    pub fn tick(&mut self, frame: u64) -> f32 {
        self.frame = frame;

        if !self.commands.is_empty() {
            self.apply_commands();
        }

        let sample_rate = self.sample_rate;
        let mut output = 0.0;

        for ctx in &self.contexts {
            output += ctx.score.sample(seconds_between(ctx.start_frame, frame, sample_rate));
        }

        // Release finished contexts
        self.contexts.retain(|ctx| frame < ctx.close_frame);

        if let Some(media) = &mut self.media {
            if media.playing {
                let volume = media.current_volume(frame, sample_rate);
                output += media.clip.sample_at(media.position) * volume;
                media.position += (media.clip.sample_rate / sample_rate) as f64;
                if media.position >= media.clip.samples.len() as f64 {
                    media.playing = false;
                }
            }
        }

        // Apply limiter to the combined output
        self.limiter.process(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::Tone;
    use crate::music::melody::melody_score;

    fn render(stage: &mut Stage, start_frame: u64, frames: u64) -> Vec<f32> {
        (start_frame..start_frame + frames).map(|f| stage.tick(f)).collect()
    }

    #[test]
    fn test_context_is_released_after_margin() {
        let mut stage = Stage::new(1000.0);
        let mut score = Score::new();
        score.add(0.0, Tone::note(1000.0, 100.0, 0.5, 0.4));
        stage.enqueue(StageCommand::StartContext { id: 1, score });

        render(&mut stage, 0, 10);
        assert_eq!(stage.active_contexts(), 1);

        // 0.5s of audio plus the 1s margin
        render(&mut stage, 10, 1491);
        assert_eq!(stage.active_contexts(), 0);
    }

    #[test]
    fn test_media_fades_in() {
        let mut stage = Stage::new(1000.0);
        stage.enqueue(StageCommand::LoadMedia(Arc::new(MediaClip::from_samples(vec![0.5; 5000], 1000.0))));
        stage.enqueue(StageCommand::PlayMedia { restart: true, volume: 0.0 });
        stage.enqueue(StageCommand::FadeMedia { target: 0.9, seconds: 1.0 });

        let out = render(&mut stage, 0, 1001);
        assert_eq!(out[0], 0.0);
        assert!((out[500] - 0.5 * 0.45).abs() < 1e-3);
        assert!((stage.media_volume().unwrap() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_late_context_sounds_like_a_fresh_one() {
        let sample_rate = 44100.0;
        let mut fresh = Stage::new(sample_rate);
        fresh.enqueue(StageCommand::StartContext {
            id: 1,
            score: melody_score(sample_rate),
        });
        let expected = render(&mut fresh, 0, 4410);

        // Ten hours of stream before the melody starts
        let late_start = 10 * 3600 * 44100;
        let mut late = Stage::new(sample_rate);
        late.tick(late_start - 1);
        late.enqueue(StageCommand::StartContext {
            id: 1,
            score: melody_score(sample_rate),
        });
        let out = render(&mut late, late_start, 4410);

        let worst = out
            .iter()
            .zip(&expected)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f32, f32::max);
        assert!(worst < 1e-6, "late render drifted by {}", worst);
        assert!(expected.iter().any(|sample| sample.abs() > 1e-3));
    }

    #[test]
    fn test_settle_releases_scores_but_keeps_the_song() {
        let mut stage = Stage::new(1000.0);
        let mut score = Score::new();
        score.add(0.0, Tone::note(1000.0, 100.0, 0.5, 0.4));
        stage.enqueue(StageCommand::StartContext { id: 1, score });
        stage.enqueue(StageCommand::LoadMedia(Arc::new(MediaClip::from_samples(vec![0.1; 10], 1000.0))));
        stage.enqueue(StageCommand::PlayMedia { restart: true, volume: 1.0 });

        stage.settle();
        assert!(!stage.has_pending_commands());
        assert_eq!(stage.active_contexts(), 0);
        assert!(stage.media_playing());
    }

    #[test]
    fn test_media_stops_at_end() {
        let mut stage = Stage::new(1000.0);
        stage.enqueue(StageCommand::LoadMedia(Arc::new(MediaClip::from_samples(vec![0.1; 10], 1000.0))));
        stage.enqueue(StageCommand::PlayMedia { restart: true, volume: 1.0 });
        render(&mut stage, 0, 5);
        assert!(stage.media_playing());
        render(&mut stage, 5, 10);
        assert!(!stage.media_playing());
    }
}
