//! The controller: owns all state, reacts to time and input, and produces
//! snapshots for the view.

use crate::card::{Cake, Letter, Toasts, LOCKED_MESSAGE, LOCK_BANNER};
use crate::clock::{Clock, Moment};
use crate::config::CardConfig;
use crate::countdown::{Countdown, Remaining, TimeLeft, ARRIVED_MESSAGE};
use crate::gallery::{is_placeholder, Gallery, ImageProbe};
use crate::input::{AppEvent, Key};
use crate::music::{PlaybackOutcome, Player, ToggleOutcome};
use crate::music::player::MISSING_SONG_MESSAGE;
use crate::particles::{
    Balloons, Confetti, Effect, Fireworks, FloatingHearts, HeartExplosion, Sparkles, Sprite, Viewport,
};
use crate::platform::AudioSystem;
use crate::schedule::{Ticker, Timeline};
use crate::state::{AppState, Screen};
use crate::view::{
    ButtonView, CakeView, CountdownView, GalleryView, LetterView, LightboxView, SlotView, Snapshot, StartView,
};
use std::time::Duration;

/// Countdown refresh interval
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Lets the card settle on screen before the celebration starts
pub const CELEBRATION_DELAY: Duration = Duration::from_millis(300);

/// Welcome screen fade before the card appears
pub const OPENING_FADE: Duration = Duration::from_millis(500);

pub const START_WAIT_TITLE: &str = "Please wait for the countdown to finish!";

pub const SURPRISE_MESSAGES: [&str; 4] = [
    "🎉 SURPRISE! You are AMAZING! 🎉",
    "✨ You light up my world! ✨",
    "❤️ I love you more than words can say! ❤️",
    "🌟 You deserve all the happiness in the world! 🌟",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    Celebrate,
    RevealCard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Counting(TimeLeft),
    /// The target has passed; `celebrated_now` only on the tick that fired it
    Arrived { celebrated_now: bool },
}

struct Effects {
    confetti: Confetti,
    fireworks: Fireworks,
    hearts: FloatingHearts,
    balloons: Balloons,
    sparkles: Sparkles,
    explosion: HeartExplosion,
}

impl Effects {
    fn new(rng: &mut fastrand::Rng) -> Self {
        Self {
            confetti: Confetti::new(rng.u64(..)),
            fireworks: Fireworks::new(rng.u64(..)),
            hearts: FloatingHearts::new(rng.u64(..)),
            balloons: Balloons::new(rng.u64(..)),
            sparkles: Sparkles::new(),
            explosion: HeartExplosion::new(rng.u64(..)),
        }
    }

    fn all_mut(&mut self) -> [&mut dyn Effect; 6] {
        [
            &mut self.confetti,
            &mut self.fireworks,
            &mut self.hearts,
            &mut self.balloons,
            &mut self.sparkles,
            &mut self.explosion,
        ]
    }

    fn all(&self) -> [&dyn Effect; 6] {
        [
            &self.balloons,
            &self.hearts,
            &self.confetti,
            &self.fireworks,
            &self.explosion,
            &self.sparkles,
        ]
    }
}

pub struct Controller<C: Clock> {
    clock: C,
    config: CardConfig,
    state: AppState,
    countdown: Countdown,
    ticker: Ticker,
    timeline: Timeline<Deferred>,
    opening_since: Option<Duration>,
    viewport: Viewport,
    audio: AudioSystem,
    player: Player,
    cake: Option<Cake>,
    letter: Letter,
    toasts: Toasts,
    gallery: Option<Gallery>,
    effects: Effects,
    rng: fastrand::Rng,
}

impl<C: Clock> Controller<C> {
    /// Wire everything up and run the first countdown tick
    pub fn bootstrap(
        clock: C,
        config: CardConfig,
        audio: AudioSystem,
        viewport: Viewport,
        probe: &dyn ImageProbe,
        seed: u64,
    ) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let effects = Effects::new(&mut rng);
        let player = Player::new(config.song.clone(), rng.u64(..));
        let cake = config.elements.cake.then(|| Cake::new(config.candles));

        let gallery = (config.elements.gallery && !config.photos.is_empty()).then(|| {
            let mut gallery = Gallery::new(config.photos.clone(), config.gallery_note.clone());
            gallery.assign_indices();
            let replaced = gallery.add_fallbacks(probe);
            if replaced > 0 {
                log::info!("{} photo(s) replaced by placeholders", replaced);
            }
            gallery.optimize_layout();
            gallery
        });

        let mut state = AppState::new();
        if config.early_entry || !config.lock_until_birthday {
            state.enable_start();
        }

        let mut controller = Self {
            countdown: Countdown::new(config.birthday),
            clock,
            config,
            state,
            ticker: Ticker::new(TICK_INTERVAL),
            timeline: Timeline::new(),
            opening_since: None,
            viewport,
            audio,
            player,
            cake,
            letter: Letter::new(),
            toasts: Toasts::new(),
            gallery,
            effects,
            rng,
        };

        log::info!(
            "Card for {} counting down to {}",
            controller.config.name,
            controller.countdown.target()
        );

        // A page opened after the target unlocks on this very first tick
        let now = controller.clock.now();
        if controller.ticker.poll(now.elapsed) {
            controller.tick();
        }
        controller
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn audio(&self) -> &AudioSystem {
        &self.audio
    }

    pub fn cake(&self) -> Option<&Cake> {
        self.cake.as_ref()
    }

    pub fn letter(&self) -> &Letter {
        &self.letter
    }

    pub fn toasts(&self) -> &Toasts {
        &self.toasts
    }

    pub fn gallery(&self) -> Option<&Gallery> {
        self.gallery.as_ref()
    }

    pub fn confetti(&self) -> &Confetti {
        &self.effects.confetti
    }

    pub fn fireworks(&self) -> &Fireworks {
        &self.effects.fireworks
    }

    pub fn hearts(&self) -> &FloatingHearts {
        &self.effects.hearts
    }

    pub fn balloons(&self) -> &Balloons {
        &self.effects.balloons
    }

    pub fn sparkles(&self) -> &Sparkles {
        &self.effects.sparkles
    }

    pub fn explosion(&self) -> &HeartExplosion {
        &self.effects.explosion
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Recompute the countdown now
    pub fn tick(&mut self) -> TickOutcome {
        let now = self.clock.now();
        let remaining = self.countdown.remaining(now.wall);
        self.state.set_countdown(remaining);

        match remaining {
            Remaining::Pending(left) => {
                log::trace!("Countdown: {}", left);
                TickOutcome::Counting(left)
            }
            Remaining::Arrived => {
                self.state.enable_start();
                TickOutcome::Arrived {
                    celebrated_now: self.celebrate_birthday(now),
                }
            }
        }
    }

    fn celebrate_birthday(&mut self, now: Moment) -> bool {
        if !self.state.try_mark_celebrated() {
            return false;
        }
        log::info!("Celebration triggered");
        self.unlock_card(now);
        self.timeline.schedule(now.elapsed + CELEBRATION_DELAY, Deferred::Celebrate);
        true
    }

    fn run_celebration(&mut self, now: Moment) {
        self.state.record_celebration();
        self.effects.confetti.launch(self.viewport);
        self.effects.fireworks.trigger(now.elapsed);
        self.toasts
            .push(format!("🎉 Happy Birthday {}! 🎉", self.config.name.trim()), now.elapsed);

        match self.player.play_with_fallback(&mut self.audio) {
            PlaybackOutcome::Primary => log::info!("Celebration song: file"),
            PlaybackOutcome::Fallback => log::info!("Celebration song: synthesized melody"),
            PlaybackOutcome::Silent => log::warn!("Celebration song: no audio"),
        }
    }

    fn unlock_card(&mut self, now: Moment) {
        if self.state.release_lock() {
            log::info!("Card unlocked");
        }
        if self.state.screen == Screen::Card {
            self.start_decorations(now);
        }
    }

    fn start_decorations(&mut self, now: Moment) {
        self.effects.hearts.start(now.elapsed);
        self.effects.balloons.start(now.elapsed);
    }

    /// Decide the lock once the card is on screen
    pub fn apply_lock_state(&mut self) {
        let now = self.clock.now();
        if !self.config.lock_until_birthday || self.countdown.has_arrived(now.wall) {
            self.unlock_card(now);
        } else if self.state.engage_lock() {
            log::info!("Card locked until {}", self.countdown.target());
        }
    }

    /// The start button: begin music and fade into the card
    pub fn start(&mut self) -> bool {
        if !self.config.elements.start_button || self.state.screen != Screen::Welcome {
            return false;
        }
        if !self.state.start_enabled() {
            log::debug!("Start pressed while disabled");
            return false;
        }

        let now = self.clock.now();
        let outcome = self.player.play_with_fallback(&mut self.audio);
        log::info!("Opening card, music: {:?}", outcome);

        self.state.screen = Screen::Opening;
        self.opening_since = Some(now.elapsed);
        self.timeline.schedule(now.elapsed + OPENING_FADE, Deferred::RevealCard);
        true
    }

    fn reveal_card(&mut self) {
        self.state.screen = Screen::Card;
        self.opening_since = None;
        self.effects.confetti.launch(self.viewport);
        log::info!("Card revealed");
        self.apply_lock_state();
    }

    /// Shows the locked notice and returns true while the card is locked
    fn blocked_by_lock(&mut self) -> bool {
        if self.state.is_locked() {
            let now = self.clock.now();
            self.toasts.push(LOCKED_MESSAGE, now.elapsed);
            return true;
        }
        false
    }

    fn on_card(&self) -> bool {
        self.state.screen == Screen::Card
    }

    pub fn blow_candles(&mut self) -> bool {
        if !self.on_card() || self.cake.is_none() || self.blocked_by_lock() {
            return false;
        }
        let now = self.clock.now();
        if let Some(cake) = &mut self.cake {
            if cake.blow_out(now.elapsed) {
                log::info!("Candles blown out");
            }
        }
        self.effects.confetti.launch(self.viewport);
        self.effects.fireworks.trigger(now.elapsed);
        true
    }

    pub fn toggle_music(&mut self) -> bool {
        if !self.on_card() || !self.config.elements.music_button || self.blocked_by_lock() {
            return false;
        }
        let now = self.clock.now();
        match self.player.toggle(&mut self.audio) {
            ToggleOutcome::Playing | ToggleOutcome::Paused => true,
            ToggleOutcome::Unavailable => {
                self.toasts.push(MISSING_SONG_MESSAGE, now.elapsed);
                false
            }
        }
    }

    /// One of four surprises, picked at random
    pub fn surprise(&mut self) -> Option<usize> {
        if !self.on_card() || !self.config.elements.surprise_button || self.blocked_by_lock() {
            return None;
        }
        let now = self.clock.now();
        let choice = self.rng.usize(0..SURPRISE_MESSAGES.len());
        match choice {
            0 => self.effects.confetti.launch(self.viewport),
            1 => self.effects.fireworks.trigger(now.elapsed),
            2 => self.effects.explosion.trigger(now.elapsed),
            _ => {
                self.effects.confetti.launch(self.viewport);
                self.effects.fireworks.trigger(now.elapsed);
            }
        }
        self.toasts.push(SURPRISE_MESSAGES[choice], now.elapsed);
        Some(choice)
    }

    pub fn show_letter(&mut self) -> bool {
        if !self.on_card() || !self.config.elements.letter_button || self.blocked_by_lock() {
            return false;
        }
        let now = self.clock.now();
        self.letter.show();
        self.effects.explosion.trigger(now.elapsed);
        true
    }

    pub fn hide_letter(&mut self) -> bool {
        let now = self.clock.now();
        self.letter.hide(now.elapsed)
    }

    /// Start the drum loop; a second press while it plays does nothing
    pub fn dance(&mut self) -> bool {
        if !self.on_card() || self.blocked_by_lock() {
            return false;
        }
        let now = self.clock.now();
        self.player.play_celebration_loop(&mut self.audio, now.elapsed)
    }

    /// A click anywhere on the card leaves a sparkle
    pub fn click(&mut self, x: f32, y: f32) -> bool {
        if !self.on_card() {
            return false;
        }
        let now = self.clock.now();
        self.effects.sparkles.spawn(x, y, now.elapsed);
        true
    }

    /// Open the lightbox on the `index`th visible photo
    pub fn open_photo(&mut self, index: usize) -> bool {
        if !self.on_card() {
            return false;
        }
        match &mut self.gallery {
            Some(gallery) => gallery.open_lightbox(index),
            None => false,
        }
    }

    fn lightbox_listening(&self) -> bool {
        self.gallery
            .as_ref()
            .and_then(Gallery::lightbox)
            .map(|lightbox| lightbox.is_listening())
            .unwrap_or(false)
    }

    /// Route one input event. Returns whether anything reacted.
    pub fn handle_event(&mut self, event: AppEvent) -> bool {
        if event.is_interaction() && self.player.retry_on_interaction(&mut self.audio) {
            log::debug!("Song retried on user interaction");
        }

        match event {
            AppEvent::Resize(viewport) => {
                self.viewport = viewport;
                true
            }
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Click { x, y } => self.click(x, y),
            AppEvent::TouchStart { x } => self
                .gallery
                .as_mut()
                .and_then(Gallery::lightbox_mut)
                .map(|lightbox| lightbox.touch_start(x))
                .unwrap_or(false),
            AppEvent::TouchEnd { x } => self
                .gallery
                .as_mut()
                .and_then(Gallery::lightbox_mut)
                .map(|lightbox| lightbox.touch_end(x))
                .unwrap_or(false),
        }
    }

    fn handle_key(&mut self, key: Key) -> bool {
        let now = self.clock.now();
        if self.lightbox_listening() {
            if let Some(lightbox) = self.gallery.as_mut().and_then(Gallery::lightbox_mut) {
                if lightbox.handle_key(&key, now.elapsed) {
                    return true;
                }
            }
        }

        match key {
            Key::Enter => self.start(),
            Key::Escape | Key::Char('x') => self.hide_letter(),
            Key::Char('b') => self.blow_candles(),
            Key::Char('m') => self.toggle_music(),
            Key::Char('s') => self.surprise().is_some(),
            Key::Char('l') => self.show_letter(),
            Key::Char('d') => self.dance(),
            Key::Char(digit @ '1'..='9') => {
                let index = digit as usize - '1' as usize;
                self.open_photo(index)
            }
            Key::Left | Key::Right | Key::Char(_) => false,
        }
    }

    /// Advance one frame: countdown, deferred actions, effects, widgets
    pub fn update(&mut self) {
        let now = self.clock.now();

        if self.ticker.poll(now.elapsed) {
            self.tick();
        }

        for action in self.timeline.drain_due(now.elapsed) {
            match action {
                Deferred::Celebrate => self.run_celebration(now),
                Deferred::RevealCard => self.reveal_card(),
            }
        }

        let viewport = self.viewport;
        for effect in self.effects.all_mut() {
            // Idle effects ask for no more frames
            if effect.is_active() {
                effect.update(now.elapsed, viewport);
            }
        }

        if let Some(cake) = &self.cake {
            log::trace!("Flames: {:?}", cake.flames(now.elapsed));
        }
        self.letter.update(now.elapsed);
        self.toasts.update(now.elapsed);
        if let Some(gallery) = &mut self.gallery {
            gallery.update(now.elapsed);
        }
        self.audio.pump();
        self.player.poll(&self.audio, now.elapsed);
    }

    /// Tear down before the card leaves the screen: decorations stop
    /// spawning and the output stream is stopped
    pub fn close(&mut self) {
        self.effects.hearts.stop();
        self.effects.balloons.stop();
        self.audio.suspend();
        log::info!("Card closed");
    }

    fn buttons(&self) -> Vec<ButtonView> {
        let elements = &self.config.elements;
        let mut buttons = Vec::new();
        if self.cake.is_some() {
            buttons.push(ButtonView {
                key: 'b',
                label: "🕯️ Blow candles",
            });
        }
        if elements.music_button {
            buttons.push(ButtonView {
                key: 'm',
                label: self.player.label(),
            });
        }
        if elements.surprise_button {
            buttons.push(ButtonView {
                key: 's',
                label: "🎁 Surprise",
            });
        }
        if elements.letter_button {
            buttons.push(ButtonView {
                key: 'l',
                label: "💌 Love letter",
            });
        }
        buttons.push(ButtonView {
            key: 'd',
            label: "💃 Dance",
        });
        buttons
    }

    /// Immutable picture of the current state for the view
    pub fn snapshot(&self) -> Snapshot {
        let now = self.clock.now();

        let countdown = if self.config.elements.countdown {
            self.state.countdown().map(|remaining| match remaining {
                Remaining::Pending(left) => CountdownView::Pending(left),
                Remaining::Arrived => CountdownView::Arrived(ARRIVED_MESSAGE),
            })
        } else {
            None
        };

        let start = self.config.elements.start_button.then(|| StartView {
            enabled: self.state.start_enabled(),
            title: if self.state.start_enabled() { "" } else { START_WAIT_TITLE },
        });

        let welcome_opacity = match self.opening_since {
            Some(since) => {
                1.0 - (now.elapsed.saturating_sub(since).as_secs_f32() / OPENING_FADE.as_secs_f32()).min(1.0)
            }
            None if self.state.screen == Screen::Welcome => 1.0,
            None => 0.0,
        };

        let gallery = self.gallery.as_ref().map(|gallery| GalleryView {
            slots: gallery
                .slots()
                .iter()
                .filter(|slot| !slot.hidden)
                .map(|slot| SlotView {
                    label: slot.alt.clone(),
                    index: slot.index,
                    placeholder: is_placeholder(slot),
                    wide: slot.wide,
                })
                .collect(),
            note: gallery.note().map(str::to_string),
            single: gallery.is_single(),
        });

        let lightbox = self.gallery.as_ref().and_then(Gallery::lightbox).map(|lightbox| {
            let item = lightbox.current_item();
            LightboxView {
                src: item.src.clone(),
                alt: item.alt.clone(),
                position: lightbox.current(),
                total: lightbox.len(),
                opacity: lightbox.opacity(now.elapsed),
            }
        });

        let letter = self.letter.is_visible().then(|| LetterView {
            paragraphs: self.config.letter.clone(),
            opacity: self.letter.opacity(now.elapsed),
        });

        let mut sprites: Vec<Sprite> = Vec::new();
        for effect in self.effects.all() {
            effect.draw(now.elapsed, self.viewport, &mut sprites);
        }

        Snapshot {
            screen: self.state.screen,
            viewport: self.viewport,
            name: self.config.name.clone(),
            headline: self.config.headline.clone(),
            message: self.config.message.clone(),
            welcome_opacity,
            countdown,
            start,
            lock_banner: self.state.is_locked().then_some(LOCK_BANNER),
            cake: self.cake.as_ref().map(|cake| CakeView {
                flames: cake.flames(now.elapsed),
                instruction: cake.instruction(),
            }),
            buttons: self.buttons(),
            letter,
            gallery,
            lightbox,
            toasts: self.toasts.visible(now.elapsed),
            sprites,
        }
    }
}
