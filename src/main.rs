/* Birthday card in the terminal.

Counts down to the birthday, then unlocks the card and celebrates with
confetti, fireworks and music. Logs go to a file so they never tear the
drawn screen.
*/

use birthday_card::config::parse_birthday;
use birthday_card::gallery::FsProbe;
use birthday_card::input::{AppEvent, Key};
use birthday_card::particles::Viewport;
use birthday_card::platform::AudioSystem;
use birthday_card::utils::logging::init_logger;
use birthday_card::view::{TerminalView, View};
use birthday_card::{CardConfig, Controller, SystemClock};
use anyhow::Context;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};
use std::fs::File;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "birthday-card", version, about = "An animated birthday card for the terminal")]
struct Cli {
    /// Card description (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the birthday: YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS, local time
    #[arg(short, long)]
    birthday: Option<String>,

    /// Override the recipient's name
    #[arg(short, long)]
    name: Option<String>,

    /// Override the song file (WAV)
    #[arg(long)]
    song: Option<PathBuf>,

    /// Show the card without waiting for the birthday
    #[arg(long)]
    no_lock: bool,

    /// Allow opening the card early, in its locked state
    #[arg(long)]
    early_entry: bool,

    /// Run without opening an audio device
    #[arg(long)]
    mute: bool,

    /// Frames per second
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Seed for the animations and surprises
    #[arg(long)]
    seed: Option<u64>,

    /// Where log records go
    #[arg(long, default_value = "birthday-card.log")]
    log_file: PathBuf,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: log::LevelFilter,
}

impl Cli {
    fn card_config(&self) -> anyhow::Result<CardConfig> {
        let mut config = CardConfig::load_or_default(self.config.as_deref())?;
        if let Some(birthday) = &self.birthday {
            config.birthday = parse_birthday(birthday)?;
        }
        if let Some(name) = &self.name {
            config.name = name.clone();
        }
        if let Some(song) = &self.song {
            config.song = Some(song.clone());
        }
        if self.no_lock {
            config.lock_until_birthday = false;
        }
        if self.early_entry {
            config.early_entry = true;
        }
        Ok(config)
    }
}

fn audio_system(mute: bool) -> AudioSystem {
    if mute {
        log::info!("Audio muted");
        return AudioSystem::silent();
    }

    #[cfg(feature = "native")]
    {
        AudioSystem::new(Box::new(birthday_card::platform::CpalOutput::new()))
    }

    #[cfg(not(feature = "native"))]
    {
        log::warn!("Built without audio support");
        AudioSystem::silent()
    }
}

/// Translate a terminal event into the card's events; empty for events the
/// card ignores
fn translate(event: Event) -> Vec<AppEvent> {
    match event {
        Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
            let key = match code {
                KeyCode::Enter | KeyCode::Char(' ') => Key::Enter,
                KeyCode::Esc => Key::Escape,
                KeyCode::Left => Key::Left,
                KeyCode::Right => Key::Right,
                KeyCode::Char(c) => Key::Char(c.to_ascii_lowercase()),
                _ => return Vec::new(),
            };
            vec![AppEvent::Key(key)]
        }
        // A press and release pair doubles as a swipe for the lightbox
        Event::Mouse(MouseEvent { kind, column, row, .. }) => {
            let (x, y) = Viewport::from_cell(column, row);
            match kind {
                MouseEventKind::Down(_) => vec![AppEvent::Click { x, y }, AppEvent::TouchStart { x }],
                MouseEventKind::Up(_) => vec![AppEvent::TouchEnd { x }],
                _ => Vec::new(),
            }
        }
        Event::Resize(columns, rows) => vec![AppEvent::Resize(Viewport::from_cells(columns, rows))],
        _ => Vec::new(),
    }
}

fn is_quit(event: &Event) -> bool {
    match event {
        Event::Key(KeyEvent { code, modifiers, .. }) => {
            matches!(code, KeyCode::Char('q'))
                || (matches!(code, KeyCode::Char('c')) && modifiers.contains(KeyModifiers::CONTROL))
        }
        _ => false,
    }
}

fn run(cli: &Cli, view: &mut TerminalView) -> anyhow::Result<()> {
    let config = cli.card_config().context("failed to load the card")?;
    let audio = audio_system(cli.mute);
    let (columns, rows) = view.size();
    let probe = FsProbe::new(config.base_dir.clone());
    let seed = cli.seed.unwrap_or_else(|| fastrand::u64(..));
    log::info!("Seed {}", seed);

    let mut controller = Controller::bootstrap(
        SystemClock::new(),
        config,
        audio,
        Viewport::from_cells(columns, rows),
        &probe,
        seed,
    );

    let frame = Duration::from_secs_f64(1.0 / cli.fps.clamp(1, 240) as f64);
    loop {
        let started = Instant::now();

        controller.update();
        view.render(&controller.snapshot())?;

        // Drain input until the frame is used up
        while let Some(remaining) = frame.checked_sub(started.elapsed()) {
            if !event::poll(remaining)? {
                break;
            }
            let event = event::read()?;
            if is_quit(&event) {
                log::info!("Quit");
                controller.close();
                return Ok(());
            }
            for event in translate(event) {
                controller.handle_event(event);
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("failed to create log file {}", cli.log_file.display()))?;
    init_logger(cli.log_level, Some(Box::new(log_file)));

    let mut view = TerminalView::new().context("failed to set up the terminal")?;
    let result = run(&cli, &mut view);
    view.restore()?;

    if let Err(e) = &result {
        log::error!("{:#}", e);
    }
    result
}
