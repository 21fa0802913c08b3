use birthday_card::app::{START_WAIT_TITLE, SURPRISE_MESSAGES};
use birthday_card::card::LOCKED_MESSAGE;
use birthday_card::gallery::ImageProbe;
use birthday_card::input::{AppEvent, Key};
use birthday_card::music::player::MISSING_SONG_MESSAGE;
use birthday_card::particles::{Effect, Viewport};
use birthday_card::platform::AudioSystem;
use birthday_card::state::{Lock, Screen};
use birthday_card::{CardConfig, Controller, ManualClock};
use chrono::{NaiveDate, NaiveDateTime};
use std::time::Duration;

struct NoImages;

impl ImageProbe for NoImages {
    fn loads(&self, _src: &str) -> bool {
        false
    }
}

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 12, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .unwrap()
}

fn card(clock: &ManualClock, config: CardConfig) -> Controller<ManualClock> {
    Controller::bootstrap(
        clock.clone(),
        config,
        AudioSystem::silent(),
        Viewport::from_cells(100, 40),
        &NoImages,
        11,
    )
}

fn early_entry() -> CardConfig {
    CardConfig {
        early_entry: true,
        song: None,
        ..CardConfig::default()
    }
}

fn latest_toast(card: &Controller<ManualClock>) -> Option<String> {
    card.toasts().latest().map(|toast| toast.text.clone())
}

/// Press start and let the welcome fade finish
fn open(clock: &ManualClock, card: &mut Controller<ManualClock>) {
    assert!(card.handle_event(AppEvent::Key(Key::Enter)));
    assert_eq!(card.state().screen, Screen::Opening);
    clock.advance(Duration::from_millis(600));
    card.update();
    assert_eq!(card.state().screen, Screen::Card);
}

#[test]
fn test_start_waits_for_the_countdown() {
    let clock = ManualClock::new(at(16, 12));
    let mut card = card(&clock, CardConfig::default());

    assert!(!card.start());
    assert_eq!(card.state().screen, Screen::Welcome);

    let start = card.snapshot().start.unwrap();
    assert!(!start.enabled);
    assert_eq!(start.title, START_WAIT_TITLE);
}

#[test]
fn test_early_card_is_locked() {
    let clock = ManualClock::new(at(16, 12));
    let mut card = card(&clock, early_entry());
    open(&clock, &mut card);

    assert_eq!(card.state().lock(), Lock::Locked);
    assert!(card.snapshot().lock_banner.is_some());

    assert!(!card.blow_candles());
    assert_eq!(latest_toast(&card).as_deref(), Some(LOCKED_MESSAGE));
    assert!(!card.cake().unwrap().is_blown_out());

    assert!(!card.show_letter());
    assert!(!card.letter().is_visible());
    assert!(card.surprise().is_none());
    assert!(!card.dance());
    assert!(!card.toggle_music());
    assert!(!card.hearts().is_running());
    assert!(!card.balloons().is_running());

    // Sparkles are never gated
    assert!(card.click(120.0, 80.0));
    assert_eq!(card.sparkles().len(), 1);
}

#[test]
fn test_midnight_unlocks_an_open_card() {
    let clock = ManualClock::new(at(16, 23));
    let mut card = card(&clock, early_entry());
    open(&clock, &mut card);
    assert!(card.state().is_locked());

    clock.set_wall(at(17, 0));
    clock.advance(Duration::from_secs(1));
    card.update();

    assert_eq!(card.state().lock(), Lock::Unlocked);
    assert!(card.hearts().is_running());
    assert!(card.balloons().is_running());
    assert!(card.snapshot().lock_banner.is_none());

    assert!(card.handle_event(AppEvent::Key(Key::Char('b'))));
    assert!(card.cake().unwrap().is_blown_out());

    card.close();
    assert!(!card.hearts().is_running());
    assert!(!card.balloons().is_running());
    assert!(!card.audio().is_running());
}

#[test]
fn test_disabled_lock_opens_straight_away() {
    let clock = ManualClock::new(at(1, 8));
    let config = CardConfig {
        lock_until_birthday: false,
        song: None,
        ..CardConfig::default()
    };
    let mut card = card(&clock, config);
    open(&clock, &mut card);

    assert_eq!(card.state().lock(), Lock::Unlocked);
    assert!(!card.state().has_celebrated());

    let choice = card.surprise().unwrap();
    assert_eq!(latest_toast(&card).as_deref(), Some(SURPRISE_MESSAGES[choice]));

    assert!(!card.toggle_music());
    assert_eq!(latest_toast(&card).as_deref(), Some(MISSING_SONG_MESSAGE));
}

#[test]
fn test_letter_opens_and_closes() {
    let clock = ManualClock::new(at(17, 10));
    let mut card = card(&clock, CardConfig::default());
    open(&clock, &mut card);

    assert!(card.handle_event(AppEvent::Key(Key::Char('l'))));
    assert!(card.letter().is_visible());
    assert!(card.explosion().is_active());

    assert!(card.handle_event(AppEvent::Key(Key::Escape)));
    assert!(card.letter().is_hiding());
    // Closing twice does nothing more
    assert!(!card.hide_letter());

    clock.advance(Duration::from_millis(600));
    card.update();
    assert!(!card.letter().is_visible());
    assert!(card.snapshot().letter.is_none());
}

#[test]
fn test_missing_elements_do_nothing() {
    let clock = ManualClock::new(at(17, 10));
    let mut config = CardConfig::default();
    config.elements.cake = false;
    config.elements.letter_button = false;
    config.elements.countdown = false;
    let mut card = card(&clock, config);
    open(&clock, &mut card);

    assert!(!card.blow_candles());
    assert!(!card.show_letter());
    let snapshot = card.snapshot();
    assert!(snapshot.cake.is_none());
    assert!(snapshot.countdown.is_none());
    assert!(snapshot.buttons.iter().all(|button| button.key != 'b' && button.key != 'l'));
}
