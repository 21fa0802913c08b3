//! Crossterm front end. Each frame is queued in full and flushed once.

use super::{CakeView, CountdownView, GalleryView, LetterView, LightboxView, Snapshot, View};
use crate::card::Flame;
use crate::particles::{Rgb, Sprite};
use crate::state::Screen;
use crossterm::{
    cursor::{self, MoveTo},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, BufWriter, Stdout, Write};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const TEXT: Rgb = (240, 234, 255);
const ACCENT: Rgb = (255, 107, 157);
const GOLD: Rgb = (255, 215, 0);
const MUTED: Rgb = (150, 140, 170);
const FLAME: Rgb = (255, 160, 40);

/// Scale a color toward black by `opacity`
fn faded(color: Rgb, opacity: f32) -> Color {
    let opacity = opacity.clamp(0.0, 1.0);
    let scale = |channel: u8| (channel as f32 * opacity).round() as u8;
    Color::Rgb {
        r: scale(color.0),
        g: scale(color.1),
        b: scale(color.2),
    }
}

/// Width in terminal cells; emoji take two
fn text_width(text: &str) -> u16 {
    UnicodeWidthStr::width(text).min(u16::MAX as usize) as u16
}

/// Keep as many leading characters as fit in `width` cells
fn clip(text: &str, width: u16) -> String {
    let mut used = 0;
    text.chars()
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= width as usize
        })
        .collect()
}

pub struct TerminalView {
    out: BufWriter<Stdout>,
    columns: u16,
    rows: u16,
    active: bool,
}

impl TerminalView {
    /// Switch the terminal into the card's full screen mode
    pub fn new() -> anyhow::Result<Self> {
        let (columns, rows) = terminal::size()?;
        let mut view = Self {
            out: BufWriter::new(io::stdout()),
            columns,
            rows,
            active: false,
        };
        enable_raw_mode()?;
        view.active = true;
        execute!(view.out, EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;
        log::debug!("Terminal view {}x{}", columns, rows);
        Ok(view)
    }

    pub fn size(&self) -> (u16, u16) {
        (self.columns, self.rows)
    }

    /// Put the terminal back the way we found it
    pub fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(self.out, ResetColor, cursor::Show, DisableMouseCapture, LeaveAlternateScreen)?;
        disable_raw_mode()
    }

    fn put(&mut self, column: u16, row: u16, text: &str, color: Color) -> io::Result<()> {
        if row >= self.rows || column >= self.columns {
            return Ok(());
        }
        let text = clip(text, self.columns - column);
        queue!(self.out, MoveTo(column, row), SetForegroundColor(color), Print(text))
    }

    fn centered(&mut self, row: u16, text: &str, color: Color) -> io::Result<()> {
        let column = self.columns.saturating_sub(text_width(text)) / 2;
        self.put(column, row, text, color)
    }

    fn countdown(&mut self, row: u16, countdown: &CountdownView, opacity: f32) -> io::Result<()> {
        match countdown {
            CountdownView::Pending(left) => {
                let text = format!(
                    "{:>3} days  {:02} hours  {:02} minutes  {:02} seconds",
                    left.days, left.hours, left.minutes, left.seconds
                );
                self.centered(row, &text, faded(GOLD, opacity))
            }
            CountdownView::Arrived(message) => self.centered(row, message, faded(GOLD, opacity)),
        }
    }

    fn welcome(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        let opacity = snapshot.welcome_opacity;
        let middle = self.rows / 2;

        self.centered(middle.saturating_sub(4), "🎁 A little something for you 🎁", faded(ACCENT, opacity))?;
        self.centered(middle.saturating_sub(2), &snapshot.name, faded(TEXT, opacity))?;
        if let Some(countdown) = &snapshot.countdown {
            self.countdown(middle, countdown, opacity)?;
        }
        if let Some(start) = &snapshot.start {
            if start.enabled {
                self.centered(middle + 2, "[Enter] Open your card ✨", faded(ACCENT, opacity))?;
            } else {
                self.centered(middle + 2, "[Enter] Open your card", faded(MUTED, opacity * 0.6))?;
                self.centered(middle + 3, start.title, faded(MUTED, opacity))?;
            }
        }
        Ok(())
    }

    fn cake(&mut self, row: u16, cake: &CakeView) -> io::Result<u16> {
        let mut flames = String::new();
        let mut candles = String::new();
        for flame in &cake.flames {
            flames.push_str(match flame {
                Flame::Lit => " 🔥 ",
                Flame::Fading(amount) if *amount < 0.5 => " 🔥 ",
                Flame::Fading(_) => " ~  ",
                Flame::Out => "    ",
            });
            candles.push_str(" || ");
        }
        let dim = cake
            .flames
            .iter()
            .map(|flame| match flame {
                Flame::Lit => 1.0,
                Flame::Fading(amount) => 1.0 - amount,
                Flame::Out => 0.0,
            })
            .fold(0.0f32, f32::max);

        self.centered(row, &flames, faded(FLAME, dim.max(0.2)))?;
        self.centered(row + 1, &candles, faded(TEXT, 1.0))?;
        self.centered(row + 2, "╭──────────────╮", faded(ACCENT, 1.0))?;
        self.centered(row + 3, "│  🎂  🎂  🎂  │", faded(ACCENT, 1.0))?;
        self.centered(row + 4, "╰──────────────╯", faded(ACCENT, 1.0))?;
        self.centered(row + 5, cake.instruction, faded(MUTED, 1.0))?;
        Ok(row + 7)
    }

    fn gallery(&mut self, row: u16, gallery: &GalleryView) -> io::Result<u16> {
        let mut row = row;
        if let Some(note) = &gallery.note {
            self.centered(row, note, faded(MUTED, 1.0))?;
            row += 1;
        }
        for slot in &gallery.slots {
            let number = slot.index.map(|i| format!("[{}]", i + 1)).unwrap_or_default();
            let kind = if slot.placeholder { "▢" } else { "▣" };
            let label = if slot.wide {
                format!("{} {} {} (full width)", number, kind, slot.label)
            } else {
                format!("{} {} {}", number, kind, slot.label)
            };
            self.centered(row, &label, faded(TEXT, if slot.placeholder { 0.6 } else { 1.0 }))?;
            row += 1;
        }
        Ok(row + 1)
    }

    fn card(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        let mut row = 1;
        let title = format!("🎉 {}, {}! 🎉", snapshot.headline, snapshot.name);
        self.centered(row, &title, faded(ACCENT, 1.0))?;
        row += 1;
        self.centered(row, &snapshot.message, faded(TEXT, 1.0))?;
        row += 1;
        if let Some(banner) = snapshot.lock_banner {
            self.centered(row, &format!("🔒 {}", banner), faded(GOLD, 1.0))?;
        }
        row += 1;
        if let Some(countdown) = &snapshot.countdown {
            self.countdown(row, countdown, 1.0)?;
        }
        row += 2;

        if let Some(cake) = &snapshot.cake {
            row = self.cake(row, cake)?;
        }

        let buttons: Vec<String> = snapshot
            .buttons
            .iter()
            .map(|button| format!("[{}] {}", button.key, button.label))
            .collect();
        self.centered(row, &buttons.join("   "), faded(TEXT, 1.0))?;
        row += 2;

        if let Some(gallery) = &snapshot.gallery {
            self.gallery(row, gallery)?;
        }

        let hint = "q quit · click for sparkles · 1-9 photos";
        self.centered(self.rows.saturating_sub(1), hint, faded(MUTED, 0.7))
    }

    fn letter(&mut self, letter: &LetterView) -> io::Result<()> {
        let width = self.columns.saturating_sub(8).min(64);
        let left = self.columns.saturating_sub(width) / 2;
        let top = self.rows.saturating_sub(letter.paragraphs.len() as u16 + 6) / 2;
        let color = faded(ACCENT, letter.opacity);
        let body = faded(TEXT, letter.opacity);

        let border = "─".repeat(width.saturating_sub(2) as usize);
        let blank = " ".repeat(width.saturating_sub(2) as usize);
        self.put(left, top, &format!("╭{}╮", border), color)?;
        let inner = top + 1;
        let lines = letter.paragraphs.len() as u16 + 3;
        for offset in 0..lines {
            self.put(left, inner + offset, &format!("│{}│", blank), color)?;
        }
        self.put(left, inner + lines, &format!("╰{}╯", border), color)?;

        self.put(left + 2, inner, "💌", color)?;
        for (i, paragraph) in letter.paragraphs.iter().enumerate() {
            let text = clip(paragraph, width.saturating_sub(4));
            self.put(left + 2, inner + 1 + i as u16, &text, body)?;
        }
        self.put(left + 2, inner + lines - 1, "[Esc] close", faded(MUTED, letter.opacity))
    }

    fn lightbox(&mut self, lightbox: &LightboxView) -> io::Result<()> {
        let middle = self.rows / 2;
        let color = faded(TEXT, lightbox.opacity);
        self.centered(middle.saturating_sub(2), &lightbox.alt, faded(ACCENT, lightbox.opacity))?;
        self.centered(middle, &lightbox.src, color)?;
        let position = format!("◀  {} / {}  ▶", lightbox.position + 1, lightbox.total);
        self.centered(middle + 2, &position, color)?;
        self.centered(middle + 3, "[Esc] close", faded(MUTED, lightbox.opacity))
    }

    fn toasts(&mut self, toasts: &[(String, f32)]) -> io::Result<()> {
        let base = self.rows.saturating_sub(3);
        for (i, (text, opacity)) in toasts.iter().rev().enumerate() {
            let Some(row) = base.checked_sub(i as u16) else {
                break;
            };
            self.centered(row, text, faded(GOLD, *opacity))?;
        }
        Ok(())
    }

    fn sprites(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        for sprite in &snapshot.sprites {
            self.sprite(snapshot, sprite)?;
        }
        Ok(())
    }

    fn sprite(&mut self, snapshot: &Snapshot, sprite: &Sprite) -> io::Result<()> {
        if sprite.opacity <= 0.05 {
            return Ok(());
        }
        match snapshot.viewport.to_cell(sprite.x, sprite.y) {
            Some((column, row)) => self.put(column, row, sprite.glyph, faded(sprite.color, sprite.opacity)),
            None => Ok(()),
        }
    }
}

impl View for TerminalView {
    fn render(&mut self, snapshot: &Snapshot) -> anyhow::Result<()> {
        let (columns, rows) = terminal::size()?;
        self.columns = columns;
        self.rows = rows;

        queue!(self.out, Clear(ClearType::All))?;
        match snapshot.screen {
            Screen::Welcome | Screen::Opening => self.welcome(snapshot)?,
            Screen::Card => self.card(snapshot)?,
        }
        if let Some(letter) = &snapshot.letter {
            self.letter(letter)?;
        }
        if let Some(lightbox) = &snapshot.lightbox {
            self.lightbox(lightbox)?;
        }
        self.toasts(&snapshot.toasts)?;
        self.sprites(snapshot)?;

        queue!(self.out, ResetColor)?;
        self.out.flush()?;
        Ok(())
    }
}

impl Drop for TerminalView {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            log::error!("Failed to restore terminal: {}", e);
        }
    }
}
