//! Render requests for the presentation layer
//!
//! The core never formats pixels. Each tick it hands the presenter a `Frame`
//! of named values; banners and end screens go through the same trait.

use glam::IVec2;

use crate::highscores::ScoreRecord;
use crate::session::Ending;
use crate::sim::SessionState;

/// Lines visible at once on the leaderboard screen
pub const LEADERBOARD_PAGE_LINES: usize = 3;

/// One zombie as drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub glyph: char,
    pub pos: IVec2,
    pub visible: bool,
}

/// Everything on the in-game screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub score: u32,
    pub hp: u8,
    /// Whole seconds left in the level
    pub remaining_secs: u32,
    pub crosshair: IVec2,
    pub zombies: Vec<Sprite>,
    /// Difficulty initial and level, e.g. "N L3"
    pub state_banner: String,
    /// Transient info line ("SHIELD UP!")
    pub info: Option<&'static str>,
}

impl Frame {
    pub fn from_state(state: &SessionState, now: f32) -> Self {
        Self {
            score: state.score,
            hp: state.hp,
            remaining_secs: state.timer.remaining_display(now),
            crosshair: state.crosshair,
            zombies: state
                .zombies
                .iter()
                .map(|z| Sprite {
                    glyph: z.kind.glyph(),
                    pos: z.pos,
                    visible: z.visible,
                })
                .collect(),
            state_banner: state_banner(state),
            info: None,
        }
    }

    /// HUD row text ("S:4", "HP:3", "T: 7")
    pub fn hud_line(&self) -> String {
        format!("S:{} HP:{} T:{:2}", self.score, self.hp, self.remaining_secs)
    }
}

pub fn state_banner(state: &SessionState) -> String {
    format!("{} L{}", state.difficulty.initial(), state.level())
}

/// "LEVEL n" splash text
pub fn level_banner(level: u8) -> String {
    format!("LEVEL {level}")
}

/// Leaderboard rows as shown on screen ("1. AAA 30")
pub fn leaderboard_lines(records: &[ScoreRecord]) -> Vec<String> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {} {}", i + 1, r.name, r.score))
        .collect()
}

/// Rows of the page starting at `start` (ranks stay absolute)
pub fn leaderboard_page(records: &[ScoreRecord], start: usize) -> Vec<String> {
    leaderboard_lines(records)
        .into_iter()
        .skip(start)
        .take(LEADERBOARD_PAGE_LINES)
        .collect()
}

/// Clamp a scroll position so a full page stays visible
pub fn clamp_page_start(start: i32, total: usize) -> usize {
    if total <= LEADERBOARD_PAGE_LINES {
        return 0;
    }
    let max_start = (total - LEADERBOARD_PAGE_LINES) as i32;
    start.clamp(0, max_start) as usize
}

/// Draws what the core asks for
pub trait Presenter {
    /// In-game screen for this tick
    fn draw(&mut self, frame: &Frame);
    /// Full-screen banner (level splash)
    fn banner(&mut self, text: &str);
    /// End-of-session screen
    fn ending(&mut self, ending: Ending, score: u32);
    /// High score table, scrolled so row `start` is at the top
    fn leaderboard(&mut self, records: &[ScoreRecord], start: usize);
}

/// Presenter that logs instead of drawing (headless runs)
#[derive(Debug, Default)]
pub struct LogPresenter {
    pub frames: u64,
    pub last_frame: Option<Frame>,
    pub banners: Vec<String>,
    pub endings: Vec<Ending>,
}

impl Presenter for LogPresenter {
    fn draw(&mut self, frame: &Frame) {
        self.frames += 1;
        if self.last_frame.as_ref().map(|f| f.hud_line()) != Some(frame.hud_line()) {
            log::debug!("{} [{}]", frame.hud_line(), frame.state_banner);
        }
        self.last_frame = Some(frame.clone());
    }

    fn banner(&mut self, text: &str) {
        log::info!("== {text} ==");
        self.banners.push(text.to_string());
    }

    fn ending(&mut self, ending: Ending, score: u32) {
        log::info!("{} - score {}", ending.title(), score);
        self.endings.push(ending);
    }

    fn leaderboard(&mut self, records: &[ScoreRecord], start: usize) {
        if records.is_empty() {
            log::info!("HIGH SCORES: No records yet");
            return;
        }
        log::info!("HIGH SCORES");
        for line in leaderboard_page(records, start) {
            log::info!("  {line}");
        }
    }
}
