//! Game session orchestration
//!
//! One `GameSession` per play-through. It owns the session state, drives the
//! paced single-threaded loop (sample -> tick -> feedback -> draw -> sleep)
//! and runs the end-of-game flow. Every pause blocks the whole loop: nothing
//! is sampled and no zombie ages while a cue or banner plays.

use serde::{Deserialize, Serialize};

use crate::consts::LEVEL_BANNER_SECS;
use crate::feedback::{Cue, FeedbackSink};
use crate::highscores::{Leaderboard, ScoreRecord};
use crate::hud::{Frame, Presenter, clamp_page_start, level_banner};
use crate::name_entry::NameSource;
use crate::platform::{Clock, SensorRig};
use crate::settings::Settings;
use crate::sim::{GameEvent, Outcome, SessionState, SessionStats, TickInput, tick};

/// How long an end screen waits for a press before moving on
pub const CONTINUE_TIMEOUT_SECS: f32 = 30.0;
const PROMPT_POLL_SECS: f32 = 0.01;

/// The handheld's collaborators
pub struct Device {
    pub sensors: SensorRig,
    pub clock: Box<dyn Clock>,
    pub feedback: Box<dyn FeedbackSink>,
    pub presenter: Box<dyn Presenter>,
}

/// Which end-of-game branch runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ending {
    /// All 10 levels survived - special ending, then scores
    Cleared,
    /// Died or timed out without ever pulling the trigger
    NoShotFired,
    /// Normal game over screen, then scores
    GameOver(Outcome),
}

impl Ending {
    /// Cleared wins over the no-shot check; no-shot only applies otherwise
    pub fn resolve(outcome: Outcome, shot_fired: bool) -> Self {
        match outcome {
            Outcome::Cleared => Ending::Cleared,
            _ if !shot_fired => Ending::NoShotFired,
            other => Ending::GameOver(other),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Ending::Cleared => "ALL LEVELS CLEARED",
            Ending::NoShotFired => "SECRET MODE! No bullet fired.",
            Ending::GameOver(outcome) => outcome.as_str(),
        }
    }

    /// Whether the player may enter the leaderboard afterwards
    pub fn offers_submission(&self) -> bool {
        !matches!(self, Ending::NoShotFired)
    }
}

/// Summary handed back once a session is over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub seed: u64,
    pub outcome: Outcome,
    pub ending: Ending,
    pub score: u32,
    pub level: u8,
    pub hp: u8,
    pub ticks: u64,
    pub stats: SessionStats,
    /// Name and rank if the score was submitted and kept
    pub entry: Option<(String, usize)>,
}

/// One play-through
pub struct GameSession<'d> {
    device: &'d mut Device,
    settings: Settings,
    state: SessionState,
    ticks: u64,
}

impl<'d> GameSession<'d> {
    /// Level 1 banner, start jingle, then a fresh session state
    pub fn start(device: &'d mut Device, settings: Settings) -> Self {
        device.presenter.banner(&level_banner(1));
        device.clock.sleep(LEVEL_BANNER_SECS);
        play_cue(device, Cue::GameStart);

        let seed = settings.seed.unwrap_or_else(seed_from_time);
        let now = device.clock.now();
        let mut state =
            SessionState::new(settings.difficulty, settings.effective_level_count(), seed, now);
        state.prime_sound(device.sensors.read_quiet());

        log::info!(
            "Game started; difficulty {} ({} levels, seed {})",
            settings.difficulty.as_str(),
            settings.effective_level_count(),
            seed
        );

        Self {
            device,
            settings,
            state,
            ticks: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    /// Run one loop iteration. Returns false once the session has ended.
    pub fn step(&mut self) -> bool {
        if self.state.is_over() {
            return false;
        }
        let device = &mut *self.device;

        let now = device.clock.now();
        let sample = device.sensors.sample(now);
        let input = TickInput {
            now,
            tilt: sample.tilt,
            touch: sample.touch,
            quiet: sample.quiet,
            trigger: sample.trigger,
            tone_active: device.feedback.tone_active(),
        };
        let events = tick(&mut self.state, &input);
        self.ticks += 1;

        let mut info = None;
        for event in &events {
            if let GameEvent::LevelUp { level } = event {
                device.presenter.banner(&level_banner(*level));
                let before = device.clock.now();
                device.clock.sleep(LEVEL_BANNER_SECS);
                // The new level starts once the banner is gone
                self.state.shift_clock(device.clock.now() - before);
            }
            if let Some(cue) = Cue::for_event(event) {
                info = info.or(cue.banner());
                play_cue(device, cue);
            }
        }

        let mut frame = Frame::from_state(&self.state, device.clock.now());
        frame.info = info;
        device.presenter.draw(&frame);

        if self.state.is_over() {
            return false;
        }
        device.clock.sleep(self.settings.effective_tick_interval());
        true
    }

    /// Loop until a terminal state, then run the ending and score submission
    pub fn run(mut self, leaderboard: &mut dyn Leaderboard, names: &mut dyn NameSource) -> SessionReport {
        loop {
            if let Some(outcome) = self.state.outcome() {
                return self.wrap_up(outcome, leaderboard, names);
            }
            self.step();
        }
    }

    /// End-of-game flow for a finished session; None while it is still running
    pub fn conclude(
        self,
        leaderboard: &mut dyn Leaderboard,
        names: &mut dyn NameSource,
    ) -> Option<SessionReport> {
        let outcome = self.state.outcome()?;
        Some(self.wrap_up(outcome, leaderboard, names))
    }

    fn wrap_up(
        self,
        outcome: Outcome,
        leaderboard: &mut dyn Leaderboard,
        names: &mut dyn NameSource,
    ) -> SessionReport {
        let state = self.state;
        let ending = Ending::resolve(outcome, state.shot_fired);
        let device = self.device;

        device.presenter.ending(ending, state.score);
        // A trigger still down from the last shot must not leak into name entry
        wait_for_continue(device, |_| {});

        let mut entry = None;
        if ending.offers_submission() {
            if leaderboard.can_enter_leaderboard(state.score) {
                let name = names.enter_name(&mut device.sensors, device.clock.as_mut());
                match leaderboard.add_score(&name, state.score) {
                    Ok(Some(rank)) => {
                        log::info!("Saved score: {} {} (rank {})", name, state.score, rank);
                        entry = Some((name, rank));
                    }
                    Ok(None) => log::info!("Score {} fell off the table", state.score),
                    Err(e) => log::error!("Failed to save score: {e}"),
                }
            } else {
                log::info!("Score not high enough for leaderboard: {}", state.score);
            }
            show_leaderboard(device, leaderboard.records());
        } else {
            log::info!("Easter egg: no shot fired this round!");
        }

        let report = SessionReport {
            seed: state.seed,
            outcome,
            ending,
            score: state.score,
            level: state.level(),
            hp: state.hp,
            ticks: self.ticks,
            stats: state.stats,
            entry,
        };
        log::info!(
            "Session report: {:?}, score {}, level {}, {} kills, {} shots",
            report.ending,
            report.score,
            report.level,
            report.stats.kills(),
            report.stats.shots
        );
        report
    }
}

/// Where a "press to continue" prompt is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prompt {
    /// Button still down from before the prompt
    AwaitRelease,
    AwaitPress,
    AwaitLetGo,
}

/// Block until a full press and release of the trigger, calling `on_poll`
/// every poll. Gives up after `CONTINUE_TIMEOUT_SECS`; returns whether the
/// player pressed.
fn wait_for_continue(device: &mut Device, mut on_poll: impl FnMut(&mut Device)) -> bool {
    let deadline = device.clock.now() + CONTINUE_TIMEOUT_SECS;
    let mut prompt = Prompt::AwaitRelease;
    loop {
        on_poll(device);
        let held = device.sensors.button_held();
        prompt = match (prompt, held) {
            (Prompt::AwaitRelease, false) => Prompt::AwaitPress,
            (Prompt::AwaitPress, true) => Prompt::AwaitLetGo,
            (Prompt::AwaitLetGo, false) => return true,
            (prompt, _) => prompt,
        };
        if device.clock.now() >= deadline {
            log::info!("No input, moving on");
            return false;
        }
        device.clock.sleep(PROMPT_POLL_SECS);
    }
}

/// Leaderboard screen: the encoder scrolls, a press leaves
fn show_leaderboard(device: &mut Device, records: &[ScoreRecord]) {
    let mut start = 0;
    device.presenter.leaderboard(records, start);
    wait_for_continue(device, |device| {
        let delta = device.sensors.read_rotary();
        if delta == 0 {
            return;
        }
        let next = clamp_page_start(start as i32 + delta, records.len());
        if next != start {
            start = next;
            device.presenter.leaderboard(records, start);
        }
    });
}

/// Play a cue and block for its length
fn play_cue(device: &mut Device, cue: Cue) {
    device.feedback.play(cue);
    device.clock.sleep(cue.duration());
}

fn seed_from_time() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::LogFeedback;
    use crate::highscores::HighScores;
    use crate::hud::LogPresenter;
    use crate::name_entry::{EncoderNameInput, FixedName};
    use crate::platform::ManualClock;
    use crate::platform::fake::{Script, ScriptedRig};
    use crate::settings::Difficulty;
    use glam::Vec3;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn device(script: &Script) -> Device {
        Device {
            sensors: ScriptedRig::rig(script),
            clock: Box::new(ManualClock::new()),
            feedback: Box::new(LogFeedback::new()),
            presenter: Box::new(LogPresenter::default()),
        }
    }

    fn settings(difficulty: Difficulty, levels: u8) -> Settings {
        Settings {
            level_count: levels,
            seed: Some(42),
            ..Settings::with_difficulty(difficulty)
        }
    }

    #[test]
    fn test_ending_resolution() {
        assert_eq!(Ending::resolve(Outcome::Cleared, false), Ending::Cleared);
        assert_eq!(Ending::resolve(Outcome::Dead, false), Ending::NoShotFired);
        assert_eq!(Ending::resolve(Outcome::TimeUpAtCap, false), Ending::NoShotFired);
        assert_eq!(Ending::resolve(Outcome::Dead, true), Ending::GameOver(Outcome::Dead));
        assert!(!Ending::NoShotFired.offers_submission());
        assert!(Ending::Cleared.offers_submission());
    }

    #[test]
    fn test_idle_session_takes_secret_ending() {
        let script = Script::default();
        let mut device = device(&script);
        let mut board = HighScores::new();
        let report = GameSession::start(&mut device, settings(Difficulty::Normal, 10))
            .run(&mut board, &mut FixedName("AAA".into()));

        assert_eq!(report.outcome, Outcome::Dead);
        assert_eq!(report.ending, Ending::NoShotFired);
        assert_eq!(report.hp, 0);
        assert!(report.entry.is_none());
        assert!(board.is_empty());
    }

    #[test]
    fn test_shielded_run_clears_all_levels() {
        let script = Script::default();
        script.set_touch(true);
        let mut device = device(&script);
        let mut board = HighScores::new();
        let report = GameSession::start(&mut device, settings(Difficulty::Easy, 10))
            .run(&mut board, &mut FixedName("TOM".into()));

        assert_eq!(report.outcome, Outcome::Cleared);
        assert_eq!(report.ending, Ending::Cleared);
        assert_eq!(report.level, 10);
        assert_eq!(report.hp, 3);
        // Shield kills on the later levels score points
        assert_eq!(report.score, report.stats.shield_kills);
        if report.score > 0 {
            assert_eq!(report.entry, Some(("TOM".to_string(), 1)));
            assert_eq!(board.top_score(), Some(report.score));
        }
    }

    #[test]
    fn test_blocked_trigger_is_not_a_shot() {
        let script = Script::default();
        script.set_touch(true);
        script.set_button(true);
        let mut device = device(&script);
        let mut session = GameSession::start(&mut device, settings(Difficulty::Easy, 1));
        // Held since power-up: not a press
        for _ in 0..5 {
            session.step();
        }
        assert_eq!(session.state().stats.blocked_shots, 0);

        script.set_button(false);
        for _ in 0..5 {
            session.step();
        }
        script.set_button(true);
        for _ in 0..10 {
            session.step();
        }
        assert!(!session.state().shot_fired);
        assert_eq!(session.state().stats.blocked_shots, 1);
        assert_eq!(session.state().score, 0);
    }

    #[test]
    fn test_short_run_times_up_and_submits() {
        let script = Script::default();
        script.set_touch(true);
        let mut device = device(&script);
        let mut session = GameSession::start(&mut device, settings(Difficulty::Easy, 1));

        // Drop the shield, fire once at the centre
        script.set_touch(false);
        session.step();
        script.set_button(true);
        for _ in 0..5 {
            session.step();
        }
        script.set_button(false);
        script.set_touch(true);
        while session.step() {}

        let mut board = HighScores::new();
        board.insert("OLD", 1);
        let report = session
            .conclude(&mut board, &mut FixedName("NEW".into()))
            .unwrap();
        assert_eq!(report.outcome, Outcome::TimeUpAtCap);
        assert_eq!(report.stats.shots, 1);
        assert_eq!(report.ending, Ending::GameOver(Outcome::TimeUpAtCap));
        if report.score > 0 {
            // Equal scores keep the older record first
            assert_eq!(report.entry, Some(("NEW".to_string(), 2)));
            assert_eq!(board.records()[1].name, "NEW");
        } else {
            assert_eq!(board.records().len(), 1);
        }
    }

    #[test]
    fn test_level_banner_pause_is_rebased() {
        let script = Script::default();
        script.set_touch(true);
        script.set_tilt(Vec3::new(0.0, 0.0, 9.8));
        let mut device = device(&script);
        let mut session = GameSession::start(&mut device, settings(Difficulty::Normal, 10));
        while session.state().level() == 1 {
            session.step();
        }
        let state = session.state();
        assert_eq!(state.level(), 2);
        // Fresh zombies and the countdown start together after the banner
        assert!(state.zombies.iter().all(|z| z.spawned_at == state.timer.started_at));
        // The shield may already have taken one T zombie this tick
        assert!(state.zombies.len() >= 3);
    }

    #[test]
    fn test_conclude_needs_finished_session() {
        let script = Script::default();
        let mut device = device(&script);
        let session = GameSession::start(&mut device, settings(Difficulty::Easy, 1));
        let mut board = HighScores::new();
        assert!(session.conclude(&mut board, &mut FixedName("AAA".into())).is_none());
        assert!(board.is_empty());
    }

    #[test]
    fn test_trigger_held_at_game_over_skips_name_entry_press() {
        let script = Script::default();
        let mut device = device(&script);
        let mut session = GameSession::start(&mut device, settings(Difficulty::Easy, 1));
        session.state.shot_fired = true;
        session.state.score = 5;
        session.state.finish(Outcome::Dead);

        // Still firing when the game ends, let go, then press to continue
        script.queue_button([true; 10]);
        script.queue_button([false; 5]);
        script.queue_button([true; 5]);
        // Three idle polls while the encoder turns to D, then a long press
        script.queue_button([false; 4]);
        script.queue_rotary([2, 2, 2]);
        script.queue_button([true; 80]);

        let mut board = HighScores::new();
        let report = session
            .conclude(&mut board, &mut EncoderNameInput::default())
            .unwrap();
        assert_eq!(report.ending, Ending::GameOver(Outcome::Dead));
        assert_eq!(report.entry, Some(("D".to_string(), 1)));
        assert_eq!(board.records()[0].name, "D");
    }

    #[test]
    fn test_continue_prompt_times_out() {
        let script = Script::default();
        let mut device = device(&script);
        assert!(!wait_for_continue(&mut device, |_| {}));
        assert!(device.clock.now() >= CONTINUE_TIMEOUT_SECS);
    }

    #[derive(Default, Clone)]
    struct Pages(Rc<RefCell<Vec<usize>>>);

    impl Presenter for Pages {
        fn draw(&mut self, _frame: &Frame) {}
        fn banner(&mut self, _text: &str) {}
        fn ending(&mut self, _ending: Ending, _score: u32) {}
        fn leaderboard(&mut self, _records: &[ScoreRecord], start: usize) {
            self.0.borrow_mut().push(start);
        }
    }

    #[test]
    fn test_leaderboard_scrolls_with_encoder() {
        let script = Script::default();
        let pages = Pages::default();
        let mut device = Device {
            presenter: Box::new(pages.clone()),
            ..device(&script)
        };
        let records: Vec<_> = (0..10)
            .map(|i| ScoreRecord {
                name: format!("P{i}"),
                score: 100 - i * 10,
            })
            .collect();

        script.queue_rotary([1, 1, 5, -1]);
        script.queue_button([false, false, false, false, true, false]);
        show_leaderboard(&mut device, &records);

        // Scrolling past the end stops at the last full page
        assert_eq!(*pages.0.borrow(), vec![0, 1, 2, 7, 6]);
    }
}
