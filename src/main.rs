//! Zombie Hunter entry point
//!
//! Headless demo: plays one session against a scripted player on a virtual
//! clock and logs every screen. Settings come from `settings.json` or the
//! path given as the first argument.

use std::path::PathBuf;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use zombie_hunter::feedback::LogFeedback;
use zombie_hunter::hud::LogPresenter;
use zombie_hunter::name_entry::FixedName;
use zombie_hunter::platform::ManualClock;
use zombie_hunter::platform::fake::{Script, ScriptedRig};
use zombie_hunter::{Device, GameSession, ScoreFile, Settings};

fn main() {
    env_logger::init();
    log::info!("Zombie Hunter (headless demo) starting...");

    let settings_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("settings.json"));
    let settings = Settings::load(&settings_path);
    let mut scores = ScoreFile::open(settings.scores_path.clone());

    let script = Script::default();
    let mut device = Device {
        sensors: ScriptedRig::rig(&script),
        clock: Box::new(ManualClock::new()),
        feedback: Box::new(LogFeedback::new()),
        presenter: Box::new(LogPresenter::default()),
    };

    let mut player = DemoPlayer::new(settings.seed.unwrap_or(0x5eed));
    let mut session = GameSession::start(&mut device, settings);
    loop {
        player.act(&script);
        if !session.step() {
            break;
        }
    }

    // Let go of everything, then tap through the end screens
    script.set_button(false);
    script.set_touch(false);
    script.queue_button([false, true, true, false, false, true, true, false]);

    let Some(report) = session.conclude(&mut scores, &mut FixedName("CPU".into())) else {
        log::error!("Session stopped before it finished");
        return;
    };
    match serde_json::to_string(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to encode report: {e}"),
    }
}

/// Random but plausible input: drifts the tilt, taps the trigger and
/// occasionally raises the shield or shouts
struct DemoPlayer {
    rng: Pcg32,
    tilt: Vec3,
}

impl DemoPlayer {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            tilt: Vec3::new(0.0, 0.0, 9.8),
        }
    }

    fn act(&mut self, script: &Script) {
        self.tilt.x = (self.tilt.x + self.rng.random_range(-0.8..0.8)).clamp(-6.0, 6.0);
        self.tilt.y = (self.tilt.y + self.rng.random_range(-0.8..0.8)).clamp(-6.0, 6.0);
        script.set_tilt(self.tilt);
        script.set_button(self.rng.random_bool(0.3));
        script.set_touch(self.rng.random_bool(0.25));
        script.set_quiet(!self.rng.random_bool(0.05));
    }
}
