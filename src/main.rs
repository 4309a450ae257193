//! MRR Boat entry point
//!
//! The web build is driven from JS through `mrr_boat::web::BoatGame`. Natively
//! this runs a headless collect challenge with an autopilot that steers toward
//! the nearest coin, logging every event.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec3;

    use mrr_boat::sim::{Control, GameEvent, GameMode, Phase, World};
    use mrr_boat::{HighScores, Tuning, normalize_angle};

    /// 60 Hz frames
    const FRAME_MS: u64 = 16;

    /// Point the boat at the closest visible coin and sail
    fn autopilot(world: &mut World, now: u64) {
        let boat = world.boat.position;
        let target = world
            .coins
            .views(now)
            .into_iter()
            .map(|c| c.position)
            .min_by(|a, b| {
                a.distance_squared(boat)
                    .partial_cmp(&b.distance_squared(boat))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

        let pilot = &mut world.boat;
        pilot.controls = Default::default();
        let Some(target) = target else {
            return;
        };
        let to_target = target - boat;
        let desired = to_target.x.atan2(to_target.z);
        let error = normalize_angle(desired - pilot.heading);
        if error > 0.05 {
            pilot.set_control(Control::TurnLeft, true);
        } else if error < -0.05 {
            pilot.set_control(Control::TurnRight, true);
        }
        if error.abs() < 1.0 {
            pilot.set_control(Control::Forward, true);
        }
    }

    pub fn run(tuning_path: Option<String>) {
        let tuning = match tuning_path.map(std::fs::read_to_string) {
            Some(Ok(json)) => match Tuning::from_json(&json) {
                Ok(tuning) => tuning,
                Err(e) => {
                    log::error!("Invalid tuning file: {}", e);
                    return;
                }
            },
            Some(Err(e)) => {
                log::error!("Could not read tuning file: {}", e);
                return;
            }
            None => Tuning::default(),
        };

        let mut world = World::new(tuning, 12345);
        let mut now: u64 = 0;
        world.start_game(GameMode::CollectChallenge, now);

        while world.session.phase() != Phase::Ended {
            now += FRAME_MS;
            autopilot(&mut world, now);
            for event in world.frame(now, FRAME_MS as f32 / 1000.0) {
                match event {
                    GameEvent::CoinCollected(hit) => log::info!(
                        "+{} ({:?} coin {}) score={}",
                        hit.value,
                        hit.kind,
                        hit.id,
                        world.session.score()
                    ),
                    GameEvent::CountdownTick { remaining } if remaining > 0 => {
                        log::info!("{}...", remaining)
                    }
                    other => log::debug!("{:?}", other),
                }
            }
        }

        let boat: Vec3 = world.boat.position;
        log::info!(
            "Challenge over after {:.1}s: score {}, {} coins, boat at ({:.1}, {:.1})",
            now as f64 / 1000.0,
            world.session.score(),
            world.coins.collected_count(),
            boat.x,
            boat.z
        );

        let mut scores = HighScores::load();
        scores.record_run(&world, now as f64);
        scores.save();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("MRR Boat (headless) starting...");
    headless::run(std::env::args().nth(1));
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_start, this is just to satisfy the compiler
}
