//! Lost Orbit entry point
//!
//! Headless native runner: plays the opening drift, then a game driven by a
//! scripted key sequence, drawing every refresh into a vertex batch. An
//! optional first argument names a JSON config file.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;
    use std::thread;
    use std::time::{Duration, Instant};

    use lost_orbit::input::Key;
    use lost_orbit::renderer::VertexBatch;
    use lost_orbit::{ConfigError, GameConfig, GameSession};

    /// Display cadence (60 Hz)
    const REFRESH: Duration = Duration::from_micros(16_667);
    const ATTRACT_TIME: Duration = Duration::from_secs(2);
    const GAME_TIME: Duration = Duration::from_secs(30);

    /// Keys held from each offset (seconds) until the next entry
    const SCRIPT: &[(f64, &[Key])] = &[
        (0.0, &[]),
        (0.5, &[Key::Left]),
        (0.8, &[Key::Up]),
        (3.0, &[]),
        (5.0, &[Key::Space]),
        (9.0, &[Key::Right, Key::Up]),
        (9.4, &[]),
    ];

    fn held_at(elapsed: Duration) -> &'static [Key] {
        let t = elapsed.as_secs_f64();
        SCRIPT
            .iter()
            .take_while(|(from, _)| *from <= t)
            .last()
            .map(|(_, keys)| *keys)
            .unwrap_or(&[])
    }

    /// Pump one session until it ends or `limit` passes
    fn drive(
        session: &mut GameSession,
        limit: Duration,
        scripted: bool,
    ) -> Result<(), ConfigError> {
        let mut batch = VertexBatch::new();
        let start = Instant::now();
        session.start(start)?;

        loop {
            let now = Instant::now();
            let elapsed = now.duration_since(start);
            if elapsed >= limit || session.outcome().is_some() {
                break;
            }
            if scripted {
                let held = held_at(elapsed);
                let keys = session.keys();
                for key in Key::ALL {
                    keys.set(key, held.contains(&key));
                }
            }
            session.advance(now);
            session.render(&mut batch);
            thread::sleep(REFRESH);
        }

        let rates = session.scheduler().rates();
        log::info!(
            "{} fps, {} steps/s, last frame {} vertices ({} bytes)",
            rates.frames_per_second,
            rates.steps_per_second,
            batch.len(),
            batch.as_bytes().len()
        );
        session.stop();
        Ok(())
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        let config = match std::env::args().nth(1) {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        let mut opening = GameSession::attract(&config)?;
        drive(&mut opening, ATTRACT_TIME, false)?;

        let mut game = GameSession::new(&config)?;
        drive(&mut game, GAME_TIME, true)?;

        match game.outcome() {
            Some(outcome) => log::info!("outcome: {outcome}"),
            None => log::info!("no outcome after {}s", GAME_TIME.as_secs()),
        }
        if let (Some(fuel), Some(food)) = (game.fuel_level(), game.food_level()) {
            log::info!("fuel {:.1}%, food {:.1}%", fuel * 100.0, food * 100.0);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Lost Orbit (native) starting...");
    if let Err(err) = native::run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
