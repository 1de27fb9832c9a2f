//! Ricochet Core headless driver
//!
//! Runs seeded aim-and-shoot rounds against the reference engine and logs
//! what the kernel predicts and how the balls settle. Useful for eyeballing
//! tuning changes without the game.
//!
//! Usage: `ricochet-core [config.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), ricochet_core::ConfigError> {
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use ricochet_core::GameConfig;
    use ricochet_core::consts::*;
    use ricochet_core::renderer::{aim_line, ball_marker, vertex::colors};
    use ricochet_core::sim::{AimInput, HeadlessGame, LaunchInput, StaticWorld, TickInput};

    /// Frames of aiming before each shot
    const AIM_FRAMES: u32 = 30;
    /// Give up on a round after this many sim ticks
    const MAX_ROUND_TICKS: u32 = 60 * 90;
    const ROUNDS: u32 = 6;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => GameConfig::load(&path)?,
        None => GameConfig::default(),
    };
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    log::info!("Ricochet Core headless run, seed {}", seed);

    let mut rng = Pcg32::seed_from_u64(seed);

    // Box arena with a short deflector in the middle
    let mut world = StaticWorld::rectangle(Vec2::new(-12.0, -8.0), Vec2::new(12.0, 8.0));
    world.add_wall(Vec2::new(-2.0, 3.0), Vec2::new(2.0, 1.0));

    let mut game = HeadlessGame::new(config, world)?;
    let balls: Vec<_> = (0..3)
        .map(|_| {
            let pos = Vec2::new(rng.random_range(-10.0..10.0), rng.random_range(-6.0..-1.0));
            game.spawn_ball(pos)
        })
        .collect();

    for round in 0..ROUNDS {
        let shooter = balls[round as usize % balls.len()];

        // Aim: sweep slightly around a random heading
        let heading = rng.random_range(0.0..std::f32::consts::TAU);
        let mut last_dir = Vec2::from_angle(heading);
        for frame in 0..AIM_FRAMES {
            last_dir = Vec2::from_angle(heading + frame as f32 * 0.002);
            let input = TickInput {
                aim: Some(AimInput {
                    ball: shooter,
                    direction: last_dir,
                }),
                ..Default::default()
            };
            let out = game.step(&input, SIM_DT);
            if frame + 1 == AIM_FRAMES {
                if let Some(path) = &out.aim_path {
                    let line_width = game.sim.config.aim.line_width;
                    let mut verts = aim_line(&out.aim_segments, line_width, colors::AIM_LINE);
                    if let Some(bounce) = path.reflection_point() {
                        verts.extend(ball_marker(bounce, line_width, colors::AIM_BOUNCE, 12));
                    }
                    log::info!(
                        "Round {}: {:?} aim path {:?} ({} segments, {} vertices)",
                        round,
                        shooter,
                        path.points(),
                        out.aim_segments.len(),
                        verts.len()
                    );
                }
            }
        }
        if let Some(planner) = game.sim.planner(shooter) {
            log::debug!("{:?} raycasts so far: {}", shooter, planner.raycast_count());
        }

        // Shoot
        let speed = rng.random_range(0.3..1.0) * game.sim.config.profile.max_speed;
        let launch = TickInput {
            launch: Some(LaunchInput {
                ball: shooter,
                velocity: last_dir * speed,
            }),
            ..Default::default()
        };
        game.step(&launch, SIM_DT);

        // Settle: variable frame times through a fixed-step accumulator
        let mut accumulator = 0.0f32;
        let mut ticks = 0u32;
        let mut boosts = 0usize;
        while !game.all_at_rest() && ticks < MAX_ROUND_TICKS {
            accumulator += rng.random_range(0.5..3.0) * SIM_DT;
            let mut substeps = 0;
            while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let out = game.step(&TickInput::default(), SIM_DT);
                boosts += out.boosts.len();
                for id in out.stopped {
                    log::info!("{:?} came to rest at t={:.2}s", id, game.sim.now);
                }
                accumulator -= SIM_DT;
                substeps += 1;
                ticks += 1;
            }
            if substeps == MAX_SUBSTEPS {
                accumulator = 0.0;
            }
        }

        if ticks >= MAX_ROUND_TICKS {
            log::warn!("Round {} did not settle within {} ticks", round, MAX_ROUND_TICKS);
        }
        log::info!(
            "Round {} done: {} ticks, {} boost impulses",
            round,
            ticks,
            boosts
        );
    }

    for ball in &game.sim.balls {
        log::info!("{:?} final position {:?}", ball.id, ball.pos);
    }
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is embedded by the web host; nothing to run here.
}
