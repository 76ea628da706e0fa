//! Ring Toss headless runner
//!
//! Plays a scripted session, pulsing the left and right currents in turn,
//! until every ring is hooked or the frame limit runs out.
//!
//! Usage: `ring-toss [params.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use ring_toss::consts::{DEFAULT_RING_COUNT, FRAME_RATE};
    use ring_toss::{Params, SimEvent, Snapshot, TickInput, World, tick};

    /// Give up after five simulated minutes
    const MAX_FRAMES: u64 = 5 * 60 * FRAME_RATE as u64;

    /// Hold a current for 1.5s, rest 1s, alternating sides
    fn scripted_input(frame: u64) -> TickInput {
        let cycle = frame % 300;
        match cycle {
            0..90 => TickInput {
                left: true,
                right: false,
            },
            150..240 => TickInput {
                left: false,
                right: true,
            },
            _ => TickInput::default(),
        }
    }

    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let mut args = std::env::args().skip(1);
        let params = match args.next() {
            Some(path) => Params::load_or_default(path),
            None => Params::default(),
        };
        let seed = args.next().and_then(|s| s.parse::<u64>().ok());

        let mut world = match World::new(params, DEFAULT_RING_COUNT, seed) {
            Ok(world) => world,
            Err(err) => {
                log::error!("Invalid parameters: {}", err);
                std::process::exit(1);
            }
        };

        for frame in 0..MAX_FRAMES {
            let report = tick(&mut world, &scripted_input(frame));
            for event in &report.events {
                match event {
                    SimEvent::RingHooked { ring_id, side } => {
                        log::info!(
                            "Ring {} on {} post ({}/{})",
                            ring_id,
                            side.as_str(),
                            report.hooked_count,
                            world.ring_count()
                        );
                    }
                    SimEvent::AllHooked => {
                        let secs = world.frame as f32 / FRAME_RATE as f32;
                        log::info!("All rings hooked in {:.1}s (seed {})", secs, world.seed);
                    }
                }
            }
            if world.is_complete() {
                break;
            }
        }

        let snapshot = Snapshot::capture(&world);
        println!(
            "frame {}: {}/{} rings hooked, {} bubbles",
            snapshot.frame,
            snapshot.hooked_count,
            snapshot.rings.len(),
            snapshot.bubbles.len()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives the library directly
}
