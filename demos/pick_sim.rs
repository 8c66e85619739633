//! Real-time terminal playback of a pick route.
//!
//! Run: cargo run --bin pick-sim -- --seed 3 milk eggs tea
//!
//! While running: Enter pauses or resumes, `+`/`-` change speed, a number
//! sets the speed multiplier, `q` stops.

use std::io::{self, BufRead};
use std::sync::mpsc::{self, Sender};
use std::thread;

use pickbot_core::layout;
use pickbot_demos::{DemoError, Options, USAGE, prepare};
use pickbot_sim::{Context, Control, RunOutcome, SimEvent, SleepTicker, StepScheduler, run};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let opts = match Options::from_args(std::env::args().skip(1)) {
        Ok(o) => o,
        Err(e @ DemoError::Usage(_)) => {
            eprintln!("{e}\n\n{USAGE}");
            std::process::exit(2);
        }
        Err(e) => return Err(e.into()),
    };
    if opts.help {
        println!("{USAGE}");
        return Ok(());
    }

    let prepared = prepare(&opts)?;
    for item in &prepared.unresolved {
        println!("no shelf stocks \"{item}\", skipping it");
    }

    let (events_tx, events_rx) = mpsc::channel();
    let mut scheduler = StepScheduler::new(
        events_tx,
        prepared.config.robot_speed,
        prepared.config.profile(),
    );
    let mut cadence = prepared.config.cadence();

    let grid = prepared.grid.clone();
    let route = prepared.route.clone();
    let printer = thread::spawn(move || {
        for event in events_rx {
            match event {
                SimEvent::Started { path_len, waypoints } => {
                    let start = route.path.first().copied();
                    println!("{}", layout::render_route(&grid, &route.path, start));
                    println!("route: {waypoints} picks over {path_len} cells");
                }
                SimEvent::Step { step, metrics } => {
                    print!("\x1b[2J\x1b[H");
                    println!("{}", layout::render_route(&grid, &route.path, Some(step.position)));
                    println!(
                        "step {}/{} at {}: {} ({} left)",
                        step.step_index,
                        route.step_count(),
                        step.position,
                        step.action,
                        step.remaining_waypoints
                    );
                    println!("{metrics}");
                }
                SimEvent::Warning(w) => println!("warning: {w}"),
                SimEvent::Paused => println!("paused"),
                SimEvent::Resumed => println!("resumed"),
                SimEvent::Stopped => println!("stopped"),
                SimEvent::Completed { metrics } => println!("delivered: {metrics}"),
            }
        }
    });

    let (controls_tx, controls_rx) = mpsc::channel();
    let speed = cadence.speed();
    thread::spawn(move || read_controls(controls_tx, speed));

    scheduler.start(prepared.route.clone());
    let outcome = run(
        &mut scheduler,
        &mut SleepTicker,
        &mut cadence,
        &Context::new(),
        &controls_rx,
    );
    // Dropping the scheduler closes the event channel and ends the printer.
    drop(scheduler);
    if printer.join().is_err() {
        log::error!("event printer panicked");
    }
    if outcome == RunOutcome::Paused {
        println!("input closed while paused");
    }
    Ok(())
}

fn read_controls(tx: Sender<Control>, mut speed: f64) {
    for line in io::stdin().lock().lines() {
        let Ok(line) = line else { break };
        let control = match line.trim() {
            "" | "p" => Control::TogglePause,
            "q" => Control::Stop,
            "+" => {
                speed *= 2.0;
                Control::SetSpeed(speed)
            }
            "-" => {
                speed /= 2.0;
                Control::SetSpeed(speed)
            }
            other => match other.parse::<f64>() {
                Ok(v) => {
                    speed = v;
                    Control::SetSpeed(v)
                }
                Err(_) => continue,
            },
        };
        if tx.send(control).is_err() {
            break;
        }
    }
}
