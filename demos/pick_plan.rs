//! Plan a pick route and print it without playback.
//!
//! Run: cargo run --bin pick-plan -- --scenario christmas --picks 6

use pickbot_core::layout;
use pickbot_demos::{DemoError, Options, USAGE, prepare};
use pickbot_route::Metrics;

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

    let p = prepare(&opts)?;
    if opts.json {
        println!("{}", serde_json::to_string_pretty(&*p.route)?);
        return Ok(());
    }

    let profile = p.config.profile();
    println!("{}", layout::render_route(&p.grid, &p.route.path, None));
    println!(
        "scenario {} ({:+}% efficiency), {:?} ordering",
        p.config.scenario,
        profile.efficiency_adjustment_percent(),
        p.config.ordering_mode()
    );
    for item in &p.unresolved {
        println!("  not stocked: {item}");
    }
    for w in &p.route.warnings {
        println!("  warning: {w}");
    }
    for (i, wp) in p.route.waypoints.iter().enumerate() {
        println!("  {}. {} at {}", i + 1, wp.label, wp.pos);
    }
    for step in p.route.steps() {
        if !matches!(step.action, pickbot_route::StepAction::Moving) {
            println!("  step {:>3} {}: {}", step.step_index, step.position, step.action);
        }
    }

    let speed = p.config.robot_speed;
    println!("optimized: {}", Metrics::for_route(&p.route, speed, &profile));
    println!("in order:  {}", Metrics::for_route(&p.baseline, speed, &profile));
    println!(
        "vs order:  {}",
        Metrics::against_baseline(&p.route, &p.baseline, speed, &profile)
    );
    Ok(())
}
