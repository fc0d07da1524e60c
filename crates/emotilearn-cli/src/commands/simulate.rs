use clap::Args;
use emotilearn_core::clock::format_mm_ss;
use emotilearn_core::quiz::Catalog;
use emotilearn_core::{
    Config, ControllerSettings, EmotionLabel, EmotionSource, ManualClock, ScriptedSource,
    SessionController,
};

#[derive(Args)]
pub struct SimulateArgs {
    /// Comma-separated emotion labels, one per sample
    #[arg(long, value_delimiter = ',', required = true)]
    emotions: Vec<EmotionLabel>,
    /// Seconds of virtual time to simulate
    #[arg(long, default_value = "30")]
    ticks: u64,
    /// Milliseconds between samples (defaults to `session.sample_interval_ms`)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    interval_ms: Option<u64>,
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let interval_ms = args
        .interval_ms
        .unwrap_or(config.session.sample_interval_ms);

    let clock = ManualClock::new();
    let mut ctl = SessionController::new(
        Box::new(clock.clone()),
        ControllerSettings::from(&config),
        Catalog::builtin().questions,
    );
    let mut source = ScriptedSource::new(args.emotions);

    let horizon_ms = args.ticks * 1000;
    let mut next_sample = 0u64;
    let mut next_tick = 1000u64;
    let mut events = ctl.start_session();

    // Dispatch the earliest trigger each step; at equal times scheduled
    // tasks go first, then the tick, then the sample.
    loop {
        let due = ctl.next_due_at().unwrap_or(u64::MAX);
        let now = due.min(next_tick).min(next_sample);
        if now > horizon_ms {
            break;
        }
        clock.set_ms(now);

        if due <= now {
            events.extend(ctl.poll());
        } else if next_tick <= now {
            events.extend(ctl.tick());
            next_tick += 1000;
        } else {
            match source.next_sample() {
                Some(sample) => {
                    events.extend(ctl.record_sample(sample));
                    next_sample = next_sample.saturating_add(interval_ms);
                }
                None => next_sample = u64::MAX,
            }
        }
    }
    events.extend(ctl.stop_session());

    let snapshot = ctl.snapshot();
    tracing::info!(
        elapsed = %format_mm_ss(snapshot.session.elapsed_secs),
        events = events.len(),
        "simulation finished"
    );
    let output = serde_json::json!({
        "events": events,
        "snapshot": snapshot,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
