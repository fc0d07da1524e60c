use std::time::Duration;

use clap::Args;
use emotilearn_core::clock::format_hours_minutes;
use emotilearn_core::quiz::Catalog;
use emotilearn_core::{
    Config, ControllerSettings, EmotionSource, SessionController, SystemClock, WeightedSource,
};
use tokio::time::{self, Instant, MissedTickBehavior};

use super::emit;

#[derive(Args)]
pub struct RunArgs {
    /// Seed for the emotion source (overrides `source.seed`)
    #[arg(long)]
    seed: Option<u64>,
    /// Stop after this many seconds instead of waiting for Ctrl-C
    #[arg(long)]
    duration: Option<u64>,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(event_loop(config, args))
}

/// Sleep until `at`, or forever when there is nothing to wait for.
async fn sleep_until(at: Option<Instant>) {
    match at {
        Some(at) => time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

async fn event_loop(config: Config, args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut source = match args.seed.or(config.source.seed) {
        Some(seed) => WeightedSource::new(seed),
        None => WeightedSource::from_entropy(),
    };
    let mut ctl = SessionController::new(
        Box::new(SystemClock::new()),
        ControllerSettings::from(&config),
        Catalog::builtin().questions,
    );

    let mut samples = time::interval(Duration::from_millis(config.session.sample_interval_ms));
    samples.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let start = Instant::now();
    let mut seconds = time::interval_at(start + Duration::from_secs(1), Duration::from_secs(1));
    seconds.set_missed_tick_behavior(MissedTickBehavior::Burst);
    let stop_at = args.duration.map(|secs| start + Duration::from_secs(secs));

    let events = ctl.start_session();
    emit(&ctl, &events)?;

    loop {
        let wake = ctl
            .next_due_at()
            .map(|due| Instant::now() + Duration::from_millis(due.saturating_sub(ctl.now_ms())));

        let events = tokio::select! {
            _ = samples.tick() => match source.next_sample() {
                Some(sample) => ctl.record_sample(sample),
                None => Vec::new(),
            },
            _ = seconds.tick() => ctl.tick(),
            _ = sleep_until(wake) => ctl.poll(),
            _ = sleep_until(stop_at) => break,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
        };
        emit(&ctl, &events)?;
    }

    let events = ctl.stop_session();
    emit(&ctl, &events)?;
    tracing::info!(
        studied = %format_hours_minutes(ctl.session_state().elapsed_secs),
        "session ended"
    );
    Ok(())
}
