pub mod config;
pub mod quiz;
pub mod run;
pub mod simulate;

use emotilearn_core::{Event, SessionController};

/// One NDJSON line: the events of a state change and the view after it.
pub(crate) fn emit(ctl: &SessionController, events: &[Event]) -> Result<(), serde_json::Error> {
    if events.is_empty() {
        return Ok(());
    }
    let line = serde_json::json!({
        "events": events,
        "snapshot": ctl.snapshot(),
    });
    println!("{}", serde_json::to_string(&line)?);
    Ok(())
}
