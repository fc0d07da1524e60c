//! Controller behaviour under a configuration loaded from disk.

use std::io::Write;

use emotilearn_core::quiz::Catalog;
use emotilearn_core::{
    Config, ControllerSettings, EmotionLabel, EmotionSample, ManualClock, Mode, SessionController,
};

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn custom_delays_and_duration_flow_into_controller() {
    let file = write_config(
        r#"
[transitions]
meditation_delay_ms = 500
quiz_return_delay_ms = 100

[meditation]
default_duration_secs = 600
"#,
    );
    let config = Config::load_from(file.path()).unwrap();
    assert_eq!(config.transitions.quiz_delay_ms, 1500);

    let clock = ManualClock::new();
    let mut ctl = SessionController::new(
        Box::new(clock.clone()),
        ControllerSettings::from(&config),
        Catalog::builtin().questions,
    );
    ctl.start_session();
    ctl.record_sample(EmotionSample::certain(EmotionLabel::Sad));
    assert_eq!(ctl.next_due_at(), Some(500));

    clock.advance_ms(500);
    ctl.poll();
    assert_eq!(ctl.mode(), Mode::Meditation);
    assert_eq!(ctl.meditation().unwrap().selected_duration_secs(), 600);
}

#[test]
fn small_history_capacity_evicts_oldest() {
    let file = write_config("[session]\nhistory_capacity = 2\n");
    let config = Config::load_from(file.path()).unwrap();

    let mut ctl = SessionController::new(
        Box::new(ManualClock::new()),
        ControllerSettings::from(&config),
        Catalog::builtin().questions,
    );
    ctl.start_session();
    for label in [EmotionLabel::Happy, EmotionLabel::Focused, EmotionLabel::Surprised] {
        ctl.record_sample(EmotionSample::certain(label));
    }

    let labels: Vec<_> = ctl.history().recent(5).iter().map(|s| s.label()).collect();
    assert_eq!(labels, vec![EmotionLabel::Focused, EmotionLabel::Surprised]);
}

#[test]
fn invalid_file_is_rejected() {
    let file = write_config("[meditation]\ndefault_duration_secs = 45\n");
    assert!(Config::load_from(file.path()).is_err());
}
