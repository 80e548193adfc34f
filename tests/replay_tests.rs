use keyrace::config::SessionConfig;
use keyrace::error::KeyRaceError;
use keyrace::metrics::FinishReason;
use keyrace::prompt::Prompt;
use keyrace::replay::Replay;
use keyrace::simulate::SimulatedTypist;
use std::fs;

const TEXT: &str = "pack my box with five dozen liquor jugs";

fn sloppy(seed: u64) -> SimulatedTypist {
    SimulatedTypist {
        error_rate: 0.2,
        fix_rate: 0.5,
        seed: Some(seed),
        ..Default::default()
    }
}

#[test]
fn test_rescore_matches_live_counts() {
    let prompt = Prompt::from_text(TEXT);
    let config = SessionConfig::default();

    for seed in [1, 2, 3, 4] {
        let live = sloppy(seed).run(&prompt, &config);
        let replay = live.replay.clone().unwrap();
        let again = replay.rescore(&config);

        assert_eq!(again.chars, live.chars, "seed {seed}");
        assert_eq!(again.words, live.words, "seed {seed}");
        assert_eq!(again.keypresses, live.keypresses, "seed {seed}");
        assert_eq!(again.accuracy, live.accuracy, "seed {seed}");
    }
}

#[test]
fn test_rescore_uses_recorded_time_limit() {
    let long = vec![TEXT; 6].join(" ");
    let prompt = Prompt::from_text(&long);
    let config = SessionConfig::timed(5);

    let live = sloppy(3).run(&prompt, &config);
    assert_eq!(live.reason, FinishReason::Time);
    assert_eq!(live.elapsed_ms, 5_000);

    // Flags passed at rescore time must not override the recorded run.
    let replay = live.replay.clone().unwrap();
    assert_eq!(replay.config.as_ref(), Some(&config));
    let again = replay.rescore(&SessionConfig::default());

    assert_eq!(again.mode, live.mode);
    assert_eq!(again.reason, FinishReason::Time);
    assert_eq!(again.elapsed_ms, live.elapsed_ms);
    assert_eq!(again.wpm, live.wpm);
    assert_eq!(again.raw_wpm, live.raw_wpm);
    assert_eq!(again.chars, live.chars);
    assert_eq!(again.words, live.words);
    assert_eq!(again.keypresses, live.keypresses);
}

#[test]
fn test_rescore_of_clean_run_matches_speed() {
    let prompt = Prompt::from_text(TEXT);
    let config = SessionConfig::default();
    let sim = SimulatedTypist {
        error_rate: 0.0,
        seed: Some(8),
        ..Default::default()
    };

    let live = sim.run(&prompt, &config);
    assert_eq!(live.reason, FinishReason::Completed);

    let again = live.replay.as_ref().unwrap().rescore(&config);
    assert_eq!(again.elapsed_ms, live.elapsed_ms);
    assert_eq!(again.wpm, live.wpm);
    assert_eq!(again.reason, FinishReason::Completed);
}

#[test]
fn test_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.json");

    let live = sloppy(6).run(&Prompt::from_text(TEXT), &SessionConfig::default());
    let replay = live.replay.unwrap();
    replay.save(&path).unwrap();

    let loaded = Replay::load(&path).unwrap();
    assert_eq!(loaded, replay);
}

#[test]
fn test_load_rejects_dirty_submit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(
        &path,
        r#"{
            "promptWords": ["hi"],
            "events": [
                { "t": 0, "type": "input", "value": "h", "text": "h" },
                { "t": 10, "type": "submit", "value": "h", "text": "h" }
            ]
        }"#,
    )
    .unwrap();

    let err = Replay::load(&path).unwrap_err();
    assert!(matches!(err, KeyRaceError::Validation(_)), "got {err:?}");
}

#[test]
fn test_log_without_config_uses_fallback() {
    let replay: Replay = serde_json::from_str(
        r#"{ "promptWords": ["a"], "events": [ { "t": 0, "type": "input", "text": "a" } ] }"#,
    )
    .unwrap();
    let r = replay.rescore(&SessionConfig::default());
    assert_eq!(r.reason, FinishReason::Completed);
    assert_eq!(r.accuracy, 100.0);
}
