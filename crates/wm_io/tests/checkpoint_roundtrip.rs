// crates/wm_io/tests/checkpoint_roundtrip.rs

//! 检查点文件往返：保存、加载、恢复后继续运行与不间断运行一致

use glam::DVec3;
use wm_config::WavemakerConfig;
use wm_io::{MotionLog, WavemakerCheckpoint};
use wm_physics::{FaceSample, SerialReduce, StepInput, WavemakerBoundary};

fn points() -> Vec<DVec3> {
    (0..=4)
        .flat_map(|j| (0..=4).map(move |k| DVec3::new(0.0, j as f64 * 0.5, k as f64 * 0.2)))
        .collect()
}

fn faces(t: f64) -> Vec<FaceSample> {
    let level = 0.4 + 0.02 * t.sin();
    (0..4)
        .map(|j| FaceSample::new(0.4, DVec3::new(0.0, 0.25 + 0.5 * j as f64, 0.4), level / 0.8))
        .collect()
}

fn config() -> WavemakerConfig {
    let times: Vec<f64> = (0..=10).map(|i| i as f64).collect();
    let pos = |rate: f64| times.iter().map(|t| rate * t).collect::<Vec<_>>();
    WavemakerConfig::piston(times.clone(), vec![pos(0.1), pos(-0.08)])
        .with_absorption(vec![vec![0.0; 11]; 2], 0.4)
        .with_dps(0.5, 2.0)
}

fn advance(boundary: &mut WavemakerBoundary, t: f64, pts: &[DVec3]) -> Vec<DVec3> {
    let samples = faces(t);
    boundary
        .update(&StepInput::new(t, 0.1, &samples), pts, &SerialReduce)
        .unwrap()
        .displacements
        .clone()
}

#[test]
fn test_file_roundtrip_and_resume() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("restart").join("inlet.wmck.json");
    let pts = points();

    let mut uninterrupted = WavemakerBoundary::new("inlet", config()).unwrap();
    for i in 0..=45 {
        advance(&mut uninterrupted, i as f64 * 0.1, &pts);
    }

    let checkpoint = WavemakerCheckpoint::capture(&uninterrupted);
    checkpoint.save(&path).unwrap();
    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());

    let loaded = WavemakerCheckpoint::load(&path).unwrap();
    assert_eq!(loaded, checkpoint);

    let mut resumed = loaded.restore().unwrap();
    assert_eq!(resumed.paddles(), uninterrupted.paddles());
    assert_eq!(resumed.last_update(), uninterrupted.last_update());

    for i in 46..=100 {
        let t = i as f64 * 0.1;
        assert_eq!(advance(&mut uninterrupted, t, &pts), advance(&mut resumed, t, &pts));
    }
    assert_eq!(resumed.paddles(), uninterrupted.paddles());
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = WavemakerCheckpoint::load(&dir.path().join("none.json")).unwrap_err();
    assert!(matches!(err, wm_io::IoError::File(_)));
}

#[test]
fn test_motion_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("motion.csv");
    let pts = points();

    let mut boundary = WavemakerBoundary::new("inlet", config()).unwrap();
    let mut log = MotionLog::create(&path, boundary.config()).unwrap();
    for i in 0..10 {
        advance(&mut boundary, i as f64 * 0.1, &pts);
        log.record(boundary.report().unwrap()).unwrap();
    }
    log.finish().unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 11);
    assert!(text.starts_with("time,timeMult,disp0,disp1,level0,level1"));
}
