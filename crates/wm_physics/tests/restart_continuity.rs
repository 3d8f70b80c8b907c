// crates/wm_physics/tests/restart_continuity.rs

//! 重启连续性：中途保存状态再恢复，后续结果与不间断运行逐位一致

use glam::DVec3;
use wm_config::WavemakerConfig;
use wm_physics::{FaceSample, PaddleState, SerialReduce, StepInput, WavemakerBoundary};

fn points() -> Vec<DVec3> {
    let mut pts = Vec::new();
    for j in 0..=6 {
        for k in 0..=4 {
            pts.push(DVec3::new(0.0, j as f64 / 2.0, k as f64 * 0.25));
        }
    }
    pts
}

/// 水位随时间振荡，驱动主动吸收
fn faces(t: f64) -> Vec<FaceSample> {
    let level = 0.5 + 0.03 * (2.0 * t).sin();
    (0..6)
        .map(|j| {
            let y = 0.25 + 0.5 * j as f64;
            FaceSample::new(0.5, DVec3::new(0.0, y, 0.5), level)
        })
        .collect()
}

fn config() -> WavemakerConfig {
    let times: Vec<f64> = (0..=20).map(|i| i as f64).collect();
    let drift = |rate: f64| times.iter().map(|t| rate * t).collect::<Vec<_>>();
    WavemakerConfig::piston(times.clone(), vec![drift(0.06), drift(0.02), drift(-0.05)])
        .with_absorption(vec![vec![0.0; 21]; 3], 0.5)
        .with_dps(0.6, 3.0)
        .with_smoothing(2.0)
}

fn step(boundary: &mut WavemakerBoundary, t: f64, pts: &[DVec3]) -> Vec<DVec3> {
    let samples = faces(t);
    boundary
        .update(&StepInput::new(t, 0.1, &samples), pts, &SerialReduce)
        .unwrap()
        .displacements
        .clone()
}

#[test]
fn test_restore_matches_uninterrupted_run() {
    let pts = points();
    let mut reference = WavemakerBoundary::new("inlet", config()).unwrap();

    let mut snapshot = None;
    for i in 0..=200 {
        let t = i as f64 * 0.1;
        step(&mut reference, t, &pts);
        if i == 90 {
            snapshot = Some((
                reference.paddles().to_vec(),
                reference.last_update(),
            ));
        }
    }

    let (paddles, last) = snapshot.unwrap();
    // 状态经 JSON 往返
    let json = serde_json::to_string(&paddles).unwrap();
    let paddles: Vec<PaddleState> = serde_json::from_str(&json).unwrap();

    let mut resumed = WavemakerBoundary::restore("inlet", config(), paddles, last).unwrap();
    let mut replay = WavemakerBoundary::new("inlet", config()).unwrap();
    for i in 0..=90 {
        step(&mut replay, i as f64 * 0.1, &pts);
    }
    assert_eq!(replay.paddles(), resumed.paddles());

    for i in 91..=200 {
        let t = i as f64 * 0.1;
        let a = step(&mut replay, t, &pts);
        let b = step(&mut resumed, t, &pts);
        assert_eq!(a, b, "t = {t}");
    }
    assert_eq!(reference.paddles(), resumed.paddles());
}

#[test]
fn test_dps_survives_restart_mid_ramp() {
    let pts = points();
    let mut boundary = WavemakerBoundary::new("inlet", config()).unwrap();

    // 推进到第一块板进入回中
    let mut t = 0.0;
    while !boundary.paddles()[0].dps_active {
        step(&mut boundary, t, &pts);
        t += 0.1;
        assert!(t < 20.0, "DPS never activated");
    }
    let state = boundary.paddles().to_vec();
    assert!(state[0].dps_t_ini >= 0.0);

    let mut resumed =
        WavemakerBoundary::restore("inlet", config(), state, boundary.last_update()).unwrap();
    let a = step(&mut boundary, t, &pts);
    let b = step(&mut resumed, t, &pts);
    assert_eq!(a, b);
    assert_eq!(boundary.paddles()[0].inst_dps_correction, resumed.paddles()[0].inst_dps_correction);
}

#[test]
fn test_restored_boundary_rejects_earlier_time() {
    let pts = points();
    let mut boundary =
        WavemakerBoundary::restore("inlet", config(), PaddleState::fleet(3), Some(5.0)).unwrap();
    let earlier = faces(4.0);
    assert!(boundary
        .update(&StepInput::new(4.0, 0.1, &earlier), &pts, &SerialReduce)
        .is_err());

    // 恢复后同一时刻的重复调用按当前状态计算，不推进
    let current = faces(5.0);
    let motion = boundary
        .update(&StepInput::new(5.0, 0.1, &current), &pts, &SerialReduce)
        .unwrap();
    assert_eq!(motion.displacements.len(), pts.len());
    assert_eq!(boundary.paddles(), PaddleState::fleet(3).as_slice());
}
