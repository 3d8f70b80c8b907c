// crates/wm_physics/tests/domain_decomposition.rs

//! 区域分解：边界被切成两个子域时，各子域经全局归约后得到与串行完全相同的修正

use std::cell::RefCell;
use std::collections::VecDeque;

use glam::DVec3;
use wm_config::WavemakerConfig;
use wm_physics::water_level::BandSums;
use wm_physics::{FaceSample, PatchExtent, PatchReduce, SerialReduce, StepInput, WavemakerBoundary};

// ============================================================
// 双子域归约
// ============================================================

/// 另一子域的本地量已知，按集合通信的调用顺序逐个配对
struct PeerReduce {
    extremes: RefCell<VecDeque<f64>>,
    wet_area: RefCell<VecDeque<Vec<f64>>>,
}

impl PeerReduce {
    fn new(peer_points: &[DVec3], peer_faces: &[FaceSample], n_paddles: usize, global: &PatchExtent) -> Self {
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        let mut z_min = f64::INFINITY;
        let mut z_max = f64::NEG_INFINITY;
        for p in peer_points {
            y_min = y_min.min(p.y);
            y_max = y_max.max(p.y);
            z_min = z_min.min(p.z);
            z_max = z_max.max(p.z);
        }
        let wet = BandSums::accumulate(peer_faces, global, n_paddles).wet_area().to_vec();
        Self {
            extremes: RefCell::new(VecDeque::from(vec![y_min, y_max, z_min, z_max])),
            wet_area: RefCell::new(VecDeque::from(vec![wet])),
        }
    }

    fn next_extreme(&self) -> f64 {
        self.extremes.borrow_mut().pop_front().expect("unexpected min/max reduction")
    }

    fn is_drained(&self) -> bool {
        self.extremes.borrow().is_empty() && self.wet_area.borrow().is_empty()
    }
}

impl PatchReduce for PeerReduce {
    fn sum_in_place(&self, values: &mut [f64]) {
        let peer = self.wet_area.borrow_mut().pop_front().expect("unexpected sum reduction");
        assert_eq!(peer.len(), values.len());
        for (v, p) in values.iter_mut().zip(&peer) {
            *v += p;
        }
    }

    fn min(&self, local: f64) -> f64 {
        local.min(self.next_extreme())
    }

    fn max(&self, local: f64) -> f64 {
        local.max(self.next_extreme())
    }
}

// ============================================================
// 场景
// ============================================================

const WIDTH: f64 = 2.0;
const HEIGHT: f64 = 1.0;
const NY: usize = 8;
const NZ: usize = 10;
const SPLIT: f64 = 1.0;

fn wall_points() -> Vec<DVec3> {
    let mut pts = Vec::new();
    for j in 0..=NY {
        for k in 0..=NZ {
            pts.push(DVec3::new(
                0.0,
                WIDTH * j as f64 / NY as f64,
                HEIGHT * k as f64 / NZ as f64,
            ));
        }
    }
    pts
}

/// 各条带水深不同，并随时间起伏
fn faces(t: f64) -> Vec<FaceSample> {
    let dy = WIDTH / NY as f64;
    let dz = HEIGHT / NZ as f64;
    let mut faces = Vec::new();
    for j in 0..NY {
        let y = (j as f64 + 0.5) * dy;
        let depth = 0.4 + 0.01 * j as f64 + 0.02 * (t + y).sin();
        for k in 0..NZ {
            let z0 = k as f64 * dz;
            let alpha = ((depth - z0) / dz).clamp(0.0, 1.0);
            faces.push(FaceSample::new(dy * dz, DVec3::new(0.0, y, z0 + 0.5 * dz), alpha));
        }
    }
    faces
}

fn config() -> WavemakerConfig {
    let times = vec![0.0, 10.0];
    let position = vec![
        vec![0.0, 0.5],
        vec![0.0, 0.3],
        vec![0.0, -0.2],
        vec![0.0, 0.1],
    ];
    WavemakerConfig::piston(times, position)
        .with_absorption(vec![vec![0.0, 0.0]; 4], 0.4)
        .with_dps(0.6, 1.0)
}

#[test]
fn test_two_subdomains_match_serial_run() {
    let all_points = wall_points();
    let global = PatchExtent::from_points(&all_points, &SerialReduce).unwrap();

    // 界面上的一列点两侧都有
    let (idx_a, points_a): (Vec<usize>, Vec<DVec3>) = all_points
        .iter()
        .enumerate()
        .filter(|(_, p)| p.y <= SPLIT)
        .map(|(i, p)| (i, *p))
        .unzip();
    let (idx_b, points_b): (Vec<usize>, Vec<DVec3>) = all_points
        .iter()
        .enumerate()
        .filter(|(_, p)| p.y >= SPLIT)
        .map(|(i, p)| (i, *p))
        .unzip();

    let mut serial = WavemakerBoundary::new("inlet", config()).unwrap();
    let mut rank_a = WavemakerBoundary::new("inlet", config()).unwrap();
    let mut rank_b = WavemakerBoundary::new("inlet", config()).unwrap();

    for step in 0..=20 {
        let t = step as f64 * 0.1;
        let all_faces = faces(t);
        let (faces_a, faces_b): (Vec<FaceSample>, Vec<FaceSample>) =
            all_faces.iter().copied().partition(|f| f.centre.y < SPLIT);

        let expected = serial
            .update(&StepInput::new(t, 0.1, &all_faces), &all_points, &SerialReduce)
            .unwrap()
            .displacements
            .clone();

        let reduce_a = PeerReduce::new(&points_b, &faces_b, 4, &global);
        let motion_a = rank_a
            .update(&StepInput::new(t, 0.1, &faces_a), &points_a, &reduce_a)
            .unwrap();
        for (d, &i) in motion_a.displacements.iter().zip(&idx_a) {
            assert_eq!(*d, expected[i], "t={t}, point {i}");
        }
        assert!(reduce_a.is_drained());

        let reduce_b = PeerReduce::new(&points_a, &faces_a, 4, &global);
        let motion_b = rank_b
            .update(&StepInput::new(t, 0.1, &faces_b), &points_b, &reduce_b)
            .unwrap();
        for (d, &i) in motion_b.displacements.iter().zip(&idx_b) {
            assert_eq!(*d, expected[i], "t={t}, point {i}");
        }
        assert!(reduce_b.is_drained());

        assert_eq!(rank_a.paddles(), serial.paddles());
        assert_eq!(rank_b.paddles(), serial.paddles());
        assert_eq!(rank_a.report().unwrap().water_levels, serial.report().unwrap().water_levels);
    }

    assert!(serial.paddles().iter().any(|s| s.cum_abs_correction != 0.0));
}

#[test]
fn test_local_extent_alone_gives_different_levels() {
    let all_points = wall_points();
    let points_a: Vec<DVec3> = all_points.iter().copied().filter(|p| p.y <= SPLIT).collect();
    let faces_a: Vec<FaceSample> = faces(0.0).into_iter().filter(|f| f.centre.y < SPLIT).collect();

    let mut serial = WavemakerBoundary::new("inlet", config()).unwrap();
    serial
        .update(&StepInput::new(0.0, 0.1, &faces(0.0)), &all_points, &SerialReduce)
        .unwrap();

    let mut isolated = WavemakerBoundary::new("inlet", config()).unwrap();
    isolated
        .update(&StepInput::new(0.0, 0.1, &faces_a), &points_a, &SerialReduce)
        .unwrap();

    assert_ne!(
        isolated.report().unwrap().water_levels,
        serial.report().unwrap().water_levels
    );
}
