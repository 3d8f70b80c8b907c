// crates/wm_config/src/wavemaker.rs

//! WavemakerConfig - 造波板运行配置
//!
//! 键名沿用宿主字典的写法（`wavemakerType`、`timeSeries`、`DPST` 等），
//! 缺省字段按下表取默认值：
//!
//! | 键 | 默认值 | 含义 |
//! |----|--------|------|
//! | `wavemakerType` | `Piston` | 造波板类型 |
//! | `nPaddles` | 1 | 板数 |
//! | `genAbs` | false | 主动吸收关闭 |
//! | `maxStroke` | 999.0 | 哨兵值，漂移保护关闭 |
//! | `DPST` | 25.0 | 漂移保护回中时长 [s] |
//! | `tuningFactor` | 1.0 | 幅值调节系数 |
//! | `tSmooth` | -1.0 | 启动平滑关闭 |
//! | `initialWaterDepth` | -1.0 | 未设置 |
//! | `hingeHeight` / `hingeLocation` | 999.0 | 未设置 |

use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use wm_foundation::tolerance::{approx_eq, UNIT_VECTOR_EPS};

use crate::error::ConfigError;
use crate::kind::WavemakerKind;

/// `maxStroke` 的哨兵值，表示漂移保护关闭
pub const MAX_STROKE_DISABLED: f64 = 999.0;

/// 铰链几何未设置时的哨兵值
pub const HINGE_UNSET: f64 = 999.0;

/// 造波板配置（运行期只读）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WavemakerConfig {
    /// 造波板类型
    #[serde(rename = "wavemakerType", default)]
    pub kind: WavemakerKind,

    /// 控制时间点 [s]，单调不减
    #[serde(rename = "timeSeries", default = "default_series")]
    pub time_series: Vec<f64>,

    /// 板数
    #[serde(rename = "nPaddles", default = "default_n_paddles")]
    pub n_paddles: usize,

    /// 位移表 [m]，`[paddle][sample]`
    #[serde(rename = "paddlePosition", default = "default_table")]
    pub paddle_position: Vec<Vec<f64>>,

    /// 倾角表 [deg]，`[paddle][sample]`
    #[serde(rename = "paddleTilt", default = "default_table")]
    pub paddle_tilt: Vec<Vec<f64>>,

    /// 目标波面表 [m]，`[paddle][sample]`，主动吸收使用
    #[serde(rename = "paddleEta", default = "default_table")]
    pub paddle_eta: Vec<Vec<f64>>,

    /// 初始静水深 [m]
    #[serde(rename = "initialWaterDepth", default = "default_unset")]
    pub initial_water_depth: f64,

    /// 平均运动方向（单位向量）
    #[serde(rename = "meanAngle", default)]
    pub mean_angle: DVec3,

    /// 铰链高度 [m]
    #[serde(rename = "hingeHeight", default = "default_hinge")]
    pub hinge_height: f64,

    /// 铰链水平位置 [m]
    #[serde(rename = "hingeLocation", default = "default_hinge")]
    pub hinge_location: f64,

    /// 主动吸收开关
    #[serde(rename = "genAbs", default)]
    pub gen_abs: bool,

    /// 最大冲程 [m]，等于 [`MAX_STROKE_DISABLED`] 时关闭漂移保护
    #[serde(rename = "maxStroke", default = "default_max_stroke")]
    pub max_stroke: f64,

    /// 漂移保护回中时长 [s]
    #[serde(rename = "DPST", default = "default_dps_ramp_time")]
    pub dps_ramp_time: f64,

    /// 启动平滑时长 [s]，<= 0 表示关闭
    #[serde(rename = "tSmooth", default = "default_unset")]
    pub t_smooth: f64,

    /// 幅值调节系数
    #[serde(rename = "tuningFactor", default = "default_tuning_factor")]
    pub tuning_factor: f64,
}

fn default_series() -> Vec<f64> { vec![-1.0] }
fn default_n_paddles() -> usize { 1 }
fn default_table() -> Vec<Vec<f64>> { vec![vec![-1.0]] }
fn default_unset() -> f64 { -1.0 }
fn default_hinge() -> f64 { HINGE_UNSET }
fn default_max_stroke() -> f64 { MAX_STROKE_DISABLED }
fn default_dps_ramp_time() -> f64 { 25.0 }
fn default_tuning_factor() -> f64 { 1.0 }

impl Default for WavemakerConfig {
    fn default() -> Self {
        Self {
            kind: WavemakerKind::default(),
            time_series: default_series(),
            n_paddles: default_n_paddles(),
            paddle_position: default_table(),
            paddle_tilt: default_table(),
            paddle_eta: default_table(),
            initial_water_depth: default_unset(),
            mean_angle: DVec3::ZERO,
            hinge_height: default_hinge(),
            hinge_location: default_hinge(),
            gen_abs: false,
            max_stroke: default_max_stroke(),
            dps_ramp_time: default_dps_ramp_time(),
            t_smooth: default_unset(),
            tuning_factor: default_tuning_factor(),
        }
    }
}

impl WavemakerConfig {
    /// 活塞式配置，沿 +x 运动
    pub fn piston(time_series: Vec<f64>, paddle_position: Vec<Vec<f64>>) -> Self {
        Self {
            kind: WavemakerKind::Piston,
            n_paddles: paddle_position.len(),
            time_series,
            paddle_position,
            mean_angle: DVec3::X,
            ..Self::default()
        }
    }

    /// 摇板式配置
    pub fn flap(
        time_series: Vec<f64>,
        paddle_tilt: Vec<Vec<f64>>,
        hinge_height: f64,
        hinge_location: f64,
    ) -> Self {
        Self {
            kind: WavemakerKind::Flap,
            n_paddles: paddle_tilt.len(),
            time_series,
            paddle_tilt,
            hinge_height,
            hinge_location,
            ..Self::default()
        }
    }

    /// 混合式配置
    pub fn mixed(
        time_series: Vec<f64>,
        paddle_position: Vec<Vec<f64>>,
        paddle_tilt: Vec<Vec<f64>>,
        hinge_height: f64,
        hinge_location: f64,
    ) -> Self {
        Self {
            kind: WavemakerKind::Mixed,
            n_paddles: paddle_position.len(),
            time_series,
            paddle_position,
            paddle_tilt,
            mean_angle: DVec3::X,
            hinge_height,
            hinge_location,
            ..Self::default()
        }
    }

    /// 开启主动吸收
    pub fn with_absorption(mut self, paddle_eta: Vec<Vec<f64>>, initial_water_depth: f64) -> Self {
        self.gen_abs = true;
        self.paddle_eta = paddle_eta;
        self.initial_water_depth = initial_water_depth;
        self
    }

    /// 开启漂移保护
    pub fn with_dps(mut self, max_stroke: f64, ramp_time: f64) -> Self {
        self.max_stroke = max_stroke;
        self.dps_ramp_time = ramp_time;
        self
    }

    /// 设置启动平滑时长
    pub fn with_smoothing(mut self, t_smooth: f64) -> Self {
        self.t_smooth = t_smooth;
        self
    }

    /// 设置幅值调节系数
    pub fn with_tuning_factor(mut self, tuning_factor: f64) -> Self {
        self.tuning_factor = tuning_factor;
        self
    }

    /// 设置平均运动方向
    pub fn with_mean_angle(mut self, mean_angle: DVec3) -> Self {
        self.mean_angle = mean_angle;
        self
    }

    /// 漂移保护是否生效
    #[inline]
    pub fn dps_enabled(&self) -> bool {
        self.max_stroke != MAX_STROKE_DISABLED && self.kind.has_displacement()
    }

    /// 主动吸收是否生效
    #[inline]
    pub fn absorption_enabled(&self) -> bool {
        self.gen_abs && self.kind.has_displacement()
    }

    /// 启动平滑是否开启
    #[inline]
    pub fn smoothing_enabled(&self) -> bool {
        self.t_smooth > 0.0
    }

    /// 时间序列范围 `(min, max)`
    pub fn time_range(&self) -> (f64, f64) {
        let min = self.time_series.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = self.time_series.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        (min, max)
    }

    /// 从 JSON 文件加载并校验
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// 从 JSON 字符串加载并校验
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: WavemakerConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 序列化为格式化 JSON
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 保存到 JSON 文件
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        std::fs::write(path.as_ref(), self.to_json_pretty()?)?;
        Ok(())
    }

    /// 验证配置一致性
    ///
    /// 在首次使用前调用一次。任何不一致都是致命错误，不做静默修正。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_paddles == 0 {
            return Err(ConfigError::invalid("nPaddles", self.n_paddles, "必须 >= 1"));
        }

        self.validate_time_series()?;

        if self.kind.has_displacement() {
            self.validate_table("paddlePosition", &self.paddle_position)?;

            let norm = self.mean_angle.length();
            if !norm.is_finite() || !approx_eq(norm, 1.0, UNIT_VECTOR_EPS) {
                return Err(ConfigError::invalid(
                    "meanAngle",
                    format!("{:?}", self.mean_angle),
                    "平均运动方向必须为单位向量",
                ));
            }
        }

        if self.kind.has_tilt() {
            self.validate_table("paddleTilt", &self.paddle_tilt)?;
            if self.hinge_height == HINGE_UNSET || !self.hinge_height.is_finite() {
                return Err(ConfigError::invalid(
                    "hingeHeight",
                    self.hinge_height,
                    format!("{} 造波板必须给定铰链高度", self.kind),
                ));
            }
            if self.hinge_location == HINGE_UNSET || !self.hinge_location.is_finite() {
                return Err(ConfigError::invalid(
                    "hingeLocation",
                    self.hinge_location,
                    format!("{} 造波板必须给定铰链位置", self.kind),
                ));
            }
        }

        if self.gen_abs {
            if !self.kind.has_displacement() {
                return Err(ConfigError::invalid(
                    "genAbs",
                    self.gen_abs,
                    "主动吸收只适用于有平移自由度的造波板 (Piston, Mixed)",
                ));
            }
            self.validate_table("paddleEta", &self.paddle_eta)?;
            if !(self.initial_water_depth > 0.0) {
                return Err(ConfigError::invalid(
                    "initialWaterDepth",
                    self.initial_water_depth,
                    "开启主动吸收时必须为正",
                ));
            }
        }

        if self.dps_enabled() {
            if !(self.max_stroke > 0.0) {
                return Err(ConfigError::invalid("maxStroke", self.max_stroke, "必须为正"));
            }
            if !(self.dps_ramp_time > 0.0) {
                return Err(ConfigError::invalid("DPST", self.dps_ramp_time, "必须为正"));
            }
        }

        if !self.tuning_factor.is_finite() {
            return Err(ConfigError::invalid("tuningFactor", self.tuning_factor, "必须为有限值"));
        }

        Ok(())
    }

    fn validate_time_series(&self) -> Result<(), ConfigError> {
        if self.time_series.is_empty() {
            return Err(ConfigError::invalid("timeSeries", "()", "时间序列不能为空"));
        }
        for (i, pair) in self.time_series.windows(2).enumerate() {
            if !(pair[1] >= pair[0]) {
                return Err(ConfigError::invalid(
                    "timeSeries",
                    format!("[{}]={} > [{}]={}", i, pair[0], i + 1, pair[1]),
                    "时间序列必须单调不减",
                ));
            }
        }
        Ok(())
    }

    fn validate_table(&self, key: &str, table: &[Vec<f64>]) -> Result<(), ConfigError> {
        if table.len() != self.n_paddles {
            return Err(ConfigError::shape(key, self.n_paddles, table.len()));
        }
        let n_samples = self.time_series.len();
        for (i, row) in table.iter().enumerate() {
            if row.len() != n_samples {
                return Err(ConfigError::shape(format!("{}[{}]", key, i), n_samples, row.len()));
            }
        }
        Ok(())
    }
}
