// crates/wm_io/src/motion_log.rs

//! 逐步运动记录（CSV）
//!
//! 每个时间步一行：时间、平滑系数，以及按造波板类型选择的各板位移、
//! 倾角和实测水位列。

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use wm_config::WavemakerConfig;
use wm_foundation::WmError;
use wm_physics::StepReport;

use crate::error::IoResult;

/// 运动记录写出器
pub struct MotionLog<W: Write> {
    writer: W,
    n_paddles: usize,
    displacement: bool,
    tilt: bool,
    level: bool,
    rows: usize,
}

impl MotionLog<BufWriter<File>> {
    /// 创建文件并写入表头
    pub fn create(path: &Path, config: &WavemakerConfig) -> IoResult<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file), config)
    }
}

impl<W: Write> MotionLog<W> {
    /// 包装任意写出目标并写入表头
    pub fn new(writer: W, config: &WavemakerConfig) -> IoResult<Self> {
        let mut log = Self {
            writer,
            n_paddles: config.n_paddles,
            displacement: config.kind.has_displacement(),
            tilt: config.kind.has_tilt(),
            level: config.absorption_enabled(),
            rows: 0,
        };
        log.write_header()?;
        Ok(log)
    }

    fn write_header(&mut self) -> IoResult<()> {
        let mut cols = vec!["time".to_string(), "timeMult".to_string()];
        let groups = [
            (self.displacement, "disp"),
            (self.tilt, "tilt"),
            (self.level, "level"),
        ];
        for (enabled, prefix) in groups {
            if enabled {
                cols.extend((0..self.n_paddles).map(|i| format!("{prefix}{i}")));
            }
        }
        writeln!(self.writer, "{}", cols.join(","))?;
        Ok(())
    }

    /// 追加一步
    pub fn record(&mut self, report: &StepReport) -> IoResult<()> {
        let mut fields = vec![report.time.to_string(), report.time_mult.to_string()];
        let groups: [(bool, &'static str, &[f64]); 3] = [
            (self.displacement, "displacements", &report.displacements),
            (self.tilt, "tilts", &report.tilts),
            (self.level, "water_levels", &report.water_levels),
        ];
        for (enabled, name, values) in groups {
            if !enabled {
                continue;
            }
            WmError::check_size(name, self.n_paddles, values.len())?;
            fields.extend(values.iter().map(|v| v.to_string()));
        }
        writeln!(self.writer, "{}", fields.join(","))?;
        self.rows += 1;
        Ok(())
    }

    /// 已写入的数据行数
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// 刷新并取回写出目标
    pub fn finish(mut self) -> IoResult<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
