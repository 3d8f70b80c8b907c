// crates/wm_config/src/kind.rs

//! 造波板类型

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// 造波板类型
///
/// 决定每块板拥有哪些自由度：平移（位移）、绕铰转动（倾角），或两者兼有。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WavemakerKind {
    /// 活塞式：整块板沿平均运动方向平移
    #[default]
    Piston,
    /// 摇板式：铰链以上部分绕铰链转动
    Flap,
    /// 混合式：平移与转动叠加
    Mixed,
}

impl WavemakerKind {
    /// 所有支持的名称
    pub const SUPPORTED: &'static str = "Piston, Flap, Mixed";

    /// 获取名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::Piston => "Piston",
            Self::Flap => "Flap",
            Self::Mixed => "Mixed",
        }
    }

    /// 是否有平移自由度（位移表、主动吸收、漂移保护）
    #[inline]
    pub fn has_displacement(&self) -> bool {
        matches!(self, Self::Piston | Self::Mixed)
    }

    /// 是否有转动自由度（倾角表、铰链几何）
    #[inline]
    pub fn has_tilt(&self) -> bool {
        matches!(self, Self::Flap | Self::Mixed)
    }
}

impl fmt::Display for WavemakerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for WavemakerKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Piston" => Ok(Self::Piston),
            "Flap" => Ok(Self::Flap),
            "Mixed" => Ok(Self::Mixed),
            other => Err(ConfigError::Unsupported {
                what: "造波板类型",
                name: other.to_string(),
                supported: Self::SUPPORTED,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str() {
        assert_eq!("Flap".parse::<WavemakerKind>().unwrap(), WavemakerKind::Flap);
        assert!("Plunger".parse::<WavemakerKind>().is_err());
        // 名称区分大小写，与宿主字典一致
        assert!("piston".parse::<WavemakerKind>().is_err());
    }

    #[test]
    fn test_degrees_of_freedom() {
        assert!(WavemakerKind::Piston.has_displacement());
        assert!(!WavemakerKind::Piston.has_tilt());
        assert!(!WavemakerKind::Flap.has_displacement());
        assert!(WavemakerKind::Mixed.has_displacement() && WavemakerKind::Mixed.has_tilt());
    }

    #[test]
    fn test_serde_spelling() {
        let json = serde_json::to_string(&WavemakerKind::Mixed).unwrap();
        assert_eq!(json, "\"Mixed\"");
        let back: WavemakerKind = serde_json::from_str("\"Piston\"").unwrap();
        assert_eq!(back, WavemakerKind::Piston);
        assert!(serde_json::from_str::<WavemakerKind>("\"Wedge\"").is_err());
    }
}
