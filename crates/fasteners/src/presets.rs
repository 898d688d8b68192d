use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bits::phillips_bit_depth;
use crate::config::{BoltConfig, NutConfig, ThreadConfig};
use crate::validate::FastenerError;

/// Standard metric sizes with fine-pitch threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricPreset {
    M3,
    M4,
    M5,
    M6,
    M8,
    M10,
    M12,
}

struct PresetTable {
    major_dia: f64,
    pitch: f64,
    hex_flat: f64,
    hex_height: f64,
    cap_dia: f64,
    cap_height: f64,
    allen_flat: f64,
    allen_depth: f64,
    pan_dia: f64,
    nut_height: f64,
    nut_flat: f64,
    thread_length: f64,
    shank_length: f64,
}

impl MetricPreset {
    pub const ALL: [MetricPreset; 7] = [
        MetricPreset::M3,
        MetricPreset::M4,
        MetricPreset::M5,
        MetricPreset::M6,
        MetricPreset::M8,
        MetricPreset::M10,
        MetricPreset::M12,
    ];

    #[rustfmt::skip]
    fn table(self) -> PresetTable {
        let row = |major_dia, pitch, hex_flat, hex_height, cap_dia, cap_height, allen_flat,
                   allen_depth, pan_dia, nut_height, nut_flat, thread_length, shank_length| {
            PresetTable {
                major_dia, pitch, hex_flat, hex_height, cap_dia, cap_height, allen_flat,
                allen_depth, pan_dia, nut_height, nut_flat, thread_length, shank_length,
            }
        };
        match self {
            MetricPreset::M3 => row(3.0, 0.35, 5.5, 2.0, 5.5, 3.0, 2.5, 1.5, 5.6, 2.4, 5.5, 6.0, 0.0),
            MetricPreset::M4 => row(4.0, 0.5, 7.0, 2.8, 7.0, 4.0, 3.0, 2.0, 8.0, 3.2, 7.0, 8.0, 0.0),
            MetricPreset::M5 => row(5.0, 0.5, 8.0, 3.5, 8.5, 5.0, 4.0, 2.5, 9.5, 4.0, 8.0, 10.0, 0.0),
            MetricPreset::M6 => row(6.0, 0.75, 10.0, 4.0, 10.0, 6.0, 5.0, 3.0, 12.0, 5.0, 10.0, 12.0, 0.0),
            MetricPreset::M8 => row(8.0, 1.0, 13.0, 5.3, 13.5, 8.0, 6.0, 4.0, 16.0, 6.5, 13.0, 16.0, 0.0),
            MetricPreset::M10 => row(10.0, 1.25, 17.0, 6.4, 16.0, 10.0, 8.0, 5.0, 20.0, 8.0, 17.0, 20.0, 0.0),
            MetricPreset::M12 => row(12.0, 1.5, 19.0, 7.5, 18.5, 12.0, 10.0, 6.0, 24.0, 10.0, 19.0, 32.0, 33.0),
        }
    }

    pub fn thread(self) -> ThreadConfig {
        let t = self.table();
        ThreadConfig::metric(t.major_dia, t.pitch)
    }

    /// Overwrite the size fields of `base`, keeping its head, bit and output
    /// choices.
    pub fn apply_to_bolt(self, base: BoltConfig) -> BoltConfig {
        let t = self.table();
        let phillips_bit_dia = t.pan_dia * (1.82 / 5.6);
        BoltConfig {
            hex_head_flat_distance: t.hex_flat,
            hex_head_height: t.hex_height,
            cap_head_dia: t.cap_dia,
            cap_head_height: t.cap_height,
            dome_head_dia: t.pan_dia,
            pan_head_dia: t.pan_dia,
            allen_bit_flat_distance: t.allen_flat,
            allen_bit_depth: t.allen_depth,
            phillips_bit_dia,
            phillips_bit_depth: phillips_bit_depth(phillips_bit_dia),
            shank_dia: t.major_dia,
            shank_length: t.shank_length,
            thread_length: t.thread_length,
            thread: self.thread(),
            ..base
        }
    }

    pub fn apply_to_nut(self, base: NutConfig) -> NutConfig {
        let t = self.table();
        NutConfig {
            height: t.nut_height,
            flat_distance: t.nut_flat,
            thread: self.thread(),
            ..base
        }
    }

    pub fn bolt(self) -> BoltConfig {
        self.apply_to_bolt(BoltConfig::default())
    }

    pub fn nut(self) -> NutConfig {
        self.apply_to_nut(NutConfig::default())
    }
}

impl fmt::Display for MetricPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl FromStr for MetricPreset {
    type Err = FastenerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricPreset::ALL
            .into_iter()
            .find(|p| p.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FastenerError::UnknownPreset(s.to_string()))
    }
}
