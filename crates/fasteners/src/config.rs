//! Parameter records for bolts and nuts.
//!
//! Every record deserializes with `#[serde(default)]`, so a JSON file only
//! needs the fields it changes. Defaults describe an M8 fine-pitch bolt.

use serde::{Deserialize, Serialize};

/// Number of angular steps used by every revolved fastener surface.
pub const DIVISIONS: usize = 36;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadType {
    #[default]
    Hex,
    Cap,
    Dome,
    Pan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BitType {
    #[default]
    None,
    Allen,
    Phillips,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NutType {
    #[default]
    Hex,
    /// Hex nut with a nylon insert ring underneath.
    Lock,
}

/// Thread form shared by bolts and nuts. Lengths are in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadConfig {
    pub major_dia: f64,
    pub minor_dia: f64,
    pub pitch: f64,
    /// Share of the pitch spent on the flat crest, in percent.
    pub crest_percent: f64,
    /// Share of the pitch spent on the flat root, in percent.
    pub root_percent: f64,
}

impl Default for ThreadConfig {
    fn default() -> Self {
        Self {
            major_dia: 8.0,
            minor_dia: 6.917,
            pitch: 1.0,
            crest_percent: 10.0,
            root_percent: 10.0,
        }
    }
}

impl ThreadConfig {
    /// Metric thread whose minor diameter follows from the pitch.
    pub fn metric(major_dia: f64, pitch: f64) -> Self {
        Self {
            major_dia,
            minor_dia: major_dia - 1.082532 * pitch,
            pitch,
            ..Self::default()
        }
    }

    pub fn crest_height(&self) -> f64 {
        self.pitch * self.crest_percent / 100.0
    }

    pub fn root_height(&self) -> f64 {
        self.pitch * self.root_percent / 100.0
    }

    /// Height of each flank between crest and root.
    pub fn flank_height(&self) -> f64 {
        (self.pitch - (self.crest_height() + self.root_height())) / 2.0
    }
}

/// Final welding and scaling applied to a generated fastener.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Uniform scale applied after welding.
    pub scale: f64,
    /// Decimal places used as the weld key.
    pub weld_precision: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            scale: 0.1,
            weld_precision: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoltConfig {
    pub head: HeadType,
    pub bit: BitType,
    pub hex_head_flat_distance: f64,
    pub hex_head_height: f64,
    pub cap_head_dia: f64,
    pub cap_head_height: f64,
    pub dome_head_dia: f64,
    pub pan_head_dia: f64,
    pub allen_bit_flat_distance: f64,
    pub allen_bit_depth: f64,
    pub phillips_bit_dia: f64,
    pub phillips_bit_depth: f64,
    pub shank_dia: f64,
    pub shank_length: f64,
    pub thread_length: f64,
    pub thread: ThreadConfig,
    pub output: OutputConfig,
}

impl Default for BoltConfig {
    fn default() -> Self {
        Self {
            head: HeadType::Hex,
            bit: BitType::None,
            hex_head_flat_distance: 13.0,
            hex_head_height: 5.3,
            cap_head_dia: 13.5,
            cap_head_height: 8.0,
            dome_head_dia: 16.0,
            pan_head_dia: 16.0,
            allen_bit_flat_distance: 6.0,
            allen_bit_depth: 4.0,
            phillips_bit_dia: 5.2,
            phillips_bit_depth: 3.27,
            shank_dia: 8.0,
            shank_length: 0.0,
            thread_length: 16.0,
            thread: ThreadConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl BoltConfig {
    pub fn with_head(mut self, head: HeadType, bit: BitType) -> Self {
        self.head = head;
        self.bit = bit;
        self
    }

    /// Height of the selected head, or None for heads whose height is
    /// derived from their diameter.
    pub fn declared_head_height(&self) -> Option<f64> {
        match self.head {
            HeadType::Hex => Some(self.hex_head_height),
            HeadType::Cap => Some(self.cap_head_height),
            HeadType::Dome | HeadType::Pan => None,
        }
    }

    pub fn bit_depth(&self) -> Option<f64> {
        match self.bit {
            BitType::None => None,
            BitType::Allen => Some(self.allen_bit_depth),
            BitType::Phillips => Some(self.phillips_bit_depth),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutConfig {
    pub kind: NutType,
    pub height: f64,
    pub flat_distance: f64,
    pub thread: ThreadConfig,
    pub output: OutputConfig,
}

impl Default for NutConfig {
    fn default() -> Self {
        Self {
            kind: NutType::Hex,
            height: 8.0,
            flat_distance: 13.0,
            thread: ThreadConfig::default(),
            output: OutputConfig::default(),
        }
    }
}
