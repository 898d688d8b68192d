use procmesh_kernel::MeshError;
use procmesh_kernel::mesh::assembler::MAX_WELD_PRECISION;
use tracing::warn;

use crate::config::{BoltConfig, NutConfig, OutputConfig, ThreadConfig};

/// Reasons a fastener cannot be generated from its parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FastenerError {
    #[error("major diameter {major} must be larger than minor diameter {minor}")]
    MinorNotBelowMajor { minor: f64, major: f64 },
    #[error("thread length {length} must be at least 7 times the pitch {pitch}")]
    ThreadTooShort { length: f64, pitch: f64 },
    #[error("nut flat distance {flat} must be greater than major diameter {major}")]
    NutFlatTooSmall { flat: f64, major: f64 },
    #[error("nut height {height} must be greater than 2.5 times the pitch {pitch}")]
    NutTooShort { height: f64, pitch: f64 },
    #[error("bit depth {depth} must not be greater than head height {head_height}")]
    BitTooDeep { depth: f64, head_height: f64 },
    #[error("invalid dimension for {parameter}: {value}")]
    InvalidDimension { parameter: &'static str, value: f64 },
    #[error("unknown preset {0:?}")]
    UnknownPreset(String),
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

fn positive(parameter: &'static str, value: f64) -> Result<(), FastenerError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FastenerError::InvalidDimension { parameter, value })
    }
}

fn check_output(output: &OutputConfig) -> Result<(), FastenerError> {
    positive("scale", output.scale)?;
    if output.weld_precision > MAX_WELD_PRECISION {
        return Err(FastenerError::InvalidDimension {
            parameter: "weld_precision",
            value: output.weld_precision as f64,
        });
    }
    Ok(())
}

fn check_thread(thread: &ThreadConfig) -> Result<(), FastenerError> {
    positive("major_dia", thread.major_dia)?;
    positive("minor_dia", thread.minor_dia)?;
    positive("pitch", thread.pitch)?;
    if thread.minor_dia >= thread.major_dia {
        return Err(FastenerError::MinorNotBelowMajor {
            minor: thread.minor_dia,
            major: thread.major_dia,
        });
    }
    Ok(())
}

/// Reject bolt parameters that would produce a broken mesh.
pub fn validate_bolt(config: &BoltConfig) -> Result<(), FastenerError> {
    let result = check_bolt(config);
    if let Err(e) = &result {
        warn!(error = %e, "bolt parameters rejected");
    }
    result
}

fn check_bolt(config: &BoltConfig) -> Result<(), FastenerError> {
    check_thread(&config.thread)?;
    positive("shank_dia", config.shank_dia)?;
    check_output(&config.output)?;
    if config.shank_length < 0.0 {
        return Err(FastenerError::InvalidDimension {
            parameter: "shank_length",
            value: config.shank_length,
        });
    }
    let pitch = config.thread.pitch;
    if pitch * 7.0 > config.thread_length {
        return Err(FastenerError::ThreadTooShort {
            length: config.thread_length,
            pitch,
        });
    }
    if let (Some(head_height), Some(depth)) = (config.declared_head_height(), config.bit_depth()) {
        if depth > head_height {
            return Err(FastenerError::BitTooDeep { depth, head_height });
        }
    }
    Ok(())
}

/// Reject nut parameters that would produce a broken mesh.
pub fn validate_nut(config: &NutConfig) -> Result<(), FastenerError> {
    let result = check_nut(config);
    if let Err(e) = &result {
        warn!(error = %e, "nut parameters rejected");
    }
    result
}

fn check_nut(config: &NutConfig) -> Result<(), FastenerError> {
    check_thread(&config.thread)?;
    check_output(&config.output)?;
    if config.flat_distance < config.thread.major_dia {
        return Err(FastenerError::NutFlatTooSmall {
            flat: config.flat_distance,
            major: config.thread.major_dia,
        });
    }
    if config.thread.pitch * 2.5 > config.height {
        return Err(FastenerError::NutTooShort {
            height: config.height,
            pitch: config.thread.pitch,
        });
    }
    Ok(())
}
