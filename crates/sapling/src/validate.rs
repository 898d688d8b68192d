use procmesh_kernel::MeshError;
use procmesh_kernel::mesh::assembler::MAX_WELD_PRECISION;
use tracing::warn;

use crate::params::{MAX_LEVELS, TreeParams};

/// Reasons a tree cannot be grown from its parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeError {
    #[error("levels must be between 1 and {max}, got {levels}")]
    InvalidLevels { levels: usize, max: usize },
    #[error("curve resolution of level {level} must be at least 1")]
    ZeroCurveRes { level: usize },
    #[error("base size {0} must lie in [0, 1)")]
    BaseSize(f64),
    #[error("invalid value for {parameter}: {value}")]
    InvalidParameter { parameter: &'static str, value: f64 },
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

fn positive(parameter: &'static str, value: f64) -> Result<(), TreeError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TreeError::InvalidParameter { parameter, value })
    }
}

fn unit(parameter: &'static str, value: f64) -> Result<(), TreeError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TreeError::InvalidParameter { parameter, value })
    }
}

/// Reject tree parameters that cannot be grown.
pub fn validate_params(params: &TreeParams) -> Result<(), TreeError> {
    let result = check_params(params);
    if let Err(e) = &result {
        warn!(error = %e, "tree parameters rejected");
    }
    result
}

fn check_params(params: &TreeParams) -> Result<(), TreeError> {
    if params.levels == 0 || params.levels > MAX_LEVELS {
        return Err(TreeError::InvalidLevels {
            levels: params.levels,
            max: MAX_LEVELS,
        });
    }
    for level in 0..params.levels {
        if params.curve_res[level] == 0 {
            return Err(TreeError::ZeroCurveRes { level });
        }
    }
    if !(0.0..1.0).contains(&params.base_size) {
        return Err(TreeError::BaseSize(params.base_size));
    }
    positive("scale", params.scale)?;
    if params.scale_v.abs() >= params.scale {
        return Err(TreeError::InvalidParameter {
            parameter: "scale_v",
            value: params.scale_v,
        });
    }
    positive("ratio", params.ratio)?;
    positive("leaf_scale", params.leaf_scale)?;
    positive("leaf_scale_x", params.leaf_scale_x)?;
    if params.weld_precision > MAX_WELD_PRECISION {
        return Err(TreeError::InvalidParameter {
            parameter: "weld_precision",
            value: params.weld_precision as f64,
        });
    }
    if let Some(prune) = &params.prune {
        positive("prune.width", prune.width)?;
        unit("prune.width_peak", prune.width_peak)?;
        unit("prune.ratio", prune.ratio)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::PruneEnvelope;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_params(&TreeParams::default()).is_ok());
    }

    #[test]
    fn test_levels_range() {
        let params = TreeParams {
            levels: 0,
            ..TreeParams::default()
        };
        assert_eq!(
            validate_params(&params),
            Err(TreeError::InvalidLevels { levels: 0, max: 4 })
        );
        let params = TreeParams {
            levels: 5,
            ..TreeParams::default()
        };
        assert!(matches!(
            validate_params(&params),
            Err(TreeError::InvalidLevels { .. })
        ));
    }

    #[test]
    fn test_zero_curve_res_only_checked_for_used_levels() {
        let mut params = TreeParams::default();
        params.curve_res[3] = 0;
        assert!(validate_params(&params).is_ok());
        params.curve_res[1] = 0;
        assert_eq!(
            validate_params(&params),
            Err(TreeError::ZeroCurveRes { level: 1 })
        );
    }

    #[test]
    fn test_prune_envelope_checked() {
        let params = TreeParams {
            prune: Some(PruneEnvelope {
                width_peak: 1.5,
                ..PruneEnvelope::default()
            }),
            ..TreeParams::default()
        };
        assert!(matches!(
            validate_params(&params),
            Err(TreeError::InvalidParameter {
                parameter: "prune.width_peak",
                ..
            })
        ));
    }

    #[test]
    fn test_base_size_range() {
        let params = TreeParams {
            base_size: 1.0,
            ..TreeParams::default()
        };
        assert_eq!(validate_params(&params), Err(TreeError::BaseSize(1.0)));
    }

    #[test]
    fn test_weld_precision_bounded() {
        let mut params = TreeParams {
            weld_precision: MAX_WELD_PRECISION,
            ..TreeParams::default()
        };
        assert!(validate_params(&params).is_ok());
        params.weld_precision = 19;
        assert_eq!(
            validate_params(&params),
            Err(TreeError::InvalidParameter {
                parameter: "weld_precision",
                value: 19.0,
            })
        );
    }
}
