use super::error::{OptimizerError, Result};
use super::types::RunConfiguration;

/// Validate a run configuration before any particle is created
///
/// Rejects empty swarms, zero iterations, inverted or degenerate bounds,
/// clamp factors outside `(0, 1]` and non-finite coefficients.
pub fn validate_configuration(config: &RunConfiguration) -> Result<()> {
    if config.particle_count == 0 {
        return Err(OptimizerError::Configuration(
            "particle count must be greater than zero".into(),
        ));
    }
    if config.max_iterations == 0 {
        return Err(OptimizerError::Configuration(
            "iteration count must be greater than zero".into(),
        ));
    }

    let reals = [
        ("xmin", config.xmin),
        ("xmax", config.xmax),
        ("w", config.inertia),
        ("c1", config.cognitive),
        ("c2", config.social),
        ("k", config.clamp_factor),
        ("near minima offset", config.near_minima_offset),
    ];
    for (name, value) in reals {
        if !value.is_finite() {
            return Err(OptimizerError::Configuration(format!(
                "{} must be finite, got {}",
                name, value
            )));
        }
    }

    if config.xmin >= config.xmax {
        return Err(OptimizerError::Configuration(format!(
            "xmin ({}) must be less than xmax ({})",
            config.xmin, config.xmax
        )));
    }
    if config.clamp_factor <= 0.0 || config.clamp_factor > 1.0 {
        return Err(OptimizerError::Configuration(format!(
            "clamp factor k must lie in (0, 1], got {}",
            config.clamp_factor
        )));
    }
    if config.near_minima_offset < 0.0 {
        return Err(OptimizerError::Configuration(format!(
            "near minima offset must be non-negative, got {}",
            config.near_minima_offset
        )));
    }
    // Wide finite bounds can still overflow the span
    if !config.vmax().is_finite() {
        return Err(OptimizerError::Configuration(
            "search range is too wide to derive a finite vmax".into(),
        ));
    }

    Ok(())
}

/// Hard truncation to `[min, max]`, no reflection or wraparound
#[inline]
pub fn clamp_to_bounds(value: f64, min: f64, max: f64) -> f64 {
    value.clamp(min, max)
}

/// Surface NaN/infinite results instead of letting them propagate
pub fn ensure_finite(value: f64, iteration: usize, what: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(OptimizerError::Computation {
            iteration,
            detail: format!("{} evaluated to {}", what, value),
        })
    }
}
