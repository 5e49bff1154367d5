//! Log densities with explicit support checks.
//!
//! Every helper returns [`ModelError::OutOfSupport`] instead of `-inf`, so
//! callers never see a non-finite log density.

use statrs::distribution::{Continuous, Gamma, Normal, Uniform};

use crate::error::ModelError;

fn out_of_support(name: &'static str, index: usize, value: f64) -> ModelError {
    ModelError::OutOfSupport { name, index, value }
}

fn finite(value: f64, stage: &'static str) -> Result<f64, ModelError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ModelError::NonFinite { stage })
    }
}

/// Gamma(shape, rate) log density of `name[index] = x`.
///
/// The support is `x > 0`, widened to `x >= 0` for shape 1, where the
/// density at zero is `rate`.
pub(crate) fn gamma(
    shape: f64,
    rate: f64,
    name: &'static str,
    index: usize,
    x: f64,
) -> Result<f64, ModelError> {
    let dist = Gamma::new(shape, rate).map_err(|e| ModelError::InvalidPrior {
        name: gamma_param_name(shape),
        reason: e.to_string(),
    })?;
    if x == 0.0 && shape == 1.0 {
        return finite(rate.ln(), name);
    }
    if !(x.is_finite() && x > 0.0) {
        return Err(out_of_support(name, index, x));
    }
    finite(dist.ln_pdf(x), name)
}

/// Hyperparameter to blame when a Gamma(shape, rate) cannot be built.
pub(crate) fn gamma_param_name(shape: f64) -> &'static str {
    if shape.is_finite() && shape > 0.0 {
        "delta_rate"
    } else {
        "delta_shape"
    }
}

/// Normal(mean, sd) log density of `x`.
///
/// `sd` must already have been checked to be positive; a non-finite mean
/// or density is reported as [`ModelError::NonFinite`] for `stage`.
pub(crate) fn normal(mean: f64, sd: f64, x: f64, stage: &'static str) -> Result<f64, ModelError> {
    let dist = Normal::new(mean, sd).map_err(|_| ModelError::NonFinite { stage })?;
    finite(dist.ln_pdf(x), stage)
}

/// Normal log density of a parameter with a fixed-mean prior; support is
/// the finite reals.
pub(crate) fn normal_prior(
    mean: f64,
    sd: f64,
    name: &'static str,
    index: usize,
    x: f64,
) -> Result<f64, ModelError> {
    if !x.is_finite() {
        return Err(out_of_support(name, index, x));
    }
    normal(mean, sd, x, name)
}

/// Uniform(low, high) log density of `name[index] = x`.
///
/// With `positive` set the support excludes `low`, as required for scale
/// parameters.
pub(crate) fn uniform(
    low: f64,
    high: f64,
    positive: bool,
    name: &'static str,
    index: usize,
    x: f64,
) -> Result<f64, ModelError> {
    let above = if positive { x > low } else { x >= low };
    if !(above && x <= high) {
        return Err(out_of_support(name, index, x));
    }
    let dist = Uniform::new(low, high).map_err(|e| ModelError::InvalidPrior {
        name,
        reason: e.to_string(),
    })?;
    finite(dist.ln_pdf(x), name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn gamma_unit_is_negative_x() {
        assert_relative_eq!(gamma(1.0, 1.0, "deltaX", 1, 2.5).unwrap(), -2.5, epsilon = 1e-12);
    }

    #[test]
    fn gamma_rejects_zero_and_negative() {
        assert!(matches!(
            gamma(2.0, 1.0, "deltaX", 3, 0.0),
            Err(ModelError::OutOfSupport {
                name: "deltaX",
                index: 3,
                ..
            })
        ));
        assert!(gamma(1.0, 1.0, "deltaX", 1, -1.0).is_err());
        assert!(gamma(1.0, 1.0, "deltaX", 1, f64::NAN).is_err());
    }

    #[test]
    fn gamma_shape_one_accepts_zero() {
        assert_relative_eq!(gamma(1.0, 1.0, "deltaX", 1, 0.0).unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(
            gamma(1.0, 2.0, "deltaX", 1, 0.0).unwrap(),
            2.0_f64.ln(),
            epsilon = 1e-12
        );
        assert!(gamma(0.5, 1.0, "deltaX", 1, 0.0).is_err());
    }

    #[test]
    fn gamma_names_the_bad_hyperparameter() {
        assert!(matches!(
            gamma(1.0, -1.0, "deltaX", 1, 1.0),
            Err(ModelError::InvalidPrior {
                name: "delta_rate",
                ..
            })
        ));
        assert!(matches!(
            gamma(0.0, 1.0, "deltaX", 1, 1.0),
            Err(ModelError::InvalidPrior {
                name: "delta_shape",
                ..
            })
        ));
    }

    #[test]
    fn normal_standard_at_zero() {
        let expected = -0.5 * (2.0 * std::f64::consts::PI).ln();
        assert_relative_eq!(normal(0.0, 1.0, 0.0, "t").unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn normal_prior_rejects_infinite() {
        assert!(normal_prior(0.0, 1.0, "a", 1, f64::INFINITY).is_err());
    }

    #[test]
    fn uniform_support() {
        assert_relative_eq!(
            uniform(0.0, 100.0, true, "sig", 1, 50.0).unwrap(),
            -(100.0_f64.ln()),
            epsilon = 1e-12
        );
        assert!(uniform(0.0, 100.0, true, "sig", 1, 0.0).is_err());
        assert!(uniform(0.0, 100.0, false, "mu.ev", 1, 0.0).is_ok());
        assert!(uniform(0.0, 100.0, false, "mu.ev", 1, 100.5).is_err());
    }
}
