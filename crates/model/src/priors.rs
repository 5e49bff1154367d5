//! Prior hyperparameters of the SAM model.

use crate::error::ModelError;

/// Hyperparameters of every prior in the model.
///
/// BUGS parameterizes the Normal by precision; `coef_precision` keeps that
/// convention and [`coef_sd`](Self::coef_sd) converts it for evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Priors {
    /// Gamma shape of each raw block weight.
    delta_shape: f64,
    /// Gamma rate of each raw block weight.
    delta_rate: f64,
    /// Precision of the Normal(0, ·) prior on the regression coefficients.
    coef_precision: f64,
    /// Upper bound of the Uniform(0, ·) prior on the residual sd.
    sig_upper: f64,
    /// Upper bound of the Uniform(0, ·) prior on each event-class mean.
    event_mean_upper: f64,
    /// Upper bound of the Uniform(0, ·) prior on each event-class sd.
    event_sd_upper: f64,
}

impl Default for Priors {
    fn default() -> Self {
        Self {
            delta_shape: 1.0,
            delta_rate: 1.0,
            coef_precision: 1.0e-7,
            sig_upper: 100.0,
            event_mean_upper: 500.0,
            event_sd_upper: 500.0,
        }
    }
}

impl Priors {
    /// Set the Gamma shape and rate of the raw block weights.
    pub fn with_delta(mut self, shape: f64, rate: f64) -> Self {
        self.delta_shape = shape;
        self.delta_rate = rate;
        self
    }

    /// Set the precision of the coefficient prior.
    pub fn with_coef_precision(mut self, precision: f64) -> Self {
        self.coef_precision = precision;
        self
    }

    /// Set the upper bound of the residual sd prior.
    pub fn with_sig_upper(mut self, upper: f64) -> Self {
        self.sig_upper = upper;
        self
    }

    /// Set the upper bounds of the event-class mean and sd priors.
    pub fn with_event_upper(mut self, mean_upper: f64, sd_upper: f64) -> Self {
        self.event_mean_upper = mean_upper;
        self.event_sd_upper = sd_upper;
        self
    }

    pub fn delta_shape(&self) -> f64 {
        self.delta_shape
    }

    pub fn delta_rate(&self) -> f64 {
        self.delta_rate
    }

    pub fn coef_precision(&self) -> f64 {
        self.coef_precision
    }

    /// Standard deviation of the coefficient prior, `1 / sqrt(precision)`.
    pub fn coef_sd(&self) -> f64 {
        self.coef_precision.sqrt().recip()
    }

    pub fn sig_upper(&self) -> f64 {
        self.sig_upper
    }

    pub fn event_mean_upper(&self) -> f64 {
        self.event_mean_upper
    }

    pub fn event_sd_upper(&self) -> f64 {
        self.event_sd_upper
    }

    /// Check that every hyperparameter is finite and strictly positive.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidPrior`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ModelError> {
        let fields = [
            ("delta_shape", self.delta_shape),
            ("delta_rate", self.delta_rate),
            ("coef_precision", self.coef_precision),
            ("sig_upper", self.sig_upper),
            ("event_mean_upper", self.event_mean_upper),
            ("event_sd_upper", self.event_sd_upper),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(ModelError::InvalidPrior {
                    name,
                    reason: format!("must be finite and > 0, got {value}"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_match_published_model() {
        let p = Priors::default();
        assert_relative_eq!(p.delta_shape(), 1.0);
        assert_relative_eq!(p.delta_rate(), 1.0);
        assert_relative_eq!(p.sig_upper(), 100.0);
        assert_relative_eq!(p.event_mean_upper(), 500.0);
        assert_relative_eq!(p.coef_sd(), 3162.2776601683795, epsilon = 1e-9);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn builders_override() {
        let p = Priors::default()
            .with_delta(2.0, 0.5)
            .with_coef_precision(0.01)
            .with_sig_upper(50.0)
            .with_event_upper(10.0, 20.0);
        assert_relative_eq!(p.delta_shape(), 2.0);
        assert_relative_eq!(p.delta_rate(), 0.5);
        assert_relative_eq!(p.coef_sd(), 10.0, epsilon = 1e-12);
        assert_relative_eq!(p.event_sd_upper(), 20.0);
    }

    #[test]
    fn rejects_non_positive() {
        let err = Priors::default().with_sig_upper(0.0).validate().unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidPrior {
                name: "sig_upper",
                ..
            }
        ));
        assert!(
            Priors::default()
                .with_delta(f64::NAN, 1.0)
                .validate()
                .is_err()
        );
    }
}
