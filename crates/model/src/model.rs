//! The SAM regression of ANPP on antecedent precipitation and event sizes.

use rand::Rng;
use rand_distr::{Distribution, Gamma, Normal};
use sam_antecedent::{AntecedentError, MonthlyPrecip, WeightCalculator};
use sam_io::{AnppDataset, N_EVENT_CLASSES};
use tracing::{debug, trace};

use crate::density;
use crate::error::ModelError;
use crate::graph::{ModelGraph, NodeDist};
use crate::impute;
use crate::params::{N_COEF, ParamLayout, SamParams};
use crate::priors::Priors;

/// Stochastic antecedent model for one site.
///
/// ```text
/// deltaX[b] ~ Gamma            a[j] ~ Normal(0, 1/sqrt(precision))
///     │                        sig  ~ Uniform(0, sig_upper)
///     ▼
/// weights ──► antX[year] ─┐
///                         ├─► mu[i] ──► ANPP[i] ~ Normal(mu[i], sig)
/// Event[i,k] ─────────────┘
///     ~ Normal(mu.ev[k], sig.ev[k]),  missing cells latent
/// ```
///
/// Holds only validated, read-only inputs; every evaluation is a pure
/// function of a [`SamParams`] point.
#[derive(Debug, Clone)]
pub struct SamModel {
    calculator: WeightCalculator,
    precip: MonthlyPrecip,
    dataset: AnppDataset,
    priors: Priors,
    /// Row of `precip` holding each observation's year.
    year_idx: Vec<usize>,
    layout: ParamLayout,
}

impl SamModel {
    /// Assembles a model and checks that every observation year has a
    /// computable antecedent value.
    ///
    /// # Errors
    ///
    /// - [`ModelError::InvalidPrior`] for bad hyperparameters.
    /// - [`ModelError::EmptyDataset`] if there are no observations.
    /// - [`ModelError::ObservationYear`] if an observation year lacks a
    ///   complete lookback window within the configured years.
    /// - [`ModelError::Antecedent`] if `precip` is shorter than the
    ///   configured number of years or misses a month that an observation
    ///   year needs.
    pub fn new(
        calculator: WeightCalculator,
        precip: MonthlyPrecip,
        dataset: AnppDataset,
        priors: Priors,
    ) -> Result<Self, ModelError> {
        priors.validate()?;
        if dataset.is_empty() {
            return Err(ModelError::EmptyDataset);
        }

        let config = calculator.config();
        if precip.n_years() < config.n_years() {
            return Err(AntecedentError::SeriesTooShort {
                expected: config.n_years(),
                got: precip.n_years(),
            }
            .into());
        }

        let first = calculator.first_eligible_year(&precip);
        let last = precip.first_year() + config.n_years() as i32 - 1;
        let year_idx = dataset
            .observations()
            .iter()
            .map(|obs| match precip.year_index(obs.year) {
                Some(idx) if obs.year >= first && obs.year <= last => Ok(idx),
                _ => Err(ModelError::ObservationYear {
                    year: obs.year,
                    first,
                    last,
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Uniform weights touch every unmasked cell, so this surfaces any
        // missing month before sampling starts.
        let probe = calculator.weights(&vec![1.0; config.n_blocks()])?;
        for &idx in &year_idx {
            calculator.antecedent_at(&probe, &precip, idx)?;
        }

        let layout = ParamLayout::new(config.n_blocks(), dataset.events().missing_cells());
        debug!(
            n_obs = dataset.len(),
            n_missing_events = layout.missing().len(),
            dim = layout.dim(),
            first_year = first,
            last_year = last,
            "SAM model ready"
        );

        Ok(Self {
            calculator,
            precip,
            dataset,
            priors,
            year_idx,
            layout,
        })
    }

    /// Weight calculator shared by every evaluation.
    pub fn calculator(&self) -> &WeightCalculator {
        &self.calculator
    }

    /// Monthly precipitation series.
    pub fn precip(&self) -> &MonthlyPrecip {
        &self.precip
    }

    /// ANPP observations and event covariates.
    pub fn dataset(&self) -> &AnppDataset {
        &self.dataset
    }

    /// Prior hyperparameters.
    pub fn priors(&self) -> &Priors {
        &self.priors
    }

    /// Flat parameter layout.
    pub fn layout(&self) -> &ParamLayout {
        &self.layout
    }

    /// Number of ANPP observations.
    pub fn n_obs(&self) -> usize {
        self.dataset.len()
    }

    /// Precipitation row index of each observation year.
    pub fn year_indices(&self) -> &[usize] {
        &self.year_idx
    }

    /// Registers every node of the model with `graph`.
    ///
    /// `ANPP.rep` is declared latent: it shares the likelihood of `ANPP`
    /// but is never conditioned on data.
    pub fn declare<G: ModelGraph + ?Sized>(&self, graph: &mut G) -> Result<(), ModelError> {
        let config = self.calculator.config();
        let n_cells = 12 * config.n_lag();
        let n = self.n_obs();
        let n_missing = self.layout.missing().len();
        let n_observed = n * N_EVENT_CLASSES - n_missing;
        let p = &self.priors;

        graph.latent(
            "deltaX",
            NodeDist::Gamma {
                shape: p.delta_shape(),
                rate: p.delta_rate(),
            },
            config.n_blocks(),
        )?;
        graph.deterministic("delta", &["deltaX"], n_cells)?;
        graph.deterministic("weight", &["delta"], n_cells)?;
        graph.deterministic("alpha", &["delta"], n_cells)?;
        graph.deterministic("weightYr", &["weight"], config.n_lag())?;
        graph.deterministic("weightOrdered", &["weight"], n_cells)?;
        graph.deterministic("cumWeight", &["weightOrdered"], n_cells)?;
        graph.deterministic("antX", &["weight"], config.n_eligible())?;

        graph.latent(
            "a",
            NodeDist::Normal {
                mean: 0.0,
                sd: p.coef_sd(),
            },
            N_COEF,
        )?;
        graph.latent(
            "sig",
            NodeDist::Uniform {
                low: 0.0,
                high: p.sig_upper(),
            },
            1,
        )?;
        graph.latent(
            "mu.ev",
            NodeDist::Uniform {
                low: 0.0,
                high: p.event_mean_upper(),
            },
            N_EVENT_CLASSES,
        )?;
        graph.latent(
            "sig.ev",
            NodeDist::Uniform {
                low: 0.0,
                high: p.event_sd_upper(),
            },
            N_EVENT_CLASSES,
        )?;

        let event_dist = || NodeDist::NormalOf {
            mean: "mu.ev".into(),
            sd: "sig.ev".into(),
        };
        let mut mu_parents = vec!["a", "antX"];
        if n_observed > 0 {
            graph.observed("Event", event_dist(), n_observed)?;
            mu_parents.push("Event");
        }
        if n_missing > 0 {
            graph.latent("Event.missing", event_dist(), n_missing)?;
            mu_parents.push("Event.missing");
        }

        graph.deterministic("mu", &mu_parents, n)?;
        let anpp_dist = || NodeDist::NormalOf {
            mean: "mu".into(),
            sd: "sig".into(),
        };
        graph.observed("ANPP", anpp_dist(), n)?;
        graph.latent("ANPP.rep", anpp_dist(), n)?;
        Ok(())
    }

    /// Joint log density (priors, event submodel and ANPP likelihood) at
    /// `params`.
    ///
    /// # Errors
    ///
    /// - [`ModelError::ShapeMismatch`] if a parameter block has the wrong
    ///   length.
    /// - [`ModelError::OutOfSupport`] for a parameter outside its prior's
    ///   support.
    /// - [`ModelError::NonFinite`] if a term overflows.
    pub fn log_density(&self, params: &SamParams) -> Result<f64, ModelError> {
        params.check_shape(&self.layout)?;
        let p = &self.priors;

        let mut lp = 0.0;
        for (b, &d) in params.delta_x.iter().enumerate() {
            lp += density::gamma(p.delta_shape(), p.delta_rate(), "deltaX", b + 1, d)?;
        }
        for (j, &a) in params.a.iter().enumerate() {
            lp += density::normal_prior(0.0, p.coef_sd(), "a", j + 1, a)?;
        }
        lp += density::uniform(0.0, p.sig_upper(), true, "sig", 1, params.sig)?;
        for k in 0..N_EVENT_CLASSES {
            lp += density::uniform(
                0.0,
                p.event_mean_upper(),
                false,
                "mu.ev",
                k + 1,
                params.mu_ev[k],
            )?;
            lp += density::uniform(
                0.0,
                p.event_sd_upper(),
                true,
                "sig.ev",
                k + 1,
                params.sig_ev[k],
            )?;
        }
        if let Some((i, &v)) = params
            .event_missing
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite())
        {
            return Err(ModelError::OutOfSupport {
                name: "Event.missing",
                index: i + 1,
                value: v,
            });
        }

        let events = impute::complete(self.dataset.events(), &params.event_missing)?;
        lp += impute::log_density(&events, &params.mu_ev, &params.sig_ev)?;

        let mu = self.predict(params, &events)?;
        for (m, obs) in mu.iter().zip(self.dataset.observations()) {
            lp += density::normal(*m, params.sig, obs.anpp, "ANPP likelihood")?;
        }

        if !lp.is_finite() {
            return Err(ModelError::NonFinite {
                stage: "log density",
            });
        }
        trace!(lp, "log density evaluated");
        Ok(lp)
    }

    /// [`log_density`](Self::log_density) of a flat parameter vector.
    pub fn log_density_flat(&self, flat: &[f64]) -> Result<f64, ModelError> {
        self.log_density(&SamParams::from_flat(&self.layout, flat)?)
    }

    /// Antecedent precipitation of each observation year.
    pub fn antecedent(&self, params: &SamParams) -> Result<Vec<f64>, ModelError> {
        params.check_shape(&self.layout)?;
        let weights = self.calculator.weights(&params.delta_x)?;
        self.year_idx
            .iter()
            .map(|&idx| {
                self.calculator
                    .antecedent_at(&weights, &self.precip, idx)
                    .map_err(ModelError::from)
            })
            .collect()
    }

    /// Mean ANPP `mu[i]` of each observation.
    pub fn linear_predictor(&self, params: &SamParams) -> Result<Vec<f64>, ModelError> {
        params.check_shape(&self.layout)?;
        let events = impute::complete(self.dataset.events(), &params.event_missing)?;
        self.predict(params, &events)
    }

    /// Draws a replicate `ANPP.rep[i] ~ Normal(mu[i], sig)` for every
    /// observation.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::OutOfSupport`] if `sig` is not positive, plus
    /// any error from [`linear_predictor`](Self::linear_predictor).
    pub fn replicate(
        &self,
        params: &SamParams,
        rng: &mut impl Rng,
    ) -> Result<Vec<f64>, ModelError> {
        if !(params.sig.is_finite() && params.sig > 0.0) {
            return Err(ModelError::OutOfSupport {
                name: "sig",
                index: 1,
                value: params.sig,
            });
        }
        let mu = self.linear_predictor(params)?;
        mu.into_iter()
            .map(|m| {
                Normal::new(m, params.sig)
                    .map(|d| d.sample(rng))
                    .map_err(|_| ModelError::NonFinite {
                        stage: "ANPP replicates",
                    })
            })
            .collect()
    }

    /// Draws a parameter point from the priors.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidPrior`] if a prior cannot be sampled.
    pub fn draw_prior(&self, rng: &mut impl Rng) -> Result<SamParams, ModelError> {
        let p = &self.priors;

        // rand_distr parameterizes Gamma by scale.
        let gamma = Gamma::new(p.delta_shape(), p.delta_rate().recip()).map_err(|e| {
            ModelError::InvalidPrior {
                name: density::gamma_param_name(p.delta_shape()),
                reason: e.to_string(),
            }
        })?;
        let delta_x = (0..self.layout.n_blocks())
            .map(|_| gamma.sample(rng))
            .collect();

        let coef = Normal::new(0.0, p.coef_sd()).map_err(|e| ModelError::InvalidPrior {
            name: "coef_precision",
            reason: e.to_string(),
        })?;
        let a: [f64; N_COEF] = std::array::from_fn(|_| coef.sample(rng));

        let sig = positive_uniform(p.sig_upper(), rng);
        let mu_ev: [f64; N_EVENT_CLASSES] =
            std::array::from_fn(|_| p.event_mean_upper() * rng.random::<f64>());
        let sig_ev: [f64; N_EVENT_CLASSES] =
            std::array::from_fn(|_| positive_uniform(p.event_sd_upper(), rng));
        let event_missing = impute::draw_missing(self.dataset.events(), &mu_ev, &sig_ev, rng)?;

        Ok(SamParams {
            delta_x,
            a,
            sig,
            mu_ev,
            sig_ev,
            event_missing,
        })
    }

    /// A point inside the support of every prior, suitable for starting an
    /// engine: unit raw weights, zero coefficients, half the residual sd
    /// bound, and event moments taken from the observed cells.
    pub fn initial_params(&self) -> SamParams {
        let p = &self.priors;
        let moments = impute::observed_moments(self.dataset.events());

        let mu_ev: [f64; N_EVENT_CLASSES] = std::array::from_fn(|k| match moments[k] {
            Some((mean, _)) => mean.clamp(0.0, p.event_mean_upper()),
            None => 0.5 * p.event_mean_upper(),
        });
        let sig_ev: [f64; N_EVENT_CLASSES] = std::array::from_fn(|k| match moments[k] {
            Some((_, sd)) if sd > 0.0 => sd.min(p.event_sd_upper()),
            _ => 1.0_f64.min(p.event_sd_upper()),
        });
        let event_missing = self
            .layout
            .missing()
            .iter()
            .map(|&(_, k)| mu_ev[k])
            .collect();

        SamParams {
            delta_x: vec![1.0; self.layout.n_blocks()],
            a: [0.0; N_COEF],
            sig: 0.5 * p.sig_upper(),
            mu_ev,
            sig_ev,
            event_missing,
        }
    }

    fn predict(
        &self,
        params: &SamParams,
        events: &[[f64; N_EVENT_CLASSES]],
    ) -> Result<Vec<f64>, ModelError> {
        let ant_x = self.antecedent(params)?;
        let a = &params.a;
        Ok(ant_x
            .iter()
            .zip(events)
            .map(|(&x, ev)| {
                let event_term: f64 = ev.iter().zip(&a[2..]).map(|(e, c)| e * c).sum();
                a[0] + a[1] * x + event_term
            })
            .collect())
    }
}

/// Uniform draw on `(0, upper]`.
fn positive_uniform(upper: f64, rng: &mut impl Rng) -> f64 {
    upper * (1.0 - rng.random::<f64>())
}
