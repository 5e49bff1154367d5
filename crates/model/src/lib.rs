//! # sam-model
//!
//! Stochastic antecedent model (Ogle et al. 2015): ANPP regressed on
//! antecedent precipitation and four event-size classes, with Gamma priors
//! on the raw block weights and a Normal submodel imputing missing event
//! cells.
//!
//! The crate does not sample. It exposes what an inference engine needs:
//!
//! - [`SamModel::declare`] registers the node structure through the narrow
//!   [`ModelGraph`] interface.
//! - [`SamModel::log_density`] evaluates the joint log density of a
//!   [`SamParams`] point; [`ParamLayout`] maps points to flat vectors.
//! - [`SamModel::draw_prior`] and [`SamModel::replicate`] provide prior and
//!   posterior-predictive draws.

mod density;
mod error;
mod graph;
pub mod impute;
mod model;
mod params;
mod priors;

pub use error::ModelError;
pub use graph::{GraphRecorder, ModelGraph, Node, NodeDist, NodeKind};
pub use model::SamModel;
pub use params::{N_COEF, ParamLayout, SamParams};
pub use priors::Priors;
