//! Narrow registration interface between the model and an inference engine.
//!
//! The model describes itself by calling [`ModelGraph`] methods; an engine
//! implements the trait to build whatever internal representation it needs.
//! [`GraphRecorder`] is the in-crate implementation used for validation and
//! for printing the model structure.

use std::fmt;

use crate::error::ModelError;

/// Distribution attached to a stochastic node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeDist {
    /// Gamma with fixed shape and rate.
    Gamma { shape: f64, rate: f64 },
    /// Normal with fixed mean and standard deviation.
    Normal { mean: f64, sd: f64 },
    /// Uniform on `[low, high]`.
    Uniform { low: f64, high: f64 },
    /// Normal whose mean and sd are other nodes, matched elementwise.
    NormalOf { mean: String, sd: String },
}

impl NodeDist {
    /// Node names this distribution depends on.
    pub fn parents(&self) -> Vec<&str> {
        match self {
            Self::NormalOf { mean, sd } => vec![mean.as_str(), sd.as_str()],
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for NodeDist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gamma { shape, rate } => write!(f, "Gamma(shape={shape}, rate={rate})"),
            Self::Normal { mean, sd } => write!(f, "Normal(mean={mean}, sd={sd})"),
            Self::Uniform { low, high } => write!(f, "Uniform({low}, {high})"),
            Self::NormalOf { mean, sd } => write!(f, "Normal(mean={mean}, sd={sd})"),
        }
    }
}

/// Registration interface implemented by an inference engine.
pub trait ModelGraph {
    /// Declare an unobserved stochastic node with `shape` elements.
    fn latent(&mut self, name: &str, dist: NodeDist, shape: usize) -> Result<(), ModelError>;

    /// Declare a node computed from `parents`.
    fn deterministic(
        &mut self,
        name: &str,
        parents: &[&str],
        shape: usize,
    ) -> Result<(), ModelError>;

    /// Declare `n` observed values drawn from `dist`.
    fn observed(&mut self, name: &str, dist: NodeDist, n: usize) -> Result<(), ModelError>;
}

/// Role of a node in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Latent,
    Deterministic,
    Observed,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Latent => "latent",
            Self::Deterministic => "deterministic",
            Self::Observed => "observed",
        };
        f.pad(s)
    }
}

/// One recorded node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    /// `None` for deterministic nodes.
    pub dist: Option<NodeDist>,
    pub parents: Vec<String>,
    pub shape: usize,
}

/// [`ModelGraph`] implementation that records nodes in declaration order.
///
/// Rejects duplicate names, references to nodes not yet declared, and
/// empty shapes.
#[derive(Debug, Clone, Default)]
pub struct GraphRecorder {
    nodes: Vec<Node>,
}

impl GraphRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes in declaration order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Look up a node by name.
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Number of declared nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if nothing has been declared.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of scalar elements across nodes of `kind`.
    pub fn n_scalars(&self, kind: NodeKind) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.kind == kind)
            .map(|n| n.shape)
            .sum()
    }

    fn push(
        &mut self,
        name: &str,
        kind: NodeKind,
        dist: Option<NodeDist>,
        parents: Vec<String>,
        shape: usize,
    ) -> Result<(), ModelError> {
        if self.get(name).is_some() {
            return Err(ModelError::DuplicateNode { name: name.into() });
        }
        if shape == 0 {
            return Err(ModelError::EmptyShape { name: name.into() });
        }
        if let Some(parent) = parents.iter().find(|p| self.get(p).is_none()) {
            return Err(ModelError::UnknownParent {
                node: name.into(),
                parent: parent.clone(),
            });
        }
        self.nodes.push(Node {
            name: name.into(),
            kind,
            dist,
            parents,
            shape,
        });
        Ok(())
    }
}

impl ModelGraph for GraphRecorder {
    fn latent(&mut self, name: &str, dist: NodeDist, shape: usize) -> Result<(), ModelError> {
        let parents = dist.parents().into_iter().map(String::from).collect();
        self.push(name, NodeKind::Latent, Some(dist), parents, shape)
    }

    fn deterministic(
        &mut self,
        name: &str,
        parents: &[&str],
        shape: usize,
    ) -> Result<(), ModelError> {
        let parents = parents.iter().map(|p| p.to_string()).collect();
        self.push(name, NodeKind::Deterministic, None, parents, shape)
    }

    fn observed(&mut self, name: &str, dist: NodeDist, n: usize) -> Result<(), ModelError> {
        let parents = dist.parents().into_iter().map(String::from).collect();
        self.push(name, NodeKind::Observed, Some(dist), parents, n)
    }
}

impl fmt::Display for GraphRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.nodes.iter().map(|n| n.name.len()).max().unwrap_or(0);
        for node in &self.nodes {
            write!(
                f,
                "{:<width$}  {:<13}  [{}]",
                node.name, node.kind, node.shape
            )?;
            match &node.dist {
                Some(dist) => write!(f, "  ~ {dist}")?,
                None => write!(f, "  <- {}", node.parents.join(", "))?,
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
