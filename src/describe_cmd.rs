//! Describe command: print the registered model graph and parameter layout.

use std::fmt::Write;

use anyhow::Result;
use tracing::info_span;

use sam_model::{GraphRecorder, SamModel};

use crate::cli::ModelArgs;
use crate::inputs;

/// Run the describe command.
pub fn run(args: ModelArgs) -> Result<()> {
    let _cmd = info_span!("describe").entered();
    let (_, model) = inputs::load_model(&args)?;
    print!("{}", describe(&model)?);
    Ok(())
}

/// Text description of the graph followed by every free parameter with
/// its support.
pub fn describe(model: &SamModel) -> Result<String> {
    let mut graph = GraphRecorder::new();
    model.declare(&mut graph)?;

    let layout = model.layout();
    let mut out = String::new();
    writeln!(out, "nodes ({}):", graph.len())?;
    out.push_str(&graph.to_string());
    writeln!(out)?;
    writeln!(out, "parameters ({}):", layout.dim())?;
    for (i, (name, (lo, hi))) in layout
        .names()
        .into_iter()
        .zip(layout.bounds(model.priors()))
        .enumerate()
    {
        writeln!(out, "{:>5}  {name:<16} [{lo}, {hi}]", i + 1)?;
    }
    Ok(out)
}
