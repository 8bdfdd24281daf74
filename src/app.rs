// Copyright @yucwang 2026

use std::io::Write;
use std::path::Path;

use crate::core::estimator::{Estimator, EstimatorConfig};
use crate::core::reducer::VolumeEstimate;
use crate::error::Result;
use crate::io::prism_loader::{load_prisms, parse_prisms, PrismInput};
use crate::io::report::write_report;
use crate::plot::Visualizer;

/// Output side of a run: where the report goes and who draws the result.
pub struct Outputs<'a, W: Write> {
    pub out: &'a mut W,
    pub styled: bool,
    pub visualizer: Option<&'a mut dyn Visualizer>,
}

/// Estimates, reports and then visualizes. Nothing is written unless the
/// estimate succeeds, and the visualizer is only called after the report.
pub fn run<W: Write>(input: PrismInput, config: &EstimatorConfig, outputs: Outputs<'_, W>)
    -> Result<VolumeEstimate>
{
    let estimator = Estimator::new(config.clone());
    let estimation = estimator.estimate(input.prisms, input.deg_acc)?;

    write_report(outputs.out, &estimation.estimate, outputs.styled)?;
    if let Some(visualizer) = outputs.visualizer {
        visualizer.visualize(&estimation.bounds, &estimation.prisms)?;
    }
    Ok(estimation.estimate)
}

pub fn run_source<W: Write>(source: &str, config: &EstimatorConfig, outputs: Outputs<'_, W>)
    -> Result<VolumeEstimate>
{
    run(parse_prisms(source)?, config, outputs)
}

pub fn run_file<P: AsRef<Path>, W: Write>(path: P, config: &EstimatorConfig, outputs: Outputs<'_, W>)
    -> Result<VolumeEstimate>
{
    run(load_prisms(path)?, config, outputs)
}
