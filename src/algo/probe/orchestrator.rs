//! Running several probes over one point set.

use super::{Probe, ProbeContext};
use crate::algo::Progress;
use crate::error::GraphError;
use crate::graph::EdgeSet;

/// Outcome of [`ProbeOrchestrator::run`].
#[derive(Debug, Default)]
pub struct ProbeReport {
    /// Union of every applied probe's edges.
    pub edges: EdgeSet,

    /// Probes that ran, with the number of edges each proposed (before
    /// merging, so overlaps count once per probe).
    pub applied: Vec<(&'static str, usize)>,

    /// Probes that failed preparation, with the reason.
    pub skipped: Vec<(&'static str, GraphError)>,
}

/// Drives a list of probes over a [`ProbeContext`].
#[derive(Debug, Default)]
pub struct ProbeOrchestrator {
    probes: Vec<Probe>,
    progress: Progress,
}

impl ProbeOrchestrator {
    /// Create an empty orchestrator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a probe.
    pub fn with_probe(mut self, probe: impl Into<Probe>) -> Self {
        self.probes.push(probe.into());
        self
    }

    /// Set the progress reporter.
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    /// Configured probes, in run order.
    pub fn probes(&self) -> &[Probe] {
        &self.probes
    }

    /// Prepare every probe, then run the prepared ones in order.
    ///
    /// A probe whose preparation fails is logged and skipped. The run itself
    /// never fails.
    pub fn run(&mut self, ctx: &ProbeContext<'_>) -> ProbeReport {
        let mut report = ProbeReport::default();

        let prepared: Vec<bool> = self
            .probes
            .iter_mut()
            .map(|probe| match probe.prepare(ctx) {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("skipping {} probe: {}", probe.name(), e);
                    report.skipped.push((probe.name(), e));
                    false
                }
            })
            .collect();

        let total = self.probes.len();
        for (i, (probe, ready)) in self.probes.iter().zip(prepared).enumerate() {
            if ready {
                let mut found = EdgeSet::new();
                probe.process_all(ctx, &mut found);
                log::debug!("{} probe proposed {} edges", probe.name(), found.len());

                report.applied.push((probe.name(), found.len()));
                report.edges.extend_from(&found);
            }
            self.progress.report(i + 1, total, probe.name());
        }

        log::debug!(
            "probing finished: {} edges from {} probes ({} skipped)",
            report.edges.len(),
            report.applied.len(),
            report.skipped.len()
        );
        report
    }

    /// Largest radius any probe uses at point `i`, or 0 without probes.
    pub fn search_radius(&self, i: usize) -> f64 {
        self.probes
            .iter()
            .map(|p| p.radius().resolve(i))
            .fold(0.0, f64::max)
    }

    /// The largest radius, if every probe uses a constant one.
    ///
    /// Useful for sizing a [`HashGrid`](crate::spatial::HashGrid) before
    /// probing. Returns `None` without probes.
    pub fn shared_radius(&self) -> Option<f64> {
        if self.probes.is_empty() {
            return None;
        }
        self.probes
            .iter()
            .map(|p| p.radius().constant())
            .try_fold(0.0, |acc: f64, r| r.map(|r| acc.max(r)))
    }
}
