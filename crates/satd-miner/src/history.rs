//! Mining SATD changes across a whole commit history.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use satd_core::{CommentExtractor, CommitRef, GitAccess, SatdClassifier, SatdDifference};
use satd_gitpulse::history::{CommitPair, HistoryWalk, WalkOptions};
use tracing::{info, warn};

use crate::miner::DiffMiner;

/// A revision pair whose comparison failed.
#[derive(Debug, Clone)]
pub struct FailedPair {
    pub pair: CommitPair,
    pub error: String,
}

/// Outcome of a history walk.
#[derive(Debug, Clone, Default)]
pub struct HistoryReport {
    /// One difference per compared (parent, child) pair, in walk order.
    pub differences: Vec<SatdDifference>,
    pub failed: Vec<FailedPair>,
    /// The walk stopped early because the cancel flag was raised.
    pub cancelled: bool,
}

/// Runs a direct-parent comparison for every edge reachable from a commit.
///
/// Pairs are compared one at a time. The cancel flag is checked between
/// pairs; a comparison already running always completes.
pub struct HistoryMiner<'m, 'a, G, E, C>
where
    G: GitAccess + ?Sized,
    E: CommentExtractor + ?Sized,
    C: SatdClassifier + ?Sized,
{
    miner: &'m DiffMiner<'a, G, E, C>,
    options: WalkOptions,
    cancel: Arc<AtomicBool>,
}

impl<'m, 'a, G, E, C> HistoryMiner<'m, 'a, G, E, C>
where
    G: GitAccess + ?Sized,
    E: CommentExtractor + ?Sized,
    C: SatdClassifier + ?Sized,
{
    pub fn new(miner: &'m DiffMiner<'a, G, E, C>, options: WalkOptions) -> Self {
        Self {
            miner,
            options,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share an external cancel flag.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Walk history from `head`, calling `on_pair` after each successful comparison.
    ///
    /// A pair that fails is logged, recorded in [`HistoryReport::failed`],
    /// and skipped.
    pub fn mine(
        &self,
        head: &CommitRef,
        mut on_pair: impl FnMut(&SatdDifference),
    ) -> HistoryReport {
        let mut report = HistoryReport::default();
        let walk = HistoryWalk::new(self.miner.git(), head.clone(), self.options.clone());

        for pair in walk {
            if self.cancel.load(Ordering::Relaxed) {
                info!(compared = report.differences.len(), "history mining cancelled");
                report.cancelled = true;
                break;
            }
            match self.miner.mine_diff(&pair.parent, &pair.child) {
                Ok(diff) => {
                    on_pair(&diff);
                    report.differences.push(diff);
                }
                Err(e) => {
                    warn!(parent = %pair.parent, child = %pair.child, error = %e, "skipping commit pair");
                    report.failed.push(FailedPair {
                        pair,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            compared = report.differences.len(),
            failed = report.failed.len(),
            "history mining finished"
        );
        report
    }
}
