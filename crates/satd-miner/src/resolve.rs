//! Resolution of aligned comment pairs.

use satd_core::{Resolution, SatdClassifier};
use tracing::warn;

/// Outcome for an old comment matched to a new one.
///
/// The new text is re-classified: debt whose comment survives but no
/// longer reads as SATD counts as removed. A classifier error counts as
/// "not SATD".
///
/// # Examples
///
/// ```
/// use satd_core::{DebtCategory, Resolution, SatdClassifier};
/// use satd_miner::resolve::resolve_pair;
///
/// struct Todo;
/// impl SatdClassifier for Todo {
///     fn classify(&self, text: &str) -> satd_core::Result<Option<DebtCategory>> {
///         Ok(text.contains("TODO").then_some(DebtCategory::Implementation))
///     }
/// }
///
/// assert_eq!(resolve_pair("// TODO a", "// TODO a", &Todo), Resolution::Stay);
/// assert_eq!(resolve_pair("// TODO a", "// TODO b", &Todo), Resolution::Changed);
/// assert_eq!(resolve_pair("// TODO a", "// done", &Todo), Resolution::Removed);
/// ```
pub fn resolve_pair<C: SatdClassifier + ?Sized>(
    old_text: &str,
    new_text: &str,
    classifier: &C,
) -> Resolution {
    if !is_satd(classifier, new_text) {
        Resolution::Removed
    } else if old_text == new_text {
        Resolution::Stay
    } else {
        Resolution::Changed
    }
}

/// `classify` collapsed to a boolean, logging failures.
pub fn is_satd<C: SatdClassifier + ?Sized>(classifier: &C, text: &str) -> bool {
    match classifier.classify(text) {
        Ok(category) => category.is_some(),
        Err(e) => {
            warn!(error = %e, "classifier failed, treating comment as non-SATD");
            false
        }
    }
}
