use tracing::debug;

use super::{
    engine::Selection,
    matcher::{MatchMode, TargetSpec},
    SelectError,
};

/// Check that every requested name was seen in the input.
///
/// Only exact selections are checked; a prefix need not match anything.
/// When the selection stopped early, every requested name was selected (the
/// bound equals the number of distinct names, and only requested names are
/// selected), so all of them were seen even though the input was not read to
/// the end.
pub fn check_coverage(targets: &TargetSpec, selection: &Selection) -> Result<(), SelectError> {
    if targets.match_mode() == MatchMode::Prefix {
        debug!("Selecting by prefix, not checking for missing sequences.");
        return Ok(());
    }

    let missing: Vec<String> = targets
        .names()
        .iter()
        .filter(|name| !selection.encountered.contains(name.as_str()))
        .cloned()
        .collect();

    debug_assert!(
        !selection.stopped_early || missing.is_empty(),
        "stopping early implies every requested name was seen"
    );

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SelectError::MissingTargets(missing))
    }
}
