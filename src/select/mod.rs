use thiserror::Error;
use tracing::{debug, info};

use self::{record::SequenceRecord, transform::Window};

pub mod coverage;
pub mod engine;
pub mod matcher;
pub mod options;
pub mod record;
pub mod transform;

pub use self::options::SelectionOptions;

/// Problems with the requested selection, detected before any record is read.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("At least one sequence name is needed.")]
    NoTargets,

    #[error("Sequence names were duplicated in the arguments: {}. All sequence names should be unique.", .0.join(" "))]
    DuplicateTargets(Vec<String>),

    #[error("Window '{0}' does not contain exactly 1 comma.")]
    WindowWithoutSingleComma(String),

    #[error("Unable to understand the values in window '{0}' as integers.")]
    WindowNotIntegers(String),

    #[error("The left value should be greater than or equal to 1 in window {0},{1}.")]
    WindowStartBelowOne(i64, i64),

    #[error("The left value should not be greater than the right value in window {0},{1}.")]
    WindowStartAfterEnd(i64, i64),

    #[error("The maximum gap fraction should be equal to or greater than 0 and less than 1, got {0}.")]
    MaxGapFractionOutOfRange(f64),
}

/// Fatal conditions of a selection run.
#[derive(Debug, Error)]
pub enum SelectError {
    #[error(transparent)]
    InvalidConfiguration(#[from] ConfigError),

    #[error("Sequence {0} occurs multiple times in the input.")]
    DuplicateName(String),

    #[error("Found no sequences to print.")]
    NoSequencesFound,

    #[error("The following sequences were not found in the input: {}", .0.join(" "))]
    MissingTargets(Vec<String>),

    #[error("A window {1} was specified but {0} is only {2} bases long.")]
    WindowOutOfRange(String, Window, usize),

    #[error("Could not read or write FASTA records")]
    Io(#[from] std::io::Error),
}

/// Select, validate and transform records in a single forward pass over `records`.
///
/// The returned records keep their input order and are ready to be written.
pub fn run<I>(records: I, options: &SelectionOptions) -> Result<Vec<SequenceRecord>, SelectError>
where
    I: IntoIterator<Item = Result<SequenceRecord, SelectError>>,
{
    let (targets, pipeline) = options.build()?;

    info!(n_targets = targets.names().len(), "Selecting sequences.");
    let selection = engine::select(records, &targets)?;
    debug!(
        n_selected = selection.records.len(),
        n_encountered = selection.encountered.len(),
        stopped_early = selection.stopped_early,
        "Selection finished."
    );

    coverage::check_coverage(&targets, &selection)?;

    info!(
        window = ?pipeline.window(),
        filters = ?pipeline.filters(),
        "Transforming selected sequences."
    );
    pipeline.apply(selection.records)
}
