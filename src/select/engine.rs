use std::collections::HashSet;

use tracing::{debug, trace};

use super::{matcher::TargetSpec, record::SequenceRecord, SelectError};

/// Outcome of the single pass over the input.
#[derive(Debug)]
pub struct Selection {
    /// Selected records, in input order.
    pub records: Vec<SequenceRecord>,
    /// Every name read from the input, selected or not.
    pub encountered: HashSet<String>,
    /// Set when reading stopped before the input was exhausted.
    pub stopped_early: bool,
}

/// Pull records from `records` and keep the ones `targets` asks for.
///
/// A name selected twice is an error. For exact, non inverted selections the
/// input stops being read as soon as every requested name has been selected.
pub fn select<I>(records: I, targets: &TargetSpec) -> Result<Selection, SelectError>
where
    I: IntoIterator<Item = Result<SequenceRecord, SelectError>>,
{
    let bound = targets.selection_bound();
    let mut selection = Selection {
        records: Vec::new(),
        encountered: HashSet::new(),
        stopped_early: false,
    };
    let mut selected_names = HashSet::new();

    for record_result in records {
        let record = record_result?;
        selection.encountered.insert(record.name().to_string());

        if !targets.includes(record.name()) {
            trace!(name = record.name(), "Skipping sequence.");
            continue;
        }

        if !selected_names.insert(record.name().to_string()) {
            return Err(SelectError::DuplicateName(record.name().to_string()));
        }
        trace!(name = record.name(), "Selecting sequence.");
        selection.records.push(record);

        if bound == Some(selection.records.len()) {
            debug!(
                n_selected = selection.records.len(),
                "All requested sequences found, not reading further."
            );
            selection.stopped_early = true;
            break;
        }
    }

    if selection.records.is_empty() {
        return Err(SelectError::NoSequencesFound);
    }

    Ok(selection)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::select::matcher::MatchMode;
    use std::cell::Cell;
    use tracing_test::traced_test;

    fn spec(names: &[&str], match_mode: MatchMode, invert: bool) -> TargetSpec {
        TargetSpec::new(
            names.iter().map(|name| name.to_string()).collect(),
            match_mode,
            invert,
        )
        .unwrap()
    }

    fn input(names: &[&str]) -> Vec<Result<SequenceRecord, SelectError>> {
        names
            .iter()
            .map(|name| Ok(SequenceRecord::new(name, b"ACGT")))
            .collect()
    }

    fn selected_names(selection: &Selection) -> Vec<&str> {
        selection.records.iter().map(|record| record.name()).collect()
    }

    #[test]
    fn test_selection_preserves_input_order() {
        let targets = spec(&["c", "a"], MatchMode::Exact, false);
        let selection = select(input(&["a", "b", "c", "d"]), &targets).unwrap();
        assert_eq!(selected_names(&selection), vec!["a", "c"]);
    }

    #[test]
    #[traced_test]
    fn test_exact_selection_stops_after_last_target() {
        let targets = spec(&["a", "b"], MatchMode::Exact, false);
        let consumed = Cell::new(0);
        let records = input(&["a", "b", "c", "d"])
            .into_iter()
            .inspect(|_| consumed.set(consumed.get() + 1));

        let selection = select(records, &targets).unwrap();

        assert_eq!(consumed.get(), 2);
        assert!(selection.stopped_early);
        assert!(logs_contain("not reading further"));
    }

    #[test]
    fn test_early_exit_never_reads_past_last_target() {
        let targets = spec(&["a"], MatchMode::Exact, false);
        let records = input(&["b", "a"])
            .into_iter()
            .chain(std::iter::once(Err(SelectError::NoSequencesFound)));

        let selection = select(records, &targets).unwrap();
        assert_eq!(selected_names(&selection), vec!["a"]);
    }

    #[test]
    fn test_prefix_selection_reads_whole_input() {
        let targets = spec(&["A", "B"], MatchMode::Prefix, false);
        let selection = select(input(&["A1", "B1", "C1", "A2"]), &targets).unwrap();

        assert_eq!(selected_names(&selection), vec!["A1", "B1", "A2"]);
        assert!(!selection.stopped_early);
    }

    #[test]
    fn test_inverted_selection_reads_whole_input() {
        let targets = spec(&["a"], MatchMode::Exact, true);
        let selection = select(input(&["a", "b", "c"]), &targets).unwrap();

        assert_eq!(selected_names(&selection), vec!["b", "c"]);
        assert!(!selection.stopped_early);
        assert_eq!(selection.encountered.len(), 3);
    }

    #[test]
    fn test_invert_selects_the_complement() {
        let names = ["A1", "B1", "C1", "A2", "AB", "D"];
        for match_mode in [MatchMode::Exact, MatchMode::Prefix] {
            let targets: &[&str] = match match_mode {
                MatchMode::Exact => &["A1", "C1"],
                MatchMode::Prefix => &["A"],
            };
            let kept = select(input(&names), &spec(targets, match_mode, false)).unwrap();
            let dropped = select(input(&names), &spec(targets, match_mode, true)).unwrap();

            let kept = selected_names(&kept);
            let dropped = selected_names(&dropped);
            assert!(kept.iter().all(|name| !dropped.contains(name)));
            let mut union: Vec<_> = kept.into_iter().chain(dropped).collect();
            union.sort();
            let mut all = names.to_vec();
            all.sort();
            assert_eq!(union, all);
        }
    }

    #[test]
    fn test_duplicate_selected_name_is_an_error() {
        let targets = spec(&["seq1", "seq2"], MatchMode::Exact, false);
        let result = select(input(&["seq1", "seq1", "seq2"]), &targets);
        assert!(matches!(result, Err(SelectError::DuplicateName(name)) if name == "seq1"));
    }

    #[test]
    fn test_duplicate_unselected_name_is_ignored() {
        let targets = spec(&["seq1"], MatchMode::Prefix, false);
        let selection = select(input(&["other", "other", "seq1"]), &targets).unwrap();
        assert_eq!(selected_names(&selection), vec!["seq1"]);
    }

    #[test]
    fn test_duplicate_in_inverted_selection_is_an_error() {
        let targets = spec(&["x"], MatchMode::Exact, true);
        let result = select(input(&["a", "b", "a"]), &targets);
        assert!(matches!(result, Err(SelectError::DuplicateName(name)) if name == "a"));
    }

    #[test]
    fn test_empty_selection_is_an_error() {
        let targets = spec(&["x"], MatchMode::Exact, false);
        assert!(matches!(
            select(input(&["a", "b"]), &targets),
            Err(SelectError::NoSequencesFound)
        ));
    }

    #[test]
    fn test_read_errors_are_propagated() {
        let targets = spec(&["a"], MatchMode::Prefix, false);
        let records = vec![
            Ok(SequenceRecord::new("a", b"A")),
            Err(SelectError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "bad record",
            ))),
        ];
        assert!(matches!(select(records, &targets), Err(SelectError::Io(_))));
    }
}
