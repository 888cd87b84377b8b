use std::{fmt, str::FromStr};

use tracing::{debug, trace, warn};

use super::{record::SequenceRecord, ConfigError, SelectError};

/// A 1 based, inclusive coordinate range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    start: usize,
    end: usize,
}

impl Window {
    pub fn new(start: i64, end: i64) -> Result<Self, ConfigError> {
        if start > end {
            return Err(ConfigError::WindowStartAfterEnd(start, end));
        }
        if start < 1 {
            return Err(ConfigError::WindowStartBelowOne(start, end));
        }
        // Both bounds are at least 1 here.
        Ok(Self {
            start: start as usize,
            end: end as usize,
        })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn width(&self) -> usize {
        self.end - self.start + 1
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Parses the comma separated form `START,END`, e.g. `2,10`.
impl FromStr for Window {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once(',')
            .filter(|(_, end)| !end.contains(','))
            .ok_or_else(|| ConfigError::WindowWithoutSingleComma(s.to_string()))?;

        let parse = |coordinate: &str| {
            coordinate
                .trim()
                .parse::<i64>()
                .map_err(|_| ConfigError::WindowNotIntegers(s.to_string()))
        };
        Window::new(parse(start)?, parse(end)?)
    }
}

/// Optional filters run on the selected records.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FilterConfig {
    /// Remove every gap character from the residues.
    pub gap_strip: bool,
    /// Drop records that are nothing but gaps.
    pub skip_blanks: bool,
    /// Drop records whose gap fraction is above this value.
    pub max_gap_fraction: Option<f64>,
}

impl FilterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.max_gap_fraction {
            Some(fraction) if !(0.0..1.0).contains(&fraction) => {
                Err(ConfigError::MaxGapFractionOutOfRange(fraction))
            }
            _ => Ok(()),
        }
    }
}

/// The ordered stages applied to the selected records.
///
/// Stages run in a fixed order: window trim, gap strip, blank skip and max gap
/// fraction. Each stage sees only what survived the previous one, so a record
/// whose gaps were stripped always passes the gap fraction filter.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    window: Option<Window>,
    filters: FilterConfig,
}

impl Pipeline {
    pub fn new(window: Option<Window>, filters: FilterConfig) -> Result<Self, ConfigError> {
        filters.validate()?;
        Ok(Self { window, filters })
    }

    pub fn window(&self) -> Option<Window> {
        self.window
    }

    pub fn filters(&self) -> &FilterConfig {
        &self.filters
    }

    pub fn apply(&self, records: Vec<SequenceRecord>) -> Result<Vec<SequenceRecord>, SelectError> {
        let mut records = records;

        if let Some(window) = self.window {
            debug!(%window, width = window.width(), "Trimming sequences to window.");
            records = records
                .into_iter()
                .map(|record| trim_to_window(record, window))
                .collect::<Result<_, _>>()?;
        }

        if self.filters.gap_strip {
            debug!("Stripping gaps.");
            records = records.into_iter().map(SequenceRecord::strip_gaps).collect();
        }

        if self.filters.skip_blanks {
            let n_before = records.len();
            records.retain(|record| !is_blank(record));
            debug!(n_skipped = n_before - records.len(), "Skipped blank sequences.");
        }

        if let Some(max_gap_fraction) = self.filters.max_gap_fraction {
            let n_before = records.len();
            records.retain(|record| within_gap_fraction(record, max_gap_fraction));
            debug!(
                n_skipped = n_before - records.len(),
                max_gap_fraction, "Skipped gappy sequences."
            );
        }

        Ok(records)
    }
}

/// Cut a record down to `window`. The window must lie within the record.
pub fn trim_to_window(record: SequenceRecord, window: Window) -> Result<SequenceRecord, SelectError> {
    if window.end() > record.len() {
        return Err(SelectError::WindowOutOfRange(
            record.name().to_string(),
            window,
            record.len(),
        ));
    }
    Ok(record.truncate_to(window.start() - 1..window.end()))
}

/// A record is blank when nothing is left after removing its gaps.
pub fn is_blank(record: &SequenceRecord) -> bool {
    record.ungapped().is_empty()
}

fn within_gap_fraction(record: &SequenceRecord, max_gap_fraction: f64) -> bool {
    match record.gap_fraction() {
        Some(fraction) => {
            trace!(name = record.name(), fraction, "Computed gap fraction.");
            fraction <= max_gap_fraction
        }
        None => {
            warn!(
                name = record.name(),
                "Skipping empty sequence, its gap fraction is undefined."
            );
            false
        }
    }
}
