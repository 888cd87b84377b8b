use super::{
    matcher::{MatchMode, TargetSpec},
    transform::{FilterConfig, Pipeline, Window},
    ConfigError,
};

/// Everything a caller can ask of a selection run, before validation.
#[derive(Clone, Debug, Default)]
pub struct SelectionOptions {
    pub target_names: Vec<String>,
    pub invert_search: bool,
    /// Window in its `START,END` text form.
    pub window: Option<String>,
    pub gap_strip: bool,
    /// Select by name prefix instead of the whole name.
    pub match_start: bool,
    pub skip_blanks: bool,
    pub max_gap_fraction: Option<f64>,
}

impl SelectionOptions {
    /// Validate the options and split them into what selects and what transforms.
    pub fn build(&self) -> Result<(TargetSpec, Pipeline), ConfigError> {
        let match_mode = if self.match_start {
            MatchMode::Prefix
        } else {
            MatchMode::Exact
        };
        let targets = TargetSpec::new(self.target_names.clone(), match_mode, self.invert_search)?;

        let window = self
            .window
            .as_deref()
            .map(str::parse::<Window>)
            .transpose()?;
        let pipeline = Pipeline::new(
            window,
            FilterConfig {
                gap_strip: self.gap_strip,
                skip_blanks: self.skip_blanks,
                max_gap_fraction: self.max_gap_fraction,
            },
        )?;

        Ok((targets, pipeline))
    }
}
