use anyhow::Context;
use clap::{value_parser, Parser};
use findseqs::select::{
    self,
    record::{read_records, write_records},
    SelectionOptions,
};
use std::{path::PathBuf, process::ExitCode};
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Retrieve searched-for sequences from a FASTA file.
///
/// Output is printed to stdout in FASTA format.
#[derive(Parser, Debug)]
#[command()]
struct Args {
    #[arg(value_parser = existing_file)]
    fasta_file: PathBuf,

    #[arg(required = true, num_args = 1..)]
    sequence_names: Vec<String>,

    #[arg(short = 'v', long, help = "Return all sequences except those searched for.")]
    invert_search: bool,

    #[arg(
        short = 'W',
        long,
        allow_hyphen_values = true,
        value_name = "START,END",
        help = "Only print the positions START to END (1 based, inclusive) of each sequence."
    )]
    window: Option<String>,

    #[arg(
        short,
        long,
        help = "Remove all gap characters ('-' and '?') before printing. (Aligned sequences will probably become unaligned.)"
    )]
    gap_strip: bool,

    #[arg(
        short = 'S',
        long,
        help = "Return sequences whose names begin with one of the searched for names."
    )]
    match_start: bool,

    #[arg(
        short = 'B',
        long,
        help = "Ignore sequences consisting entirely of gap characters ('-' and '?')."
    )]
    skip_blanks: bool,

    #[arg(
        long = "max-gap-frac",
        allow_negative_numbers = true,
        help = "Ignore sequences whose fraction of gap characters exceeds this threshold."
    )]
    max_gap_fraction: Option<f64>,

    #[arg(long, default_value_t = Level::WARN, value_parser = value_parser!(Level), help = "Most verbose level logged to stderr.")]
    log_level: Level,
}

impl From<&Args> for SelectionOptions {
    fn from(args: &Args) -> Self {
        SelectionOptions {
            target_names: args.sequence_names.clone(),
            invert_search: args.invert_search,
            window: args.window.clone(),
            gap_strip: args.gap_strip,
            match_start: args.match_start,
            skip_blanks: args.skip_blanks,
            max_gap_fraction: args.max_gap_fraction,
        }
    }
}

fn existing_file(path: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path);
    if path.is_file() {
        Ok(path)
    } else {
        Err(format!("{} does not exist or is not a file.", path.display()))
    }
}

fn report_error<OkType, ErrType: std::fmt::Display>(
    result: Result<OkType, ErrType>,
) -> Result<OkType, ErrType> {
    result.map_err(|err| {
        error!("{:#}", err);
        err
    })
}

fn main() -> ExitCode {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        // stdout is reserved for the selected sequences.
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    match report_error(run(&args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let options = SelectionOptions::from(args);

    info!(
        input_file = args.fasta_file.as_os_str().to_str(),
        "Reading input file."
    );
    let file = std::fs::File::open(&args.fasta_file)
        .with_context(|| format!("Could not open {}", args.fasta_file.display()))?;

    let selected = select::run(read_records(file), &options)
        .with_context(|| format!("Could not select sequences from {}", args.fasta_file.display()))?;

    debug!(n_sequences = selected.len(), "Writing sequences.");
    write_records(selected, std::io::stdout().lock()).context("Could not write sequences")?;
    Ok(())
}
