use std::io;

use bio::io::fasta;

use super::SelectError;

/// Characters counted as alignment gaps or unknown bases.
pub const GAP_CHARACTERS: [u8; 2] = [b'-', b'?'];

pub fn is_gap(residue: &u8) -> bool {
    GAP_CHARACTERS.contains(residue)
}

/// A named sequence travelling through the selection.
///
/// The name is the first word of the FASTA header. Whatever follows it is kept
/// as the description so that headers are written back unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceRecord {
    name: String,
    description: Option<String>,
    residues: Vec<u8>,
}

impl SequenceRecord {
    pub fn new(name: &str, residues: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            residues: residues.to_vec(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn residues(&self) -> &[u8] {
        &self.residues
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn gap_count(&self) -> usize {
        self.residues.iter().filter(|residue| is_gap(residue)).count()
    }

    /// Fraction of residues that are gap characters.
    ///
    /// `None` for a record without residues, where the fraction is undefined.
    pub fn gap_fraction(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        Some(self.gap_count() as f64 / self.len() as f64)
    }

    /// Copy of the residues with all gap characters removed.
    pub fn ungapped(&self) -> Vec<u8> {
        self.residues
            .iter()
            .copied()
            .filter(|residue| !is_gap(residue))
            .collect()
    }

    /// Remove all gap characters, keeping the order of the remaining residues.
    pub fn strip_gaps(mut self) -> Self {
        self.residues.retain(|residue| !is_gap(residue));
        self
    }

    /// Keep only the residues in the zero based, half open `range`.
    pub(crate) fn truncate_to(mut self, range: std::ops::Range<usize>) -> Self {
        self.residues.truncate(range.end);
        self.residues.drain(..range.start);
        self
    }
}

impl From<fasta::Record> for SequenceRecord {
    fn from(record: fasta::Record) -> Self {
        Self {
            name: record.id().to_string(),
            description: record.desc().map(str::to_string),
            residues: record.seq().to_vec(),
        }
    }
}

impl From<&SequenceRecord> for fasta::Record {
    fn from(record: &SequenceRecord) -> Self {
        fasta::Record::with_attrs(record.name(), record.description(), record.residues())
    }
}

/// Lazily parse FASTA records from `reader`.
///
/// Nothing is read beyond the records that are actually pulled from the iterator.
pub fn read_records<R: io::Read>(
    reader: R,
) -> impl Iterator<Item = Result<SequenceRecord, SelectError>> {
    fasta::Reader::new(reader).records().map(|record_result| {
        record_result
            .map(SequenceRecord::from)
            .map_err(SelectError::from)
    })
}

/// Write records to `writer` in FASTA format, in the order given.
pub fn write_records<W, I>(records: I, writer: W) -> Result<(), SelectError>
where
    W: io::Write,
    I: IntoIterator<Item = SequenceRecord>,
{
    let mut fasta_writer = fasta::Writer::new(writer);
    for record in records {
        fasta_writer.write_record(&fasta::Record::from(&record))?;
    }
    fasta_writer.flush()?;
    Ok(())
}
