use super::error::Error;
use crate::model::entry::{EntryRecord, EntryView, Phase, PourbaixEntry};
use crate::model::types::PhaseType;

/// Input entries partitioned by phase, each list in input order.
#[derive(Debug, Clone, Default)]
pub struct Classified {
    pub solids: Vec<PourbaixEntry>,
    pub ions: Vec<PourbaixEntry>,
}

impl Classified {
    /// Copies and partitions typed entries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if an entry has no solute atoms.
    pub fn from_entries(entries: &[PourbaixEntry]) -> Result<Self, Error> {
        let mut classified = Self::default();
        for (index, entry) in entries.iter().enumerate() {
            classified.push(index, entry.clone())?;
        }
        Ok(classified)
    }

    /// Classifies untyped records by their phase tag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for a tag other than `Solid` or
    /// `Ion` or an entry without solute atoms, and [`Error::Parse`] for an
    /// unparseable formula.
    pub fn from_records(records: &[EntryRecord]) -> Result<Self, Error> {
        let mut classified = Self::default();
        for (index, record) in records.iter().enumerate() {
            classified.push(index, entry_from_record(index, record)?)?;
        }
        Ok(classified)
    }

    /// Solids followed by ions.
    pub fn into_unprocessed(self) -> Vec<PourbaixEntry> {
        let mut entries = self.solids;
        entries.extend(self.ions);
        entries
    }

    fn push(&mut self, index: usize, entry: PourbaixEntry) -> Result<(), Error> {
        if entry.n_m() <= 0.0 {
            return Err(Error::configuration(
                index,
                &entry.name(),
                "entry must contain an element other than H and O",
            ));
        }
        match entry.phase_type() {
            PhaseType::Solid => self.solids.push(entry),
            PhaseType::Ion => self.ions.push(entry),
        }
        Ok(())
    }
}

fn entry_from_record(index: usize, record: &EntryRecord) -> Result<PourbaixEntry, Error> {
    let phase_type: PhaseType = record.phase_type.parse().map_err(|_| {
        Error::configuration(
            index,
            &record.phase_type,
            "entry must be phase type Ion or Solid",
        )
    })?;

    let phase = Phase::from_formula(phase_type, &record.formula)?;
    let mut entry = PourbaixEntry::new(phase, record.energy).with_correction(record.correction);
    if let Some(concentration) = record.concentration {
        entry = entry.with_concentration(concentration);
    }
    if let Some(id) = &record.id {
        entry = entry.with_id(id.clone());
    }
    Ok(entry)
}
