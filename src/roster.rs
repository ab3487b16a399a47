//! CSV roster export and import (`name,rating,position`).

use crate::error::AppError;
use crate::models::{Player, PlayerInput, RatingInput};
use crate::store::{PlayerStore, StoreError};
use serde::{Deserialize, Serialize};
use std::io;

#[derive(Serialize)]
struct RosterRecord<'a> {
    name: &'a str,
    rating: u8,
    position: &'a str,
}

#[derive(Deserialize)]
struct RosterEntry {
    name: String,
    rating: String,
    position: String,
}

/// Outcome of [`import_roster`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ImportSummary {
    pub imported: usize,
    /// Rows whose name was already in the store.
    pub skipped: usize,
}

/// Write players as CSV with a header row.
pub fn write_roster<W: io::Write>(players: &[Player], out: W) -> Result<(), csv::Error> {
    let mut w = csv::Writer::from_writer(out);
    for p in players {
        w.serialize(RosterRecord {
            name: &p.name,
            rating: p.rating,
            position: p.position.code(),
        })?;
    }
    w.flush()?;
    Ok(())
}

/// Validate every row, then insert them. Names already in the store are skipped.
/// A malformed row rejects the whole file before anything is inserted.
pub fn import_roster<S, R>(store: &S, input: R) -> Result<ImportSummary, AppError>
where
    S: PlayerStore + ?Sized,
    R: io::Read,
{
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    let mut rows = Vec::new();
    for (i, entry) in reader.deserialize::<RosterEntry>().enumerate() {
        let line = i + 2;
        let entry =
            entry.map_err(|e| AppError::Validation(format!("roster line {line}: {e}")))?;
        let fields = PlayerInput {
            name: Some(entry.name),
            rating: Some(RatingInput::Text(entry.rating)),
            position: Some(entry.position),
        }
        .validate()
        .map_err(|e| AppError::Validation(format!("roster line {line}: {e}")))?;
        rows.push(fields);
    }

    let mut summary = ImportSummary::default();
    for fields in rows {
        let name = fields.name().to_string();
        match store.insert(fields) {
            Ok(_) => summary.imported += 1,
            Err(StoreError::DuplicateName(_)) => {
                log::warn!("Skipping roster entry {:?}: name already exists", name);
                summary.skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlayerFields, Position};
    use crate::store::DocumentStore;

    #[test]
    fn import_skips_existing_names() {
        let store = DocumentStore::in_memory();
        store
            .insert(PlayerFields::new("Ana", 70, Position::Forward).unwrap())
            .unwrap();
        let csv = "name,rating,position\nAna,80,FW\nBo, 65 ,gk\n";
        let summary = import_roster(&store, csv.as_bytes()).unwrap();
        assert_eq!(summary, ImportSummary { imported: 1, skipped: 1 });
        let bo = store.find_by_name("Bo").unwrap().unwrap();
        assert_eq!(bo.rating, 65);
        assert_eq!(bo.position, Position::Goalkeeper);
    }

    #[test]
    fn bad_row_rejects_whole_file() {
        let store = DocumentStore::in_memory();
        let csv = "name,rating,position\nAna,80,FW\nBo,500,GK\n";
        let err = import_roster(&store, csv.as_bytes()).unwrap_err();
        assert!(err.to_string().starts_with("roster line 3:"));
        assert_eq!(store.len().unwrap(), 0);
    }

    #[test]
    fn export_writes_header_and_codes() {
        let store = DocumentStore::in_memory();
        store
            .insert(PlayerFields::new("Cy", 55, Position::Defender).unwrap())
            .unwrap();
        let mut out = Vec::new();
        write_roster(&store.list().unwrap(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "name,rating,position\nCy,55,DF\n");
    }
}
