use std::fmt;

use tracing::debug;

use crate::timer_file::{TimerDocument, TimerEntry};

/// Stable handle for a row. Never reused within one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowId(u64);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One user-configured timer. Every field is kept as typed text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TimerRow {
    pub name: String,
    pub offsets: String,
    pub interval: String,
    pub beeps: String,
}

impl TimerRow {
    pub fn new(
        name: impl Into<String>,
        offsets: impl Into<String>,
        interval: impl Into<String>,
        beeps: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            offsets: offsets.into(),
            interval: interval.into(),
            beeps: beeps.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.name.is_empty()
            && self.offsets.is_empty()
            && self.interval.is_empty()
            && self.beeps.is_empty()
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Offsets => &self.offsets,
            Field::Interval => &self.interval,
            Field::Beeps => &self.beeps,
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Offsets => &mut self.offsets,
            Field::Interval => &mut self.interval,
            Field::Beeps => &mut self.beeps,
        }
    }
}

impl From<TimerEntry> for TimerRow {
    fn from(e: TimerEntry) -> Self {
        Self {
            name: e.name,
            offsets: e.offsets,
            interval: e.interval,
            beeps: e.beeps,
        }
    }
}

impl From<&TimerRow> for TimerEntry {
    fn from(r: &TimerRow) -> Self {
        Self {
            name: r.name.clone(),
            offsets: r.offsets.clone(),
            interval: r.interval.clone(),
            beeps: r.beeps.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Field {
    Name,
    Offsets,
    Interval,
    Beeps,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Offsets, Field::Interval, Field::Beeps];
}

/// Ordered working set of timer rows.
#[derive(Debug, Clone)]
pub struct TimerRowStore {
    rows: Vec<(RowId, TimerRow)>,
    next_id: u64,
    allow_delete_first_row: bool,
}

impl TimerRowStore {
    /// Empty store. `allow_delete_first_row` decides whether the row at the top
    /// of the list can be deleted.
    pub fn new(allow_delete_first_row: bool) -> Self {
        Self {
            rows: Vec::new(),
            next_id: 0,
            allow_delete_first_row,
        }
    }

    pub fn allows_delete_first_row(&self) -> bool {
        self.allow_delete_first_row
    }

    pub fn add_row(&mut self, row: TimerRow) -> RowId {
        let id = RowId(self.next_id);
        self.next_id += 1;
        self.rows.push((id, row));
        id
    }

    pub fn add_blank_row(&mut self) -> RowId {
        self.add_row(TimerRow::default())
    }

    /// Remove a row. Returns false if nothing was removed: unknown id, or the
    /// first row while first-row deletion is disabled.
    pub fn delete_row(&mut self, id: RowId) -> bool {
        let Some(pos) = self.position(id) else {
            return false;
        };
        if pos == 0 && !self.allow_delete_first_row {
            debug!(%id, "refusing to delete first row");
            return false;
        }
        self.rows.remove(pos);
        true
    }

    /// Rows in display order. Each call starts a fresh pass.
    pub fn rows(&self) -> impl Iterator<Item = (RowId, &TimerRow)> + '_ {
        self.rows.iter().map(|(id, row)| (*id, row))
    }

    pub fn get(&self, id: RowId) -> Option<&TimerRow> {
        self.rows.iter().find(|(rid, _)| *rid == id).map(|(_, row)| row)
    }

    pub fn position(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|(rid, _)| *rid == id)
    }

    pub fn id_at(&self, index: usize) -> Option<RowId> {
        self.rows.get(index).map(|(id, _)| *id)
    }

    pub fn first_id(&self) -> Option<RowId> {
        self.id_at(0)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn set_field(&mut self, id: RowId, field: Field, value: impl Into<String>) -> bool {
        match self.rows.iter_mut().find(|(rid, _)| *rid == id) {
            Some((_, row)) => {
                *row.field_mut(field) = value.into();
                true
            }
            None => false,
        }
    }

    /// Snapshot for saving. Rows with every field empty are left out.
    pub fn to_document(&self) -> TimerDocument {
        TimerDocument::new(
            self.rows
                .iter()
                .filter(|(_, row)| !row.is_blank())
                .map(|(_, row)| TimerEntry::from(row))
                .collect(),
        )
    }

    /// Replace every row with the document's timers. Old ids stop resolving.
    pub fn load_document(&mut self, doc: TimerDocument) {
        self.rows.clear();
        for entry in doc.timers {
            self.add_row(entry.into());
        }
    }
}

impl Default for TimerRowStore {
    fn default() -> Self {
        Self::new(true)
    }
}
