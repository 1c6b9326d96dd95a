use bonding_ports::{JournalEntry, LedgerMutation, TradeJournal};
use parking_lot::RwLock;

/// In-memory trade journal
///
/// Sequence numbers start at 1 and never skip.
#[derive(Debug, Default)]
pub struct InMemoryJournal {
    entries: RwLock<Vec<JournalEntry>>,
}

impl InMemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every entry in commit order
    pub fn entries(&self) -> Vec<JournalEntry> {
        self.entries.read().clone()
    }

    pub fn last(&self) -> Option<JournalEntry> {
        self.entries.read().last().cloned()
    }
}

impl TradeJournal for InMemoryJournal {
    fn append(&self, mutation: LedgerMutation) -> u64 {
        let mut entries = self.entries.write();
        let sequence = entries.len() as u64 + 1;
        entries.push(JournalEntry { sequence, mutation });
        sequence
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }
}
