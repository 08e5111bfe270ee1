// ── Row selection ──
//
// Ephemeral checked-row state for a list screen. Cleared after every
// mutating action completes.

use crate::error::CoreError;
use crate::validate::{require_any_selection, require_single_selection};

/// Selected record ids in the order they were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<i64>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check or uncheck `id`. Returns `true` if it is now selected.
    pub fn toggle(&mut self, id: i64) -> bool {
        if let Some(pos) = self.ids.iter().position(|&s| s == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop ids that no longer exist after a refresh.
    pub fn retain_existing(&mut self, existing: &[i64]) {
        self.ids.retain(|id| existing.contains(id));
    }

    /// The single selected id, for update actions.
    pub fn single(&self) -> Result<i64, CoreError> {
        require_single_selection(self.ids.len())?;
        Ok(self.ids[0])
    }

    /// All selected ids, for delete actions.
    pub fn at_least_one(&self) -> Result<Vec<i64>, CoreError> {
        require_any_selection(self.ids.len())?;
        Ok(self.ids.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_and_removes() {
        let mut sel = Selection::new();
        assert!(sel.toggle(3));
        assert!(sel.toggle(1));
        assert!(!sel.toggle(3));
        assert_eq!(sel.ids(), &[1]);
    }

    #[test]
    fn single_requires_exactly_one() {
        let mut sel = Selection::new();
        assert!(sel.single().is_err());
        sel.toggle(5);
        assert_eq!(sel.single().ok(), Some(5));
        sel.toggle(6);
        assert!(sel.single().is_err());
        assert_eq!(sel.at_least_one().ok(), Some(vec![5, 6]));
    }

    #[test]
    fn retain_existing_prunes_deleted_ids() {
        let mut sel = Selection::new();
        sel.toggle(1);
        sel.toggle(2);
        sel.retain_existing(&[2, 3]);
        assert_eq!(sel.ids(), &[2]);
    }
}
