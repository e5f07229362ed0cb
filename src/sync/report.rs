// LapsSync - Run summary

use std::fmt;

use crate::vault::VaultEntry;

/// Outcome of one successfully applied action.
#[derive(Debug, Clone, PartialEq)]
pub enum AppliedAction {
    Created(VaultEntry),
    Rotated(VaultEntry),
}

/// Counters for one sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub created: usize,
    pub rotated: usize,
    /// Matched items whose password already matched.
    pub unchanged: usize,
    /// Records skipped because the directory had no password.
    pub skipped: usize,
}

impl SyncReport {
    pub fn record(&mut self, applied: &AppliedAction) {
        match applied {
            AppliedAction::Created(_) => self.created += 1,
            AppliedAction::Rotated(_) => self.rotated += 1,
        }
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "created={} rotated={} unchanged={} skipped={}",
            self.created, self.rotated, self.unchanged, self.skipped
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> VaultEntry {
        VaultEntry {
            id: "i".to_string(),
            container_id: "v".to_string(),
            category: "LOGIN".to_string(),
            title: "PC01.domain".to_string(),
            fields: vec![],
            extra: Default::default(),
        }
    }

    #[test]
    fn test_report_counts_applied_actions() {
        let mut report = SyncReport::default();
        report.record(&AppliedAction::Created(item()));
        report.record(&AppliedAction::Created(item()));
        report.record(&AppliedAction::Rotated(item()));

        assert_eq!(report.created, 2);
        assert_eq!(report.rotated, 1);
        assert_eq!(report.to_string(), "created=2 rotated=1 unchanged=0 skipped=0");
    }
}
