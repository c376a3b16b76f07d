//! Display labels for enumerated backend values.

/// Label shown for backend values with no known display label.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// One display label and the backend values it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelEntry {
    /// Text shown in the UI.
    pub label: &'static str,
    /// Backend values represented by the label.
    pub values: &'static [&'static str],
}

/// Finite set of display labels for one enumerated column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelSet {
    entries: &'static [LabelEntry],
}

impl LabelSet {
    /// Creates a label set from static entries.
    #[must_use]
    pub const fn new(entries: &'static [LabelEntry]) -> Self {
        Self { entries }
    }

    /// Returns the entries in display order.
    #[must_use]
    pub fn entries(&self) -> &'static [LabelEntry] {
        self.entries
    }

    /// Returns the backend values of every label containing `search_text`,
    /// compared case-insensitively, de-duplicated in label order.
    ///
    /// An empty result means no label matched.
    #[must_use]
    pub fn matching_values(&self, search_text: &str) -> Vec<&'static str> {
        let needle = search_text.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut values: Vec<&'static str> = Vec::new();
        for entry in self.entries {
            if !entry.label.to_lowercase().contains(needle.as_str()) {
                continue;
            }
            for value in entry.values.iter().copied() {
                if !values.contains(&value) {
                    values.push(value);
                }
            }
        }

        values
    }

    /// Returns the display label for a backend value, or [`UNKNOWN_LABEL`].
    #[must_use]
    pub fn display_label(&self, value: &str) -> &'static str {
        self.entries
            .iter()
            .find(|entry| {
                entry
                    .values
                    .iter()
                    .any(|candidate| candidate.eq_ignore_ascii_case(value))
            })
            .map(|entry| entry.label)
            .unwrap_or(UNKNOWN_LABEL)
    }
}

/// Soft-delete state of users, customers and configurations.
pub const SOFT_DELETE_LABELS: LabelSet = LabelSet::new(&[
    LabelEntry {
        label: "Active",
        values: &["false"],
    },
    LabelEntry {
        label: "Deleted",
        values: &["true"],
    },
]);

/// Application role names assigned to users.
pub const USER_ROLE_LABELS: LabelSet = LabelSet::new(&[
    LabelEntry {
        label: "Project Admin",
        values: &["Project Admin"],
    },
    LabelEntry {
        label: "Ericsson Contributor",
        values: &["Ericsson Contributor"],
    },
    LabelEntry {
        label: "Customer Approver",
        values: &["Customer Approver"],
    },
    LabelEntry {
        label: "Ops Admin",
        values: &["Ops Admin"],
    },
]);

/// Review status of acceptance packages and line items.
pub const PACKAGE_STATUS_LABELS: LabelSet = LabelSet::new(&[
    LabelEntry {
        label: "Init",
        values: &["Init"],
    },
    LabelEntry {
        label: "In Progress",
        values: &["InProgress"],
    },
    LabelEntry {
        label: "Customer New",
        values: &["CustomerNew"],
    },
    LabelEntry {
        label: "Customer Revision",
        values: &["CustomerRevision"],
    },
    LabelEntry {
        label: "Customer Approved",
        values: &["CustomerApproved", "AutoApproved"],
    },
    LabelEntry {
        label: "Customer Rejected",
        values: &["CustomerRejected"],
    },
    LabelEntry {
        label: "Abandoned",
        values: &["Abandoned"],
    },
]);

/// Review status of evidences.
pub const EVIDENCE_STATUS_LABELS: LabelSet = LabelSet::new(&[
    LabelEntry {
        label: "Pending",
        values: &["Pending", "Ready"],
    },
    LabelEntry {
        label: "Approved",
        values: &["Approved"],
    },
    LabelEntry {
        label: "Rejected",
        values: &["Rejected"],
    },
    LabelEntry {
        label: "Not Applicable",
        values: &["NotApplicable"],
    },
]);

#[cfg(test)]
mod tests {
    use super::{EVIDENCE_STATUS_LABELS, PACKAGE_STATUS_LABELS, SOFT_DELETE_LABELS, UNKNOWN_LABEL};

    #[test]
    fn substring_match_is_case_insensitive() {
        assert_eq!(SOFT_DELETE_LABELS.matching_values("activ"), vec!["false"]);
        assert_eq!(SOFT_DELETE_LABELS.matching_values("DEL"), vec!["true"]);
    }

    #[test]
    fn no_matching_label_yields_no_values() {
        assert!(SOFT_DELETE_LABELS.matching_values("xyz").is_empty());
        assert!(SOFT_DELETE_LABELS.matching_values("   ").is_empty());
    }

    #[test]
    fn several_matches_collect_every_backend_value() {
        assert_eq!(
            PACKAGE_STATUS_LABELS.matching_values("customer"),
            vec![
                "CustomerNew",
                "CustomerRevision",
                "CustomerApproved",
                "AutoApproved",
                "CustomerRejected",
            ]
        );
    }

    #[test]
    fn unknown_backend_value_displays_as_unknown() {
        assert_eq!(EVIDENCE_STATUS_LABELS.display_label("ready"), "Pending");
        assert_eq!(EVIDENCE_STATUS_LABELS.display_label("Archived"), UNKNOWN_LABEL);
    }
}
