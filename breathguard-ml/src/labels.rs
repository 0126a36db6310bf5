//! Condition Labels and Label Sets
//!
//! ## Overview
//!
//! The estimator is parameterized by a [`LabelSet`]: the ordered,
//! deduplicated list of condition classes it may output, plus a role
//! map naming which entry plays the baseline (healthy-equivalent),
//! metabolic (diabetes-equivalent) and respiratory (copd-equivalent)
//! part in the decision rules. Keeping roles separate from names lets a
//! deployment rename its classes without touching the classifier.
//!
//! Label-set *order* is semantically relevant: the estimator partitions
//! residual probability mass by walking the set in order, so two sets
//! with the same members but different order produce different
//! distributions under the same random sequence.
//!
//! [`Label`] stores its text inline (no heap), so labels stay `Copy`
//! and safe to embed in results that cross the service boundary.

use core::fmt;

use heapless::Vec;
use thiserror_no_std::Error;

/// Maximum number of labels in a set.
pub const MAX_LABELS: usize = 8;

/// Maximum length of a label in bytes.
pub const MAX_LABEL_LEN: usize = 23;

/// Inline condition-label string
///
/// Avoids heap allocation for the short class names label sets use.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label {
    len: u8,
    data: [u8; MAX_LABEL_LEN],
}

impl Label {
    /// Create from a string slice. Returns `None` when the text is
    /// empty or longer than [`MAX_LABEL_LEN`] bytes.
    pub fn new(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.is_empty() || bytes.len() > MAX_LABEL_LEN {
            return None;
        }

        let mut data = [0u8; MAX_LABEL_LEN];
        data[..bytes.len()].copy_from_slice(bytes);

        Some(Self {
            len: bytes.len() as u8,
            data,
        })
    }

    /// Get as string slice
    pub fn as_str(&self) -> &str {
        // Only valid UTF-8 is stored by new()
        core::str::from_utf8(&self.data[..self.len as usize]).unwrap_or("")
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Label {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Role an entry plays in the decision rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassRole {
    /// Healthy-equivalent entry; the fallback when no rule fires.
    Baseline,
    /// Diabetes-equivalent entry; selected by the s0/s1 rules.
    Metabolic,
    /// Copd-equivalent entry; selected by the s2/s3 rules.
    Respiratory,
}

impl ClassRole {
    /// Conventional wire name of the role's class.
    pub const fn conventional_name(&self) -> &'static str {
        match self {
            ClassRole::Baseline => "healthy",
            ClassRole::Metabolic => "diabetes",
            ClassRole::Respiratory => "copd",
        }
    }
}

/// Indices of the role-bearing entries within a label set.
///
/// Roles may coincide; a single-label set with all three roles on index
/// zero is legal (every prediction collapses onto that label).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassRoles {
    /// Index of the baseline entry.
    pub baseline: usize,
    /// Index of the metabolic entry.
    pub metabolic: usize,
    /// Index of the respiratory entry.
    pub respiratory: usize,
}

/// Label-set construction errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSetError {
    /// No labels supplied
    #[error("label set is empty")]
    Empty,

    /// More labels than the set can hold
    #[error("label set has {count} labels, maximum is {max}")]
    TooManyLabels {
        /// Number of labels supplied
        count: usize,
        /// Capacity of a label set
        max: usize,
    },

    /// A label was empty or longer than [`MAX_LABEL_LEN`] bytes
    #[error("label at index {index} is empty or too long")]
    InvalidLabel {
        /// Position of the offending label
        index: usize,
    },

    /// The same label appeared twice
    #[error("label at index {index} duplicates an earlier label")]
    DuplicateLabel {
        /// Position of the second occurrence
        index: usize,
    },

    /// A role index pointed outside the set
    #[error("{role:?} role index {index} is out of bounds")]
    RoleOutOfBounds {
        /// The role whose index was invalid
        role: ClassRole,
        /// The out-of-bounds index
        index: usize,
    },

    /// A conventional role label was absent when resolving by name
    #[error("label set has no {role:?} entry (expected a label named {})", .role.conventional_name())]
    MissingRole {
        /// The unresolvable role
        role: ClassRole,
    },
}

/// Ordered, deduplicated set of condition labels with role assignments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<Label, MAX_LABELS>,
    roles: ClassRoles,
}

impl LabelSet {
    /// Build a label set with explicit role indices.
    pub fn new(names: &[&str], roles: ClassRoles) -> Result<Self, LabelSetError> {
        if names.is_empty() {
            return Err(LabelSetError::Empty);
        }
        if names.len() > MAX_LABELS {
            return Err(LabelSetError::TooManyLabels {
                count: names.len(),
                max: MAX_LABELS,
            });
        }

        let mut labels: Vec<Label, MAX_LABELS> = Vec::new();
        for (index, name) in names.iter().enumerate() {
            let label = Label::new(name).ok_or(LabelSetError::InvalidLabel { index })?;
            if labels.iter().any(|existing| *existing == label) {
                return Err(LabelSetError::DuplicateLabel { index });
            }
            // Capacity was checked above
            labels.push(label).ok();
        }

        for (role, index) in [
            (ClassRole::Baseline, roles.baseline),
            (ClassRole::Metabolic, roles.metabolic),
            (ClassRole::Respiratory, roles.respiratory),
        ] {
            if index >= labels.len() {
                return Err(LabelSetError::RoleOutOfBounds { role, index });
            }
        }

        Ok(Self { labels, roles })
    }

    /// Build a label set resolving roles by the conventional class
    /// names (healthy, diabetes, copd). This is how bare label lists
    /// arriving over the wire acquire roles; sets that rename their
    /// classes must use [`new`](Self::new) with explicit indices.
    pub fn from_names(names: &[&str]) -> Result<Self, LabelSetError> {
        if names.is_empty() {
            return Err(LabelSetError::Empty);
        }

        let position = |role: ClassRole| {
            names
                .iter()
                .position(|n| *n == role.conventional_name())
                .ok_or(LabelSetError::MissingRole { role })
        };

        let roles = ClassRoles {
            baseline: position(ClassRole::Baseline)?,
            metabolic: position(ClassRole::Metabolic)?,
            respiratory: position(ClassRole::Respiratory)?,
        };
        Self::new(names, roles)
    }

    /// The five-class screening panel this system ships with.
    pub fn screening() -> Self {
        Self::new(
            &["healthy", "diabetes", "kidney_disease", "copd", "asthma"],
            ClassRoles {
                baseline: 0,
                metabolic: 1,
                respiratory: 3,
            },
        )
        .expect("screening panel is a valid label set")
    }

    /// The minimal three-class triage set.
    pub fn triage() -> Self {
        Self::new(
            &["healthy", "diabetes", "copd"],
            ClassRoles {
                baseline: 0,
                metabolic: 1,
                respiratory: 2,
            },
        )
        .expect("triage panel is a valid label set")
    }

    /// Number of labels in the set.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// A label set is never empty; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label at the given index.
    pub fn get(&self, index: usize) -> Option<Label> {
        self.labels.get(index).copied()
    }

    /// Iterate labels in set order.
    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.labels.iter()
    }

    /// Index of the entry bearing the given role.
    pub fn role_index(&self, role: ClassRole) -> usize {
        match role {
            ClassRole::Baseline => self.roles.baseline,
            ClassRole::Metabolic => self.roles.metabolic,
            ClassRole::Respiratory => self.roles.respiratory,
        }
    }

    /// Label bearing the given role.
    pub fn role_label(&self, role: ClassRole) -> Label {
        // Role indices are validated at construction
        self.labels[self.role_index(role)]
    }
}

impl Default for LabelSet {
    fn default() -> Self {
        Self::screening()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_label() {
        let label = Label::new("kidney_disease").unwrap();
        assert_eq!(label.as_str(), "kidney_disease");

        assert!(Label::new("").is_none());
        assert!(Label::new("a_far_too_long_condition_label").is_none());
    }

    #[test]
    fn screening_panel_roles() {
        let set = LabelSet::screening();
        assert_eq!(set.len(), 5);
        assert_eq!(set.role_label(ClassRole::Baseline).as_str(), "healthy");
        assert_eq!(set.role_label(ClassRole::Metabolic).as_str(), "diabetes");
        assert_eq!(set.role_label(ClassRole::Respiratory).as_str(), "copd");
    }

    #[test]
    fn from_names_resolves_conventional_roles() {
        let set = LabelSet::from_names(&["copd", "healthy", "diabetes"]).unwrap();
        assert_eq!(set.role_index(ClassRole::Respiratory), 0);
        assert_eq!(set.role_index(ClassRole::Baseline), 1);
        assert_eq!(set.role_index(ClassRole::Metabolic), 2);
    }

    #[test]
    fn from_names_requires_all_roles() {
        let err = LabelSet::from_names(&["healthy", "diabetes"]).unwrap_err();
        assert_eq!(
            err,
            LabelSetError::MissingRole {
                role: ClassRole::Respiratory
            }
        );
    }

    #[test]
    fn construction_errors() {
        assert_eq!(
            LabelSet::from_names(&[]).unwrap_err(),
            LabelSetError::Empty
        );

        let err = LabelSet::new(
            &["healthy", "healthy"],
            ClassRoles {
                baseline: 0,
                metabolic: 0,
                respiratory: 0,
            },
        )
        .unwrap_err();
        assert_eq!(err, LabelSetError::DuplicateLabel { index: 1 });

        let err = LabelSet::new(
            &["healthy"],
            ClassRoles {
                baseline: 0,
                metabolic: 3,
                respiratory: 0,
            },
        )
        .unwrap_err();
        assert!(matches!(err, LabelSetError::RoleOutOfBounds { index: 3, .. }));
    }

    #[test]
    fn single_label_set_with_coinciding_roles() {
        let set = LabelSet::new(
            &["healthy"],
            ClassRoles {
                baseline: 0,
                metabolic: 0,
                respiratory: 0,
            },
        )
        .unwrap();
        assert_eq!(set.role_label(ClassRole::Metabolic).as_str(), "healthy");
    }
}
