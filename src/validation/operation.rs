//! Persistence operations that trigger validation

use std::fmt;

/// Operation being validated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    Insert,
    Update,
    Delete,
}

impl Operation {
    /// Every operation, in installation order
    pub const ALL: [Operation; 3] = [Operation::Insert, Operation::Update, Operation::Delete];

    /// Insert and update share the write category
    pub fn category(&self) -> OperationCategory {
        match self {
            Operation::Insert | Operation::Update => OperationCategory::Write,
            Operation::Delete => OperationCategory::Delete,
        }
    }

    /// Conventional entry-point name for this operation
    pub fn entry_name(&self) -> &'static str {
        match self {
            Operation::Insert => "validateForInsert",
            Operation::Update => "validateForUpdate",
            Operation::Delete => "validateForDelete",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Insert => "insert",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Consistency-check category: one hook per category per type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationCategory {
    /// Insert and update
    Write,
    Delete,
}

impl OperationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationCategory::Write => "write",
            OperationCategory::Delete => "delete",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_update_share_category() {
        assert_eq!(Operation::Insert.category(), OperationCategory::Write);
        assert_eq!(Operation::Update.category(), OperationCategory::Write);
        assert_eq!(Operation::Delete.category(), OperationCategory::Delete);
    }

    #[test]
    fn test_entry_names_distinct() {
        let names: Vec<_> = Operation::ALL.iter().map(|op| op.entry_name()).collect();
        assert_eq!(
            names,
            vec!["validateForInsert", "validateForUpdate", "validateForDelete"]
        );
    }
}
