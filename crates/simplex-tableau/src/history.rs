use crate::pivot::PivotChoice;
use crate::tableau::Tableau;

/// One recorded step of a solve.
///
/// `choice` is the pivot taken from `tableau` to reach the next record; it
/// is `None` on the final record.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct IterationRecord {
    pub iteration: usize,
    pub tableau: Tableau,
    pub choice: Option<PivotChoice>,
    /// Label of the entering variable, when a pivot was taken
    pub entering: Option<String>,
    /// Label of the leaving variable, when a pivot was taken
    pub leaving: Option<String>,
    /// Objective value of the basic solution at this snapshot
    pub objective_value: f64,
}

impl IterationRecord {
    /// Record a snapshot and the pivot taken from it. The pivot cell of the
    /// stored copy is marked for display.
    pub fn new(iteration: usize, tableau: &Tableau, choice: Option<PivotChoice>) -> Self {
        let mut snapshot = tableau.clone();
        snapshot.clear_pivot_marks();

        let position = choice.and_then(|c| c.position());
        if let Some((row, col)) = position {
            snapshot.mark_pivot(row, col);
        }

        Self {
            iteration,
            entering: position.map(|(_, col)| snapshot.column_labels()[col].clone()),
            leaving: position.map(|(row, _)| snapshot.row_label(row).to_string()),
            objective_value: snapshot.objective_value(),
            tableau: snapshot,
            choice,
        }
    }

    pub fn is_final(&self) -> bool {
        self.choice.is_none()
    }
}

/// Append-only sequence of iteration records
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IterationHistory {
    records: Vec<IterationRecord>,
}

impl IterationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, record: IterationRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[IterationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&IterationRecord> {
        self.records.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IterationRecord> {
        self.records.iter()
    }

    /// Number of pivots performed (records that carry a choice)
    pub fn pivots(&self) -> usize {
        self.records.iter().filter(|r| !r.is_final()).count()
    }
}

impl<'a> IntoIterator for &'a IterationHistory {
    type Item = &'a IterationRecord;
    type IntoIter = std::slice::Iter<'a, IterationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
