use std::fmt;

use serde::Serialize;

use crate::models::run::Algorithm;

/// What happened in one observable micro-step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum StepKind {
    /// Two elements are being compared
    Compare,
    /// Two elements were exchanged
    Swap,
    /// Insertion sort isolated its candidate
    Isolate,
    /// Insertion sort shifted an element one slot right
    Shift,
    /// Insertion sort dropped its candidate into place
    Place,
    /// A recursive call is working on a sub-range
    Range,
    /// Merge sort divided a range into halves
    Split,
    /// Merge sort is about to merge two sorted runs
    MergeStart,
    /// Merge sort copied a leftover element
    MergeCopy,
    /// Merge sort wrote a merged value back into the array
    WriteBack,
    /// Median-of-three chose a pivot and parked it at `right - 1`
    PivotChosen,
    /// The pivot reached its final index
    PivotPlaced,
    /// Partition finished; elements are split around the pivot
    PartitionResult,
    /// A search looked at an index
    Inspect,
    /// Binary search narrowed its range
    Eliminate,
    /// The target was found
    Found,
    /// The search ended without a match
    NotFound,
    /// Sortedness check looked at an adjacent pair
    SortCheck,
    /// Sortedness check found an out-of-order pair
    Unsorted,
    /// The array was sorted ahead of binary search
    SortedForSearch,
}

impl StepKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StepKind::Compare => "compare",
            StepKind::Swap => "swap",
            StepKind::Isolate => "isolate",
            StepKind::Shift => "shift",
            StepKind::Place => "place",
            StepKind::Range => "range",
            StepKind::Split => "split",
            StepKind::MergeStart => "merge",
            StepKind::MergeCopy => "copy",
            StepKind::WriteBack => "write-back",
            StepKind::PivotChosen => "pivot",
            StepKind::PivotPlaced => "pivot-placed",
            StepKind::PartitionResult => "partitioned",
            StepKind::Inspect => "inspect",
            StepKind::Eliminate => "eliminate",
            StepKind::Found => "found",
            StepKind::NotFound => "not-found",
            StepKind::SortCheck => "check",
            StepKind::Unsorted => "unsorted",
            StepKind::SortedForSearch => "sorted",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role an index plays in a step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Role {
    Compared,
    Swapped,
    Pivot,
    PartitionBound,
    MergeSource,
    /// Lower half of a split or partition
    LeftRun,
    /// Upper half of a split or partition
    RightRun,
    SearchRange,
    Eliminated,
    Found,
}

/// One highlighted index
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Mark {
    pub index: usize,
    pub role: Role,
}

/// Which run of a merge an element came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Side {
    Left,
    Right,
}

/// Algorithm specific extras carried by a step
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StepMeta {
    /// Inclusive bounds of the current recursive call or search range
    pub bounds: Option<(usize, usize)>,
    pub pivot: Option<i64>,
    /// The two sorted runs about to be merged
    pub merging: Option<(Vec<i64>, Vec<i64>)>,
    pub side: Option<Side>,
    pub target: Option<i64>,
    pub comparisons: Option<usize>,
}

/// Immutable snapshot emitted at a suspension point
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StepEvent {
    /// Position in the run's event sequence, starting at 1
    pub seq: u64,
    pub algorithm: Algorithm,
    pub kind: StepKind,
    pub marks: Vec<Mark>,
    pub meta: StepMeta,
    /// Array contents after the step's mutation
    pub array: Vec<i64>,
}

impl StepEvent {
    /// Indices carrying `role`, in mark order
    pub fn indices_with(&self, role: Role) -> Vec<usize> {
        self.marks
            .iter()
            .filter(|m| m.role == role)
            .map(|m| m.index)
            .collect()
    }

    /// All marked indices, in mark order
    pub fn indices(&self) -> Vec<usize> {
        self.marks.iter().map(|m| m.index).collect()
    }
}

/// Builder for the parts of a [`StepEvent`] a runner decides.
///
/// The run context fills in the sequence number, algorithm and array
/// snapshot when the step is emitted.
#[derive(Clone, Debug)]
pub struct Step {
    pub kind: StepKind,
    pub marks: Vec<Mark>,
    pub meta: StepMeta,
}

impl Step {
    pub fn new(kind: StepKind) -> Self {
        Self {
            kind,
            marks: Vec::new(),
            meta: StepMeta::default(),
        }
    }

    pub fn mark(mut self, index: usize, role: Role) -> Self {
        self.marks.push(Mark { index, role });
        self
    }

    /// Mark every index of `[left, right]` with `role`
    pub fn mark_range(mut self, left: usize, right: usize, role: Role) -> Self {
        self.marks
            .extend((left..=right).map(|index| Mark { index, role }));
        self
    }

    pub fn bounds(mut self, left: usize, right: usize) -> Self {
        self.meta.bounds = Some((left, right));
        self
    }

    pub fn pivot(mut self, value: i64) -> Self {
        self.meta.pivot = Some(value);
        self
    }

    pub fn merging(mut self, left: Vec<i64>, right: Vec<i64>) -> Self {
        self.meta.merging = Some((left, right));
        self
    }

    pub fn side(mut self, side: Side) -> Self {
        self.meta.side = Some(side);
        self
    }

    pub fn target(mut self, value: i64) -> Self {
        self.meta.target = Some(value);
        self
    }

    pub fn comparisons(mut self, count: usize) -> Self {
        self.meta.comparisons = Some(count);
        self
    }

    pub(crate) fn into_event(self, seq: u64, algorithm: Algorithm, array: Vec<i64>) -> StepEvent {
        StepEvent {
            seq,
            algorithm,
            kind: self.kind,
            marks: self.marks,
            meta: self.meta,
            array,
        }
    }
}
