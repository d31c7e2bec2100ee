use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use crate::error::EngineError;

/// Lowest raw speed the slider produces
pub const MIN_SPEED: u32 = 1;

/// Highest raw speed the slider produces
pub const MAX_SPEED: u32 = 100;

/// Default raw speed (the "Medium" band)
pub const DEFAULT_SPEED: u32 = 50;

/// Algorithms the engine can run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Algorithm {
    BubbleSort,
    InsertionSort,
    SelectionSort,
    MergeSort,
    QuickSort,
    LinearSearch,
    BinarySearch,
}

impl Algorithm {
    pub const ALL: [Algorithm; 7] = [
        Algorithm::BubbleSort,
        Algorithm::InsertionSort,
        Algorithm::SelectionSort,
        Algorithm::MergeSort,
        Algorithm::QuickSort,
        Algorithm::LinearSearch,
        Algorithm::BinarySearch,
    ];

    /// Short identifier used on the command line and in logs
    pub fn id(self) -> &'static str {
        match self {
            Algorithm::BubbleSort => "bubble",
            Algorithm::InsertionSort => "insertion",
            Algorithm::SelectionSort => "selection",
            Algorithm::MergeSort => "merge",
            Algorithm::QuickSort => "quick",
            Algorithm::LinearSearch => "linear",
            Algorithm::BinarySearch => "binary",
        }
    }

    /// Human readable name
    pub fn display_name(self) -> &'static str {
        match self {
            Algorithm::BubbleSort => "Bubble Sort",
            Algorithm::InsertionSort => "Insertion Sort",
            Algorithm::SelectionSort => "Selection Sort",
            Algorithm::MergeSort => "Merge Sort",
            Algorithm::QuickSort => "Quick Sort",
            Algorithm::LinearSearch => "Linear Search",
            Algorithm::BinarySearch => "Binary Search",
        }
    }

    /// Time complexity note shown while the algorithm runs
    pub fn complexity(self) -> &'static str {
        match self {
            Algorithm::BubbleSort | Algorithm::InsertionSort | Algorithm::SelectionSort => {
                "O(n²) time complexity"
            }
            Algorithm::MergeSort => "O(n log n) time complexity",
            Algorithm::QuickSort => "O(n log n) average time complexity",
            Algorithm::LinearSearch => "O(n) time complexity",
            Algorithm::BinarySearch => "O(log n) time complexity",
        }
    }

    pub fn is_search(self) -> bool {
        matches!(self, Algorithm::LinearSearch | Algorithm::BinarySearch)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Algorithm {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Algorithm::ALL
            .into_iter()
            .find(|alg| {
                needle == alg.id()
                    || needle == alg.display_name().to_ascii_lowercase()
                    || needle == alg.display_name().replace(' ', "").to_ascii_lowercase()
            })
            .ok_or_else(|| EngineError::InvalidInput(format!("unknown algorithm: {}", s)))
    }
}

/// Lifecycle of the single run slot
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Stopping,
    Stopped,
}

impl RunState {
    pub fn as_str(self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Stopping => "stopping",
            RunState::Stopped => "stopped",
        }
    }
}

/// Whether suspension waits for an advance signal or for a timer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum SchedulingMode {
    Manual,
    #[default]
    Timed,
}

impl SchedulingMode {
    pub fn toggled(self) -> Self {
        match self {
            SchedulingMode::Manual => SchedulingMode::Timed,
            SchedulingMode::Timed => SchedulingMode::Manual,
        }
    }
}

/// Raw value of the speed control, clamped to `MIN_SPEED..=MAX_SPEED`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct SpeedSetting(u32);

impl SpeedSetting {
    pub fn new(raw: u32) -> Self {
        Self(raw.clamp(MIN_SPEED, MAX_SPEED))
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    /// Label of the band the raw value falls into
    pub fn label(self) -> &'static str {
        match self.0 {
            0..=20 => "Very Slow",
            21..=40 => "Slow",
            41..=60 => "Medium",
            61..=80 => "Fast",
            _ => "Very Fast",
        }
    }
}

impl Default for SpeedSetting {
    fn default() -> Self {
        Self(DEFAULT_SPEED)
    }
}

/// Result of a finished search
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    pub index: Option<usize>,
    pub comparisons: usize,
    pub steps: usize,
    /// Worst-case step count, `floor(log2(n)) + 1`, for binary search
    pub bound: Option<usize>,
}

impl SearchOutcome {
    /// Index of the match, or -1 when the target is absent
    pub fn position(&self) -> i64 {
        self.index.map_or(-1, |i| i as i64)
    }

    pub fn found(&self) -> bool {
        self.index.is_some()
    }
}

/// How a run ended
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum RunOutcome {
    Sorted,
    Found { index: usize },
    NotFound,
    Stopped,
    Faulted { message: String },
}

impl RunOutcome {
    pub fn is_stopped(&self) -> bool {
        matches!(self, RunOutcome::Stopped)
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Sorted => write!(f, "completed"),
            RunOutcome::Found { index } => write!(f, "found at index {}", index),
            RunOutcome::NotFound => write!(f, "not found"),
            RunOutcome::Stopped => write!(f, "stopped"),
            RunOutcome::Faulted { message } => write!(f, "faulted: {}", message),
        }
    }
}

/// Summary of one run, produced when its task exits
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub algorithm: Algorithm,
    pub outcome: RunOutcome,
    pub search: Option<SearchOutcome>,
    pub steps: u64,
    pub elapsed: Duration,
    pub final_array: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_parsing() {
        assert_eq!("bubble".parse::<Algorithm>().unwrap(), Algorithm::BubbleSort);
        assert_eq!("Quick Sort".parse::<Algorithm>().unwrap(), Algorithm::QuickSort);
        assert_eq!("binarySearch".parse::<Algorithm>().unwrap(), Algorithm::BinarySearch);
        assert!(matches!(
            "bogo".parse::<Algorithm>(),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_search_flag() {
        assert!(Algorithm::LinearSearch.is_search());
        assert!(!Algorithm::MergeSort.is_search());
    }

    #[test]
    fn test_speed_setting_clamps() {
        assert_eq!(SpeedSetting::new(0).raw(), MIN_SPEED);
        assert_eq!(SpeedSetting::new(500).raw(), MAX_SPEED);
        assert_eq!(SpeedSetting::default().raw(), DEFAULT_SPEED);
    }

    #[test]
    fn test_speed_labels() {
        assert_eq!(SpeedSetting::new(10).label(), "Very Slow");
        assert_eq!(SpeedSetting::new(40).label(), "Slow");
        assert_eq!(SpeedSetting::new(50).label(), "Medium");
        assert_eq!(SpeedSetting::new(80).label(), "Fast");
        assert_eq!(SpeedSetting::new(81).label(), "Very Fast");
    }

    #[test]
    fn test_search_outcome_sentinel() {
        let missing = SearchOutcome {
            index: None,
            comparisons: 3,
            steps: 3,
            bound: None,
        };
        assert_eq!(missing.position(), -1);

        let hit = SearchOutcome {
            index: Some(3),
            comparisons: 2,
            steps: 2,
            bound: Some(3),
        };
        assert_eq!(hit.position(), 3);
        assert!(hit.found());
    }

    #[test]
    fn test_run_report_serializes() {
        let report = RunReport {
            algorithm: Algorithm::BubbleSort,
            outcome: RunOutcome::Sorted,
            search: None,
            steps: 4,
            elapsed: Duration::from_millis(20),
            final_array: vec![1, 3],
        };

        let yaml = serde_yaml_ng::to_string(&report).unwrap();

        assert!(yaml.contains("algorithm: BubbleSort"));
        assert!(yaml.contains("outcome: Sorted"));
        assert!(yaml.contains("steps: 4"));
    }

    #[test]
    fn test_mode_toggle() {
        assert_eq!(SchedulingMode::Manual.toggled(), SchedulingMode::Timed);
        assert_eq!(SchedulingMode::default(), SchedulingMode::Timed);
    }
}
