//! Services module - the algorithm runners.
//!
//! Each runner is a stateless async routine over a [`RunContext`]. A runner
//! repeats one pattern until it terminates:
//!
//! 1. check the cancellation token
//! 2. mutate or inspect the [`crate::models::ArrayStore`]
//! 3. publish a [`crate::models::Step`] to the renderer
//! 4. suspend through the [`crate::scheduler::SuspensionController`]
//! 5. check the token again
//!
//! A stop observed at any check surfaces as
//! [`EngineError::Stopped`](crate::error::EngineError::Stopped) and is
//! propagated unchanged; the runner performs no further mutation and publishes
//! no further steps.
//!
//! # Components
//!
//! - [`sorting`]: bubble, insertion, selection, merge and quick sort
//! - [`searching`]: linear and binary search, plus the sortedness check
//! - [`execute`]: dispatch on [`Algorithm`]
//!
//! Recursive runners (merge and quick sort) return boxed futures so that
//! recursion stays ordinary call-stack recursion with `.await` at each
//! suspension point.

pub mod context;
pub mod searching;
pub mod sorting;

pub use context::RunContext;

use crate::error::{EngineError, EngineResult};
use crate::models::{Algorithm, SearchOutcome};

/// What a runner produced when it terminated on its own
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunResult {
    Sorted,
    Searched(SearchOutcome),
}

/// Run the context's algorithm to completion or until stopped
///
/// Searches require `target`; sorts ignore it.
pub async fn execute(ctx: &RunContext, target: Option<i64>) -> EngineResult<RunResult> {
    let algorithm = ctx.algorithm();
    let require_target = || {
        target.ok_or_else(|| EngineError::InvalidInput(format!("{} needs a target", algorithm)))
    };

    match algorithm {
        Algorithm::BubbleSort => sorting::bubble_sort(ctx).await.map(|_| RunResult::Sorted),
        Algorithm::InsertionSort => sorting::insertion_sort(ctx).await.map(|_| RunResult::Sorted),
        Algorithm::SelectionSort => sorting::selection_sort(ctx).await.map(|_| RunResult::Sorted),
        Algorithm::MergeSort => sorting::merge_sort(ctx).await.map(|_| RunResult::Sorted),
        Algorithm::QuickSort => sorting::quick_sort(ctx).await.map(|_| RunResult::Sorted),
        Algorithm::LinearSearch => {
            let target = require_target()?;
            searching::linear_search(ctx, target)
                .await
                .map(RunResult::Searched)
        }
        Algorithm::BinarySearch => {
            let target = require_target()?;
            searching::binary_search(ctx, target)
                .await
                .map(RunResult::Searched)
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::harness;

    #[tokio::test(start_paused = true)]
    async fn test_execute_dispatches_sort() {
        let (ctx, _state, _rx) = harness(Algorithm::InsertionSort, vec![3, 1, 2]);

        let result = execute(&ctx, None).await.unwrap();

        assert_eq!(result, RunResult::Sorted);
        assert_eq!(ctx.store().snapshot(), vec![1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_search_requires_target() {
        let (ctx, _state, _rx) = harness(Algorithm::LinearSearch, vec![1]);

        let result = execute(&ctx, None).await;

        assert!(matches!(result, Err(EngineError::InvalidInput(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_dispatches_search() {
        let (ctx, _state, _rx) = harness(Algorithm::LinearSearch, vec![4, 8]);

        let result = execute(&ctx, Some(8)).await.unwrap();

        match result {
            RunResult::Searched(outcome) => assert_eq!(outcome.index, Some(1)),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
