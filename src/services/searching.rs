use crate::error::EngineResult;
use crate::models::{Role, SearchOutcome, Step, StepKind};
use crate::services::RunContext;

/// Sequential scan from index 0
pub async fn linear_search(ctx: &RunContext, target: i64) -> EngineResult<SearchOutcome> {
    let store = ctx.store();
    let mut comparisons = 0;

    for i in 0..store.size() {
        ctx.ensure_running()?;
        comparisons += 1;
        ctx.step(
            Step::new(StepKind::Inspect)
                .mark(i, Role::Compared)
                .target(target)
                .comparisons(comparisons),
        )
        .await?;

        if store.get(i) == target {
            ctx.emit(
                Step::new(StepKind::Found)
                    .mark(i, Role::Found)
                    .target(target)
                    .comparisons(comparisons),
            )?;
            ctx.pause(10).await?;
            return Ok(SearchOutcome {
                index: Some(i),
                comparisons,
                steps: comparisons,
                bound: None,
            });
        }

        ctx.pause(2).await?;
    }

    ctx.emit(
        Step::new(StepKind::NotFound)
            .target(target)
            .comparisons(comparisons),
    )?;
    ctx.pause(10).await?;

    Ok(SearchOutcome {
        index: None,
        comparisons,
        steps: comparisons,
        bound: None,
    })
}

/// Halving search over an ascending array
///
/// An unsorted array is first checked and sorted in place, visibly, by
/// [`ensure_sorted`].
pub async fn binary_search(ctx: &RunContext, target: i64) -> EngineResult<SearchOutcome> {
    let store = ctx.store();
    let n = store.size();
    if n == 0 {
        return Ok(SearchOutcome {
            index: None,
            comparisons: 0,
            steps: 0,
            bound: Some(0),
        });
    }
    let bound = n.ilog2() as usize + 1;

    if !store.is_sorted() {
        ensure_sorted(ctx).await?;
    }

    ctx.step(
        Step::new(StepKind::Range)
            .mark_range(0, n - 1, Role::SearchRange)
            .bounds(0, n - 1)
            .target(target),
    )
    .await?;

    let (mut left, mut right) = (0, n - 1);
    let mut steps = 0;

    while left <= right {
        ctx.ensure_running()?;
        steps += 1;
        let mid = left + (right - left) / 2;
        ctx.step(
            Step::new(StepKind::Inspect)
                .mark_range(left, right, Role::SearchRange)
                .mark(mid, Role::Compared)
                .bounds(left, right)
                .target(target)
                .comparisons(steps),
        )
        .await?;

        let value = store.get(mid);
        if value == target {
            ctx.emit(
                Step::new(StepKind::Found)
                    .mark(mid, Role::Found)
                    .target(target)
                    .comparisons(steps),
            )?;
            ctx.pause(15).await?;
            return Ok(SearchOutcome {
                index: Some(mid),
                comparisons: steps,
                steps,
                bound: Some(bound),
            });
        }

        let exhausted = if value < target {
            ctx.emit(
                Step::new(StepKind::Eliminate)
                    .mark_range(left, mid, Role::Eliminated)
                    .target(target),
            )?;
            left = mid + 1;
            false
        } else {
            ctx.emit(
                Step::new(StepKind::Eliminate)
                    .mark_range(mid, right, Role::Eliminated)
                    .target(target),
            )?;
            match mid.checked_sub(1) {
                Some(r) => {
                    right = r;
                    false
                }
                None => true,
            }
        };
        ctx.pause(5).await?;
        ctx.suspend().await?;

        if exhausted {
            break;
        }
    }

    ctx.emit(
        Step::new(StepKind::NotFound)
            .target(target)
            .comparisons(steps),
    )?;
    ctx.pause(10).await?;

    Ok(SearchOutcome {
        index: None,
        comparisons: steps,
        steps,
        bound: Some(bound),
    })
}

/// Walk adjacent pairs until one is out of order, then sort in place
///
/// # Returns
/// `true` if the array had to be sorted
pub async fn ensure_sorted(ctx: &RunContext) -> EngineResult<bool> {
    let store = ctx.store();
    let n = store.size();
    let mut unsorted = false;

    for i in 0..n.saturating_sub(1) {
        ctx.ensure_running()?;
        ctx.emit(
            Step::new(StepKind::SortCheck)
                .mark(i, Role::Compared)
                .mark(i + 1, Role::Compared),
        )?;
        ctx.pause(2).await?;

        if store.get(i) > store.get(i + 1) {
            ctx.emit(
                Step::new(StepKind::Unsorted)
                    .mark(i, Role::Eliminated)
                    .mark(i + 1, Role::Eliminated),
            )?;
            ctx.pause(10).await?;
            unsorted = true;
            break;
        }
    }

    if !unsorted {
        return Ok(false);
    }

    ctx.ensure_running()?;
    store.sort_ascending();
    tracing::debug!("Array sorted ahead of binary search");
    ctx.emit(Step::new(StepKind::SortedForSearch).mark_range(0, n - 1, Role::SearchRange))?;
    ctx.pause(5).await?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Algorithm, StepEvent, is_sorted};
    use crate::services::testing::harness;

    fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<StepEvent>) -> Vec<StepEvent> {
        std::iter::from_fn(|| rx.try_recv().ok()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_linear_search_not_found_after_three_comparisons() {
        let (ctx, _state, mut rx) = harness(Algorithm::LinearSearch, vec![9, 2, 7]);

        let outcome = linear_search(&ctx, 5).await.unwrap();

        assert_eq!(outcome.position(), -1);
        assert_eq!(outcome.comparisons, 3);
        let events = drain(&mut rx);
        assert_eq!(events.last().unwrap().kind, StepKind::NotFound);
    }

    #[tokio::test(start_paused = true)]
    async fn test_linear_search_finds_first_match() {
        let (ctx, _state, mut rx) = harness(Algorithm::LinearSearch, vec![4, 7, 7]);

        let outcome = linear_search(&ctx, 7).await.unwrap();

        assert_eq!(outcome.index, Some(1));
        assert_eq!(outcome.comparisons, 2);
        let found = drain(&mut rx).pop().unwrap();
        assert_eq!(found.kind, StepKind::Found);
        assert_eq!(found.indices_with(Role::Found), vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_binary_search_sorted_input() {
        let (ctx, _state, mut rx) = harness(Algorithm::BinarySearch, vec![1, 2, 3, 4, 5]);

        let outcome = binary_search(&ctx, 4).await.unwrap();

        assert_eq!(outcome.index, Some(3));
        assert_eq!(outcome.bound, Some(3));
        assert!(outcome.steps <= 3);
        let events = drain(&mut rx);
        assert!(!events.iter().any(|e| e.kind == StepKind::SortCheck));
    }

    #[tokio::test(start_paused = true)]
    async fn test_binary_search_missing_below_range() {
        let (ctx, _state, _rx) = harness(Algorithm::BinarySearch, vec![10, 20, 30]);

        let outcome = binary_search(&ctx, 1).await.unwrap();

        assert_eq!(outcome.position(), -1);
        assert_eq!(outcome.steps, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_binary_search_missing_above_range() {
        let (ctx, _state, _rx) = harness(Algorithm::BinarySearch, vec![10, 20, 30]);

        let outcome = binary_search(&ctx, 99).await.unwrap();

        assert_eq!(outcome.position(), -1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_binary_search_sorts_unsorted_input_first() {
        let (ctx, _state, mut rx) = harness(Algorithm::BinarySearch, vec![3, 1, 2]);

        let outcome = binary_search(&ctx, 3).await.unwrap();

        assert_eq!(outcome.index, Some(2));
        let events = drain(&mut rx);
        let sorted_at = events
            .iter()
            .position(|e| e.kind == StepKind::SortedForSearch)
            .unwrap();
        let first_inspect = events
            .iter()
            .position(|e| e.kind == StepKind::Inspect)
            .unwrap();
        assert!(sorted_at < first_inspect);
        assert!(is_sorted(&events[first_inspect].array));
        assert_eq!(events[0].kind, StepKind::SortCheck);
        assert_eq!(events[1].kind, StepKind::Unsorted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ensure_sorted_leaves_sorted_array_alone() {
        let (ctx, _state, mut rx) = harness(Algorithm::BinarySearch, vec![1, 2, 2, 5]);

        assert!(!ensure_sorted(&ctx).await.unwrap());

        let events = drain(&mut rx);
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.kind == StepKind::SortCheck));
    }
}
