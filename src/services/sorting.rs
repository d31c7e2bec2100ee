use crate::error::EngineResult;
use crate::models::{Role, Side, Step, StepKind};
use crate::services::RunContext;
use std::future::Future;
use std::pin::Pin;

/// Boxed future for the recursive sorts
type RangeFuture<'a> = Pin<Box<dyn Future<Output = EngineResult<()>> + Send + 'a>>;

/// Adjacent-pair sweep; stops after a pass with no swap
pub async fn bubble_sort(ctx: &RunContext) -> EngineResult<()> {
    let store = ctx.store();
    let n = store.size();

    for pass in 0..n.saturating_sub(1) {
        ctx.ensure_running()?;
        let mut swapped = false;

        for j in 0..n - pass - 1 {
            ctx.ensure_running()?;
            ctx.step(
                Step::new(StepKind::Compare)
                    .mark(j, Role::Compared)
                    .mark(j + 1, Role::Compared),
            )
            .await?;

            if store.get(j) > store.get(j + 1) {
                ctx.ensure_running()?;
                store.swap(j, j + 1);
                swapped = true;
                ctx.step(
                    Step::new(StepKind::Swap)
                        .mark(j, Role::Swapped)
                        .mark(j + 1, Role::Swapped),
                )
                .await?;
            }
        }

        if !swapped {
            tracing::debug!("Bubble sort finished early after pass {}", pass + 1);
            break;
        }
    }

    Ok(())
}

/// Shift-based insertion
///
/// While a candidate is being shifted its slot holds a copy of the
/// neighbour; the candidate lives only in the runner until it is placed.
pub async fn insertion_sort(ctx: &RunContext) -> EngineResult<()> {
    let store = ctx.store();

    for i in 1..store.size() {
        ctx.ensure_running()?;
        let key = store.get(i);
        ctx.step(Step::new(StepKind::Isolate).mark(i, Role::Pivot))
            .await?;

        let mut j = i;
        while j > 0 && store.get(j - 1) > key {
            ctx.ensure_running()?;
            store.set(j, store.get(j - 1));
            ctx.step(
                Step::new(StepKind::Shift)
                    .mark(j - 1, Role::Compared)
                    .mark(j, Role::Swapped),
            )
            .await?;
            j -= 1;
        }

        ctx.ensure_running()?;
        store.set(j, key);
        ctx.step(Step::new(StepKind::Place).mark(j, Role::Swapped))
            .await?;
    }

    Ok(())
}

/// Running-minimum selection over the unsorted suffix
pub async fn selection_sort(ctx: &RunContext) -> EngineResult<()> {
    let store = ctx.store();
    let n = store.size();

    for i in 0..n.saturating_sub(1) {
        ctx.ensure_running()?;
        let mut min = i;

        for j in i + 1..n {
            ctx.ensure_running()?;
            ctx.step(
                Step::new(StepKind::Compare)
                    .mark(min, Role::Pivot)
                    .mark(j, Role::Compared),
            )
            .await?;
            if store.get(j) < store.get(min) {
                min = j;
            }
        }

        if min != i {
            ctx.ensure_running()?;
            store.swap(i, min);
            ctx.step(
                Step::new(StepKind::Swap)
                    .mark(i, Role::Swapped)
                    .mark(min, Role::Swapped),
            )
            .await?;
        }
    }

    Ok(())
}

pub async fn merge_sort(ctx: &RunContext) -> EngineResult<()> {
    let n = ctx.store().size();
    if n < 2 {
        return Ok(());
    }
    merge_sort_range(ctx, 0, n - 1).await
}

fn merge_sort_range(ctx: &RunContext, left: usize, right: usize) -> RangeFuture<'_> {
    Box::pin(async move {
        if left >= right {
            return Ok(());
        }

        ctx.step(
            Step::new(StepKind::Range)
                .mark_range(left, right, Role::PartitionBound)
                .bounds(left, right),
        )
        .await?;

        let mid = left + (right - left) / 2;
        ctx.step(
            Step::new(StepKind::Split)
                .mark_range(left, mid, Role::LeftRun)
                .mark_range(mid + 1, right, Role::RightRun)
                .bounds(left, right),
        )
        .await?;

        merge_sort_range(ctx, left, mid).await?;
        merge_sort_range(ctx, mid + 1, right).await?;
        merge(ctx, left, mid, right).await
    })
}

/// Merge the sorted runs `[left, mid]` and `[mid + 1, right]`
///
/// Comparisons and leftover copies build a side buffer; the array is only
/// written during the write-back, one index per step.
async fn merge(ctx: &RunContext, left: usize, mid: usize, right: usize) -> EngineResult<()> {
    let store = ctx.store();
    let left_run = store.range(left, mid);
    let right_run = store.range(mid + 1, right);

    ctx.step(
        Step::new(StepKind::MergeStart)
            .mark_range(left, right, Role::MergeSource)
            .bounds(left, right)
            .merging(left_run.clone(), right_run.clone()),
    )
    .await?;

    let mut merged = Vec::with_capacity(right - left + 1);
    let (mut i, mut j) = (0, 0);

    while i < left_run.len() && j < right_run.len() {
        ctx.ensure_running()?;
        // Ties take the left element to keep the sort stable
        let side = if left_run[i] <= right_run[j] {
            Side::Left
        } else {
            Side::Right
        };
        ctx.step(
            Step::new(StepKind::Compare)
                .mark(left + i, Role::Compared)
                .mark(mid + 1 + j, Role::Compared)
                .bounds(left, right)
                .side(side),
        )
        .await?;

        match side {
            Side::Left => {
                merged.push(left_run[i]);
                i += 1;
            }
            Side::Right => {
                merged.push(right_run[j]);
                j += 1;
            }
        }
    }

    while i < left_run.len() {
        ctx.ensure_running()?;
        merged.push(left_run[i]);
        ctx.step(
            Step::new(StepKind::MergeCopy)
                .mark(left + i, Role::MergeSource)
                .bounds(left, right)
                .side(Side::Left),
        )
        .await?;
        i += 1;
    }

    while j < right_run.len() {
        ctx.ensure_running()?;
        merged.push(right_run[j]);
        ctx.step(
            Step::new(StepKind::MergeCopy)
                .mark(mid + 1 + j, Role::MergeSource)
                .bounds(left, right)
                .side(Side::Right),
        )
        .await?;
        j += 1;
    }

    for (offset, value) in merged.into_iter().enumerate() {
        ctx.ensure_running()?;
        store.set(left + offset, value);
        ctx.step(
            Step::new(StepKind::WriteBack)
                .mark(left + offset, Role::Swapped)
                .bounds(left, right),
        )
        .await?;
    }

    Ok(())
}

pub async fn quick_sort(ctx: &RunContext) -> EngineResult<()> {
    let n = ctx.store().size();
    if n < 2 {
        return Ok(());
    }
    quick_sort_range(ctx, 0, n - 1).await
}

/// Recurse into the smaller partition first
///
/// Keeps the recursion depth logarithmic whatever the pivots turn out to be.
fn quick_sort_range(ctx: &RunContext, left: usize, right: usize) -> RangeFuture<'_> {
    Box::pin(async move {
        if left >= right {
            return Ok(());
        }

        ctx.emit(
            Step::new(StepKind::Range)
                .mark_range(left, right, Role::PartitionBound)
                .bounds(left, right),
        )?;
        ctx.pause(3).await?;

        let p = partition(ctx, left, right).await?;
        let pivot = ctx.store().get(p);

        let mut result = Step::new(StepKind::PartitionResult)
            .bounds(left, right)
            .pivot(pivot);
        if p > left {
            result = result.mark_range(left, p - 1, Role::LeftRun);
        }
        result = result.mark(p, Role::Pivot);
        if p < right {
            result = result.mark_range(p + 1, right, Role::RightRun);
        }
        ctx.emit(result)?;
        ctx.pause(3).await?;

        if p - left < right - p {
            if p > left {
                quick_sort_range(ctx, left, p - 1).await?;
            }
            quick_sort_range(ctx, p + 1, right).await
        } else {
            if p < right {
                quick_sort_range(ctx, p + 1, right).await?;
            }
            if p > left {
                quick_sort_range(ctx, left, p - 1).await?;
            }
            Ok(())
        }
    })
}

/// Median-of-three partition of `[left, right]`, returns the pivot's final index
///
/// `left`, `mid` and `right` are ordered in place, the median is parked at
/// `right - 1`, and only `[left, right - 2]` is scanned. `right` already holds
/// a value no smaller than the pivot.
async fn partition(ctx: &RunContext, left: usize, right: usize) -> EngineResult<usize> {
    let store = ctx.store();
    let mid = left + (right - left) / 2;

    ctx.ensure_running()?;
    if store.get(mid) < store.get(left) {
        store.swap(left, mid);
    }
    if store.get(right) < store.get(left) {
        store.swap(left, right);
    }
    if store.get(right) < store.get(mid) {
        store.swap(mid, right);
    }
    store.swap(mid, right - 1);

    let pivot_index = right - 1;
    let pivot = store.get(pivot_index);
    ctx.emit(
        Step::new(StepKind::PivotChosen)
            .mark(pivot_index, Role::Pivot)
            .bounds(left, right)
            .pivot(pivot),
    )?;
    ctx.pause(3).await?;

    let mut i = left;
    for j in left..pivot_index {
        ctx.ensure_running()?;
        ctx.step(
            Step::new(StepKind::Compare)
                .mark(j, Role::Compared)
                .mark(pivot_index, Role::Pivot)
                .bounds(left, right)
                .pivot(pivot),
        )
        .await?;

        if store.get(j) < pivot {
            ctx.ensure_running()?;
            store.swap(i, j);
            ctx.step(
                Step::new(StepKind::Swap)
                    .mark(i, Role::Swapped)
                    .mark(j, Role::Swapped)
                    .bounds(left, right)
                    .pivot(pivot),
            )
            .await?;
            i += 1;
        }
    }

    ctx.ensure_running()?;
    store.swap(i, pivot_index);
    ctx.step(
        Step::new(StepKind::PivotPlaced)
            .mark(i, Role::Pivot)
            .bounds(left, right)
            .pivot(pivot),
    )
    .await?;

    Ok(i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::{Algorithm, SchedulingMode, StepEvent};
    use crate::services::testing::harness;

    fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<StepEvent>) -> Vec<StepEvent> {
        std::iter::from_fn(|| rx.try_recv().ok()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_bubble_sort_first_comparison() {
        let (ctx, _state, mut rx) = harness(Algorithm::BubbleSort, vec![5, 3, 8, 1]);

        bubble_sort(&ctx).await.unwrap();

        assert_eq!(ctx.store().snapshot(), vec![1, 3, 5, 8]);
        let events = drain(&mut rx);
        let first = &events[0];
        assert_eq!(first.kind, StepKind::Compare);
        assert_eq!(first.indices_with(Role::Compared), vec![0, 1]);
        assert_eq!((first.array[0], first.array[1]), (5, 3));
        assert_eq!(events[1].kind, StepKind::Swap);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bubble_sort_sorted_input_single_pass() {
        let (ctx, _state, mut rx) = harness(Algorithm::BubbleSort, vec![1, 2, 3, 4]);

        bubble_sort(&ctx).await.unwrap();

        let events = drain(&mut rx);
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.kind == StepKind::Compare));
    }

    #[tokio::test(start_paused = true)]
    async fn test_insertion_sort_steps() {
        let (ctx, _state, mut rx) = harness(Algorithm::InsertionSort, vec![2, 1]);

        insertion_sort(&ctx).await.unwrap();

        assert_eq!(ctx.store().snapshot(), vec![1, 2]);
        let kinds: Vec<StepKind> = drain(&mut rx).iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![StepKind::Isolate, StepKind::Shift, StepKind::Place]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_selection_sort_skips_swap_in_place() {
        let (ctx, _state, mut rx) = harness(Algorithm::SelectionSort, vec![1, 3, 2]);

        selection_sort(&ctx).await.unwrap();

        assert_eq!(ctx.store().snapshot(), vec![1, 2, 3]);
        let swaps = drain(&mut rx)
            .into_iter()
            .filter(|e| e.kind == StepKind::Swap)
            .count();
        assert_eq!(swaps, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_merge_sort_emits_merge_metadata() {
        let (ctx, _state, mut rx) = harness(Algorithm::MergeSort, vec![4, 1, 3, 2]);

        merge_sort(&ctx).await.unwrap();

        assert_eq!(ctx.store().snapshot(), vec![1, 2, 3, 4]);
        let events = drain(&mut rx);
        assert_eq!(events[0].kind, StepKind::Range);
        assert_eq!(events[0].meta.bounds, Some((0, 3)));
        assert_eq!(events[1].kind, StepKind::Split);
        assert_eq!(events[1].indices_with(Role::LeftRun), vec![0, 1]);

        let last_merge = events
            .iter()
            .rev()
            .find(|e| e.kind == StepKind::MergeStart)
            .unwrap();
        assert_eq!(last_merge.meta.merging, Some((vec![1, 4], vec![2, 3])));

        let write_backs = events
            .iter()
            .filter(|e| e.kind == StepKind::WriteBack)
            .count();
        // Two merges of two elements, one of four
        assert_eq!(write_backs, 8);
    }

    #[tokio::test(start_paused = true)]
    async fn test_merge_sort_ties_favor_left() {
        let (ctx, _state, mut rx) = harness(Algorithm::MergeSort, vec![7, 7]);

        merge_sort(&ctx).await.unwrap();

        let compare = drain(&mut rx)
            .into_iter()
            .find(|e| e.kind == StepKind::Compare)
            .unwrap();
        assert_eq!(compare.meta.side, Some(Side::Left));
    }

    #[tokio::test(start_paused = true)]
    async fn test_quick_sort_median_of_three_pivot() {
        let (ctx, _state, mut rx) = harness(Algorithm::QuickSort, vec![9, 4, 6, 1, 5]);

        quick_sort(&ctx).await.unwrap();

        assert_eq!(ctx.store().snapshot(), vec![1, 4, 5, 6, 9]);
        let events = drain(&mut rx);
        let chosen = events
            .iter()
            .find(|e| e.kind == StepKind::PivotChosen)
            .unwrap();
        // median of 9, 6 and 5
        assert_eq!(chosen.meta.pivot, Some(6));
        assert_eq!(chosen.indices_with(Role::Pivot), vec![3]);
        assert!(events.iter().any(|e| e.kind == StepKind::PivotPlaced));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sorts_handle_trivial_arrays() {
        for values in [vec![], vec![42]] {
            let (ctx, _state, mut rx) = harness(Algorithm::QuickSort, values.clone());
            quick_sort(&ctx).await.unwrap();
            merge_sort(&ctx).await.unwrap();
            bubble_sort(&ctx).await.unwrap();
            insertion_sort(&ctx).await.unwrap();
            selection_sort(&ctx).await.unwrap();
            assert_eq!(ctx.store().snapshot(), values);
            assert!(drain(&mut rx).is_empty());
        }
    }

    #[tokio::test]
    async fn test_stop_while_suspended_unwinds() {
        let (ctx, state, mut rx) = harness(Algorithm::BubbleSort, vec![3, 2, 1]);
        state.set_mode(SchedulingMode::Manual);

        let runner = async { bubble_sort(&ctx).await };
        let stopper = async {
            // First compare is published and the runner is parked on it
            let event = rx.recv().await.unwrap();
            state.request_stop();
            event
        };
        let (result, event) = tokio::join!(runner, stopper);

        assert_eq!(result, Err(EngineError::Stopped));
        assert_eq!(ctx.store().snapshot(), event.array);
        assert!(rx.try_recv().is_err());
    }
}
