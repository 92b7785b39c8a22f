use crate::trace::Observer;

/// Quicksort wi' a median-o'-three pivot an' Lomuto partitioning.
pub fn quick_sort<T, O>(items: &mut [T], observer: &mut O)
where
    T: PartialOrd,
    O: Observer<T> + ?Sized,
{
    if items.len() > 1 {
        let right = items.len() - 1;
        quick_sort_range(items, 0, right, observer);
    }
}

/// Sort the inclusive range `[left, right]`.
///
/// The full array is snapshotted once both halves are done (post-order), once per
/// call that actually had work tae dae.
pub fn quick_sort_range<T, O>(items: &mut [T], left: usize, right: usize, observer: &mut O)
where
    T: PartialOrd,
    O: Observer<T> + ?Sized,
{
    if left >= right {
        return;
    }

    observer.enter(left, right);
    let pivot = partition(items, left, right, observer);

    // `[left, pivot - 1]` is empty when the pivot lands on `left`.
    if pivot > left {
        quick_sort_range(items, left, pivot - 1, observer);
    }
    quick_sort_range(items, pivot + 1, right, observer);

    observer.snapshot(items);
    observer.leave();
}

/// Index o' the median among `items[left]`, the midpoint an' `items[right]`.
///
/// Falls back tae `right` when neither of the first two tests picks a median.
pub fn pick_median_of_three<T: PartialOrd>(items: &[T], left: usize, right: usize) -> usize {
    let mid = left + (right - left) / 2;

    let a = &items[left];
    let b = &items[mid];
    let c = &items[right];

    if (a > b) != (a > c) {
        left
    } else if (b > a) != (b > c) {
        mid
    } else {
        right
    }
}

/// Partition `[left, right]` around a median-o'-three pivot an' return where it lands.
///
/// Afterwards everything before the returned index is `<=` the pivot an' everything
/// efter it is `>=` the pivot.
pub fn partition<T, O>(items: &mut [T], left: usize, right: usize, observer: &mut O) -> usize
where
    T: PartialOrd,
    O: Observer<T> + ?Sized,
{
    let pivot_index = pick_median_of_three(items, left, right);
    swap(items, left, pivot_index, observer);

    // The pivot bides at `left` until the final swap.
    let mut boundary = left;
    for j in left + 1..=right {
        observer.compare(&items[j], &items[left]);
        if items[j] <= items[left] {
            boundary += 1;
            swap(items, boundary, j, observer);
        }
    }

    swap(items, left, boundary, observer);
    observer.partition(left, right, boundary, &items[boundary]);
    boundary
}

fn swap<T, O>(items: &mut [T], i: usize, j: usize, observer: &mut O)
where
    O: Observer<T> + ?Sized,
{
    if i != j {
        items.swap(i, j);
        observer.swap(i, j);
    }
}
