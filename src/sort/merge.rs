use crate::trace::Observer;

/// Top-down merge sort. Stable: on a tie the left-hand value goes first.
pub fn merge_sort<T, O>(items: &mut [T], observer: &mut O)
where
    T: PartialOrd + Clone,
    O: Observer<T> + ?Sized,
{
    if items.len() > 1 {
        let right = items.len() - 1;
        merge_sort_range(items, 0, right, observer);
    }
}

/// Sort the inclusive range `[left, right]`, snapshottin' the full array efter each merge.
///
/// # Panics
///
/// If `left < right` and `right` is oot o' bounds.
pub fn merge_sort_range<T, O>(items: &mut [T], left: usize, right: usize, observer: &mut O)
where
    T: PartialOrd + Clone,
    O: Observer<T> + ?Sized,
{
    if left >= right {
        return;
    }

    observer.enter(left, right);
    let middle = left + (right - left) / 2;

    merge_sort_range(items, left, middle, observer);
    merge_sort_range(items, middle + 1, right, observer);

    merge(items, left, middle, right, observer);
    observer.snapshot(items);
    observer.leave();
}

/// Merge the sorted runs `[left, middle]` an' `[middle + 1, right]` in place.
pub fn merge<T, O>(items: &mut [T], left: usize, middle: usize, right: usize, observer: &mut O)
where
    T: PartialOrd + Clone,
    O: Observer<T> + ?Sized,
{
    let left_run = items[left..=middle].to_vec();
    let right_run = items[middle + 1..=right].to_vec();

    let (mut i, mut j, mut k) = (0, 0, left);
    while i < left_run.len() && j < right_run.len() {
        observer.compare(&left_run[i], &right_run[j]);
        if left_run[i] <= right_run[j] {
            items[k] = left_run[i].clone();
            i += 1;
        } else {
            items[k] = right_run[j].clone();
            j += 1;
        }
        k += 1;
    }

    // Only one o' these is non-empty.
    for rest in [&left_run[i..], &right_run[j..]] {
        items[k..k + rest.len()].clone_from_slice(rest);
        k += rest.len();
    }

    observer.merge(left, middle, right);
}
