use crate::trace::Observer;

/// Bubble sort, showin' the whole array after every swap.
///
/// Every pass runs tae the end, even on sorted input, so the comparison count is
/// always `n(n-1)/2`. After pass `i` the `i + 1` largest values sit at the tail.
pub fn bubble_sort<T, O>(items: &mut [T], observer: &mut O)
where
    T: PartialOrd,
    O: Observer<T> + ?Sized,
{
    let n = items.len();
    if n < 2 {
        return;
    }

    for i in 0..n - 1 {
        for j in 0..n - 1 - i {
            observer.compare(&items[j], &items[j + 1]);
            if items[j] > items[j + 1] {
                items.swap(j, j + 1);
                observer.swap(j, j + 1);
                observer.snapshot(items);
            }
        }
    }
}
