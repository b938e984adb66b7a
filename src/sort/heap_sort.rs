use crate::sort::tag::Tagged;
use log::debug;

/// A binary heap stored in an array. The root is the minimum, or the maximum if `max` is set.
struct BinaryHeap<T> {
    data: Vec<T>,
    max: bool,
}

impl<T> BinaryHeap<T>
where
    T: Ord,
{
    // Sifts down every internal node, starting from the last one, in `O(N)` time.
    fn from_vec(data: Vec<T>, max: bool) -> Self {
        let mut heap = BinaryHeap { data, max };
        for i in (0..heap.data.len() / 2).rev() {
            heap.sift_down(i);
        }
        heap
    }

    // Returns `true` if the element at `i` belongs above the element at `j`.
    fn precedes(&self, i: usize, j: usize) -> bool {
        if self.max {
            self.data[i] > self.data[j]
        } else {
            self.data[i] < self.data[j]
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.data.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut top = i;
            if left < len && self.precedes(left, top) {
                top = left;
            }
            if right < len && self.precedes(right, top) {
                top = right;
            }
            if top == i {
                break;
            }
            self.data.swap(i, top);
            i = top;
        }
    }

    fn pop(&mut self) -> Option<T> {
        if self.data.is_empty() {
            return None;
        }
        let last = self.data.len() - 1;
        self.data.swap(0, last);
        let ret = self.data.pop();
        if !self.data.is_empty() {
            self.sift_down(0);
        }
        ret
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

fn build_heap<I, K, V, F>(items: I, mut tag: F, reverse: bool) -> BinaryHeap<Tagged<K, V>>
where
    I: IntoIterator,
    K: Ord,
    F: FnMut(I::Item) -> (K, V),
{
    let data = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let (key, value) = tag(item);
            Tagged::new(key, index, reverse, value)
        })
        .collect::<Vec<_>>();
    debug!("heap sort of {} items, reverse: {}", data.len(), reverse);
    BinaryHeap::from_vec(data, reverse)
}

/// Sorts values using a binary heap. The heap is built in `O(N)` time and every value is then
/// extracted lazily in `O(log N)` time, so the first values are available quickly and consuming
/// only a prefix of the output costs less than a full sort.
///
/// The sort is stable: equal values are yielded in input order, whether or not `reverse` is set.
///
/// # Examples
///
/// ```
/// use treap_sort::sort::heap_sort;
///
/// let sorted = heap_sort(vec![1, 7, 8, 0, 4, 6, 2, 3, 5], false).collect::<Vec<u32>>();
/// assert_eq!(sorted, vec![0, 1, 2, 3, 4, 5, 6, 7, 8]);
///
/// let top = heap_sort(vec![1, 7, 8, 0, 4], true).take(2).collect::<Vec<u32>>();
/// assert_eq!(top, vec![8, 7]);
/// ```
pub fn heap_sort<I>(items: I, reverse: bool) -> HeapSort<I::Item>
where
    I: IntoIterator,
    I::Item: Ord,
{
    HeapSort {
        heap: build_heap(items, |item| (item, ()), reverse),
    }
}

/// Sorts items by the key extracted with `key` using a binary heap. See `heap_sort`.
///
/// # Examples
///
/// ```
/// use treap_sort::sort::heap_sort_by_key;
///
/// let items = vec![(1, "a"), (1, "b"), (0, "c")];
/// let sorted = heap_sort_by_key(items, |item| item.0, false).collect::<Vec<_>>();
/// assert_eq!(sorted, vec![(0, "c"), (1, "a"), (1, "b")]);
/// ```
pub fn heap_sort_by_key<I, K, F>(items: I, mut key: F, reverse: bool) -> HeapSortByKey<I::Item, K>
where
    I: IntoIterator,
    K: Ord,
    F: FnMut(&I::Item) -> K,
{
    HeapSortByKey {
        heap: build_heap(items, |item| (key(&item), item), reverse),
    }
}

/// An iterator yielding the values passed to `heap_sort` in sorted order.
pub struct HeapSort<T> {
    heap: BinaryHeap<Tagged<T, ()>>,
}

impl<T> Iterator for HeapSort<T>
where
    T: Ord,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.heap.pop().map(|tagged| tagged.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.heap.len(), Some(self.heap.len()))
    }
}

impl<T> ExactSizeIterator for HeapSort<T> where T: Ord {}

/// An iterator yielding the items passed to `heap_sort_by_key` in sorted order.
pub struct HeapSortByKey<T, K> {
    heap: BinaryHeap<Tagged<K, T>>,
}

impl<T, K> Iterator for HeapSortByKey<T, K>
where
    K: Ord,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.heap.pop().map(|tagged| tagged.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.heap.len(), Some(self.heap.len()))
    }
}

impl<T, K> ExactSizeIterator for HeapSortByKey<T, K> where K: Ord {}
