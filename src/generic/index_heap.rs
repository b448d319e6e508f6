/*!
A max heap over a fixed collection of indexed values.

Values are stored in a backing vector which never shrinks, and the heap holds some subset of the indices into that vector.
A companion vector records where (if anywhere) each index sits on the heap, so an index may be removed, re-activated, or have its value revised without a search.

[IndexHeap] is used to store the activity of each [atom](crate::structures::atom), so the most active atom without a value may be found quickly when making a decision.

```rust
# use otter_smt::generic::index_heap::IndexHeap;
let mut heap = IndexHeap::default();

heap.add(4, 10);
heap.add(0, 70);

heap.activate(4);
heap.activate(0);

assert_eq!(heap.count(), 5);
assert_eq!(heap.value_at(2), &i32::default());

assert_eq!(heap.pop_max(), Some(0));
assert_eq!(heap.pop_max(), Some(4));
assert!(heap.pop_max().is_none());
```
*/

/// The index heap struct.
pub struct IndexHeap<V: PartialOrd + Default> {
    /// Values, indexed by value index.
    values: Vec<V>,

    /// The position on the heap of each value index, if active.
    position: Vec<Option<usize>>,

    /// The heap, as a vector of value indices.
    heap: Vec<usize>,
}

impl<V: PartialOrd + Default> Default for IndexHeap<V> {
    fn default() -> Self {
        IndexHeap {
            values: Vec::default(),
            position: Vec::default(),
            heap: Vec::default(),
        }
    }
}

impl<V: PartialOrd + Default> IndexHeap<V> {
    /// Index `value` with `value_index`, growing the structure if required.
    /// Returns true if `value_index` was a fresh index, false otherwise.
    ///
    /// The index is not placed on the heap until [activate](IndexHeap::activate) is called.
    pub fn add(&mut self, value_index: usize, value: V) -> bool {
        let fresh = self.values.len() <= value_index;
        while self.values.len() <= value_index {
            self.values.push(V::default());
            self.position.push(None);
        }
        self.values[value_index] = value;
        if !fresh {
            self.heapify_if_active(value_index);
        }
        fresh
    }

    /// Place `value_index` on the heap.
    /// Returns true if the index was placed on the heap, and false if it was already present.
    pub fn activate(&mut self, value_index: usize) -> bool {
        match self.position[value_index] {
            Some(_) => false,
            None => {
                let heap_index = self.heap.len();
                self.heap.push(value_index);
                self.position[value_index] = Some(heap_index);
                self.sift_up(heap_index);
                true
            }
        }
    }

    /// Remove `value_index` from the heap, if present.
    /// Returns true if `value_index` was removed, false otherwise.
    pub fn remove(&mut self, value_index: usize) -> bool {
        let Some(heap_index) = self.position[value_index] else {
            return false;
        };
        let last = self.heap.len() - 1;
        self.swap(heap_index, last);
        self.heap.pop();
        self.position[value_index] = None;
        if heap_index < self.heap.len() {
            self.sift_down(heap_index);
            self.sift_up(heap_index);
        }
        true
    }

    /// The index with the maximum value on the heap, if any.
    pub fn peek_max(&self) -> Option<usize> {
        self.heap.first().copied()
    }

    /// Remove and return the index with the maximum value on the heap, if any.
    pub fn pop_max(&mut self) -> Option<usize> {
        let max = self.peek_max()?;
        self.remove(max);
        Some(max)
    }

    /// Restore the heap property around `value_index`, if the index is on the heap.
    pub fn heapify_if_active(&mut self, value_index: usize) {
        if let Some(heap_index) = self.position[value_index] {
            self.sift_up(heap_index);
            if let Some(heap_index) = self.position[value_index] {
                self.sift_down(heap_index);
            }
        }
    }

    /// Restore the heap property across the whole heap.
    pub fn heapify(&mut self) {
        for heap_index in (0..self.heap.len() / 2).rev() {
            self.sift_down(heap_index)
        }
    }

    /// The value indexed by `value_index`.
    pub fn value_at(&self, value_index: usize) -> &V {
        &self.values[value_index]
    }

    /// Apply `f` to the value at `value_index`, and restore the heap property.
    pub fn apply_to_value(&mut self, value_index: usize, f: impl Fn(&V) -> V) {
        self.values[value_index] = f(&self.values[value_index]);
        self.heapify_if_active(value_index);
    }

    /// Apply `f` to all (indexed) values.
    ///
    /// The heap property is only preserved if `f` is monotone, otherwise [heapify](IndexHeap::heapify) should follow.
    pub fn apply_to_all(&mut self, f: impl Fn(&V) -> V) {
        for value in self.values.iter_mut() {
            *value = f(value)
        }
    }

    /// True if `value_index` is on the heap.
    pub fn is_active(&self, value_index: usize) -> bool {
        self.position
            .get(value_index)
            .is_some_and(|position| position.is_some())
    }

    /// A count of values indexed by the structure.
    pub fn count(&self) -> usize {
        self.values.len()
    }

    /// True if no index is on the heap.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<V: PartialOrd + Default> IndexHeap<V> {
    fn greater(&self, a: usize, b: usize) -> bool {
        self.values[self.heap[a]] > self.values[self.heap[b]]
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.position[self.heap[a]] = Some(a);
        self.position[self.heap[b]] = Some(b);
    }

    fn sift_up(&mut self, mut heap_index: usize) {
        while heap_index > 0 {
            let parent = (heap_index - 1) / 2;
            if self.greater(heap_index, parent) {
                self.swap(heap_index, parent);
                heap_index = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut heap_index: usize) {
        loop {
            let left = 2 * heap_index + 1;
            let right = left + 1;
            let mut largest = heap_index;

            if left < self.heap.len() && self.greater(left, largest) {
                largest = left;
            }
            if right < self.heap.len() && self.greater(right, largest) {
                largest = right;
            }

            if largest == heap_index {
                break;
            }
            self.swap(heap_index, largest);
            heap_index = largest;
        }
    }
}
