//! Grow-only record pools reused from frame to frame.

/// An arena of `T` with a cursor.
///
/// [`Pool::reset`] rewinds the cursor without freeing anything, and
/// [`Pool::next`] hands out the slot under the cursor, allocating only when
/// the pool has never been this full before. After the first few frames a
/// steady scene allocates nothing here.
#[derive(Debug, Clone)]
pub struct Pool<T> {
    items: Vec<T>,
    len: usize,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            len: 0,
        }
    }
}

impl<T: Default> Pool<T> {
    /// Claims the next slot, reset to `T::default()`, and returns its index.
    pub fn next(&mut self) -> (usize, &mut T) {
        let index = self.len;
        if index == self.items.len() {
            self.items.push(T::default());
        } else {
            self.items[index] = T::default();
        }
        self.len += 1;
        (index, &mut self.items[index])
    }
}

impl<T> Pool<T> {
    /// Rewinds the cursor. Slots keep their allocation.
    pub fn reset(&mut self) {
        self.len = 0;
    }

    /// Number of slots claimed since the last reset.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of slots ever allocated. Never shrinks.
    pub fn capacity(&self) -> usize {
        self.items.len()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.active().get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.active_mut().get_mut(index)
    }

    pub fn active(&self) -> &[T] {
        &self.items[..self.len]
    }

    pub fn active_mut(&mut self) -> &mut [T] {
        &mut self.items[..self.len]
    }
}
