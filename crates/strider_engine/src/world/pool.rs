//! Generic reusable-instance pool
//!
//! Amortizes construction cost for short-lived objects. The pool is
//! parameterized by a factory function (builds a fresh instance when the
//! free list is empty) and a reset function (clears a released instance
//! before it re-enters the free list).
//!
//! An instance held by a caller is never simultaneously on the free list:
//! `acquire` moves it out and `release` moves it back in.

/// Reusable-instance allocator with a bounded free list
pub struct ObjectPool<T> {
    factory: Box<dyn Fn() -> T>,
    reset: Box<dyn Fn(&mut T)>,
    free: Vec<T>,
    max_free: usize,
    created: usize,
    reused: usize,
}

impl<T> ObjectPool<T> {
    /// Create a new pool
    ///
    /// `max_free` bounds the free list; instances released beyond it are
    /// discarded so the pool cannot grow without limit.
    pub fn new(
        max_free: usize,
        factory: impl Fn() -> T + 'static,
        reset: impl Fn(&mut T) + 'static,
    ) -> Self {
        Self {
            factory: Box::new(factory),
            reset: Box::new(reset),
            free: Vec::new(),
            max_free,
            created: 0,
            reused: 0,
        }
    }

    /// Take an instance from the free list, or construct a new one
    ///
    /// The caller must overwrite every field before use; reset only
    /// guarantees the initial-value state, not frame-specific data.
    pub fn acquire(&mut self) -> T {
        if let Some(instance) = self.free.pop() {
            self.reused += 1;
            instance
        } else {
            self.created += 1;
            (self.factory)()
        }
    }

    /// Reset an instance and return it to the free list
    ///
    /// If the free list is already at `max_free` the instance is dropped
    /// instead.
    pub fn release(&mut self, mut instance: T) {
        (self.reset)(&mut instance);
        if self.free.len() < self.max_free {
            self.free.push(instance);
        }
    }

    /// Shrink the free list down to `floor` instances
    pub fn trim(&mut self, floor: usize) {
        if self.free.len() > floor {
            self.free.truncate(floor);
        }
    }

    /// Number of instances currently on the free list
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    /// Total instances constructed over the pool's lifetime
    pub fn created(&self) -> usize {
        self.created
    }

    /// Total acquisitions served from the free list
    pub fn reused(&self) -> usize {
        self.reused
    }
}
