//! Cached, replayable shape sequences
//!
//! Gathering block shapes walks terrain cells, which is the expensive part
//! of a sweep. The resolver visits the same candidates once per axis, and
//! often stops early once an axis is fully blocked. [`ShapeStream`] pulls
//! shapes from its source only when an index is first reached and keeps them,
//! so later passes replay from the cache and shapes nobody asked for are
//! never gathered.

use std::ops::ControlFlow;

use crate::physics::collision::VoxelShape;

/// Lazily materialized sequence of shapes that can be walked repeatedly
pub struct ShapeStream<'a> {
    cache: Vec<VoxelShape>,
    source: Option<Box<dyn Iterator<Item = VoxelShape> + 'a>>,
}

impl std::fmt::Debug for ShapeStream<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapeStream")
            .field("materialized", &self.cache.len())
            .field("exhausted", &self.source.is_none())
            .finish()
    }
}

impl Default for ShapeStream<'_> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a> ShapeStream<'a> {
    /// Stream with no shapes
    pub fn empty() -> Self {
        Self {
            cache: Vec::new(),
            source: None,
        }
    }

    /// Stream over already gathered shapes
    pub fn from_vec(shapes: Vec<VoxelShape>) -> Self {
        Self {
            cache: shapes,
            source: None,
        }
    }

    /// Stream pulling from `shapes` on demand
    pub fn lazy<I>(shapes: I) -> Self
    where
        I: IntoIterator<Item = VoxelShape>,
        I::IntoIter: 'a,
    {
        Self {
            cache: Vec::new(),
            source: Some(Box::new(shapes.into_iter())),
        }
    }

    /// Append more shapes after everything already in the stream
    pub fn chain<I>(mut self, more: I) -> Self
    where
        I: IntoIterator<Item = VoxelShape>,
        I::IntoIter: 'a,
    {
        let more = more.into_iter();
        self.source = Some(match self.source.take() {
            Some(existing) => Box::new(existing.chain(more)),
            None => Box::new(more),
        });
        self
    }

    /// Shape at `index`, gathering from the source if it was not reached yet
    pub fn get(&mut self, index: usize) -> Option<&VoxelShape> {
        while self.cache.len() <= index {
            let next = self.source.as_mut().and_then(Iterator::next);
            match next {
                Some(shape) => self.cache.push(shape),
                None => {
                    self.source = None;
                    return None;
                }
            }
        }
        self.cache.get(index)
    }

    /// Gather everything and return the full sequence
    pub fn materialize(&mut self) -> &[VoxelShape] {
        if let Some(source) = self.source.take() {
            self.cache.extend(source);
        }
        &self.cache
    }

    /// Number of shapes gathered so far
    pub fn materialized_len(&self) -> usize {
        self.cache.len()
    }

    /// Whether the source has been drained
    pub fn is_exhausted(&self) -> bool {
        self.source.is_none()
    }

    /// Whether the stream yields no shapes at all
    pub fn is_empty(&mut self) -> bool {
        self.get(0).is_none()
    }

    /// Fold `f` over every shape in order until it breaks; returns the
    /// break value or the final accumulator
    pub fn fold_until<T>(&mut self, init: T, mut f: impl FnMut(T, &VoxelShape) -> ControlFlow<T, T>) -> T {
        let mut acc = init;
        let mut index = 0;
        while let Some(shape) = self.get(index) {
            match f(acc, shape) {
                ControlFlow::Continue(next) => acc = next,
                ControlFlow::Break(done) => return done,
            }
            index += 1;
        }
        acc
    }
}
