use std::collections::VecDeque;
use std::fmt;

/// Result of a recycling pass.
///
/// At most one of the two lists is non-empty: either the source outlasted the
/// demand (`unused`) or the factory covered the shortfall (`created`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recycled<T> {
    pub unused: Vec<T>,
    pub created: Vec<T>,
}

impl<T> Recycled<T> {
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.unused.is_empty() && self.created.is_empty()
    }
}

/// Hands out existing instances before asking the factory for new ones.
pub struct Recycler<T, F>
where
    F: FnMut() -> T,
{
    source: VecDeque<T>,
    reused: usize,
    created: Vec<T>,
    factory: F,
}

impl<T, F> Recycler<T, F>
where
    T: Clone,
    F: FnMut() -> T,
{
    pub fn new(source: impl IntoIterator<Item = T>, factory: F) -> Self {
        Self {
            source: source.into_iter().collect(),
            reused: 0,
            created: Vec::new(),
            factory,
        }
    }

    /// Next instance: a source item while any remain, otherwise a fresh one.
    pub fn next_item(&mut self) -> T {
        if let Some(item) = self.source.pop_front() {
            self.reused += 1;
            return item;
        }
        let item = (self.factory)();
        self.created.push(item.clone());
        item
    }

    /// Lazy, unbounded stream of instances; take only as many as you place.
    pub fn items(&mut self) -> Items<'_, T, F> {
        Items { recycler: self }
    }

    #[must_use]
    pub fn reused_count(&self) -> usize {
        self.reused
    }

    /// Source items not handed out yet.
    pub fn unused(&self) -> impl Iterator<Item = &T> {
        self.source.iter()
    }

    #[must_use]
    pub fn created(&self) -> &[T] {
        &self.created
    }

    #[must_use]
    pub fn finish(self) -> Recycled<T> {
        Recycled {
            unused: self.source.into_iter().collect(),
            created: self.created,
        }
    }
}

impl<T: fmt::Debug, F: FnMut() -> T> fmt::Debug for Recycler<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recycler")
            .field("source", &self.source)
            .field("reused", &self.reused)
            .field("created", &self.created)
            .finish_non_exhaustive()
    }
}

/// Iterator returned by [`Recycler::items`]; never yields `None`.
pub struct Items<'a, T, F>
where
    F: FnMut() -> T,
{
    recycler: &'a mut Recycler<T, F>,
}

impl<T, F> Iterator for Items<'_, T, F>
where
    T: Clone,
    F: FnMut() -> T,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        Some(self.recycler.next_item())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

#[cfg(test)]
mod tests {
    use super::Recycler;

    #[test]
    fn reuses_source_before_calling_factory() {
        let mut counter = 100;
        let mut recycler = Recycler::new(vec![1, 2], || {
            counter += 1;
            counter
        });

        let pulled: Vec<i32> = recycler.items().take(4).collect();
        assert_eq!(pulled, vec![1, 2, 101, 102]);
        assert_eq!(recycler.reused_count(), 2);

        let result = recycler.finish();
        assert!(result.unused.is_empty());
        assert_eq!(result.created, vec![101, 102]);
    }

    #[test]
    fn leftover_source_is_reported_unused() {
        let mut recycler = Recycler::new(vec!['a', 'b', 'c'], || 'z');
        assert_eq!(recycler.next_item(), 'a');
        assert_eq!(recycler.unused().count(), 2);

        let result = recycler.finish();
        assert_eq!(result.unused, vec!['b', 'c']);
        assert!(result.created.is_empty());
    }
}
