use std::sync::RwLock;

/// Append-only storage shared by the engines.  Entries are handed out by index and never move.
#[derive(Debug)]
pub struct ConcurrentSlab<T> {
    inner: RwLock<Vec<T>>,
}

impl<T> Default for ConcurrentSlab<T> {
    fn default() -> Self {
        ConcurrentSlab {
            inner: RwLock::new(Vec::new()),
        }
    }
}

impl<T> ConcurrentSlab<T>
where
    T: Clone,
{
    pub fn insert(&self, value: T) -> usize {
        let mut inner = self.inner.write().unwrap();
        let ret = inner.len();
        inner.push(value);
        ret
    }

    pub fn get(&self, index: usize) -> T {
        let inner = self.inner.read().unwrap();
        inner[index].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_stable() {
        let slab = ConcurrentSlab::default();
        let a = slab.insert("a".to_owned());
        let b = slab.insert("b".to_owned());
        assert_eq!((a, b), (0, 1));
        assert_eq!(slab.get(a), "a");
        assert_eq!(slab.get(b), "b");
    }
}
