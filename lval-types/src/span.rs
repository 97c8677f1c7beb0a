use std::{fmt, sync::Arc};

/// A region of source text.
///
/// Expression trees built without a source buffer (synthesized nodes, tests) carry
/// [`Span::dummy`].
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    src: Arc<str>,
    start: usize,
    end: usize,
}

impl Span {
    pub fn new(src: Arc<str>, start: usize, end: usize) -> Option<Span> {
        src.get(start..end)?;
        Some(Span { src, start, end })
    }

    /// A span which points at nothing.
    pub fn dummy() -> Span {
        Span {
            src: Arc::from(""),
            start: 0,
            end: 0,
        }
    }

    pub fn is_dummy(&self) -> bool {
        self.src.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.src[self.start..self.end]
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Join two spans from the same source, from the start of `lhs` to the end of `rhs`.
    pub fn join(lhs: &Span, rhs: &Span) -> Span {
        if lhs.is_dummy() {
            return rhs.clone();
        }
        if rhs.is_dummy() || !Arc::ptr_eq(&lhs.src, &rhs.src) {
            return lhs.clone();
        }
        Span {
            src: lhs.src.clone(),
            start: lhs.start.min(rhs.start),
            end: lhs.end.max(rhs.end),
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("Span")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("as_str", &self.as_str())
            .finish()
    }
}

pub trait Spanned {
    fn span(&self) -> Span;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_spans() {
        let src: Arc<str> = Arc::from("point.x = 1");
        let lhs = Span::new(src.clone(), 0, 5).unwrap();
        let rhs = Span::new(src, 6, 7).unwrap();
        assert_eq!(Span::join(&lhs, &rhs).as_str(), "point.x");
        assert_eq!(Span::join(&Span::dummy(), &rhs).as_str(), "x");
    }

    #[test]
    fn out_of_range_span() {
        assert!(Span::new(Arc::from("abc"), 1, 7).is_none());
    }
}
