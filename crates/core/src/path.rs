//! Data paths.
//!
//! A `Path` addresses a value inside a data tree as a sequence of field and
//! index segments, e.g. `user.tags[0]`.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

/// One step of a data path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Object field access (`.name` or `['name']`)
    Field(String),
    /// Array index access (`[0]`)
    Index(usize),
}

impl Segment {
    /// Returns the key this segment addresses, as the observable graph
    /// stores it: field names verbatim, indices in decimal.
    pub fn key(&self) -> String {
        match self {
            Segment::Field(name) => name.clone(),
            Segment::Index(idx) => idx.to_string(),
        }
    }
}

/// A sequence of segments addressing a value from a data root.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// Creates the empty path, which addresses the data root itself.
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Returns the segments of this path.
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the number of segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this is the root path.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the first segment.
    pub fn head(&self) -> Option<&Segment> {
        self.segments.first()
    }

    /// Returns the path without its first segment.
    pub fn tail(&self) -> Path {
        Path {
            segments: self.segments.iter().skip(1).cloned().collect(),
        }
    }

    /// Returns the path made of the first `len` segments.
    pub fn prefix(&self, len: usize) -> Path {
        Path {
            segments: self.segments.iter().take(len).cloned().collect(),
        }
    }

    /// Returns a new path with `segment` appended.
    pub fn child(&self, segment: Segment) -> Path {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(segment);
        Path { segments }
    }

    /// Appends a segment in place.
    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }
}

impl From<Vec<Segment>> for Path {
    fn from(segments: Vec<Segment>) -> Self {
        Path { segments }
    }
}

/// Formats the path in expression syntax: `a.b[0]`.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Field(name) => {
                    if idx > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                Segment::Index(i) => write!(f, "[{}]", i)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn user_tags() -> Path {
        Path::from(vec![
            Segment::Field("user".into()),
            Segment::Field("tags".into()),
            Segment::Index(0),
        ])
    }

    #[test]
    fn test_display() {
        assert_eq!(user_tags().to_string(), "user.tags[0]");
        assert_eq!(Path::root().to_string(), "");
    }

    #[test]
    fn test_segment_key() {
        assert_eq!(Segment::Field("name".into()).key(), "name");
        assert_eq!(Segment::Index(12).key(), "12");
    }

    #[test]
    fn test_head_tail_prefix() {
        let path = user_tags();
        assert_eq!(path.head(), Some(&Segment::Field("user".into())));
        assert_eq!(path.tail().to_string(), "tags[0]");
        assert_eq!(path.prefix(2).to_string(), "user.tags");
        assert_eq!(path.prefix(10), path);
    }

    #[test]
    fn test_child() {
        let path = Path::root().child(Segment::Field("fruits".into())).child(Segment::Index(2));
        assert_eq!(path.to_string(), "fruits[2]");
        assert_eq!(path.len(), 2);
    }
}
