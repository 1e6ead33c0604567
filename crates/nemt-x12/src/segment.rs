//! Segment and element assembly.
//!
//! A [`Segment`] is an ordered list of [`Element`]s behind a tag. Rendering
//! escapes data values against the active [`Delimiters`], joins composites,
//! and drops trailing empty elements while keeping interior placeholders.

use crate::delimiters::Delimiters;

/// A single data element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// Plain data value, escaped on render.
    Simple(String),
    /// Composite value, sub-values joined with the component separator.
    Composite(Vec<String>),
    /// Pre-formatted value written verbatim (envelope padding, separator
    /// declarations).
    Raw(String),
}

impl Element {
    /// Whether the element renders as nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Simple(value) | Self::Raw(value) => value.is_empty(),
            Self::Composite(parts) => parts.iter().all(String::is_empty),
        }
    }

    fn render(&self, delimiters: &Delimiters) -> String {
        match self {
            Self::Simple(value) => delimiters.escape(value),
            Self::Composite(parts) => join_composite(parts, delimiters),
            Self::Raw(value) => value.clone(),
        }
    }
}

/// Join composite sub-values with the component separator.
///
/// Empty sub-values at the tail are trimmed; empty sub-values before the last
/// populated one are kept as positional placeholders.
#[must_use]
pub fn join_composite<S: AsRef<str>>(parts: &[S], delimiters: &Delimiters) -> String {
    let last = parts.iter().rposition(|p| !p.as_ref().is_empty());
    let Some(last) = last else {
        return String::new();
    };
    parts[..=last]
        .iter()
        .map(|p| delimiters.escape(p.as_ref()))
        .collect::<Vec<_>>()
        .join(&delimiters.component.to_string())
}

/// One X12 segment: a tag followed by positional elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    tag: &'static str,
    elements: Vec<Element>,
}

impl Segment {
    /// Start a segment with the given tag and no elements.
    #[must_use]
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            elements: Vec::new(),
        }
    }

    /// Append a simple element.
    #[must_use]
    pub fn element(mut self, value: impl Into<String>) -> Self {
        self.elements.push(Element::Simple(value.into()));
        self
    }

    /// Append an element that may be absent; absence keeps the position empty.
    #[must_use]
    pub fn optional<S: AsRef<str>>(mut self, value: Option<S>) -> Self {
        let value = value.map(|v| v.as_ref().to_string()).unwrap_or_default();
        self.elements.push(Element::Simple(value));
        self
    }

    /// Append `count` empty positions.
    #[must_use]
    pub fn empty(mut self, count: usize) -> Self {
        for _ in 0..count {
            self.elements.push(Element::Simple(String::new()));
        }
        self
    }

    /// Append a composite element.
    #[must_use]
    pub fn composite<I, S>(mut self, parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.elements
            .push(Element::Composite(parts.into_iter().map(Into::into).collect()));
        self
    }

    /// Append a value written without escaping.
    #[must_use]
    pub fn raw(mut self, value: impl Into<String>) -> Self {
        self.elements.push(Element::Raw(value.into()));
        self
    }

    /// Segment tag (e.g. `CLM`).
    #[must_use]
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    /// Elements in position order (element 1 first).
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Element at a 1-based X12 position.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Element> {
        position
            .checked_sub(1)
            .and_then(|idx| self.elements.get(idx))
    }

    /// Render without the segment terminator.
    #[must_use]
    pub fn render(&self, delimiters: &Delimiters) -> String {
        let used = self
            .elements
            .iter()
            .rposition(|e| !e.is_empty())
            .map_or(0, |idx| idx + 1);
        let mut out = String::from(self.tag);
        for element in &self.elements[..used] {
            out.push(delimiters.element);
            out.push_str(&element.render(delimiters));
        }
        out
    }
}
