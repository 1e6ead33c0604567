//! Segment splitting for compliance checks.

/// Element, component and terminator characters in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Separators {
    pub element: char,
    pub component: char,
    pub terminator: char,
}

impl Default for Separators {
    fn default() -> Self {
        Self {
            element: '*',
            component: ':',
            terminator: '~',
        }
    }
}

/// Fixed ISA length up to and including ISA16, without the terminator.
const ISA_LENGTH: usize = 105;

impl Separators {
    /// Read separators from a leading ISA header, falling back to defaults.
    ///
    /// The element separator follows `ISA`, ISA16 is the component separator
    /// and the character after it terminates the segment.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        let text = text.trim_start();
        if !text.starts_with("ISA") {
            return Self::default();
        }
        let header: Vec<char> = text.chars().take(ISA_LENGTH + 1).collect();
        if header.len() <= ISA_LENGTH {
            return Self::default();
        }
        let element = header[3];
        let component = header[ISA_LENGTH - 1];
        let terminator = header[ISA_LENGTH];
        if element == terminator || element.is_alphanumeric() || terminator.is_alphanumeric() {
            return Self::default();
        }
        Self {
            element,
            component,
            terminator,
        }
    }
}

/// One parsed segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSegment {
    pub tag: String,
    /// Elements after the tag; `elements[0]` is element 01.
    pub elements: Vec<String>,
    /// Zero-based position among parsed segments.
    pub index: usize,
}

impl ParsedSegment {
    /// Element at a 1-based position.
    #[must_use]
    pub fn element(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|idx| self.elements.get(idx))
            .map(String::as_str)
    }

    #[must_use]
    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }
}

/// Split on the terminator, then on the element separator.
///
/// Blank pieces and pieces without an element separator are dropped.
#[must_use]
pub fn parse_segments(text: &str, separators: Separators) -> Vec<ParsedSegment> {
    text.split(separators.terminator)
        .map(str::trim)
        .filter(|raw| raw.contains(separators.element))
        .enumerate()
        .map(|(index, raw)| {
            let mut parts = raw.split(separators.element).map(str::to_string);
            let tag = parts.next().unwrap_or_default();
            ParsedSegment {
                tag,
                elements: parts.collect(),
                index,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISA: &str = "ISA*00*          *00*          *ZZ*SENDER         *ZZ*87726          *260102*1345*^*00501*000000001*0*T*:~";

    #[test]
    fn detects_default_separators() {
        assert_eq!(Separators::detect(ISA), Separators::default());
    }

    #[test]
    fn detects_custom_separators() {
        let custom = ISA.replace('*', "|").replace(":~", ">!");
        let detected = Separators::detect(&custom);
        assert_eq!(detected.element, '|');
        assert_eq!(detected.component, '>');
        assert_eq!(detected.terminator, '!');
    }

    #[test]
    fn falls_back_without_isa() {
        assert_eq!(Separators::detect("GS*HC~"), Separators::default());
        assert_eq!(Separators::detect("ISA*00"), Separators::default());
    }

    #[test]
    fn drops_pieces_without_element_separator() {
        let segments = parse_segments("ST*837*0001~\nJUNK~\nSE*2*0001~\n", Separators::default());
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].tag, "SE");
        assert_eq!(segments[1].index, 1);
        assert_eq!(segments[1].element(1), Some("2"));
        assert_eq!(segments[1].element(3), None);
    }
}
