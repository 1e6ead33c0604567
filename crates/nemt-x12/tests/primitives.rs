//! Property tests for escaping and composite joining.

use nemt_x12::{Delimiters, Segment, join_composite};
use proptest::prelude::*;

proptest! {
    #[test]
    fn escaped_values_never_contain_delimiters(value in ".{0,40}") {
        let d = Delimiters::default();
        let escaped = d.escape(&value);
        prop_assert!(!escaped.contains(['*', '~', ':', '^']));
        prop_assert_eq!(escaped.chars().count(), value.chars().count());
    }

    #[test]
    fn composite_never_ends_with_separator(parts in proptest::collection::vec("[A-Z0-9]{0,3}", 0..6)) {
        let d = Delimiters::default();
        let joined = join_composite(&parts, &d);
        prop_assert!(!joined.ends_with(':'));
        let populated = parts.iter().rposition(|p| !p.is_empty()).map_or(0, |i| i + 1);
        let expected_separators = populated.saturating_sub(1);
        prop_assert_eq!(joined.matches(':').count(), expected_separators);
    }

    #[test]
    fn rendered_segment_has_one_element_separator_per_kept_position(
        values in proptest::collection::vec("[A-Z]{0,4}", 1..8)
    ) {
        let d = Delimiters::default();
        let mut seg = Segment::new("REF");
        for value in &values {
            seg = seg.element(value.as_str());
        }
        let kept = values.iter().rposition(|v| !v.is_empty()).map_or(0, |i| i + 1);
        prop_assert_eq!(seg.render(&d).matches('*').count(), kept);
    }
}

#[test]
fn segment_with_data_containing_separators_stays_parseable() {
    let d = Delimiters::default();
    let seg = Segment::new("NTE")
        .element("ADD")
        .element("PULOC-12 Main St*Suite 4~Back door");
    let rendered = seg.render(&d);
    assert_eq!(rendered.split('*').count(), 3);
    assert!(!rendered.contains('~'));
}
