//! External plug-in override hook (§4.2, §6 scripting host's "row
//! highlight" callback).

use loki_text::HighlightClass;

/// One sparse override span returned by a [`HighlightOverride`] callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverrideSpan {
    pub start: usize,
    pub end: usize,
    pub class: HighlightClass,
}

/// Result of querying a plug-in for one row. When `replace` is set the
/// engine zeroes the row to NORMAL before applying spans; otherwise spans
/// overwrite only the ranges they cover.
#[derive(Debug, Default)]
pub struct OverrideResult {
    pub spans: Vec<OverrideSpan>,
    pub replace: bool,
}

/// A scripting host's row-highlight entry point. Must be safe to call from
/// any mode and must not mutate editor state itself (§9 redesign flag).
pub trait HighlightOverride {
    fn override_row(
        &self,
        raw: &[u8],
        rendered: &[u8],
        index: usize,
        grammar_tag: &str,
    ) -> Option<OverrideResult>;
}

/// Apply an override result onto a row's highlight array.
pub fn apply_override(highlight: &mut [HighlightClass], result: &OverrideResult) {
    if result.replace {
        for h in highlight.iter_mut() {
            *h = HighlightClass::Normal;
        }
    }
    for span in &result.spans {
        let end = span.end.min(highlight.len());
        let start = span.start.min(end);
        for h in &mut highlight[start..end] {
            *h = span.class;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AllMatch;
    impl HighlightOverride for AllMatch {
        fn override_row(&self, _raw: &[u8], rendered: &[u8], _index: usize, _tag: &str) -> Option<OverrideResult> {
            Some(OverrideResult {
                spans: vec![OverrideSpan { start: 0, end: rendered.len(), class: HighlightClass::Match }],
                replace: true,
            })
        }
    }

    #[test]
    fn replace_zeroes_then_applies_spans() {
        let mut highlight = vec![HighlightClass::Keyword1; 4];
        let plugin = AllMatch;
        let result = plugin.override_row(b"abcd", b"abcd", 0, "plain").unwrap();
        apply_override(&mut highlight, &result);
        assert!(highlight.iter().all(|h| *h == HighlightClass::Match));
    }

    #[test]
    fn non_replace_overwrites_only_covered_range() {
        let mut highlight = vec![HighlightClass::Keyword1; 4];
        let result = OverrideResult {
            spans: vec![OverrideSpan { start: 1, end: 2, class: HighlightClass::Match }],
            replace: false,
        };
        apply_override(&mut highlight, &result);
        assert_eq!(highlight[0], HighlightClass::Keyword1);
        assert_eq!(highlight[1], HighlightClass::Match);
        assert_eq!(highlight[3], HighlightClass::Keyword1);
    }
}
