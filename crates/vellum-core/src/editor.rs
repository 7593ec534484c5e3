//! Source-text synchronization for rendered controls
//!
//! When a rendered task checkbox changes state, exactly one source
//! line is patched; every other byte of the document is untouched, so
//! the rest of the render tree stays valid without a reparse.

use regex::Regex;
use std::sync::LazyLock;

/// Task marker at any position in a line: `- [ ]`, `- [x]`, `- [X]`
static TASK_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"- \[(?: |x|X)\]").expect("task marker regex"));

/// Rewrite the first task marker on line `line_index` of `raw` to
/// match `checked`, leaving all other characters byte-identical.
///
/// An out-of-range `line_index` returns the input unchanged; it can
/// only arise from a stale callback after the document changed size,
/// so it is a no-op rather than an error. Applying the same toggle
/// twice yields the same text as applying it once.
pub fn apply_task_toggle(raw: &str, line_index: usize, checked: bool) -> String {
    let mut lines: Vec<&str> = raw.split('\n').collect();
    let Some(line) = lines.get(line_index) else {
        return raw.to_string();
    };

    let replacement = if checked { "- [x]" } else { "- [ ]" };
    let patched = TASK_MARKER.replace(line, replacement).into_owned();
    lines[line_index] = &patched;
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "# Todo\n\n- [ ] write tests\n- [x] ship\ntrailing text";

    #[test]
    fn test_toggle_on() {
        let out = apply_task_toggle(DOC, 2, true);
        assert_eq!(out, "# Todo\n\n- [x] write tests\n- [x] ship\ntrailing text");
    }

    #[test]
    fn test_toggle_off_uppercase_marker() {
        let raw = "- [X] done";
        assert_eq!(apply_task_toggle(raw, 0, false), "- [ ] done");
    }

    #[test]
    fn test_idempotent() {
        let once = apply_task_toggle(DOC, 2, true);
        let twice = apply_task_toggle(&once, 2, true);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_only_target_line_changes() {
        let out = apply_task_toggle(DOC, 3, false);
        let before: Vec<&str> = DOC.split('\n').collect();
        let after: Vec<&str> = out.split('\n').collect();
        for (i, (b, a)) in before.iter().zip(&after).enumerate() {
            if i == 3 {
                assert_eq!(*a, "- [ ] ship");
            } else {
                assert_eq!(b, a);
            }
        }
    }

    #[test]
    fn test_out_of_range_is_noop() {
        assert_eq!(apply_task_toggle(DOC, 99, true), DOC);
    }

    #[test]
    fn test_line_without_marker_untouched() {
        assert_eq!(apply_task_toggle(DOC, 0, true), DOC);
    }

    #[test]
    fn test_only_first_marker_on_line_replaced() {
        let raw = "- [ ] see - [ ] literal";
        assert_eq!(apply_task_toggle(raw, 0, true), "- [x] see - [ ] literal");
    }
}
