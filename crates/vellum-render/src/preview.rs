//! Hover previews for wiki-links
//!
//! A resolvable link previews the target note by re-entering the full
//! render pipeline (fresh metadata + body) with the same callbacks; an
//! unresolvable link shows a "not found" indicator and never recurses.
//! Construction happens lazily via
//! [`DocumentRenderer::hover_preview`](crate::DocumentRenderer::hover_preview);
//! a preview document refuses to spawn previews of its own, which
//! bounds recursion on cyclic vaults.

use crate::renderer::RenderedDocument;

/// Content of an open hover preview
pub enum HoverPreview {
    /// The slug did not resolve (or the target was unreadable)
    NotFound,
    /// Rendered target note
    Note {
        title: String,
        document: RenderedDocument,
    },
}

impl HoverPreview {
    /// Whether this preview carries rendered note content
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Note { .. })
    }
}

/// Open/close state of one preview popup.
///
/// The popup opens while the link or the popup itself is hovered and
/// closes only once both are unhovered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HoverGate {
    link_hovered: bool,
    popup_hovered: bool,
}

impl HoverGate {
    pub fn set_link_hovered(&mut self, hovered: bool) {
        self.link_hovered = hovered;
    }

    pub fn set_popup_hovered(&mut self, hovered: bool) {
        self.popup_hovered = hovered;
    }

    pub fn is_open(&self) -> bool {
        self.link_hovered || self.popup_hovered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_stays_open_across_handoff() {
        let mut gate = HoverGate::default();
        gate.set_link_hovered(true);
        assert!(gate.is_open());

        // pointer moves from the link onto the popup
        gate.set_popup_hovered(true);
        gate.set_link_hovered(false);
        assert!(gate.is_open());

        gate.set_popup_hovered(false);
        assert!(!gate.is_open());
    }
}
