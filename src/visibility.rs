use std::collections::HashSet;

/// Page foreground state plus the surfaces currently in the viewport.
#[derive(Debug, Clone)]
pub struct VisibilityState {
    page_visible: bool,
    visible_surfaces: HashSet<String>,
}

impl Default for VisibilityState {
    fn default() -> Self {
        Self {
            page_visible: true,
            visible_surfaces: HashSet::new(),
        }
    }
}

impl VisibilityState {
    pub fn set_page_visible(&mut self, visible: bool) {
        self.page_visible = visible;
    }

    pub fn set_intersecting(&mut self, surface: &str, intersecting: bool) {
        if intersecting {
            self.visible_surfaces.insert(surface.to_owned());
        } else {
            self.visible_surfaces.remove(surface);
        }
    }

    /// True when at least one surface could be drawn this frame.
    pub fn anything_visible(&self) -> bool {
        self.page_visible && !self.visible_surfaces.is_empty()
    }

    pub fn should_render(&self, surface: &str) -> bool {
        self.page_visible && self.visible_surfaces.contains(surface)
    }
}
