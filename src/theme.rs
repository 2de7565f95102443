/// Page colour scheme as seen by the shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Resolves the `data-theme` attribute, deferring to the
    /// `prefers-color-scheme` query when it is unset or unrecognised.
    pub fn resolve(attribute: Option<&str>, prefers_dark: bool) -> Theme {
        match attribute {
            Some("dark") => Theme::Dark,
            Some("light") => Theme::Light,
            _ if prefers_dark => Theme::Dark,
            _ => Theme::Light,
        }
    }

    /// Value pushed into the `u_isDark` uniform.
    pub fn flag(self) -> f32 {
        match self {
            Theme::Light => 0.0,
            Theme::Dark => 1.0,
        }
    }
}
