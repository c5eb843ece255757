//! Layout — focus management across the panels.

/// Which panel currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPanel {
    Harmonics,
    Selector,
    CosineFormula,
    SineFormula,
}

impl FocusPanel {
    /// Cycle to the next panel.
    pub fn next(self) -> Self {
        match self {
            Self::Harmonics => Self::Selector,
            Self::Selector => Self::CosineFormula,
            Self::CosineFormula => Self::SineFormula,
            Self::SineFormula => Self::Harmonics,
        }
    }

    /// Text fields swallow printable keys.
    pub fn is_text_field(self) -> bool {
        matches!(self, Self::CosineFormula | Self::SineFormula)
    }
}
