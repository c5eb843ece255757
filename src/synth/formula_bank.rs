//! Formula bank — named pairs of generating formulas.
//!
//! Presets are fixed. `custom` holds whatever formula text last produced the
//! table from a text edit.

/// Name of the user-editable entry.
pub const CUSTOM: &str = "custom";

/// A pair of generating formulas, one per coefficient array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveFormula {
    pub cosine: String,
    pub sine: String,
}

impl WaveFormula {
    pub fn new(cosine: impl Into<String>, sine: impl Into<String>) -> Self {
        Self {
            cosine: cosine.into(),
            sine: sine.into(),
        }
    }

    /// Both formulas present. An incomplete entry cannot fill the table.
    pub fn is_complete(&self) -> bool {
        !self.cosine.trim().is_empty() && !self.sine.trim().is_empty()
    }
}

/// Built-in presets, in selector order.
const PRESETS: [(&str, &str, &str); 4] = [
    ("sine", "0", "n == 1 ? 1 : 0"),
    ("triangle", "0", "8 * sin(pi * n / 2) / (n * pi)^2"),
    ("square", "0", "(2 / (n * pi)) * (1 - (-1)^n)"),
    ("saw", "0", "2 * (-1)^(n + 1) / (n * pi)"),
];

#[derive(Debug, Clone)]
pub struct FormulaBank {
    presets: Vec<(&'static str, WaveFormula)>,
    custom: WaveFormula,
}

impl FormulaBank {
    pub fn new() -> Self {
        Self {
            presets: PRESETS
                .iter()
                .map(|&(name, cos, sin)| (name, WaveFormula::new(cos, sin)))
                .collect(),
            custom: WaveFormula::new("", ""),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&WaveFormula> {
        if name == CUSTOM {
            return Some(&self.custom);
        }
        self.presets
            .iter()
            .find(|(preset, _)| *preset == name)
            .map(|(_, formula)| formula)
    }

    /// Overwrite the custom entry's text.
    pub fn set_custom(&mut self, cosine: impl Into<String>, sine: impl Into<String>) {
        self.custom = WaveFormula::new(cosine, sine);
    }

    pub fn custom(&self) -> &WaveFormula {
        &self.custom
    }

    /// All entry names in selector order, `custom` last.
    pub fn names(&self) -> Vec<&'static str> {
        self.presets
            .iter()
            .map(|(name, _)| *name)
            .chain(std::iter::once(CUSTOM))
            .collect()
    }

    pub fn is_preset(&self, name: &str) -> bool {
        self.presets.iter().any(|(preset, _)| *preset == name)
    }
}

impl Default for FormulaBank {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_presets() {
        let bank = FormulaBank::new();
        let square = bank.lookup("square").unwrap();
        assert_eq!(square.cosine, "0");
        assert_eq!(square.sine, "(2 / (n * pi)) * (1 - (-1)^n)");
        assert!(bank.lookup("triangle").is_some());
        assert!(bank.lookup("saw").is_some());
        assert!(bank.lookup("sine").is_some());
    }

    #[test]
    fn lookup_unknown_is_none() {
        let bank = FormulaBank::new();
        assert!(bank.lookup("organ").is_none());
    }

    #[test]
    fn custom_starts_empty_and_incomplete() {
        let bank = FormulaBank::new();
        let custom = bank.lookup(CUSTOM).unwrap();
        assert_eq!(custom.cosine, "");
        assert!(!custom.is_complete());
    }

    #[test]
    fn set_custom_overwrites() {
        let mut bank = FormulaBank::new();
        bank.set_custom("0", "1 / n");
        let custom = bank.lookup(CUSTOM).unwrap();
        assert_eq!(custom.sine, "1 / n");
        assert!(custom.is_complete());
    }

    #[test]
    fn names_in_selector_order() {
        let bank = FormulaBank::new();
        assert_eq!(
            bank.names(),
            vec!["sine", "triangle", "square", "saw", "custom"]
        );
    }

    #[test]
    fn custom_is_not_a_preset() {
        let bank = FormulaBank::new();
        assert!(bank.is_preset("saw"));
        assert!(!bank.is_preset(CUSTOM));
    }

    #[test]
    fn presets_all_compile() {
        use crate::formula::{Evaluator, ExpressionEvaluator};
        let bank = FormulaBank::new();
        for name in bank.names() {
            if name == CUSTOM {
                continue;
            }
            let formula = bank.lookup(name).unwrap();
            assert!(ExpressionEvaluator.compile(&formula.cosine).is_ok(), "{name}");
            assert!(ExpressionEvaluator.compile(&formula.sine).is_ok(), "{name}");
        }
    }
}
