//! Static registry of the indicators published by mindicador.cl.

use serde::Serialize;

/// How values of an indicator are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnitFormat {
    /// Chilean pesos, `$1.234,56`.
    Peso,
    /// US dollars, `US$1,234.56`.
    Dollar,
    /// Percent, `3,25%`.
    Percent,
}

impl UnitFormat {
    pub fn symbol(self) -> &'static str {
        match self {
            UnitFormat::Peso => "$",
            UnitFormat::Dollar => "US$",
            UnitFormat::Percent => "%",
        }
    }
}

/// One economic indicator series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Indicator {
    /// API path segment (`dolar`, `uf`, ...).
    pub code: &'static str,
    pub display_name: &'static str,
    pub unit: UnitFormat,
    /// First year the API has data for.
    pub earliest_year: i32,
    /// Short glyph shown on the tab strip.
    pub glyph: &'static str,
}

const BUILTIN: &[Indicator] = &[
    Indicator { code: "dolar", display_name: "Dólar Observado", unit: UnitFormat::Peso, earliest_year: 1984, glyph: "$" },
    Indicator { code: "euro", display_name: "Euro", unit: UnitFormat::Peso, earliest_year: 1999, glyph: "€" },
    Indicator { code: "uf", display_name: "Unidad de Fomento (UF)", unit: UnitFormat::Peso, earliest_year: 1977, glyph: "UF" },
    Indicator { code: "ipc", display_name: "IPC", unit: UnitFormat::Percent, earliest_year: 1928, glyph: "%" },
    Indicator { code: "utm", display_name: "UTM", unit: UnitFormat::Peso, earliest_year: 1990, glyph: "UTM" },
    Indicator { code: "imacec", display_name: "Imacec", unit: UnitFormat::Percent, earliest_year: 1997, glyph: "Im" },
    Indicator { code: "tpm", display_name: "TPM", unit: UnitFormat::Percent, earliest_year: 2001, glyph: "TPM" },
    Indicator { code: "libra_cobre", display_name: "Libra de Cobre", unit: UnitFormat::Dollar, earliest_year: 2012, glyph: "Cu" },
    Indicator { code: "tasa_desempleo", display_name: "Tasa de Desempleo", unit: UnitFormat::Percent, earliest_year: 2009, glyph: "TD" },
    Indicator { code: "bitcoin", display_name: "Bitcoin", unit: UnitFormat::Dollar, earliest_year: 2009, glyph: "₿" },
];

/// Code of the indicator shown on startup.
pub const DEFAULT_INDICATOR: &str = "dolar";

/// Ordered set of indicators. Order is the tab-strip order.
#[derive(Debug, Clone)]
pub struct Registry {
    indicators: Vec<Indicator>,
}

impl Registry {
    pub fn builtin() -> Self {
        Self::new(BUILTIN.to_vec())
    }

    pub fn new(indicators: Vec<Indicator>) -> Self {
        Self { indicators }
    }

    pub fn find(&self, code: &str) -> Option<&Indicator> {
        self.indicators.iter().find(|i| i.code == code)
    }

    pub fn position(&self, code: &str) -> Option<usize> {
        self.indicators.iter().position(|i| i.code == code)
    }

    pub fn get(&self, index: usize) -> Option<&Indicator> {
        self.indicators.get(index)
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Indicator> {
        self.indicators.iter()
    }

    /// Neighbouring indicator on the tab strip, wrapping at both ends.
    pub fn step(&self, code: &str, delta: i32) -> Option<&Indicator> {
        if self.indicators.is_empty() {
            return None;
        }
        let n = self.indicators.len() as i32;
        let cur = self.position(code).unwrap_or(0) as i32;
        let next = (cur + delta).rem_euclid(n) as usize;
        self.indicators.get(next)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}
