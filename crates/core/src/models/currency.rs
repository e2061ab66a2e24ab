use serde::Serialize;

/// A row of the static currency table.
///
/// `rate` is units of this currency per one US dollar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurrencyRate {
    pub code: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
    pub rate: f64,
}
