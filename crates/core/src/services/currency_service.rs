use crate::models::currency::CurrencyRate;

/// Supported currencies. Rates are fixed, relative to USD = 1.
const CURRENCIES: &[CurrencyRate] = &[
    CurrencyRate { code: "USD", name: "US Dollar", symbol: "$", rate: 1.0 },
    CurrencyRate { code: "EUR", name: "Euro", symbol: "€", rate: 0.85 },
    CurrencyRate { code: "GBP", name: "British Pound", symbol: "£", rate: 0.73 },
    CurrencyRate { code: "JPY", name: "Japanese Yen", symbol: "¥", rate: 110.0 },
    CurrencyRate { code: "CAD", name: "Canadian Dollar", symbol: "C$", rate: 1.25 },
    CurrencyRate { code: "AUD", name: "Australian Dollar", symbol: "A$", rate: 1.35 },
    CurrencyRate { code: "INR", name: "Indian Rupee", symbol: "₹", rate: 75.0 },
    CurrencyRate { code: "CNY", name: "Chinese Yuan", symbol: "¥", rate: 6.4 },
];

/// Stand-in for codes missing from the table.
const FALLBACK: CurrencyRate = CurrencyRate { code: "USD", name: "US Dollar", symbol: "$", rate: 1.0 };

/// Static currency table, display formatting and fixed-rate conversion.
///
/// Unknown codes never fail: they resolve to `$` with rate 1, which makes
/// conversion through them a no-op.
pub struct CurrencyService;

impl CurrencyService {
    pub fn new() -> Self {
        Self
    }

    /// The whole table, in display order.
    pub fn all(&self) -> &'static [CurrencyRate] {
        CURRENCIES
    }

    /// Exact-match lookup by code.
    pub fn find(&self, code: &str) -> Option<&'static CurrencyRate> {
        CURRENCIES.iter().find(|c| c.code == code)
    }

    /// Like [`find`](Self::find) but falls back to `$` / rate 1.
    pub fn lookup(&self, code: &str) -> &'static CurrencyRate {
        self.find(code).unwrap_or(&FALLBACK)
    }

    #[must_use]
    pub fn is_supported(&self, code: &str) -> bool {
        self.find(code).is_some()
    }

    /// `symbol` + amount with two decimals, e.g. `€1234.50`.
    ///
    /// Cosmetic only: the amount is not converted into `code`.
    pub fn format(&self, amount: f64, code: &str) -> String {
        format!("{}{:.2}", self.lookup(code).symbol, amount)
    }

    /// Convert through the USD base: `amount / rate(from) * rate(to)`.
    pub fn convert(&self, amount: f64, from_code: &str, to_code: &str) -> f64 {
        let from = self.lookup(from_code).rate;
        let to = self.lookup(to_code).rate;
        amount / from * to
    }
}

impl Default for CurrencyService {
    fn default() -> Self {
        Self::new()
    }
}
