//! Static currency and language reference tables
//!
//! Pure data: the model prices budgets in whatever currency we name, and
//! writes its text in whatever language we name, so these tables are the
//! single source of truth for what we can name. Lookups never fail; an
//! unrecognized code falls back to the first entry.

/// A currency the budget can be priced in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyOption {
    pub code: &'static str,
    pub symbol: &'static str,
    pub label: &'static str,
}

/// Text direction for a display language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

/// A language the model can be asked to write in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageOption {
    pub code: &'static str,
    pub name: &'static str,
    pub flag: &'static str,
    pub direction: Direction,
}

/// Supported currencies. The first entry is the fallback for unknown codes.
pub const CURRENCIES: &[CurrencyOption] = &[
    CurrencyOption { code: "USD", symbol: "$", label: "US Dollar" },
    CurrencyOption { code: "EUR", symbol: "€", label: "Euro" },
    CurrencyOption { code: "GBP", symbol: "£", label: "British Pound" },
    CurrencyOption { code: "JPY", symbol: "¥", label: "Japanese Yen" },
    CurrencyOption { code: "INR", symbol: "₹", label: "Indian Rupee" },
    CurrencyOption { code: "BRL", symbol: "R$", label: "Brazilian Real" },
    CurrencyOption { code: "CAD", symbol: "C$", label: "Canadian Dollar" },
    CurrencyOption { code: "AUD", symbol: "A$", label: "Australian Dollar" },
    CurrencyOption { code: "CHF", symbol: "Fr", label: "Swiss Franc" },
    CurrencyOption { code: "MXN", symbol: "MX$", label: "Mexican Peso" },
    CurrencyOption { code: "THB", symbol: "฿", label: "Thai Baht" },
    CurrencyOption { code: "VND", symbol: "₫", label: "Vietnamese Dong" },
];

/// Supported display languages. The first entry is the fallback.
pub const LANGUAGES: &[LanguageOption] = &[
    LanguageOption { code: "en", name: "English", flag: "🇬🇧", direction: Direction::Ltr },
    LanguageOption { code: "es", name: "Español", flag: "🇪🇸", direction: Direction::Ltr },
    LanguageOption { code: "fr", name: "Français", flag: "🇫🇷", direction: Direction::Ltr },
    LanguageOption { code: "de", name: "Deutsch", flag: "🇩🇪", direction: Direction::Ltr },
    LanguageOption { code: "pt", name: "Português", flag: "🇵🇹", direction: Direction::Ltr },
    LanguageOption { code: "it", name: "Italiano", flag: "🇮🇹", direction: Direction::Ltr },
    LanguageOption { code: "ja", name: "日本語", flag: "🇯🇵", direction: Direction::Ltr },
    LanguageOption { code: "hi", name: "हिन्दी", flag: "🇮🇳", direction: Direction::Ltr },
    LanguageOption { code: "ar", name: "العربية", flag: "🇸🇦", direction: Direction::Rtl },
    LanguageOption { code: "he", name: "עברית", flag: "🇮🇱", direction: Direction::Rtl },
];

/// Look up a currency by code, falling back to the first entry (USD).
pub fn currency_for(code: &str) -> &'static CurrencyOption {
    CURRENCIES
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(code))
        .unwrap_or(&CURRENCIES[0])
}

/// Look up a language by code, falling back to the first entry (English).
pub fn language_for(code: &str) -> &'static LanguageOption {
    LANGUAGES
        .iter()
        .find(|l| l.code.eq_ignore_ascii_case(code))
        .unwrap_or(&LANGUAGES[0])
}
