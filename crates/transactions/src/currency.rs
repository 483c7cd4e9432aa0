use serde::{Deserialize, Serialize};

/// Currencies traded at the exchange offices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    Jpy,
    Chf,
    Cad,
    Aud,
    Cny,
    Mad,
    Dzd,
    Tnd,
    Egp,
    Sar,
    Aed,
    Qar,
    Kwd,
}

impl Currency {
    pub const ALL: [Currency; 16] = [
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Jpy,
        Currency::Chf,
        Currency::Cad,
        Currency::Aud,
        Currency::Cny,
        Currency::Mad,
        Currency::Dzd,
        Currency::Tnd,
        Currency::Egp,
        Currency::Sar,
        Currency::Aed,
        Currency::Qar,
        Currency::Kwd,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Chf => "CHF",
            Currency::Cad => "CAD",
            Currency::Aud => "AUD",
            Currency::Cny => "CNY",
            Currency::Mad => "MAD",
            Currency::Dzd => "DZD",
            Currency::Tnd => "TND",
            Currency::Egp => "EGP",
            Currency::Sar => "SAR",
            Currency::Aed => "AED",
            Currency::Qar => "QAR",
            Currency::Kwd => "KWD",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Currency::Usd => "US Dollar",
            Currency::Eur => "Euro",
            Currency::Gbp => "British Pound",
            Currency::Jpy => "Japanese Yen",
            Currency::Chf => "Swiss Franc",
            Currency::Cad => "Canadian Dollar",
            Currency::Aud => "Australian Dollar",
            Currency::Cny => "Chinese Yuan",
            Currency::Mad => "Moroccan Dirham",
            Currency::Dzd => "Algerian Dinar",
            Currency::Tnd => "Tunisian Dinar",
            Currency::Egp => "Egyptian Pound",
            Currency::Sar => "Saudi Riyal",
            Currency::Aed => "UAE Dirham",
            Currency::Qar => "Qatari Riyal",
            Currency::Kwd => "Kuwaiti Dinar",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Jpy => "¥",
            Currency::Chf => "CHF",
            Currency::Cad => "C$",
            Currency::Aud => "A$",
            Currency::Cny => "¥",
            Currency::Mad => "DH",
            Currency::Dzd => "DA",
            Currency::Tnd => "DT",
            Currency::Egp => "E£",
            Currency::Sar => "SR",
            Currency::Aed => "AED",
            Currency::Qar => "QR",
            Currency::Kwd => "KD",
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
