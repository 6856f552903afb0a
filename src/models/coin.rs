// ============================================================================
// Structure : Coin
// ============================================================================
// Instantané d'une cryptomonnaie tel que retourné par /coins/markets
//
// CONCEPTS RUST :
// 1. #[derive(Deserialize)] : serde mappe directement le JSON CoinGecko
// 2. deserialize_with : l'API renvoie parfois null pour les champs numériques,
//    on les convertit en 0.0 plutôt que d'échouer sur toute la liste
// 3. Immutabilité : un Coin n'est jamais modifié, la liste entière est
//    remplacée à chaque rafraîchissement
// ============================================================================

use serde::{Deserialize, Deserializer};

/// Une cryptomonnaie (instantané du marché au moment du fetch)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Coin {
    /// Identifiant unique CoinGecko (ex: "bitcoin")
    pub id: String,

    /// Symbole (ex: "btc", en minuscules côté API)
    pub symbol: String,

    /// Nom complet (ex: "Bitcoin")
    pub name: String,

    /// URL du logo (absente ou null pour certains coins)
    #[serde(default)]
    pub image: Option<String>,

    /// Prix actuel en USD
    #[serde(default, deserialize_with = "null_as_zero")]
    pub current_price: f64,

    /// Variation sur 24h en pourcentage (signée)
    #[serde(default, deserialize_with = "null_as_zero")]
    pub price_change_percentage_24h: f64,

    /// Capitalisation en USD
    #[serde(default, deserialize_with = "null_as_zero")]
    pub market_cap: f64,
}

/// Résultat d'une recherche /search (résumé minimal)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CoinSummary {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub thumb: Option<String>,
}

/// Convertit un nombre JSON nullable en f64 (null → 0.0)
fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

impl Coin {
    /// Raccourci pour construire un Coin (tests, données de démo)
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        symbol: impl Into<String>,
        current_price: f64,
        price_change_percentage_24h: f64,
        market_cap: f64,
    ) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            name: name.into(),
            image: None,
            current_price,
            price_change_percentage_24h,
            market_cap,
        }
    }

    /// Retourne true si la variation 24h est positive ou nulle
    pub fn is_positive(&self) -> bool {
        self.price_change_percentage_24h >= 0.0
    }

    /// Prix formaté pour l'affichage (ex: "$43,250.12")
    pub fn display_price(&self) -> String {
        format_price(self.current_price)
    }

    /// Variation formatée (ex: "+5.00%")
    pub fn display_change(&self) -> String {
        format_percentage(self.price_change_percentage_24h)
    }

    /// Capitalisation formatée (ex: "$1.23T")
    pub fn display_market_cap(&self) -> String {
        format_market_cap(self.market_cap)
    }
}

// ============================================================================
// Formatage des nombres
// ============================================================================

/// Formate un prix en dollars US
///
/// - 2 décimales pour les prix >= 1
/// - jusqu'à 6 décimales pour les prix < 1 (les zéros au-delà de 2 sont retirés)
pub fn format_price(price: f64) -> String {
    let formatted = if price.abs() < 1.0 {
        let raw = format!("{:.6}", price.abs());
        let (int_part, frac) = raw.split_once('.').unwrap_or((raw.as_str(), ""));
        let mut frac = frac.trim_end_matches('0').to_string();
        while frac.len() < 2 {
            frac.push('0');
        }
        format!("{}.{}", int_part, frac)
    } else {
        let raw = format!("{:.2}", price.abs());
        let (int_part, frac) = raw.split_once('.').unwrap_or((raw.as_str(), "00"));
        format!("{}.{}", group_thousands(int_part), frac)
    };

    if price < 0.0 {
        format!("-${}", formatted)
    } else {
        format!("${}", formatted)
    }
}

/// Formate une capitalisation avec suffixe T / B / M
///
/// Sous le million : séparateurs de milliers et jusqu'à 3 décimales, les
/// zéros finaux retirés ("$950,000.5").
pub fn format_market_cap(market_cap: f64) -> String {
    if market_cap >= 1e12 {
        format!("${:.2}T", market_cap / 1e12)
    } else if market_cap >= 1e9 {
        format!("${:.2}B", market_cap / 1e9)
    } else if market_cap >= 1e6 {
        format!("${:.2}M", market_cap / 1e6)
    } else {
        let raw = format!("{:.3}", market_cap);
        let (int_part, frac) = raw.split_once('.').unwrap_or((raw.as_str(), ""));
        let frac = frac.trim_end_matches('0');
        if frac.is_empty() {
            format!("${}", group_thousands(int_part))
        } else {
            format!("${}.{}", group_thousands(int_part), frac)
        }
    }
}

/// Formate un pourcentage signé (ex: "+5.00%", "-3.00%")
pub fn format_percentage(percentage: f64) -> String {
    let sign = if percentage >= 0.0 { "+" } else { "" };
    format!("{}{:.2}%", sign, percentage)
}

/// Insère des virgules tous les 3 chiffres ("1234567" → "1,234,567")
fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    format!("{}{}", sign, out)
}
