// ============================================================================
// Filtrage de la liste de coins
// ============================================================================
// Fonction pure : (liste, requête) → sous-ensemble affiché
//
// CONCEPT RUST : Cow<'a, [T]>
// - Requête vide : on retourne la liste elle-même (Cow::Borrowed), sans copie
// - Sinon : un Vec filtré (Cow::Owned) qui conserve l'ordre d'origine
// ============================================================================

use std::borrow::Cow;

use crate::models::Coin;

/// Filtre les coins dont le nom ou le symbole contient `query`
/// (insensible à la casse)
pub fn filter_coins<'a>(coins: &'a [Coin], query: &str) -> Cow<'a, [Coin]> {
    if query.is_empty() {
        return Cow::Borrowed(coins);
    }

    let needle = query.to_lowercase();
    Cow::Owned(
        coins
            .iter()
            .filter(|coin| matches_coin(coin, &needle))
            .cloned()
            .collect(),
    )
}

/// `needle` doit déjà être en minuscules
fn matches_coin(coin: &Coin, needle: &str) -> bool {
    coin.name.to_lowercase().contains(needle) || coin.symbol.to_lowercase().contains(needle)
}
