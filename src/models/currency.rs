// ============================================================================
// Structure : CurrencyInfo
// ============================================================================
// Données de référence statiques des devises supportées
//
// CONCEPTS RUST :
// 1. &'static str : strings embarquées dans le binaire (pas d'allocation)
// 2. Slices statiques : tableau de référence figé à la compilation
// 3. Itérateurs : recherche avec .iter().find()
// ============================================================================

/// Code de la devise de référence (monnaie "maison")
///
/// Tous les taux de la table de base sont exprimés en KRW par unité
/// de devise étrangère. Le won n'a pas de code item ECOS : il est
/// lui-même la référence de la statistique 731Y001.
pub const BASE_CURRENCY: &str = "KRW";

/// Description d'une devise supportée
///
/// CONCEPT RUST : struct avec champs &'static str
/// - Les données de référence ne changent jamais pendant l'exécution
/// - Pas besoin de String (owned) : tout vit dans le binaire
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrencyInfo {
    /// Code ISO de la devise (ex: "USD")
    pub code: &'static str,

    /// Nom affiché (ex: "Dollar américain")
    pub name: &'static str,

    /// Drapeau emoji pour l'affichage
    pub flag: &'static str,

    /// Symbole monétaire (ex: "$")
    pub symbol: &'static str,

    /// Code item de la statistique ECOS 731Y001 (vide pour le KRW)
    pub ecos_item_code: &'static str,

    /// Unité de cotation : certaines devises sont cotées par paquet
    /// (le JPY est coté pour 100 yens). Toujours > 0.
    pub unit: u32,
}

/// Registre des devises supportées
///
/// Ordre fixe : la devise de référence (KRW) d'abord, puis les devises
/// étrangères dans l'ordre d'insertion. Extensible en ajoutant une entrée.
static CURRENCIES: &[CurrencyInfo] = &[
    CurrencyInfo { code: "KRW", name: "Won sud-coréen",     flag: "🇰🇷", symbol: "₩",  ecos_item_code: "",        unit: 1 },
    CurrencyInfo { code: "USD", name: "Dollar américain",   flag: "🇺🇸", symbol: "$",  ecos_item_code: "0000001", unit: 1 },
    CurrencyInfo { code: "JPY", name: "Yen japonais",       flag: "🇯🇵", symbol: "¥",  ecos_item_code: "0000002", unit: 100 },
    CurrencyInfo { code: "EUR", name: "Euro",               flag: "🇪🇺", symbol: "€",  ecos_item_code: "0000003", unit: 1 },
    CurrencyInfo { code: "GBP", name: "Livre sterling",     flag: "🇬🇧", symbol: "£",  ecos_item_code: "0000004", unit: 1 },
    CurrencyInfo { code: "CNY", name: "Yuan chinois",       flag: "🇨🇳", symbol: "¥",  ecos_item_code: "0000053", unit: 1 },
    CurrencyInfo { code: "AUD", name: "Dollar australien",  flag: "🇦🇺", symbol: "A$", ecos_item_code: "0000007", unit: 1 },
];

/// Retourne toutes les devises supportées (KRW en premier)
pub fn currencies() -> &'static [CurrencyInfo] {
    CURRENCIES
}

/// Retourne les devises étrangères (tout sauf le KRW)
///
/// CONCEPT RUST : impl Trait en retour
/// - On retourne "un itérateur" sans nommer son type concret
/// - Pas d'allocation d'un Vec intermédiaire
pub fn foreign_currencies() -> impl Iterator<Item = &'static CurrencyInfo> {
    CURRENCIES.iter().filter(|c| c.code != BASE_CURRENCY)
}

/// Recherche une devise par son code
///
/// CONCEPT RUST : Option<&T>
/// - Some(devise) si le code est connu
/// - None sinon (code inconnu, pas une erreur)
pub fn find_currency(code: &str) -> Option<&'static CurrencyInfo> {
    CURRENCIES.iter().find(|c| c.code == code)
}

impl CurrencyInfo {
    /// Vérifie si cette devise est la devise de référence
    pub fn is_base(&self) -> bool {
        self.code == BASE_CURRENCY
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_currency_first() {
        let all = currencies();
        assert_eq!(all[0].code, BASE_CURRENCY);
        assert!(all[0].is_base());
        assert!(all[0].ecos_item_code.is_empty());
    }

    #[test]
    fn test_seven_currencies() {
        assert_eq!(currencies().len(), 7);
        assert_eq!(foreign_currencies().count(), 6);
    }

    #[test]
    fn test_find_currency() {
        let usd = find_currency("USD").unwrap();
        assert_eq!(usd.ecos_item_code, "0000001");
        assert_eq!(usd.unit, 1);

        assert!(find_currency("XYZ").is_none());
    }

    #[test]
    fn test_jpy_quoted_per_hundred() {
        // Le yen est coté pour 100 unités dans la statistique ECOS
        let jpy = find_currency("JPY").unwrap();
        assert_eq!(jpy.unit, 100);
    }

    #[test]
    fn test_codes_unique() {
        let mut codes: Vec<_> = currencies().iter().map(|c| c.code).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), currencies().len());
    }
}
