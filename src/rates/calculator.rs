// ============================================================================
// Calculateur de taux croisés
// ============================================================================
// Dérive le taux entre deux devises quelconques à partir de la table
// des taux KRW, en passant par le won comme dénominateur commun
//
// C'est la triangulation qui évite d'avoir besoin de cotations directes
// pour chaque paire : n taux KRW suffisent pour n² paires, au prix
// d'une division supplémentaire pour les paires étrangère/étrangère.
// ============================================================================

use crate::models::{RateTable, BASE_CURRENCY};

/// Calcule le taux from → to à partir de la table des taux KRW
///
/// Retourne None quand une entrée nécessaire manque : ce n'est pas une
/// erreur, l'appelant garde le dernier taux connu plutôt que d'effacer
/// l'affichage.
///
/// CONCEPT RUST : Option<f64> comme "taux indisponible"
/// - Some(taux) : calcul possible
/// - None : entrée manquante, l'appelant décide du repli
pub fn calculate_rate(from: &str, to: &str, table: &RateTable) -> Option<f64> {
    // Identité : exactement 1, sans aller-retour flottant
    if from == to {
        return Some(1.0);
    }

    // KRW → étrangère : inverse du taux KRW
    if from == BASE_CURRENCY {
        return table.get(to).map(|r| 1.0 / r);
    }

    // Étrangère → KRW : le taux KRW directement
    if to == BASE_CURRENCY {
        return table.get(from);
    }

    // Étrangère → étrangère : taux croisé via le won
    match (table.get(from), table.get(to)) {
        (Some(r_from), Some(r_to)) => Some(r_from / r_to),
        _ => None,
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Table d'exemple : KRW par unité
    fn sample_table() -> RateTable {
        let mut table = RateTable::new();
        table.rates.insert("USD".to_string(), 1350.0);
        table.rates.insert("JPY".to_string(), 9.0);
        table.rates.insert("EUR".to_string(), 1480.0);
        table
    }

    #[test]
    fn test_identity_is_exactly_one() {
        let table = sample_table();
        for code in ["KRW", "USD", "JPY", "EUR", "XYZ"] {
            assert_eq!(calculate_rate(code, code, &table), Some(1.0));
        }

        // Même sur une table vide
        assert_eq!(calculate_rate("USD", "USD", &RateTable::new()), Some(1.0));
    }

    #[test]
    fn test_foreign_to_base() {
        let table = sample_table();
        assert_eq!(calculate_rate("USD", "KRW", &table), Some(1350.0));
        assert_eq!(calculate_rate("JPY", "KRW", &table), Some(9.0));
    }

    #[test]
    fn test_base_to_foreign_is_inverse() {
        let table = sample_table();
        let rate = calculate_rate("KRW", "JPY", &table).unwrap();
        assert!((rate - 1.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_cross_rate_through_base() {
        let table = sample_table();
        let rate = calculate_rate("USD", "EUR", &table).unwrap();
        assert!((rate - 1350.0 / 1480.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_entry_is_none() {
        let table = sample_table();
        assert_eq!(calculate_rate("GBP", "KRW", &table), None);
        assert_eq!(calculate_rate("KRW", "GBP", &table), None);
        assert_eq!(calculate_rate("USD", "GBP", &table), None);
        assert_eq!(calculate_rate("GBP", "USD", &table), None);
    }

    #[test]
    fn test_empty_table() {
        let table = RateTable::new();
        assert_eq!(calculate_rate("USD", "KRW", &table), None);
        assert_eq!(calculate_rate("KRW", "USD", &table), None);
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        // calculate_rate(b, a) ≈ 1 / calculate_rate(a, b) quand les deux
        // sens sont calculables
        let table = sample_table();
        let pairs = [("USD", "EUR"), ("USD", "JPY"), ("KRW", "USD"), ("EUR", "KRW")];

        for (a, b) in pairs {
            let forward = calculate_rate(a, b, &table).unwrap();
            let backward = calculate_rate(b, a, &table).unwrap();
            assert!((forward * backward - 1.0).abs() < 1e-9, "{} <-> {}", a, b);
        }
    }
}
