// ============================================================================
// Structure : RateTable
// ============================================================================
// Table des taux de change par rapport à la devise de référence (KRW)
//
// CONCEPTS RUST :
// 1. HashMap : mapping code devise → taux
// 2. Ownership : la table est reconstruite entièrement à chaque refresh
//    et remplacée d'un bloc dans l'état de l'application (jamais mutée
//    en place) — pas de coordination lecteur/écrivain nécessaire
// ============================================================================

use std::collections::HashMap;

/// Table des taux KRW par unité de devise étrangère
///
/// Invariant : chaque valeur est positive et déjà ramenée à "1 unité"
/// (la division par l'unité de cotation est faite au fetch).
///
/// Le fan-out "best effort" du fetch expose aussi la liste des devises
/// dont la requête a échoué : la table peut être partielle sans que
/// l'opération globale soit en erreur.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    /// Code devise (hors KRW) → KRW par unité
    pub rates: HashMap<String, f64>,

    /// Date de référence : la plus récente observée parmi les succès
    /// (token YYYYMMDD, vide si aucune devise n'a répondu)
    pub reference_date: String,

    /// Devises dont la requête a échoué ou n'a rien retourné
    pub failed: Vec<String>,
}

impl RateTable {
    /// Crée une table vide
    pub fn new() -> Self {
        Self::default()
    }

    /// Retourne le taux KRW d'une devise si présent
    pub fn get(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    /// Vérifie si la table ne contient aucun taux
    ///
    /// Une table vide après un refresh signifie que toutes les devises
    /// ont échoué : la couche de présentation l'affiche comme une erreur.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Nombre de devises présentes dans la table
    pub fn len(&self) -> usize {
        self.rates.len()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table() {
        let table = RateTable::new();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert!(table.get("USD").is_none());
        assert!(table.reference_date.is_empty());
    }

    #[test]
    fn test_get() {
        let mut table = RateTable::new();
        table.rates.insert("USD".to_string(), 1350.0);
        table.reference_date = "20240115".to_string();

        assert_eq!(table.get("USD"), Some(1350.0));
        assert!(table.get("EUR").is_none());
        assert!(!table.is_empty());
    }

    #[test]
    fn test_partial_table_with_failures() {
        // Une table partielle n'est pas une erreur : la devise en échec
        // est simplement absente et listée dans failed
        let mut table = RateTable::new();
        table.rates.insert("USD".to_string(), 1350.0);
        table.failed.push("AUD".to_string());

        assert_eq!(table.len(), 1);
        assert!(table.get("AUD").is_none());
        assert_eq!(table.failed, vec!["AUD".to_string()]);
    }
}
