// ============================================================================
// Normaliseur de séries historiques
// ============================================================================
// Réoriente une série historique (KRW par unité de devise étrangère)
// dans le sens de la paire affichée from → to
//
// La série brute est toujours celle du côté non-KRW de la paire : le
// normaliseur ne fait que changer son orientation, il ne refetch rien.
// ============================================================================

use crate::models::{RatePoint, RateTable, BASE_CURRENCY};

/// Produit une nouvelle série orientée from → to
///
/// Règles, pour une série fetchée pour le côté non-KRW de la paire :
/// - from est le KRW : chaque taux est inversé (vue KRW → étrangère)
/// - to est le KRW : série inchangée (déjà étrangère → KRW)
/// - aucun des deux : chaque taux est divisé par l'entrée COURANTE de
///   la table pour `to` — un seul scalaire, pas une seconde série. Le
///   dénominateur est donc figé à sa dernière valeur sur toute la
///   fenêtre : approximation assumée, reproduite telle quelle.
/// - entrée du dénominateur absente : série retournée telle quelle
///   plutôt que d'échouer
///
/// CONCEPT RUST : la série d'entrée n'est jamais mutée
/// - &[RatePoint] en entrée, Vec<RatePoint> neuf en sortie
pub fn reorient_series(
    points: &[RatePoint],
    from: &str,
    to: &str,
    table: &RateTable,
) -> Vec<RatePoint> {
    if from == BASE_CURRENCY {
        // KRW → étrangère : inverse de chaque point
        return points
            .iter()
            .map(|p| RatePoint::new(p.date.clone(), 1.0 / p.rate))
            .collect();
    }

    if to == BASE_CURRENCY {
        // Déjà dans le bon sens
        return points.to_vec();
    }

    // Étrangère → étrangère : division par le taux KRW courant de `to`
    match table.get(to) {
        Some(to_rate) => points
            .iter()
            .map(|p| RatePoint::new(p.date.clone(), p.rate / to_rate))
            .collect(),
        None => points.to_vec(),
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn usd_series() -> Vec<RatePoint> {
        vec![
            RatePoint::new("1/10", 1340.0),
            RatePoint::new("1/11", 1350.0),
            RatePoint::new("1/12", 1360.0),
        ]
    }

    fn table_with_eur() -> RateTable {
        let mut table = RateTable::new();
        table.rates.insert("EUR".to_string(), 1480.0);
        table
    }

    #[test]
    fn test_base_to_foreign_inverts_every_point() {
        let series = usd_series();
        let out = reorient_series(&series, "KRW", "USD", &RateTable::new());

        assert_eq!(out.len(), 3);
        for (original, reoriented) in series.iter().zip(&out) {
            assert_eq!(reoriented.date, original.date);
            assert!((reoriented.rate - 1.0 / original.rate).abs() < 1e-12);
        }
    }

    #[test]
    fn test_foreign_to_base_passes_through() {
        let series = usd_series();
        let out = reorient_series(&series, "USD", "KRW", &RateTable::new());
        assert_eq!(out, series);
    }

    #[test]
    fn test_cross_pair_divides_by_current_scalar() {
        // USD → EUR : chaque point divisé par le taux EUR COURANT,
        // identique sur toute la fenêtre (dénominateur figé)
        let series = usd_series();
        let out = reorient_series(&series, "USD", "EUR", &table_with_eur());

        for (original, reoriented) in series.iter().zip(&out) {
            assert!((reoriented.rate - original.rate / 1480.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_missing_denominator_passes_through() {
        // Pas de taux GBP dans la table : série inchangée, pas d'erreur
        let series = usd_series();
        let out = reorient_series(&series, "USD", "GBP", &RateTable::new());
        assert_eq!(out, series);
    }

    #[test]
    fn test_input_series_untouched() {
        let series = usd_series();
        let _ = reorient_series(&series, "KRW", "USD", &RateTable::new());
        // La série d'origine est intacte (nouvelle série produite)
        assert_eq!(series[0].rate, 1340.0);
    }

    #[test]
    fn test_empty_series() {
        assert!(reorient_series(&[], "KRW", "USD", &RateTable::new()).is_empty());
    }
}
