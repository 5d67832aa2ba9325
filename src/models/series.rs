// ============================================================================
// Structure : RatePoint
// ============================================================================
// Une observation datée de taux de change (série historique)
//
// CONCEPTS RUST :
// 1. Slices : les helpers travaillent sur &[RatePoint] (pas de copie)
// 2. Iterator folding : min/max en un seul passage
// ============================================================================

/// Une observation de la série historique
///
/// Avant normalisation le taux est en "KRW par unité" (déjà ramené à
/// 1 unité). Après passage dans le normaliseur il est dans l'orientation
/// de la paire affichée (from → to).
#[derive(Debug, Clone, PartialEq)]
pub struct RatePoint {
    /// Date d'affichage "mois/jour" sans zéro initial (ex: "1/15")
    pub date: String,

    /// Taux observé
    pub rate: f64,
}

impl RatePoint {
    pub fn new(date: impl Into<String>, rate: f64) -> Self {
        Self {
            date: date.into(),
            rate,
        }
    }
}

/// Bornes (min, max) des taux d'une série
///
/// CONCEPT RUST : fold
/// - Un seul passage sur la slice au lieu de deux (min puis max)
pub fn series_bounds(points: &[RatePoint]) -> Option<(f64, f64)> {
    if points.is_empty() {
        return None;
    }

    Some(points.iter().fold((f64::MAX, f64::MIN), |(min, max), p| {
        (min.min(p.rate), max.max(p.rate))
    }))
}

/// Variation en pourcentage entre le premier et le dernier point
pub fn series_change_percent(points: &[RatePoint]) -> Option<f64> {
    let first = points.first()?.rate;
    let last = points.last()?.rate;
    if first == 0.0 {
        return None;
    }
    Some((last - first) / first * 100.0)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<RatePoint> {
        vec![
            RatePoint::new("1/10", 1340.0),
            RatePoint::new("1/11", 1360.0),
            RatePoint::new("1/12", 1350.0),
        ]
    }

    #[test]
    fn test_bounds() {
        let (min, max) = series_bounds(&sample()).unwrap();
        assert_eq!(min, 1340.0);
        assert_eq!(max, 1360.0);

        assert!(series_bounds(&[]).is_none());
    }

    #[test]
    fn test_change_percent() {
        let change = series_change_percent(&sample()).unwrap();
        // (1350 - 1340) / 1340 * 100
        assert!((change - 0.7462686567).abs() < 1e-6);

        assert!(series_change_percent(&[]).is_none());
    }

    #[test]
    fn test_change_percent_zero_first() {
        let points = vec![RatePoint::new("1/1", 0.0), RatePoint::new("1/2", 1.0)];
        assert!(series_change_percent(&points).is_none());
    }
}
