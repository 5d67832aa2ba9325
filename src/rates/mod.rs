// ============================================================================
// Module : rates
// ============================================================================
// Le cœur métier : calcul des taux croisés, réorientation des séries
// historiques et formatage pour l'affichage. Tout est pur (pas d'I/O),
// testable sans réseau.
// ============================================================================

pub mod calculator; // Taux croisés via le KRW
pub mod format;     // Formatage montants et dates
pub mod normalizer; // Réorientation des séries historiques

// Re-exports pour simplifier les imports
pub use calculator::calculate_rate;
pub use format::{format_currency, format_display_date, format_unit_rate};
pub use normalizer::reorient_series;
