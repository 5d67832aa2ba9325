// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod currency;   // Registre statique des devises
pub mod rate_table; // Table des taux KRW
pub mod series;     // Observations historiques

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use lazyforex::models::currency::CurrencyInfo;
// On peut faire : use lazyforex::models::CurrencyInfo;
pub use currency::{currencies, find_currency, foreign_currencies, CurrencyInfo, BASE_CURRENCY};
pub use rate_table::RateTable;
pub use series::{series_bounds, series_change_percent, RatePoint};
