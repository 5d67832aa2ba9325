// ============================================================================
// Module : api
// ============================================================================
// Ce module contient le client de l'API de statistiques externe
// (ECOS, Banque de Corée)
// ============================================================================

pub mod ecos; // Client API ECOS StatisticSearch

// Re-export des fonctions principales
pub use ecos::{fetch_historical_rates, fetch_latest_rates};
