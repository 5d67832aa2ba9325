// ============================================================================
// LazyForex - Library
// ============================================================================
// Expose les modules publics pour les exemples et tests
// ============================================================================

pub mod api;       // Client API ECOS (Banque de Corée)
pub mod models;    // Structures de données
pub mod rates;     // Calcul des taux, normalisation, formatage
pub mod app;       // État de l'application
pub mod ui;        // Interface utilisateur
