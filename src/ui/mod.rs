// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
//
// Couche de présentation : elle appelle le cœur (api, rates, models)
// avec des codes devises et des montants et n'affiche que les résultats
// ============================================================================

pub mod events;    // Gestion des événements clavier
pub mod converter; // Rendu de l'écran convertisseur
pub mod chart;     // Rendu du graphique de tendance

// Re-exports pour simplifier les imports
pub use converter::render;
pub use events::{Event, EventHandler};
