// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod events;    // Gestion des événements clavier
pub mod dashboard; // Rendu du job board et du sélecteur de devise

// Re-exports pour simplifier les imports
pub use dashboard::render;
pub use events::{Event, EventHandler};
