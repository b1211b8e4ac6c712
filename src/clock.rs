// ============================================================================
// Module : clock
// ============================================================================
// Source du temps pour la fraîcheur du cache
//
// CONCEPT RUST : Trait objet pour l'injection de dépendances
// - Le service reçoit un Arc<dyn Clock>
// - En prod : SystemClock (chrono)
// - En test : une horloge manuelle qu'on avance à la main
// ============================================================================

/// Horloge renvoyant l'heure courante en millisecondes epoch
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Horloge système basée sur chrono
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_after_2024() {
        // 2024-01-01T00:00:00Z
        assert!(SystemClock.now_millis() > 1_704_067_200_000);
    }
}
