//! Asset readiness gate
//!
//! The host loads media however it likes and reports each asset here. A
//! session may only start once every asset in the manifest is loaded.

use serde::{Deserialize, Serialize};

/// Media the presentation layer needs before the first frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetId {
    /// Looping muted run cycle for the player
    PlayerRun,
    /// Looping muted patrol cycle for enemies
    EnemyPatrol,
    GrassIcon,
    HoveringTile,
    GroundTile,
    /// Static player sprite used until the run cycle can play
    PlayerFallback,
}

impl AssetId {
    pub const ALL: [AssetId; 6] = [
        AssetId::PlayerRun,
        AssetId::EnemyPatrol,
        AssetId::GrassIcon,
        AssetId::HoveringTile,
        AssetId::GroundTile,
        AssetId::PlayerFallback,
    ];

    /// Default file name relative to the asset root
    pub fn file_name(&self) -> &'static str {
        match self {
            AssetId::PlayerRun => "moo.mp4",
            AssetId::EnemyPatrol => "wolf.mp4",
            AssetId::GrassIcon => "grass.png",
            AssetId::HoveringTile => "hovering.png",
            AssetId::GroundTile => "bottom.jpg",
            AssetId::PlayerFallback => "cow.png",
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, AssetId::PlayerRun | AssetId::EnemyPatrol)
    }
}

/// Load status of one asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetStatus {
    Pending,
    Loaded,
    Failed(String),
}

/// Tracks the manifest and answers the single "ready" question
#[derive(Debug, Clone)]
pub struct AssetGate {
    entries: Vec<(AssetId, AssetStatus)>,
}

impl Default for AssetGate {
    fn default() -> Self {
        Self::new(&AssetId::ALL)
    }
}

impl AssetGate {
    pub fn new(manifest: &[AssetId]) -> Self {
        let mut entries: Vec<(AssetId, AssetStatus)> = Vec::with_capacity(manifest.len());
        for &id in manifest {
            if !entries.iter().any(|(e, _)| *e == id) {
                entries.push((id, AssetStatus::Pending));
            }
        }
        Self { entries }
    }

    /// A gate with nothing to wait for (headless runs, tests)
    pub fn ready() -> Self {
        Self::new(&[])
    }

    /// Record a finished load. Returns true if this made the gate ready.
    pub fn mark_loaded(&mut self, id: AssetId) -> bool {
        let was_ready = self.is_ready();
        if let Some(status) = self.status_mut(id) {
            if *status == AssetStatus::Pending {
                *status = AssetStatus::Loaded;
            }
        }
        let ready = self.is_ready();
        if ready && !was_ready {
            log::info!("All {} assets loaded", self.entries.len());
        }
        ready && !was_ready
    }

    /// Record a failed load; the gate never opens afterwards
    pub fn mark_failed(&mut self, id: AssetId, reason: impl Into<String>) {
        let reason = reason.into();
        log::error!("Asset {} failed to load: {}", id.file_name(), reason);
        if let Some(status) = self.status_mut(id) {
            *status = AssetStatus::Failed(reason);
        }
    }

    pub fn is_ready(&self) -> bool {
        self.entries
            .iter()
            .all(|(_, status)| *status == AssetStatus::Loaded)
    }

    pub fn pending(&self) -> Vec<AssetId> {
        self.with_status(|s| *s == AssetStatus::Pending)
    }

    pub fn failed(&self) -> Vec<AssetId> {
        self.with_status(|s| matches!(s, AssetStatus::Failed(_)))
    }

    pub fn status(&self, id: AssetId) -> Option<&AssetStatus> {
        self.entries.iter().find(|(e, _)| *e == id).map(|(_, s)| s)
    }

    fn status_mut(&mut self, id: AssetId) -> Option<&mut AssetStatus> {
        self.entries
            .iter_mut()
            .find(|(e, _)| *e == id)
            .map(|(_, s)| s)
    }

    fn with_status(&self, pred: impl Fn(&AssetStatus) -> bool) -> Vec<AssetId> {
        self.entries
            .iter()
            .filter(|(_, s)| pred(s))
            .map(|(id, _)| *id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_after_all_loaded() {
        let mut gate = AssetGate::default();
        assert!(!gate.is_ready());
        assert_eq!(gate.pending().len(), 6);

        for id in &AssetId::ALL[..5] {
            assert!(!gate.mark_loaded(*id));
        }
        assert_eq!(gate.pending(), vec![AssetId::PlayerFallback]);
        assert!(gate.mark_loaded(AssetId::PlayerFallback));
        assert!(gate.is_ready());
        // Signal fires once
        assert!(!gate.mark_loaded(AssetId::PlayerFallback));
    }

    #[test]
    fn test_failure_keeps_gate_closed() {
        let mut gate = AssetGate::new(&[AssetId::PlayerRun, AssetId::GrassIcon]);
        gate.mark_failed(AssetId::PlayerRun, "404");
        gate.mark_loaded(AssetId::GrassIcon);
        // A late load event does not undo the failure
        gate.mark_loaded(AssetId::PlayerRun);
        assert!(!gate.is_ready());
        assert_eq!(gate.failed(), vec![AssetId::PlayerRun]);
        assert_eq!(
            gate.status(AssetId::PlayerRun),
            Some(&AssetStatus::Failed("404".into()))
        );
    }

    #[test]
    fn test_empty_manifest_is_ready() {
        assert!(AssetGate::ready().is_ready());
    }

    #[test]
    fn test_manifest_files() {
        assert!(AssetId::PlayerRun.is_video());
        assert!(!AssetId::GroundTile.is_video());
        assert_eq!(AssetId::GroundTile.file_name(), "bottom.jpg");
    }
}
