//! Cache manager (C6): owns the published lookup tree and the snapshots
//! it was built from, and drives background refreshes.
//!
//! Grounded in `original_source/internal/Caches.py`: `init_caches`,
//! `update_lookup_tree` and the daemon `execute_regular` timer loop. The
//! atomic swap of the published tree mirrors how the teacher's
//! `ConfigWatcher` publishes a freshly built snapshot for lock-free reads.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use tokio::sync::Mutex;

use pacserver_config::Config;

use crate::core::element::{build_elements, LoadOutcome};
use crate::core::error::LoadError;
use crate::core::template::{load_templates, Template};
use crate::core::tree::{self, TreeNode};
use crate::core::zone::{load_zones, Zone};

pub struct Cache {
    ip_map_file: PathBuf,
    pac_root: PathBuf,
    contact_info: String,
    zones: Mutex<Vec<Zone>>,
    templates: Mutex<Vec<Template>>,
    tree: ArcSwap<TreeNode>,
}

impl Cache {
    /// Load zones and templates, build the initial tree, and publish it.
    /// Any failure here is fatal to startup (§4.6).
    pub async fn init(config: &Config) -> Result<Self, LoadError> {
        let zones = load_zones(&config.ip_map_file).await?;
        let templates = load_templates(&config.pac_root).await?;

        let outcome = LoadOutcome {
            zones: Some(zones),
            templates: Some(templates),
        };
        let built = build_elements(&[], &[], outcome, &config.contact_info)
            .expect("both loads succeeded, build_elements always returns Some");

        let tree = tree::build(built.elements);
        tracing::info!(zones = built.zones.len(), templates = built.templates.len(), "initial lookup tree built");

        Ok(Self {
            ip_map_file: config.ip_map_file.clone(),
            pac_root: config.pac_root.clone(),
            contact_info: config.contact_info.clone(),
            zones: Mutex::new(built.zones),
            templates: Mutex::new(built.templates),
            tree: ArcSwap::new(Arc::new(tree)),
        })
    }

    /// Borrow the currently published tree. Lock-free: readers never
    /// observe a partially-rebuilt tree.
    pub fn tree(&self) -> Arc<TreeNode> {
        self.tree.load_full()
    }

    /// Reload zones and templates and, unless both attempts fail, rebuild
    /// and publish a new tree. Load failures degrade to the last good
    /// snapshot rather than propagating (§4.4).
    pub async fn refresh(&self) {
        let fresh_zones = load_zones(&self.ip_map_file).await.ok();
        let fresh_templates = load_templates(&self.pac_root).await.ok();

        let mut zones_guard = self.zones.lock().await;
        let mut templates_guard = self.templates.lock().await;

        let outcome = LoadOutcome {
            zones: fresh_zones,
            templates: fresh_templates,
        };

        match build_elements(&zones_guard, &templates_guard, outcome, &self.contact_info) {
            None => {
                tracing::info!("refresh produced no update, keeping cached tree");
            }
            Some(built) => {
                *zones_guard = built.zones;
                *templates_guard = built.templates;
                let tree = tree::build(built.elements);
                self.tree.store(Arc::new(tree));
                tracing::info!("lookup tree refreshed");
            }
        }
    }

    /// Spawn a background task that calls [`Cache::refresh`] every
    /// `period`, with no catch-up on overrun (a tick skipped by a slow
    /// refresh is simply not replayed).
    pub fn spawn_auto_refresh(self: Arc<Self>, period: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // First tick fires immediately; the cache is already freshly
            // built by `init`, so skip it.
            interval.tick().await;
            loop {
                interval.tick().await;
                tracing::info!("max cache age reached, refreshing lookup tree");
                self.refresh().await;
            }
        })
    }
}
