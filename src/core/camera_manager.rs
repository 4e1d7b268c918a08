use crate::camera::camera_entity::CameraEntity;
use crate::config_loader::MasterConfig;
use anyhow::{bail, Result};
use log::{debug, info};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

pub struct CameraManager {
    cameras: BTreeMap<String, Arc<Mutex<CameraEntity>>>,
}

impl CameraManager {
    pub fn new(master_config: &MasterConfig) -> Result<Self> {
        Self::from_entities(master_config.cameras.iter().cloned().map(CameraEntity::new))
    }

    pub fn from_entities(entities: impl IntoIterator<Item = CameraEntity>) -> Result<Self> {
        debug!("🛠️ Initializing CameraManager...");
        let start_time = Instant::now();
        let mut cameras = BTreeMap::new();
        for (idx, entity) in entities.into_iter().enumerate() {
            let name = entity.config.name.clone();
            debug!("  Processing camera config #{}: {}", idx + 1, name);
            if cameras.contains_key(&name) {
                bail!("❌ Duplicate camera name found in configuration: {}", name);
            }
            cameras.insert(name.clone(), Arc::new(Mutex::new(entity)));
            debug!("  Added camera '{}' to manager.", name);
        }
        info!("✅ CameraManager initialized with {} cameras in {:?}.", cameras.len(), start_time.elapsed());
        Ok(CameraManager { cameras })
    }

    pub fn get_camera(&self, name: &str) -> Option<Arc<Mutex<CameraEntity>>> {
        self.cameras.get(name).cloned()
    }

    pub fn get_all_cameras(&self) -> Vec<Arc<Mutex<CameraEntity>>> {
        debug!("📷 Retrieving all configured cameras ({})", self.cameras.len());
        self.cameras.values().cloned().collect()
    }

    pub fn get_cameras_by_names(&self, names: &[String]) -> Vec<Arc<Mutex<CameraEntity>>> {
        debug!("📷 Retrieving cameras by names: {:?}", names);
        let mut result = Vec::new();
        for name in names {
            if let Some(cam) = self.cameras.get(name) {
                result.push(cam.clone());
                debug!("  Found camera: {}", name);
            } else {
                debug!("  Camera not found: {}", name);
            }
        }
        result
    }
}

// Helper to parse comma-separated camera names from CLI
pub fn parse_camera_names_arg(names_str_opt: Option<&String>) -> Option<Vec<String>> {
    let result = names_str_opt.map(|names_str| {
        names_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    });
    debug!("📝 Parsed camera names argument {:?} into {:?}", names_str_opt, result);
    result
}
