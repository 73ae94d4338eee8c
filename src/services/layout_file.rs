use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::config::WorkspaceConfig;
use crate::core::errors::{Error, Result};
use crate::models::layer::LayerId;
use crate::models::position::{Direction, Position};
use crate::services::graph::RestoredLayer;
use crate::services::workspace::Workspace;

pub const LAYOUT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct LayoutFile<C> {
    version: u32,
    /// Absent once the root layer has been removed.
    #[serde(default)]
    root: Option<LayerId>,
    active: Option<LayerId>,
    layers: Vec<StoredLayer<C>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredLayer<C> {
    id: LayerId,
    title: String,
    position: Position,
    #[serde(default)]
    adjacency: BTreeMap<Direction, LayerId>,
    content: C,
}

/// Serializes the layers of `workspace` (creation order) together with its
/// root and active layer. History is not persisted.
pub fn to_json<C: Serialize>(workspace: &Workspace<C>) -> Result<String> {
    let layout = LayoutFile {
        version: LAYOUT_VERSION,
        root: workspace.graph().root_id().cloned(),
        active: workspace.graph().active_id().cloned(),
        layers: workspace
            .graph()
            .iter()
            .map(|node| StoredLayer {
                id: node.id.clone(),
                title: node.title.clone(),
                position: node.position,
                adjacency: node.adjacency.clone(),
                content: &node.content,
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&layout)?)
}

/// Rebuilds a workspace from [`to_json`] output. History restarts at the
/// active layer.
pub fn from_json<C: DeserializeOwned>(raw: &str, config: WorkspaceConfig) -> Result<Workspace<C>> {
    let layout: LayoutFile<C> = serde_json::from_str(raw)?;
    if layout.version != LAYOUT_VERSION {
        return Err(Error::InvalidLayout(format!(
            "unsupported layout version {} (expected {LAYOUT_VERSION})",
            layout.version
        )));
    }
    if let Some(active) = &layout.active {
        if !layout.layers.iter().any(|layer| &layer.id == active) {
            return Err(Error::InvalidLayout(format!(
                "active layer {active} is not part of the layout"
            )));
        }
    }
    let layers = layout
        .layers
        .into_iter()
        .map(|layer| RestoredLayer {
            id: layer.id,
            title: layer.title,
            content: layer.content,
            position: layer.position,
            adjacency: layer.adjacency,
        })
        .collect();
    Workspace::restore(config, layers, layout.root.as_ref(), layout.active.as_ref())
}

pub fn save_layout<C: Serialize>(workspace: &Workspace<C>, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, to_json(workspace)?)?;
    info!(path = %path.display(), layers = workspace.len(), "layout saved");
    Ok(())
}

pub fn load_layout<C: DeserializeOwned>(
    path: impl AsRef<Path>,
    config: WorkspaceConfig,
) -> Result<Workspace<C>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)?;
    let workspace = from_json(&raw, config)?;
    info!(path = %path.display(), layers = workspace.len(), "layout loaded");
    Ok(workspace)
}
