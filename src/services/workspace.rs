use serde::Serialize;
use tracing::{debug, trace};

use crate::core::config::WorkspaceConfig;
use crate::core::errors::{Error, Result};
use crate::models::layer::{LayerDefinition, LayerId, LayerNode};
use crate::models::position::{Direction, NavDirection, Position};
use crate::services::graph::{RestoredLayer, WorkspaceGraph};
use crate::services::history::NavigationHistory;

/// Read-only view handed to the rendering layer after each state change.
#[derive(Debug, Serialize)]
pub struct Snapshot<'a, C> {
    pub active_id: Option<&'a LayerId>,
    pub all_nodes: Vec<&'a LayerNode<C>>,
    /// Layers the renderer should keep mounted.
    pub visible_ids: Vec<&'a LayerId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OccupiedPosition {
    pub position: Position,
    pub id: LayerId,
}

/// A navigable set of layers: the graph, the active pointer and the history
/// behind it. Instances share nothing and are passed explicitly to whatever
/// needs them.
#[derive(Debug, Clone)]
pub struct Workspace<C> {
    config: WorkspaceConfig,
    graph: WorkspaceGraph<C>,
    history: NavigationHistory,
}

impl<C> Default for Workspace<C> {
    fn default() -> Self {
        let config = WorkspaceConfig::default();
        Self {
            graph: WorkspaceGraph::with_bounds(config.effective_bounds()),
            history: NavigationHistory::new(config.history_limit),
            config,
        }
    }
}

impl<C> Workspace<C> {
    pub fn new(config: WorkspaceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            graph: WorkspaceGraph::with_bounds(config.effective_bounds()),
            history: NavigationHistory::new(config.history_limit),
            config,
        })
    }

    pub(crate) fn restore(
        config: WorkspaceConfig,
        layers: Vec<RestoredLayer<C>>,
        root: Option<&LayerId>,
        active: Option<&LayerId>,
    ) -> Result<Self> {
        config.validate()?;
        let mut graph = WorkspaceGraph::restore(layers, root, config.effective_bounds())?;
        if let Some(active) = active {
            graph.set_active(active)?;
        }
        let mut workspace = Self {
            graph,
            history: NavigationHistory::new(config.history_limit),
            config,
        };
        if let Some(active) = workspace.graph.active_id().cloned() {
            workspace.record(active);
        }
        Ok(workspace)
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    pub fn graph(&self) -> &WorkspaceGraph<C> {
        &self.graph
    }

    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    // Commands

    pub fn add_root(&mut self, definition: LayerDefinition<C>) -> Result<LayerId> {
        let id = self.graph.add_root(definition)?;
        self.record(id.clone());
        Ok(id)
    }

    pub fn connect(
        &mut self,
        from: &LayerId,
        direction: Direction,
        definition: LayerDefinition<C>,
    ) -> Result<LayerId> {
        let id = self.graph.connect(from, direction, definition)?;
        self.record(id.clone());
        Ok(id)
    }

    /// Removes the layer at `position`. If it was active, the current history
    /// entry (or else the first layer) takes over.
    pub fn remove_at(&mut self, position: Position) -> Option<LayerNode<C>> {
        let active_before = self.graph.active_id().cloned();
        let removed = self.graph.remove_at(position)?;
        self.history.purge(&removed.id);

        if active_before.as_ref() == Some(&removed.id) {
            if let Some(entry) = self.history.current() {
                let fallback = entry.layer_id.clone();
                if self.graph.set_active(&fallback).is_ok() {
                    debug!(layer = %fallback, "active layer restored from history");
                }
            }
        }
        Some(removed)
    }

    /// Activates `id` without recording history.
    pub fn set_active(&mut self, id: &LayerId) -> Result<()> {
        self.graph.set_active(id)
    }

    /// Moves along an edge or through the active surface's stack. Bumping into
    /// a wall is not an error; it returns `false` and changes nothing.
    pub fn navigate(&mut self, direction: NavDirection) -> bool {
        let Some(active) = self.graph.active() else {
            trace!(?direction, "navigate on empty workspace");
            return false;
        };

        let target = match direction.edge() {
            Some(edge) => self
                .graph
                .neighbor(&active.id, edge)
                .filter(|neighbor| self.graph.allows(neighbor.position))
                .map(|neighbor| neighbor.id.clone()),
            None => {
                let stack = self.graph.surface_stack(active.position.surface());
                let candidate = match direction {
                    NavDirection::First => stack.first(),
                    _ => stack.last(),
                };
                candidate.filter(|id| self.graph.get(id).is_some()).cloned()
            }
        };

        match target {
            Some(id) => self.move_to(id),
            None => {
                trace!(?direction, "no layer in that direction");
                false
            }
        }
    }

    /// Jumps to the layer at `position`; an empty coordinate is a no-op.
    pub fn navigate_to_position(&mut self, position: Position) -> bool {
        match self.graph.get_at(position) {
            Some(node) => {
                let id = node.id.clone();
                self.jump_to(id)
            }
            None => {
                trace!(%position, "no layer at position");
                false
            }
        }
    }

    /// Jumps to a layer by id. Unlike the other jumps an unknown id is a caller
    /// error.
    pub fn navigate_to_id(&mut self, id: &LayerId) -> Result<bool> {
        if self.graph.get(id).is_none() {
            return Err(Error::UnknownId(id.clone()));
        }
        Ok(self.jump_to(id.clone()))
    }

    /// Jumps to the `index`-th layer in creation order.
    pub fn navigate_to_index(&mut self, index: usize) -> bool {
        match self.graph.nth(index) {
            Some(node) => {
                let id = node.id.clone();
                self.jump_to(id)
            }
            None => {
                trace!(index, "layer index out of range");
                false
            }
        }
    }

    pub fn back(&mut self) -> bool {
        let Some(entry) = self.history.back() else {
            return false;
        };
        let id = entry.layer_id.clone();
        self.replay(id)
    }

    pub fn forward(&mut self) -> bool {
        let Some(entry) = self.history.forward() else {
            return false;
        };
        let id = entry.layer_id.clone();
        self.replay(id)
    }

    // Queries

    pub fn active(&self) -> Option<&LayerNode<C>> {
        self.graph.active()
    }

    pub fn get(&self, id: &LayerId) -> Option<&LayerNode<C>> {
        self.graph.get(id)
    }

    pub fn get_at(&self, position: Position) -> Option<&LayerNode<C>> {
        self.graph.get_at(position)
    }

    pub fn snapshot(&self) -> Snapshot<'_, C> {
        let active_id = self.graph.active_id();
        let mut visible_ids: Vec<&LayerId> = active_id.into_iter().collect();
        if self.config.virtualize_neighbors {
            if let Some(active) = self.graph.active() {
                for (_, neighbor) in active.neighbors() {
                    if let Some(node) = self.graph.get(neighbor) {
                        if !visible_ids.contains(&&node.id) {
                            visible_ids.push(&node.id);
                        }
                    }
                }
            }
        }
        Snapshot {
            active_id,
            all_nodes: self.graph.iter().collect(),
            visible_ids,
        }
    }

    pub fn is_edge_available(&self, id: &LayerId, direction: Direction) -> bool {
        self.graph.is_edge_available(id, direction)
    }

    pub fn occupied_positions(&self) -> Vec<OccupiedPosition> {
        self.graph
            .occupied_positions()
            .map(|(position, id)| OccupiedPosition {
                position,
                id: id.clone(),
            })
            .collect()
    }

    /// Screen translation of a layer, for the renderer's transition.
    pub fn screen_offset(&self, id: &LayerId) -> Option<(f32, f32, f32)> {
        self.graph
            .get(id)
            .map(|node| self.config.screen_offset(node.position))
    }

    // Transitions

    fn move_to(&mut self, id: LayerId) -> bool {
        if self.graph.active_id() == Some(&id) {
            return false;
        }
        if self.graph.set_active(&id).is_err() {
            return false;
        }
        debug!(layer = %id, "layer activated");
        self.record(id);
        true
    }

    /// A direct jump onto the layer that is already active still ends any
    /// redo branch, without logging a duplicate visit.
    fn jump_to(&mut self, id: LayerId) -> bool {
        if self.graph.active_id() == Some(&id) {
            self.history.discard_redo();
            return false;
        }
        self.move_to(id)
    }

    fn replay(&mut self, id: LayerId) -> bool {
        match self.graph.set_active(&id) {
            Ok(()) => {
                debug!(layer = %id, "history replay");
                true
            }
            Err(err) => {
                debug!(layer = %id, error = %err, "history entry no longer resolves");
                false
            }
        }
    }

    fn record(&mut self, id: LayerId) {
        let index = self.graph.index_of(&id).unwrap_or_default();
        self.history.record(id, index);
    }
}
