use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::core::config::AxisBounds;
use crate::core::errors::{Error, Result};
use crate::models::layer::{LayerDefinition, LayerId, LayerNode};
use crate::models::position::{Direction, Position, SurfaceKey};

/// A layer as read back from storage, before it is placed.
#[derive(Debug, Clone)]
pub(crate) struct RestoredLayer<C> {
    pub id: LayerId,
    pub title: String,
    pub content: C,
    pub position: Position,
    pub adjacency: BTreeMap<Direction, LayerId>,
}

/// Owns every layer of a workspace together with the coordinate indexes that
/// are kept in lockstep with it.
///
/// * `position_index` maps each occupied coordinate to its layer.
/// * `surface_stacks` lists the layers of each `(x, y)` surface, highest `z`
///   first.
/// * `order` is creation order, used for index-based navigation.
#[derive(Debug, Clone)]
pub struct WorkspaceGraph<C> {
    nodes: HashMap<LayerId, LayerNode<C>>,
    position_index: HashMap<Position, LayerId>,
    surface_stacks: HashMap<SurfaceKey, Vec<LayerId>>,
    order: Vec<LayerId>,
    root: Option<LayerId>,
    active: Option<LayerId>,
    bounds: Option<AxisBounds>,
    next_seq: u64,
}

impl<C> Default for WorkspaceGraph<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> WorkspaceGraph<C> {
    pub fn new() -> Self {
        Self::with_bounds(None)
    }

    /// `None` means an unbounded grid.
    pub fn with_bounds(bounds: Option<AxisBounds>) -> Self {
        Self {
            nodes: HashMap::new(),
            position_index: HashMap::new(),
            surface_stacks: HashMap::new(),
            order: Vec::new(),
            root: None,
            active: None,
            bounds,
            next_seq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root_id(&self) -> Option<&LayerId> {
        self.root.as_ref()
    }

    pub fn active_id(&self) -> Option<&LayerId> {
        self.active.as_ref()
    }

    pub fn active(&self) -> Option<&LayerNode<C>> {
        self.active.as_ref().and_then(|id| self.nodes.get(id))
    }

    pub fn allows(&self, position: Position) -> bool {
        self.bounds.map_or(true, |bounds| bounds.contains(position))
    }

    /// Creates the first layer at the origin and activates it.
    pub fn add_root(&mut self, definition: LayerDefinition<C>) -> Result<LayerId> {
        if !self.nodes.is_empty() {
            return Err(Error::DuplicateRoot);
        }
        let id = self.claim_id(definition.id)?;
        self.place(id.clone(), definition.title, definition.content, Position::ORIGIN);
        self.root = Some(id.clone());
        self.active = Some(id.clone());
        debug!(layer = %id, "root layer added");
        Ok(id)
    }

    /// Creates a layer one step from `from` in `direction`, links both ways and
    /// activates the new layer. Nothing changes when any check fails.
    pub fn connect(
        &mut self,
        from: &LayerId,
        direction: Direction,
        definition: LayerDefinition<C>,
    ) -> Result<LayerId> {
        let source = self
            .nodes
            .get(from)
            .ok_or_else(|| Error::UnknownSource(from.clone()))?;
        if source.has_neighbor(direction) {
            return Err(Error::EdgeOccupied {
                id: from.clone(),
                direction,
            });
        }
        let target = source
            .position
            .step(direction)
            .ok_or(Error::OutOfBounds(source.position))?;
        if self.position_index.contains_key(&target) {
            return Err(Error::PositionOccupied(target));
        }
        if !self.allows(target) {
            return Err(Error::OutOfBounds(target));
        }
        let id = self.claim_id(definition.id)?;

        self.place(id.clone(), definition.title, definition.content, target);
        self.link(from, direction, &id);
        self.active = Some(id.clone());
        debug!(from = %from, %direction, layer = %id, position = %target, "layer connected");
        Ok(id)
    }

    /// Evicts the layer at `position` and every reference to it. Returns the
    /// removed layer, or `None` when the coordinate was empty.
    pub fn remove_at(&mut self, position: Position) -> Option<LayerNode<C>> {
        let id = self.position_index.remove(&position)?;
        let node = self.nodes.remove(&id)?;

        for (direction, neighbor_id) in node.neighbors() {
            if let Some(neighbor) = self.nodes.get_mut(neighbor_id) {
                let back = direction.opposite();
                if neighbor.neighbor(back) == Some(&id) {
                    neighbor.adjacency.remove(&back);
                }
            }
        }

        let surface = position.surface();
        if let Some(stack) = self.surface_stacks.get_mut(&surface) {
            stack.retain(|other| other != &id);
            if stack.is_empty() {
                self.surface_stacks.remove(&surface);
            }
        }
        self.order.retain(|other| other != &id);

        if self.root.as_ref() == Some(&id) {
            self.root = None;
        }
        if self.active.as_ref() == Some(&id) {
            self.active = self.order.first().cloned();
        }
        debug!(layer = %id, %position, "layer removed");
        Some(node)
    }

    pub fn get(&self, id: &LayerId) -> Option<&LayerNode<C>> {
        self.nodes.get(id)
    }

    pub fn get_at(&self, position: Position) -> Option<&LayerNode<C>> {
        self.position_index
            .get(&position)
            .and_then(|id| self.nodes.get(id))
    }

    /// Activates `id` without touching navigation history.
    pub fn set_active(&mut self, id: &LayerId) -> Result<()> {
        if !self.nodes.contains_key(id) {
            return Err(Error::UnknownId(id.clone()));
        }
        self.active = Some(id.clone());
        Ok(())
    }

    /// The live neighbour of `id` in `direction`.
    pub fn neighbor(&self, id: &LayerId, direction: Direction) -> Option<&LayerNode<C>> {
        self.nodes
            .get(id)
            .and_then(|node| node.neighbor(direction))
            .and_then(|neighbor| self.nodes.get(neighbor))
    }

    /// Whether `connect(id, direction, ..)` would currently succeed.
    pub fn is_edge_available(&self, id: &LayerId, direction: Direction) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        if node.has_neighbor(direction) {
            return false;
        }
        match node.position.step(direction) {
            Some(target) => !self.position_index.contains_key(&target) && self.allows(target),
            None => false,
        }
    }

    /// Layers of a surface, highest `z` first.
    pub fn surface_stack(&self, surface: SurfaceKey) -> &[LayerId] {
        self.surface_stacks
            .get(&surface)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The `index`-th live layer in creation order.
    pub fn nth(&self, index: usize) -> Option<&LayerNode<C>> {
        self.order.get(index).and_then(|id| self.nodes.get(id))
    }

    pub fn index_of(&self, id: &LayerId) -> Option<usize> {
        self.order.iter().position(|other| other == id)
    }

    /// Every layer in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &LayerNode<C>> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn occupied_positions(&self) -> impl Iterator<Item = (Position, &LayerId)> {
        self.iter().map(|node| (node.position, &node.id))
    }

    /// Rebuilds a graph from stored layers, checking every placement
    /// invariant. `root`, when present, must name a stored layer at the
    /// origin; a layout whose root was removed has none. The root (or else the
    /// first layer) starts out active.
    pub(crate) fn restore(
        layers: Vec<RestoredLayer<C>>,
        root: Option<&LayerId>,
        bounds: Option<AxisBounds>,
    ) -> Result<Self> {
        let mut graph = Self::with_bounds(bounds);
        let mut expected_links = Vec::new();

        for layer in layers {
            if graph.nodes.contains_key(&layer.id) {
                return Err(Error::InvalidLayout(format!("duplicate layer id {}", layer.id)));
            }
            if let Some(other) = graph.position_index.get(&layer.position) {
                return Err(Error::InvalidLayout(format!(
                    "layers {} and {} share position {}",
                    other, layer.id, layer.position
                )));
            }
            if !graph.allows(layer.position) {
                return Err(Error::InvalidLayout(format!(
                    "layer {} at {} is outside the workspace bounds",
                    layer.id, layer.position
                )));
            }
            for (direction, neighbor) in &layer.adjacency {
                expected_links.push((layer.id.clone(), *direction, neighbor.clone()));
            }
            graph.place(layer.id.clone(), layer.title, layer.content, layer.position);
            if let Some(node) = graph.nodes.get_mut(&layer.id) {
                node.adjacency = layer.adjacency;
            }
        }

        if let Some(root) = root {
            let Some(node) = graph.nodes.get(root) else {
                return Err(Error::InvalidLayout(format!(
                    "root layer {root} is not part of the layout"
                )));
            };
            if node.position != Position::ORIGIN {
                return Err(Error::InvalidLayout(format!(
                    "root layer {} is at {}, expected the origin",
                    root, node.position
                )));
            }
            graph.root = Some(root.clone());
        }
        graph.active = graph.root.clone().or_else(|| graph.order.first().cloned());

        for (from, direction, to) in expected_links {
            graph.check_link(&from, direction, &to)?;
        }
        Ok(graph)
    }

    fn check_link(&self, from: &LayerId, direction: Direction, to: &LayerId) -> Result<()> {
        let broken = |reason: &str| {
            Err(Error::InvalidLayout(format!(
                "edge {from} -{direction}-> {to}: {reason}"
            )))
        };
        let (Some(source), Some(target)) = (self.nodes.get(from), self.nodes.get(to)) else {
            return broken("unknown layer");
        };
        if source.position.step(direction) != Some(target.position) {
            return broken("layers are not adjacent on the grid");
        }
        if target.neighbor(direction.opposite()) != Some(from) {
            return broken("missing reverse edge");
        }
        Ok(())
    }

    fn claim_id(&mut self, requested: Option<LayerId>) -> Result<LayerId> {
        if let Some(id) = requested {
            if self.nodes.contains_key(&id) {
                return Err(Error::DuplicateId(id));
            }
            return Ok(id);
        }
        let mut seq = self.next_seq;
        loop {
            let candidate = LayerId::new(format!("layer-{seq}"));
            if !self.nodes.contains_key(&candidate) {
                return Ok(candidate);
            }
            seq += 1;
        }
    }

    fn place(&mut self, id: LayerId, title: String, content: C, position: Position) {
        let seq = self.next_seq;
        self.next_seq += 1;

        let nodes = &self.nodes;
        let stack = self.surface_stacks.entry(position.surface()).or_default();
        let at = stack.partition_point(|other| {
            nodes
                .get(other)
                .map_or(false, |node| node.position.z > position.z)
        });
        stack.insert(at, id.clone());

        self.position_index.insert(position, id.clone());
        self.order.push(id.clone());
        self.nodes
            .insert(id.clone(), LayerNode::new(id, title, content, position, seq));
    }

    fn link(&mut self, from: &LayerId, direction: Direction, to: &LayerId) {
        if let Some(source) = self.nodes.get_mut(from) {
            source.adjacency.insert(direction, to.clone());
        }
        if let Some(target) = self.nodes.get_mut(to) {
            target.adjacency.insert(direction.opposite(), from.clone());
        }
    }
}
