use std::fs;

use anyhow::Result;
use layerdeck::services::layout_file::{from_json, load_layout, save_layout, to_json};
use layerdeck::{
    Direction, Error, LayerDefinition, NavDirection, Position, Workspace, WorkspaceConfig,
};
use serde::{Deserialize, Serialize};
use tempfile::tempdir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Panel {
    route: String,
    pinned: bool,
}

fn panel(route: &str) -> Panel {
    Panel {
        route: route.to_string(),
        pinned: false,
    }
}

#[test]
fn saved_layout_restores_graph_and_active_layer() -> Result<()> {
    let temp_root = tempdir()?;
    let path = temp_root.path().join("layout.json");

    let mut workspace = Workspace::default();
    let home = workspace.add_root(LayerDefinition::new("Home", panel("/")))?;
    let docs_layer = LayerDefinition::new("Docs", panel("/docs"));
    let docs = workspace.connect(&home, Direction::Right, docs_layer)?;
    let api_layer = LayerDefinition::new("API", panel("/docs/api"));
    let api = workspace.connect(&docs, Direction::Above, api_layer)?;
    workspace.navigate_to_id(&docs)?;
    save_layout(&workspace, &path)?;

    let mut restored: Workspace<Panel> = load_layout(&path, WorkspaceConfig::default())?;
    assert_eq!(restored.len(), 3);
    assert_eq!(restored.active().map(|node| &node.id), Some(&docs));
    let restored_api = restored.get(&api).expect("api layer restored");
    assert_eq!(restored_api.position, Position::new(1, 0, 1));
    assert_eq!(restored_api.content.route, "/docs/api");
    assert_eq!(restored.graph().root_id(), Some(&home));

    // History restarts at the active layer.
    assert_eq!(restored.history().len(), 1);
    assert!(!restored.back());

    assert!(restored.navigate(NavDirection::Forward));
    assert_eq!(restored.active().map(|node| &node.id), Some(&api));
    assert!(!restored.is_edge_available(&home, Direction::Right));
    Ok(())
}

#[test]
fn restored_workspace_keeps_growing() -> Result<()> {
    let temp_root = tempdir()?;
    let path = temp_root.path().join("layout.json");

    let mut workspace: Workspace<String> = Workspace::default();
    let home = workspace.add_root(LayerDefinition::new("Home", String::new()))?;
    workspace.connect(&home, Direction::Up, LayerDefinition::new("North", String::new()))?;
    save_layout(&workspace, &path)?;

    let mut restored: Workspace<String> = load_layout(&path, WorkspaceConfig::default())?;
    let again = LayerDefinition::new("again", String::new());
    let result = restored.connect(&home, Direction::Up, again);
    assert!(matches!(result, Err(Error::EdgeOccupied { .. })));
    let south = LayerDefinition::new("South", String::new());
    let fresh = restored.connect(&home, Direction::Down, south)?;
    assert_ne!(fresh.as_str(), "layer-0");
    assert_ne!(fresh.as_str(), "layer-1");
    Ok(())
}

#[test]
fn layout_outside_configured_bounds_is_rejected() -> Result<()> {
    let temp_root = tempdir()?;
    let path = temp_root.path().join("layout.json");

    let mut workspace: Workspace<String> = Workspace::default();
    let home = workspace.add_root(LayerDefinition::new("Home", String::new()))?;
    workspace.connect(&home, Direction::Right, LayerDefinition::new("Far", String::new()))?;
    save_layout(&workspace, &path)?;

    let config: WorkspaceConfig =
        serde_json::from_str(r#"{ "infinite": false, "bounds": { "max_x": 0 } }"#)?;
    let result = load_layout::<String>(&path, config);
    assert!(matches!(result, Err(Error::InvalidLayout(_))));
    Ok(())
}

#[test]
fn corrupt_file_surfaces_json_error() -> Result<()> {
    let temp_root = tempdir()?;
    let path = temp_root.path().join("layout.json");
    fs::write(&path, "{ not json")?;

    let result = load_layout::<String>(&path, WorkspaceConfig::default());
    assert!(matches!(result, Err(Error::Json(_))));

    let missing_path = temp_root.path().join("missing.json");
    let missing = load_layout::<String>(&missing_path, WorkspaceConfig::default());
    assert!(matches!(missing, Err(Error::Io(_))));
    Ok(())
}

#[test]
fn layout_without_root_round_trips() -> Result<()> {
    let mut workspace: Workspace<String> = Workspace::default();
    let home = workspace.add_root(LayerDefinition::new("Home", String::new()))?;
    let east_layer = LayerDefinition::new("East", String::new());
    let east = workspace.connect(&home, Direction::Right, east_layer)?;
    assert!(workspace.remove_at(Position::ORIGIN).is_some());

    let restored: Workspace<String> =
        from_json(&to_json(&workspace)?, WorkspaceConfig::default())?;
    assert_eq!(restored.len(), 1);
    assert!(restored.graph().root_id().is_none());
    assert_eq!(restored.active().map(|node| &node.id), Some(&east));
    assert!(restored.is_edge_available(&east, Direction::Left));
    Ok(())
}

#[test]
fn refilled_origin_is_not_a_root() -> Result<()> {
    let mut workspace: Workspace<String> = Workspace::default();
    let home = workspace.add_root(LayerDefinition::new("Home", String::new()))?;
    let east_layer = LayerDefinition::new("East", String::new());
    let east = workspace.connect(&home, Direction::Right, east_layer)?;
    workspace.remove_at(Position::ORIGIN);
    let west_layer = LayerDefinition::new("West", String::new());
    let west = workspace.connect(&east, Direction::Left, west_layer)?;
    assert_eq!(workspace.get(&west).map(|node| node.position), Some(Position::ORIGIN));

    let mut restored: Workspace<String> =
        from_json(&to_json(&workspace)?, WorkspaceConfig::default())?;
    assert!(restored.graph().root_id().is_none());
    assert_eq!(restored.get_at(Position::ORIGIN).map(|node| &node.id), Some(&west));
    assert_eq!(restored.active().map(|node| &node.id), Some(&west));
    let result = restored.add_root(LayerDefinition::new("Home", String::new()));
    assert!(matches!(result, Err(Error::DuplicateRoot)));
    Ok(())
}
