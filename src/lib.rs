pub mod core;
pub mod models;
pub mod services;

pub use crate::core::config::WorkspaceConfig;
pub use crate::core::errors::{Error, Result};
pub use crate::models::layer::{LayerDefinition, LayerId, LayerNode};
pub use crate::models::position::{Direction, NavDirection, Position};
pub use crate::services::workspace::{Snapshot, Workspace};
