use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::errors::{Error, Result};
use crate::models::position::Position;

pub const DEFAULT_HISTORY_LIMIT: usize = 20;
pub const DEFAULT_SPACING: f32 = 100.0;

/// Distance between neighbouring grid cells in screen units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSpacing {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for GridSpacing {
    fn default() -> Self {
        Self {
            x: DEFAULT_SPACING,
            y: DEFAULT_SPACING,
            z: DEFAULT_SPACING,
        }
    }
}

/// Inclusive per-axis limits. A missing limit leaves that side open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisBounds {
    pub min_x: Option<i32>,
    pub max_x: Option<i32>,
    pub min_y: Option<i32>,
    pub max_y: Option<i32>,
    pub min_z: Option<i32>,
    pub max_z: Option<i32>,
}

impl AxisBounds {
    pub fn contains(&self, position: Position) -> bool {
        within(position.x, self.min_x, self.max_x)
            && within(position.y, self.min_y, self.max_y)
            && within(position.z, self.min_z, self.max_z)
    }

    fn validate(&self) -> Result<()> {
        let pairs = [
            ("x", self.min_x, self.max_x),
            ("y", self.min_y, self.max_y),
            ("z", self.min_z, self.max_z),
        ];
        for (axis, min, max) in pairs {
            if let (Some(min), Some(max)) = (min, max) {
                if min > max {
                    return Err(Error::InvalidConfig(format!(
                        "min_{axis} ({min}) is greater than max_{axis} ({max})"
                    )));
                }
            }
        }
        if !self.contains(Position::ORIGIN) {
            return Err(Error::InvalidConfig(
                "bounds must contain the root position (0, 0, 0)".to_string(),
            ));
        }
        Ok(())
    }
}

fn within(value: i32, min: Option<i32>, max: Option<i32>) -> bool {
    min.map_or(true, |min| value >= min) && max.map_or(true, |max| value <= max)
}

/// Construction-time settings of a workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    pub spacing: GridSpacing,
    /// Disables bounds checking entirely.
    pub infinite: bool,
    pub bounds: Option<AxisBounds>,
    pub history_limit: usize,
    /// Report immediate neighbours of the active layer as visible too.
    pub virtualize_neighbors: bool,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            spacing: GridSpacing::default(),
            infinite: true,
            bounds: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
            virtualize_neighbors: false,
        }
    }
}

impl WorkspaceConfig {
    /// Bounded grid; turns `infinite` off.
    pub fn bounded(bounds: AxisBounds) -> Self {
        Self {
            infinite: false,
            bounds: Some(bounds),
            ..Self::default()
        }
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_virtualized_neighbors(mut self, enabled: bool) -> Self {
        self.virtualize_neighbors = enabled;
        self
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path.as_ref())?;
        let config: WorkspaceConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.history_limit == 0 {
            return Err(Error::InvalidConfig(
                "history_limit must be at least 1".to_string(),
            ));
        }
        if let Some(bounds) = &self.bounds {
            bounds.validate()?;
        }
        Ok(())
    }

    /// Bounds that actually apply: none when the grid is infinite.
    pub fn effective_bounds(&self) -> Option<AxisBounds> {
        if self.infinite {
            None
        } else {
            self.bounds
        }
    }

    /// Whether `position` is reachable under the configured bounds.
    pub fn allows(&self, position: Position) -> bool {
        self.effective_bounds()
            .map_or(true, |bounds| bounds.contains(position))
    }

    /// Screen-space translation of a grid cell.
    pub fn screen_offset(&self, position: Position) -> (f32, f32, f32) {
        (
            position.x as f32 * self.spacing.x,
            position.y as f32 * self.spacing.y,
            position.z as f32 * self.spacing.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn partial_json_falls_back_to_defaults() -> Result<()> {
        let config: WorkspaceConfig = serde_json::from_str(r#"{ "history_limit": 5 }"#)?;
        assert_eq!(config.history_limit, 5);
        assert!(config.infinite);
        assert_eq!(config.spacing, GridSpacing::default());
        Ok(())
    }

    #[test]
    fn infinite_ignores_bounds() {
        let mut config = WorkspaceConfig::bounded(AxisBounds {
            max_x: Some(1),
            ..AxisBounds::default()
        });
        assert!(!config.allows(Position::new(2, 0, 0)));
        config.infinite = true;
        assert!(config.allows(Position::new(2, 0, 0)));
    }

    #[test]
    fn rejects_zero_history_limit() {
        let config = WorkspaceConfig::default().with_history_limit(0);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_inverted_and_rootless_bounds() {
        let inverted = WorkspaceConfig::bounded(AxisBounds {
            min_y: Some(2),
            max_y: Some(-2),
            ..AxisBounds::default()
        });
        assert!(matches!(inverted.validate(), Err(Error::InvalidConfig(_))));

        let rootless = WorkspaceConfig::bounded(AxisBounds {
            min_z: Some(1),
            ..AxisBounds::default()
        });
        assert!(matches!(rootless.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn screen_offset_scales_by_spacing() {
        let config = WorkspaceConfig {
            spacing: GridSpacing {
                x: 1280.0,
                y: 720.0,
                z: 10.0,
            },
            ..WorkspaceConfig::default()
        };
        assert_eq!(
            config.screen_offset(Position::new(-1, 2, 3)),
            (-1280.0, 1440.0, 30.0)
        );
    }

    #[test]
    fn loads_from_json_file() -> Result<()> {
        let file = NamedTempFile::new()?;
        fs::write(
            file.path(),
            r#"{
                "infinite": false,
                "bounds": { "min_x": -1, "max_x": 1 },
                "virtualize_neighbors": true
            }"#,
        )?;
        let config = WorkspaceConfig::from_json_file(file.path())?;
        assert!(!config.infinite);
        assert!(config.virtualize_neighbors);
        assert!(config.allows(Position::new(1, 40, 0)));
        assert!(!config.allows(Position::new(2, 0, 0)));
        Ok(())
    }
}
