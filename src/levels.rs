//! Brick layouts
//!
//! A level is a JSON document listing its bricks in layout order:
//!
//! ```json
//! { "bricks": [ { "x": 20, "y": 40, "width": 40, "height": 15,
//!                 "color": 16711680, "kind": "sparkle" } ] }
//! ```
//!
//! `width`, `height`, `color` and `kind` are optional.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::{BRICK_HEIGHT, BRICK_WIDTH};
use crate::error::LevelError;
use crate::sim::geometry::Rect;
use crate::sim::state::{Brick, BrickField, BrickKind};

/// Source of brick layouts, one per level number
pub trait LevelLoader: Send {
    /// Load the layout for `level`, or `LevelError::NotFound` when there is none
    fn load(&self, level: u32) -> Result<BrickField, LevelError>;
}

/// One brick as written in a layout file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrickDescriptor {
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_brick_width")]
    pub width: f32,
    #[serde(default = "default_brick_height")]
    pub height: f32,
    #[serde(default)]
    pub color: Option<u32>,
    #[serde(default)]
    pub kind: BrickKind,
}

fn default_brick_width() -> f32 {
    BRICK_WIDTH
}

fn default_brick_height() -> f32 {
    BRICK_HEIGHT
}

/// A parsed layout file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelLayout {
    pub bricks: Vec<BrickDescriptor>,
}

impl LevelLayout {
    pub fn parse(level: u32, json: &str) -> Result<Self, LevelError> {
        serde_json::from_str(json).map_err(|source| LevelError::Parse { level, source })
    }

    /// Build a field; brick ids follow layout order starting at 1
    pub fn into_field(self) -> BrickField {
        BrickField::new(self.bricks.into_iter().zip(1u32..).map(|(d, id)| Brick {
            id,
            rect: Rect::new(d.x, d.y, d.width, d.height),
            kind: d.kind,
            color: d.color,
        }))
    }
}

const BUILTIN_LEVELS: [&str; 3] = [
    include_str!("../levels/level1.json"),
    include_str!("../levels/level2.json"),
    include_str!("../levels/level3.json"),
];

/// Layouts compiled into the binary, numbered from 1
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLevels;

impl BuiltinLevels {
    pub fn count() -> u32 {
        BUILTIN_LEVELS.len() as u32
    }
}

impl LevelLoader for BuiltinLevels {
    fn load(&self, level: u32) -> Result<BrickField, LevelError> {
        let json = level
            .checked_sub(1)
            .and_then(|i| BUILTIN_LEVELS.get(i as usize))
            .ok_or(LevelError::NotFound(level))?;
        let field = LevelLayout::parse(level, json)?.into_field();
        log::info!("Loaded built-in level {} ({} bricks)", level, field.active_count());
        Ok(field)
    }
}

/// Layouts read from `level{n}.json` files in a directory
#[derive(Debug, Clone)]
pub struct DirectoryLevels {
    dir: PathBuf,
}

impl DirectoryLevels {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, level: u32) -> PathBuf {
        self.dir.join(format!("level{level}.json"))
    }

}

impl LevelLoader for DirectoryLevels {
    fn load(&self, level: u32) -> Result<BrickField, LevelError> {
        let path = self.path_for(level);
        let json = match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LevelError::NotFound(level));
            }
            Err(source) => return Err(LevelError::Io { level, source }),
        };
        let field = LevelLayout::parse(level, &json)?.into_field();
        log::info!(
            "Loaded level {} from {} ({} bricks)",
            level,
            path.display(),
            field.active_count()
        );
        Ok(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_levels_load() {
        for level in 1..=BuiltinLevels::count() {
            let field = BuiltinLevels.load(level).unwrap();
            assert!(!field.is_done(), "level {level} is empty");
        }
    }

    #[test]
    fn test_builtin_missing_levels() {
        assert!(matches!(BuiltinLevels.load(0), Err(LevelError::NotFound(0))));
        let past = BuiltinLevels::count() + 1;
        assert!(matches!(BuiltinLevels.load(past), Err(LevelError::NotFound(n)) if n == past));
    }

    #[test]
    fn test_builtin_bricks_fit_default_field() {
        use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
        for level in 1..=BuiltinLevels::count() {
            let field = BuiltinLevels.load(level).unwrap();
            for brick in field.iter() {
                let max = brick.rect.max();
                assert!(brick.rect.pos.x >= 0.0 && max.x <= FIELD_WIDTH);
                assert!(brick.rect.pos.y > 0.0 && max.y < FIELD_HEIGHT / 2.0);
            }
        }
    }

    #[test]
    fn test_layout_defaults() {
        let layout = LevelLayout::parse(
            7,
            r#"{ "bricks": [
                { "x": 1, "y": 2 },
                { "x": 50, "y": 2, "width": 20, "kind": "heart" }
            ] }"#,
        )
        .unwrap();
        let field = layout.into_field();
        let bricks: Vec<_> = field.iter().collect();
        assert_eq!(bricks.len(), 2);
        assert_eq!(bricks[0].id, 1);
        assert_eq!(bricks[0].rect.size.x, BRICK_WIDTH);
        assert_eq!(bricks[0].rect.size.y, BRICK_HEIGHT);
        assert_eq!(bricks[0].kind, BrickKind::Standard);
        assert_eq!(bricks[1].id, 2);
        assert_eq!(bricks[1].rect.size.x, 20.0);
        assert_eq!(bricks[1].kind, BrickKind::Heart);
    }

    #[test]
    fn test_layout_parse_error() {
        let err = LevelLayout::parse(4, "{ not json").unwrap_err();
        assert!(matches!(err, LevelError::Parse { level: 4, .. }));
    }

    #[test]
    fn test_directory_levels() {
        let dir =
            std::env::temp_dir().join(format!("breakout-sim-levels-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("level1.json"),
            r#"{ "bricks": [ { "x": 10, "y": 10 } ] }"#,
        )
        .unwrap();
        std::fs::write(dir.join("level2.json"), "garbage").unwrap();

        let loader = DirectoryLevels::new(&dir);
        assert_eq!(loader.load(1).unwrap().active_count(), 1);
        assert!(matches!(loader.load(2), Err(LevelError::Parse { level: 2, .. })));
        assert!(matches!(loader.load(3), Err(LevelError::NotFound(3))));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
