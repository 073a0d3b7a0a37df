//! Scene file loading and saving.
//!
//! A scene is a RON document holding one vertex list plus the index lists
//! for each topology, ready to bind straight into a renderer.

use std::fs;
use std::path::Path;

use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};

use crate::geometry::Vertex;

#[derive(Debug)]
pub enum SceneError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
}

impl From<std::io::Error> for SceneError {
    fn from(e: std::io::Error) -> Self {
        SceneError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for SceneError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneError::ParseError(e)
    }
}

impl From<ron::Error> for SceneError {
    fn from(e: ron::Error) -> Self {
        SceneError::SerializeError(e)
    }
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::IoError(e) => write!(f, "IO error: {}", e),
            SceneError::ParseError(e) => write!(f, "Parse error: {}", e),
            SceneError::SerializeError(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for SceneError {}

/// A drawable scene. Both index lists refer into the same vertex list and
/// either may be omitted from the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    pub vertices: Vec<Vertex>,
    #[serde(default)]
    pub line_indices: Vec<usize>,
    #[serde(default)]
    pub triangle_indices: Vec<usize>,
}

/// Load a scene from a RON file
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<Scene, SceneError> {
    let contents = fs::read_to_string(path)?;
    let scene = ron::from_str(&contents)?;
    Ok(scene)
}

/// Load a scene from a string (for embedded scenes or testing)
pub fn load_scene_from_str(contents: &str) -> Result<Scene, SceneError> {
    let scene = ron::from_str(contents)?;
    Ok(scene)
}

/// Save a scene to a RON file
pub fn save_scene<P: AsRef<Path>>(scene: &Scene, path: P) -> Result<(), SceneError> {
    let pretty = PrettyConfig::new().depth_limit(3).indentor("  ".to_string());
    let contents = ron::ser::to_string_pretty(scene, pretty)?;
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra_glm::Vec4;

    const SAMPLE: &str = r#"(
    vertices: [
        (position: (0.0, 0.0, 0.0, 1.0), color: (1.0, 0.0, 0.0, 1.0)),
        (position: (1.0, 0.0, 0.0, 1.0), color: (0.0, 1.0, 0.0, 1.0)),
    ],
    line_indices: [0, 1],
)"#;

    #[test]
    fn test_load_scene_from_str() {
        let scene = load_scene_from_str(SAMPLE).unwrap();
        assert_eq!(scene.vertices.len(), 2);
        assert_eq!(scene.line_indices, vec![0, 1]);
        assert!(scene.triangle_indices.is_empty());
        assert_eq!(scene.vertices[0].color, Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(scene.vertices[1].position, Vec4::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_embedded_demo_scene_parses() {
        let scene = load_scene_from_str(include_str!("../assets/scenes/demo.ron")).unwrap();
        assert_eq!(scene.vertices.len(), 4);
        assert_eq!(scene.line_indices.len() % 2, 0);
        assert_eq!(scene.triangle_indices.len() % 3, 0);
        assert!(scene
            .line_indices
            .iter()
            .chain(&scene.triangle_indices)
            .all(|&i| i < scene.vertices.len()));
    }

    #[test]
    fn test_save_and_reload_scene() {
        let scene = Scene {
            vertices: vec![
                Vertex::new(Vec4::new(0.0, 0.0, 0.0, 1.0), Vec4::new(1.0, 1.0, 1.0, 1.0)),
                Vertex::new(Vec4::new(0.5, 1.0, 0.0, 1.0), Vec4::new(0.0, 0.5, 1.0, 1.0)),
            ],
            line_indices: vec![0, 1],
            triangle_indices: vec![],
        };

        let path = std::env::temp_dir().join("scanline_scene_roundtrip.ron");
        save_scene(&scene, &path).unwrap();
        let reloaded = load_scene(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(reloaded.vertices.len(), scene.vertices.len());
        assert_eq!(reloaded.vertices[1].position, scene.vertices[1].position);
        assert_eq!(reloaded.vertices[1].color, scene.vertices[1].color);
        assert_eq!(reloaded.line_indices, scene.line_indices);
        assert!(reloaded.triangle_indices.is_empty());
    }

    #[test]
    fn test_malformed_scene_is_a_parse_error() {
        let result = load_scene_from_str("(vertices: oops)");
        assert!(matches!(result, Err(SceneError::ParseError(_))));
    }
}
