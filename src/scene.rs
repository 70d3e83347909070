// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use thiserror::Error;

/// One convex body given by its boundary points in the shared world frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Body {
    pub vertices: Vec<[f32; 3]>,
    /// Added to every vertex; handy for placing the same shape twice.
    #[serde(default)]
    pub offset: [f32; 3],
}

impl Body {
    pub fn world_vertices(&self) -> Vec<Vec3> {
        let offset = Vec3::from_array(self.offset);
        self.vertices
            .iter()
            .map(|v| Vec3::from_array(*v) + offset)
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scene {
    pub a: Body,
    pub b: Body,
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scene parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Scene {
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let content = fs::read_to_string(path)?;
        Scene::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SceneError> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUBES: &str = r#"
        [a]
        vertices = [
            [-0.5, -0.5, -0.5], [-0.5, -0.5, 0.5], [-0.5, 0.5, -0.5], [-0.5, 0.5, 0.5],
            [0.5, -0.5, -0.5], [0.5, -0.5, 0.5], [0.5, 0.5, -0.5], [0.5, 0.5, 0.5],
        ]

        [b]
        offset = [0.5, 0.0, 0.0]
        vertices = [
            [-0.5, -0.5, -0.5], [-0.5, -0.5, 0.5], [-0.5, 0.5, -0.5], [-0.5, 0.5, 0.5],
            [0.5, -0.5, -0.5], [0.5, -0.5, 0.5], [0.5, 0.5, -0.5], [0.5, 0.5, 0.5],
        ]
    "#;

    #[test]
    fn parses_bodies_and_applies_offset() {
        let scene = Scene::from_toml_str(CUBES).unwrap();
        assert_eq!(scene.a.offset, [0.0; 3]);
        assert_eq!(scene.a.vertices.len(), 8);

        let b = scene.b.world_vertices();
        assert_eq!(b[0], Vec3::new(0.0, -0.5, -0.5));
        assert_eq!(b[7], Vec3::new(1.0, 0.5, 0.5));
    }

    #[test]
    fn empty_vertex_list_is_accepted_by_the_parser() {
        let scene = Scene::from_toml_str("[a]\nvertices = []\n[b]\nvertices = [[0.0, 0.0, 0.0]]\n")
            .unwrap();
        assert!(scene.a.world_vertices().is_empty());
    }

    #[test]
    fn missing_body_is_a_parse_error() {
        let result = Scene::from_toml_str("[a]\nvertices = [[0.0, 0.0, 0.0]]\n");
        assert!(matches!(result, Err(SceneError::Parse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = Scene::load(Path::new("/definitely/not/here/scene.toml"));
        assert!(matches!(result, Err(SceneError::Io(_))));
    }
}
