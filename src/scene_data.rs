use glam::Vec3;
use serde::{Deserialize, Serialize};

fn default_scaling() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraData {
    pub position: [f32; 3],
    #[serde(default)]
    pub target: [f32; 3],
    #[serde(default)]
    pub fov: f32,
    #[serde(default)]
    pub near: f32,
    #[serde(default)]
    pub far: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialData {
    pub diffuse_color: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectData {
    pub name: String,
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "default_scaling")]
    pub scaling: [f32; 3],
    #[serde(default = "default_visible")]
    pub is_visible: bool,
    #[serde(default)]
    pub material: Option<MaterialData>,
}

impl ObjectData {
    /// Meshes named like a box or cube become animated cubes
    pub fn is_cube(&self) -> bool {
        let name = self.name.to_ascii_lowercase();
        name.contains("box") || name.contains("cube")
    }

    /// Uniform size taken from the x scale; non-positive scales fall back to 1
    pub fn size(&self) -> f32 {
        if self.scaling[0] > 0.0 {
            self.scaling[0]
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightData {
    pub name: String,
    pub light_type: String,
    #[serde(default)]
    pub position: Option<[f32; 3]>,
    #[serde(default)]
    pub direction: Option<[f32; 3]>,
    pub intensity: f32,
    pub diffuse: [f32; 3],
}

/// Scene snapshot sent by the host shell
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneData {
    #[serde(default)]
    pub camera: Option<CameraData>,
    #[serde(default)]
    pub objects: Vec<ObjectData>,
    #[serde(default)]
    pub lights: Vec<LightData>,
    #[serde(default)]
    pub timestamp: f64,
}

impl SceneData {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Position and size of every visible cube-like object
    pub fn cubes(&self) -> impl Iterator<Item = (Vec3, f32)> + '_ {
        self.objects
            .iter()
            .filter(|obj| obj.is_visible && obj.is_cube())
            .map(|obj| (Vec3::from_array(obj.position), obj.size()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"{
        "camera": { "position": [0.0, 3.0, 8.0], "target": [0.0, 0.0, 0.0], "fov": 0.8, "near": 0.1, "far": 100.0 },
        "objects": [
            { "name": "Box001", "position": [1.0, 0.0, 0.0], "scaling": [2.0, 2.0, 2.0] },
            { "name": "sphere", "position": [0.0, 1.0, 0.0] },
            { "name": "hidden_cube", "position": [0.0, 0.0, 0.0], "is_visible": false },
            { "name": "cube", "position": [-1.0, 0.5, 2.0] }
        ],
        "lights": [
            { "name": "sun", "light_type": "directional", "direction": [0.0, -1.0, 0.0], "intensity": 1.0, "diffuse": [1.0, 1.0, 1.0] }
        ],
        "timestamp": 12.5
    }"#;

    #[test]
    fn parses_full_scene() {
        let scene = SceneData::from_json(SCENE).unwrap();
        assert_eq!(scene.objects.len(), 4);
        assert_eq!(scene.lights.len(), 1);
        assert_eq!(scene.camera.as_ref().map(|c| c.position), Some([0.0, 3.0, 8.0]));
    }

    #[test]
    fn only_visible_cubes_are_selected() {
        let scene = SceneData::from_json(SCENE).unwrap();
        let cubes: Vec<_> = scene.cubes().collect();
        assert_eq!(cubes, vec![
            (Vec3::new(1.0, 0.0, 0.0), 2.0),
            (Vec3::new(-1.0, 0.5, 2.0), 1.0),
        ]);
    }

    #[test]
    fn empty_object_is_empty_scene() {
        let scene = SceneData::from_json("{}").unwrap();
        assert_eq!(scene, SceneData::default());
        assert_eq!(scene.cubes().count(), 0);
    }
}
