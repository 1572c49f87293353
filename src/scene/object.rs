use cgmath::{Euler, Rad, Vector3, vec3};
use scene::{Action, MeshId, ObjectId};
use std::fmt;

/// A node in the object hierarchy. The local transform is kept decomposed;
/// rotation is an XYZ Euler in radians, the way the host stores it.
pub struct SceneObject {
    pub name: String,
    pub kind: ObjectKind,
    pub parent: Option<ObjectId>,
    /// Stored child order; the export walk follows it as-is.
    pub children: Vec<ObjectId>,

    pub translation: Vector3<f64>,
    pub rotation: Euler<Rad<f64>>,
    pub scale: Vector3<f64>,
    /// Viewport display size for EMPTY objects. Becomes the tolerance
    /// field on segment joints.
    pub draw_size: f64,

    /// Custom key/value properties, in host iteration order.
    pub properties: Vec<(String, PropValue)>,

    pub mesh: Option<MeshId>,
    pub light: Option<Light>,
    pub action: Option<Action>,
}

impl SceneObject {
    pub fn new<S: Into<String>>(name: S, kind: ObjectKind) -> SceneObject {
        SceneObject {
            name: name.into(),
            kind,
            parent: None,
            children: vec![],
            translation: vec3(0.0, 0.0, 0.0),
            rotation: Euler::new(Rad(0.0), Rad(0.0), Rad(0.0)),
            scale: vec3(1.0, 1.0, 1.0),
            draw_size: 1.0,
            properties: vec![],
            mesh: None,
            light: None,
            action: None,
        }
    }

    pub fn prop(&self, key: &str) -> Option<&PropValue> {
        self.properties.iter().find(|p| p.0 == key).map(|p| &p.1)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ObjectKind {
    Mesh,
    Light,
    Empty,
    /// Anything else the host has (cameras, curves, ...); exported as a
    /// plain node.
    Other,
}

impl ObjectKind {
    pub fn from_str(s: &str) -> ObjectKind {
        match s {
            "MESH" => ObjectKind::Mesh,
            "LIGHT" | "LAMP" => ObjectKind::Light,
            "EMPTY" => ObjectKind::Empty,
            _ => ObjectKind::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            ObjectKind::Mesh => "MESH",
            ObjectKind::Light => "LIGHT",
            ObjectKind::Empty => "EMPTY",
            ObjectKind::Other => "OTHER",
        }
    }
}

/// Lamp parameters, read off LIGHT objects by the joint-name conventions.
pub struct Light {
    pub color: [f32; 3],
    pub energy: f64,
    pub distance: f64,
}

/// A custom-property value. `Display` matches the host's own string
/// conversion: floats always keep a decimal point (`5.0`, never `5`),
/// which the engine's name parser depends on.
#[derive(Clone, Debug, PartialEq)]
pub enum PropValue {
    Float(f64),
    Str(String),
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PropValue::Float(x) => write!(f, "{:?}", x),
            PropValue::Str(ref s) => write!(f, "{}", s),
        }
    }
}

#[test]
fn prop_value_display() {
    assert_eq!(PropValue::Float(5.0).to_string(), "5.0");
    assert_eq!(PropValue::Float(-0.25).to_string(), "-0.25");
    assert_eq!(PropValue::Str("Blink".to_string()).to_string(), "Blink");
}
