//! Keyframe animation data: zero or one action per object, one curve per
//! animated transform component.

/// The set of curves animating one object.
pub struct Action {
    pub curves: Vec<Curve>,
}

/// One animated component, e.g. X of `location`.
pub struct Curve {
    pub data_path: DataPath,
    /// Component index: 0 = X, 1 = Y, 2 = Z.
    pub array_index: usize,
    pub keyframes: Vec<Keyframe>,
}

/// Which transform property a curve animates.
///
/// A closed set: a curve on anything else is unrepresentable, so the
/// export never sees an unmappable data path.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum DataPath {
    Location,
    RotationEuler,
    Scale,
}

impl DataPath {
    pub fn from_str(s: &str) -> Option<DataPath> {
        match s {
            "location" => Some(DataPath::Location),
            "rotation_euler" => Some(DataPath::RotationEuler),
            "scale" => Some(DataPath::Scale),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            DataPath::Location => "location",
            DataPath::RotationEuler => "rotation_euler",
            DataPath::Scale => "scale",
        }
    }
}

pub struct Keyframe {
    /// Key time, in frames.
    pub frame: f64,
    /// Raw host value: radians for rotation curves.
    pub value: f64,
    pub interpolation: Interpolation,
    /// Bezier handles as (frame, value) pairs, raw host values.
    pub handle_left: [f64; 2],
    pub handle_right: [f64; 2],
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Constant,
    Linear,
    Bezier,
}

impl Interpolation {
    pub fn from_str(s: &str) -> Option<Interpolation> {
        match s {
            "CONSTANT" => Some(Interpolation::Constant),
            "LINEAR" => Some(Interpolation::Linear),
            "BEZIER" => Some(Interpolation::Bezier),
            _ => None,
        }
    }

    /// The token written into the `Name_array`.
    pub fn name(&self) -> &'static str {
        match *self {
            Interpolation::Constant => "CONSTANT",
            Interpolation::Linear => "LINEAR",
            Interpolation::Bezier => "BEZIER",
        }
    }
}
