//! Joint-name conventions: per-node metadata the engine parses back out of
//! node identifiers.
//!
//! Several node flavors (navigation lights, background lights, dock paths,
//! movement segments, material-parameter joints) carry their parameters as
//! `_Key[value]` fragments appended to the node name. Matching works on
//! typed data; the bracket string is only produced at the very end, when
//! the winning convention is turned into the identifier.

use errors::Result;
use export::collada::encode;
use scene::{Light, ObjectKind, PropValue, SceneObject};
use std::fmt::Write;

/// One recognized convention, with the fields it encodes.
#[derive(Debug)]
pub enum Convention {
    NavLight {
        kind: PropValue,
        size: f64,
        phase: PropValue,
        freq: PropValue,
        color: [f32; 3],
        distance: f64,
        flags: Option<PropValue>,
    },
    BackgroundLight {
        kind: PropValue,
        color: [f32; 3],
        atten: PropValue,
    },
    Dock {
        family: PropValue,
        link: Option<PropValue>,
        flags: Option<PropValue>,
        mad: Option<PropValue>,
    },
    Segment {
        tolerance: i64,
        speed: PropValue,
        flags: Option<PropValue>,
    },
    MatParam {
        /// Values of the `data*` properties, in bag order. `None` when the
        /// joint has no parameters beyond its one bookkeeping entry.
        data: Option<Vec<PropValue>>,
    },
}

/// Identifier rewrite for one node, if any convention matches. They are
/// checked in fixed order and the last match wins, so an overlap resolves
/// to the later rule.
pub fn synthesize(obj: &SceneObject) -> Result<Option<String>> {
    let mut conventions = matching(obj)?;
    Ok(conventions.pop().map(|c| c.identifier(&obj.name)))
}

/// Every convention matching `obj`, in precedence order.
pub fn matching(obj: &SceneObject) -> Result<Vec<Convention>> {
    let mut found = vec![];

    if obj.kind == ObjectKind::Light {
        if let Some(ref light) = obj.light {
            // "Phase" marks a NavLight, "Atten" a BackgroundLight; checked
            // in that order so a bag with both reads as a NavLight
            if let Some(phase) = obj.prop("Phase") {
                debug!("found NavLight {}", obj.name);
                found.push(nav_light(obj, light, phase)?);
            } else if let Some(atten) = obj.prop("Atten") {
                debug!("found BackgroundLight {}", obj.name);
                found.push(background_light(obj, light, atten)?);
            }
        }
    }

    if obj.name.contains("DOCK[") {
        debug!("found dock path {}", obj.name);
        if let Some(family) = obj.prop("Fam") {
            found.push(Convention::Dock {
                family: family.clone(),
                link: obj.prop("Link").cloned(),
                flags: obj.prop("Flags").cloned(),
                mad: obj.prop("MAD").cloned(),
            });
        }
    }

    if obj.name.contains("SEG[") {
        if let Some(speed) = obj.prop("Speed") {
            debug!("found segment {}", obj.name);
            found.push(Convention::Segment {
                tolerance: obj.draw_size as i64,
                speed: speed.clone(),
                flags: obj.prop("Flags").cloned(),
            });
        }
    }

    if obj.name.contains("MAT[") && obj.name.contains("PARAM[") {
        debug!("found material-parameter joint {}", obj.name);
        let data = if obj.properties.len() > 1 {
            Some(obj.properties.iter()
                .filter(|&&(ref key, _)| key.starts_with("data"))
                .map(|&(_, ref value)| value.clone())
                .collect())
        } else {
            None
        };
        found.push(Convention::MatParam { data });
    }

    Ok(found)
}

fn nav_light(obj: &SceneObject, light: &Light, phase: &PropValue) -> Result<Convention> {
    let kind = match obj.prop("Type") {
        Some(v) => v.clone(),
        None => bail!("navigation light {} has a Phase but no Type", obj.name),
    };
    let freq = match obj.prop("Freq") {
        Some(v) => v.clone(),
        None => bail!("navigation light {} has a Phase but no Freq", obj.name),
    };
    Ok(Convention::NavLight {
        kind,
        size: light.energy,
        phase: phase.clone(),
        freq,
        color: light.color,
        distance: light.distance,
        flags: obj.prop("Flags").cloned(),
    })
}

fn background_light(obj: &SceneObject, light: &Light, atten: &PropValue) -> Result<Convention> {
    let kind = match obj.prop("Type") {
        Some(v) => v.clone(),
        None => bail!("background light {} has an Atten but no Type", obj.name),
    };
    Ok(Convention::BackgroundLight {
        kind,
        color: light.color,
        atten: atten.clone(),
    })
}

impl Convention {
    /// The full identifier for a node named `name` under this convention.
    pub fn identifier(&self, name: &str) -> String {
        match *self {
            Convention::NavLight {
                ref kind, size, ref phase, ref freq, color, distance, ref flags,
            } => {
                let mut id = format!(
                    "{}_Type[{}]_Sz[{}]_Ph[{}]_Fr[{}]_Col[{:?},{:?},{:?}]_Dist[{}]",
                    name, kind, encode::float(size), phase, freq,
                    color[0], color[1], color[2], encode::float(distance),
                );
                if let Some(ref flags) = *flags {
                    write!(id, "_Flags[{}]", flags).unwrap();
                }
                id
            }
            Convention::BackgroundLight { ref kind, color, ref atten } => {
                // the host lamp has no specular to read, so it is pinned
                format!(
                    "{}_Type[{}]_Diff[{:?},{:?},{:?}]_Spec[0,0,0]_Atten[{}]",
                    name, kind, color[0], color[1], color[2], atten,
                )
            }
            Convention::Dock { ref family, ref link, ref flags, ref mad } => {
                let mut id = format!("{}_Fam[{}]", name, family);
                if let Some(ref link) = *link {
                    write!(id, "_Link[{}]", link).unwrap();
                }
                if let Some(ref flags) = *flags {
                    write!(id, "_Flags[{}]", flags).unwrap();
                }
                if let Some(ref mad) = *mad {
                    write!(id, "_MAD[{}]", mad).unwrap();
                }
                id
            }
            Convention::Segment { tolerance, ref speed, ref flags } => {
                let base = base_name(name);
                let mut id = format!("{}_Tol[{}]_Spd[{}]", base, tolerance, speed);
                if let Some(ref flags) = *flags {
                    write!(id, "_Flags[{}]", flags).unwrap();
                }
                id
            }
            Convention::MatParam { ref data } => {
                let base = base_name(name);
                match *data {
                    None => base.to_string(),
                    Some(ref values) => {
                        let mut id = format!("{}_Data[", base);
                        for (i, value) in values.iter().enumerate() {
                            if i > 0 { id.push(','); }
                            write!(id, "{}", value).unwrap();
                        }
                        id.push(']');
                        id
                    }
                }
            }
        }
    }
}

/// Everything before the first `.`, shedding duplicate-name suffixes like
/// `.001`.
fn base_name(name: &str) -> &str {
    name.splitn(2, '.').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use scene::{Light, ObjectKind, PropValue, SceneObject};
    use super::synthesize;

    fn float(x: f64) -> PropValue { PropValue::Float(x) }
    fn s(v: &str) -> PropValue { PropValue::Str(v.to_string()) }

    fn id(obj: &SceneObject) -> String {
        synthesize(obj).unwrap().unwrap()
    }

    #[test]
    fn nav_light() {
        let mut obj = SceneObject::new("ObjName", ObjectKind::Light);
        obj.light = Some(Light { color: [1.0, 0.0, 0.0], energy: 5.0, distance: 10.0 });
        obj.properties = vec![
            ("Phase".to_string(), float(1.0)),
            ("Type".to_string(), s("Blink")),
            ("Freq".to_string(), float(2.0)),
        ];
        assert_eq!(id(&obj),
            "ObjName_Type[Blink]_Sz[5.0]_Ph[1.0]_Fr[2.0]_Col[1.0,0.0,0.0]_Dist[10.0]");

        obj.properties.push(("Flags".to_string(), s("16")));
        assert_eq!(id(&obj),
            "ObjName_Type[Blink]_Sz[5.0]_Ph[1.0]_Fr[2.0]_Col[1.0,0.0,0.0]_Dist[10.0]_Flags[16]");
    }

    #[test]
    fn nav_light_needs_type_and_freq() {
        let mut obj = SceneObject::new("Lamp", ObjectKind::Light);
        obj.light = Some(Light { color: [1.0, 1.0, 1.0], energy: 1.0, distance: 1.0 });
        obj.properties = vec![("Phase".to_string(), float(0.0))];
        assert!(synthesize(&obj).is_err());
    }

    #[test]
    fn background_light() {
        let mut obj = SceneObject::new("Sun", ObjectKind::Light);
        obj.light = Some(Light { color: [0.5, 0.5, 1.0], energy: 3.0, distance: 0.0 });
        obj.properties = vec![
            ("Atten".to_string(), s("0.1")),
            ("Type".to_string(), s("Directional")),
        ];
        assert_eq!(id(&obj),
            "Sun_Type[Directional]_Diff[0.5,0.5,1.0]_Spec[0,0,0]_Atten[0.1]");
    }

    #[test]
    fn phase_beats_atten() {
        let mut obj = SceneObject::new("Both", ObjectKind::Light);
        obj.light = Some(Light { color: [1.0, 1.0, 1.0], energy: 2.0, distance: 4.0 });
        obj.properties = vec![
            ("Atten".to_string(), s("0.5")),
            ("Phase".to_string(), float(0.25)),
            ("Type".to_string(), s("Blink")),
            ("Freq".to_string(), float(1.0)),
        ];
        assert!(id(&obj).contains("_Ph[0.25]"));
        assert!(!id(&obj).contains("_Atten["));
    }

    #[test]
    fn dock_fragments_in_fixed_order() {
        let mut obj = SceneObject::new("Ship_DOCK[port]", ObjectKind::Empty);
        obj.properties = vec![
            ("MAD".to_string(), s("5")),
            ("Fam".to_string(), s("Fighter")),
        ];
        assert_eq!(id(&obj), "Ship_DOCK[port]_Fam[Fighter]_MAD[5]");

        obj.properties.push(("Link".to_string(), s("dock2")));
        obj.properties.push(("Flags".to_string(), s("1")));
        assert_eq!(id(&obj),
            "Ship_DOCK[port]_Fam[Fighter]_Link[dock2]_Flags[1]_MAD[5]");
    }

    #[test]
    fn dock_without_family_is_untouched() {
        let mut obj = SceneObject::new("Ship_DOCK[port]", ObjectKind::Empty);
        obj.properties = vec![("Link".to_string(), s("dock2"))];
        assert_eq!(synthesize(&obj).unwrap(), None);
    }

    #[test]
    fn segment_truncates_and_rounds() {
        let mut obj = SceneObject::new("SEG[path].001", ObjectKind::Empty);
        obj.draw_size = 2.7;
        obj.properties = vec![("Speed".to_string(), float(3.5))];
        assert_eq!(id(&obj), "SEG[path]_Tol[2]_Spd[3.5]");

        obj.properties.push(("Flags".to_string(), s("2")));
        assert_eq!(id(&obj), "SEG[path]_Tol[2]_Spd[3.5]_Flags[2]");
    }

    #[test]
    fn mat_param_collects_data_props() {
        let mut obj = SceneObject::new("MAT[hull]_PARAM[glow]_Type[RGBA].001", ObjectKind::Empty);
        obj.properties = vec![
            ("data1".to_string(), float(1.0)),
            ("other".to_string(), s("x")),
            ("data2".to_string(), float(0.5)),
        ];
        assert_eq!(id(&obj), "MAT[hull]_PARAM[glow]_Type[RGBA]_Data[1.0,0.5]");
    }

    #[test]
    fn mat_param_with_one_prop_only_truncates() {
        let mut obj = SceneObject::new("MAT[hull]_PARAM[glow].002", ObjectKind::Empty);
        obj.properties = vec![("data1".to_string(), float(1.0))];
        assert_eq!(id(&obj), "MAT[hull]_PARAM[glow]");
    }

    #[test]
    fn later_convention_wins_on_overlap() {
        // a name that is both a dock path and a segment: the segment rule
        // runs later and overwrites
        let mut obj = SceneObject::new("DOCK[a]_SEG[b]", ObjectKind::Empty);
        obj.draw_size = 1.0;
        obj.properties = vec![
            ("Fam".to_string(), s("Fighter")),
            ("Speed".to_string(), float(2.0)),
        ];
        assert_eq!(id(&obj), "DOCK[a]_SEG[b]_Tol[1]_Spd[2.0]");
    }
}
