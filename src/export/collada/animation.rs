//! Keyframe animation: five sources, a sampler and a channel per curve.

use cgmath::{Deg, Rad};
use export::collada::encode;
use export::collada::xml::{Document, ElemId};
use scene::{Curve, DataPath, Scene, SceneObject};

/// Writes the animation elements for one object: a header element named
/// after the object, then one `<animation>` per curve as siblings under
/// the library.
pub fn write_animation(
    doc: &mut Document,
    lib_animations: ElemId,
    scene: &Scene,
    obj: &SceneObject,
) {
    let header = doc.add(lib_animations, "animation");
    doc.set_attr(header, "id", format!("{}-anim", obj.name));
    doc.set_attr(header, "name", obj.name.clone());

    let action = match obj.action {
        Some(ref action) => action,
        None => return,
    };

    for curve in &action.curves {
        debug!("curve {} [{}]", curve.data_path.as_str(), curve.array_index);
        write_curve(doc, lib_animations, scene, &obj.name, curve);
    }
}

/// `Obj-translate.X`, `Obj-rotateY.ANGLE`, `Obj-scale.Z`: the base that
/// every id in the curve's block hangs off.
fn base_id(object_name: &str, curve: &Curve) -> String {
    match curve.data_path {
        DataPath::Location => {
            let axis = match curve.array_index { 0 => ".X", 1 => ".Y", 2 => ".Z", _ => "" };
            format!("{}-translate{}", object_name, axis)
        }
        DataPath::RotationEuler => {
            let axis = match curve.array_index { 0 => "X.ANGLE", 1 => "Y.ANGLE", 2 => "Z.ANGLE", _ => "" };
            format!("{}-rotate{}", object_name, axis)
        }
        DataPath::Scale => {
            let axis = match curve.array_index { 0 => ".X", 1 => ".Y", 2 => ".Z", _ => "" };
            format!("{}-scale{}", object_name, axis)
        }
    }
}

fn write_curve(
    doc: &mut Document,
    lib_animations: ElemId,
    scene: &Scene,
    object_name: &str,
    curve: &Curve,
) {
    let this_curve = doc.add(lib_animations, "animation");
    let base = base_id(object_name, curve);

    let num_keys = curve.keyframes.len();
    let mut keys = Vec::with_capacity(num_keys);
    let mut values = Vec::with_capacity(num_keys);
    let mut interp = Vec::with_capacity(num_keys);
    let mut intan = Vec::with_capacity(2 * num_keys);
    let mut outtan = Vec::with_capacity(2 * num_keys);
    for k in &curve.keyframes {
        // frames to seconds
        keys.push(k.frame / scene.frame_rate);
        values.push(match curve.data_path {
            DataPath::RotationEuler => Deg::from(Rad(k.value)).0,
            DataPath::Location | DataPath::Scale => k.value,
        });
        interp.push(k.interpolation.name());
        // handles go out raw, both axes
        intan.extend_from_slice(&k.handle_left);
        outtan.extend_from_slice(&k.handle_right);
    }

    let sampler = doc.add(this_curve, "sampler");
    doc.set_attr(sampler, "id", base.clone());

    curve_source(doc, this_curve, sampler, &base, "input", "INPUT",
        Payload::Floats(&keys), keys.len(), 1, 1);
    curve_source(doc, this_curve, sampler, &base, "output", "OUTPUT",
        Payload::Floats(&values), values.len(), 1, 1);
    curve_source(doc, this_curve, sampler, &base, "interpolation", "INTERPOLATION",
        Payload::Names(&interp), interp.len(), 1, 1);
    curve_source(doc, this_curve, sampler, &base, "intan", "IN_TANGENT",
        Payload::Floats(&intan), intan.len() / 2, 2, 2);
    curve_source(doc, this_curve, sampler, &base, "outtan", "OUT_TANGENT",
        Payload::Floats(&outtan), outtan.len() / 2, 2, 2);

    // The channel target is the first two hyphen-separated pieces of the
    // base id joined with a slash. Hyphens in the object name shift the
    // split, so this derivation has to stay exactly as-is.
    let mut segments = base.splitn(3, '-');
    let target = format!("{}/{}",
        segments.next().unwrap_or(""),
        segments.next().unwrap_or(""),
    );
    let channel = doc.add(this_curve, "channel");
    doc.set_attr(channel, "source", format!("#{}", base));
    doc.set_attr(channel, "target", target);
}

enum Payload<'a> {
    Floats(&'a [f64]),
    Names(&'a [&'static str]),
}

/// One of the five sources: the source block under the curve's
/// `<animation>` plus its `<input>` under the sampler.
fn curve_source(
    doc: &mut Document,
    curve_elem: ElemId,
    sampler: ElemId,
    base: &str,
    suffix: &str,
    semantic: &'static str,
    payload: Payload,
    accessor_count: usize,
    stride: usize,
    num_params: usize,
) {
    let source_id = format!("{}-{}", base, suffix);
    let source = doc.add(curve_elem, "source");
    doc.set_attr(source, "id", source_id.clone());
    let input = doc.add(sampler, "input");
    doc.set_attr(input, "semantic", semantic);
    doc.set_attr(input, "source", format!("#{}", source_id));

    let array_id = format!("{}-array", source_id);
    let (array, token_count, param_type) = match payload {
        Payload::Floats(values) => {
            let array = doc.add(source, "float_array");
            doc.set_text(array, encode::floats(values.iter().cloned()));
            (array, values.len(), "float")
        }
        Payload::Names(names) => {
            let array = doc.add(source, "Name_array");
            doc.set_text(array, encode::names(names.iter().cloned()));
            (array, names.len(), "name")
        }
    };
    doc.set_attr(array, "id", array_id.clone());
    doc.set_attr(array, "count", format!("{}", token_count));

    let technique = doc.add(source, "technique_common");
    let accessor = doc.add(technique, "accessor");
    doc.set_attr(accessor, "source", format!("#{}", array_id));
    doc.set_attr(accessor, "count", format!("{}", accessor_count));
    doc.set_attr(accessor, "stride", format!("{}", stride));
    for _ in 0..num_params {
        let param = doc.add(accessor, "param");
        doc.set_attr(param, "type", param_type);
    }
}
