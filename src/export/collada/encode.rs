//! Encoders for COLLADA's whitespace-separated array text.
//!
//! Pure functions; every `<float_array>`/`<Name_array>` body, color and
//! transform value goes through here. Floats keep a decimal point (`1.0`,
//! never `1`) to match the host's string conversion, which the engine's
//! importer round-trips against.

use std::fmt::Write;

/// `[1.0, 2.5, -3.0]` → `"1.0 2.5 -3.0"`. No brackets, no commas.
pub fn floats<I>(values: I) -> String
where I: IntoIterator<Item = f64> {
    let mut out = String::new();
    for (i, x) in values.into_iter().enumerate() {
        if i > 0 { out.push(' '); }
        write!(out, "{:?}", x).unwrap();
    }
    out
}

/// Space-joined symbolic tokens, any quoting stripped.
pub fn names<'a, I>(values: I) -> String
where I: IntoIterator<Item = &'a str> {
    let mut out = String::new();
    for (i, name) in values.into_iter().enumerate() {
        if i > 0 { out.push(' '); }
        out.extend(name.chars().filter(|&c| c != '\'' && c != '"'));
    }
    out
}

/// Space-joined index list.
pub fn indices<I>(values: I) -> String
where I: IntoIterator<Item = usize> {
    let mut out = String::new();
    for (i, x) in values.into_iter().enumerate() {
        if i > 0 { out.push(' '); }
        write!(out, "{}", x).unwrap();
    }
    out
}

/// `R G B`. Alpha is never part of a color here.
pub fn color(c: [f32; 3]) -> String {
    format!("{:?} {:?} {:?}", c[0], c[1], c[2])
}

/// One float, host-style (`5.0` keeps its decimal).
pub fn float(x: f64) -> String {
    format!("{:?}", x)
}
