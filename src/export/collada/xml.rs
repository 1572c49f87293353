//! Element-tree builder for the output document.
//!
//! Writers build the whole tree first; `serialize` then lays whitespace
//! out in one breadth-first pass over the finished tree and prints
//! everything. Two-space indent, children one level deeper than their
//! parent, and the last child's trailing whitespace lines the parent's
//! close tag up.

use std::collections::VecDeque;

pub type ElemId = usize;

static INDENT: &'static str = "  ";

pub struct Document {
    elems: Vec<Elem>,
}

struct Elem {
    tag: &'static str,
    /// Attributes in insertion order; the order is kept in the output.
    attrs: Vec<(&'static str, String)>,
    text: Option<String>,
    children: Vec<ElemId>,
}

impl Elem {
    fn new(tag: &'static str) -> Elem {
        Elem { tag, attrs: vec![], text: None, children: vec![] }
    }
}

impl Document {
    pub fn new(root_tag: &'static str) -> Document {
        Document { elems: vec![Elem::new(root_tag)] }
    }

    pub fn root(&self) -> ElemId {
        0
    }

    pub fn add(&mut self, parent: ElemId, tag: &'static str) -> ElemId {
        let id = self.elems.len();
        self.elems.push(Elem::new(tag));
        self.elems[parent].children.push(id);
        id
    }

    /// Sets (or overwrites) an attribute. New attributes append; an
    /// overwrite keeps the attribute's original position.
    pub fn set_attr<S: Into<String>>(&mut self, id: ElemId, name: &'static str, value: S) {
        let value = value.into();
        let attrs = &mut self.elems[id].attrs;
        match attrs.iter_mut().find(|a| a.0 == name) {
            Some(a) => a.1 = value,
            None => attrs.push((name, value)),
        }
    }

    pub fn attr(&self, id: ElemId, name: &str) -> Option<&str> {
        self.elems[id].attrs.iter()
            .find(|a| a.0 == name)
            .map(|a| &a.1[..])
    }

    pub fn set_text<S: Into<String>>(&mut self, id: ElemId, text: S) {
        self.elems[id].text = Some(text.into());
    }

    pub fn serialize(&self) -> String {
        let (head_ws, tail_ws) = self.assign_whitespace();
        let mut out = String::with_capacity(64 * 1024);
        out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        self.print(self.root(), &head_ws, &tail_ws, &mut out);
        out.push_str(&tail_ws[self.root()]);
        out
    }

    /// Breadth-first whitespace assignment over the finished tree. An
    /// element with children gets head whitespace indenting its first
    /// child; every element gets tail whitespace indenting whatever
    /// follows its close tag.
    fn assign_whitespace(&self) -> (Vec<Option<String>>, Vec<String>) {
        fn ws(level: i32) -> String {
            let mut s = String::from("\n");
            for _ in 0..level.max(0) {
                s.push_str(INDENT);
            }
            s
        }

        let mut head = vec![None; self.elems.len()];
        let mut tail = vec![String::new(); self.elems.len()];

        let mut queue: VecDeque<(i32, ElemId)> = VecDeque::new();
        queue.push_back((0, self.root()));
        while let Some((level, id)) = queue.pop_front() {
            let elem = &self.elems[id];
            if !elem.children.is_empty() {
                head[id] = Some(ws(level + 1));
            }
            // the tail must come from the queue as it is *before* the
            // children are put in front
            tail[id] = match queue.front() {
                Some(&(next_level, _)) => ws(next_level),
                None => ws(level - 1),
            };
            for &child in elem.children.iter().rev() {
                queue.push_front((level + 1, child));
            }
        }

        (head, tail)
    }

    fn print(&self, id: ElemId, head_ws: &[Option<String>], tail_ws: &[String], out: &mut String) {
        let elem = &self.elems[id];
        out.push('<');
        out.push_str(elem.tag);
        for &(name, ref value) in &elem.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            escape(value, out);
            out.push('"');
        }
        if elem.text.is_none() && elem.children.is_empty() {
            out.push_str(" />");
            return;
        }
        out.push('>');
        if let Some(ref text) = elem.text {
            escape(text, out);
        }
        if let Some(ref ws) = head_ws[id] {
            out.push_str(ws);
        }
        for &child in &elem.children {
            self.print(child, head_ws, tail_ws, out);
            out.push_str(&tail_ws[child]);
        }
        out.push_str("</");
        out.push_str(elem.tag);
        out.push('>');
    }
}

fn escape(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
