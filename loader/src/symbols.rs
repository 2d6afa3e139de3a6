use std::collections::HashMap;

const FRAME_MARKER: &str = "wasm-function[";

/// Function index to name table read from a `<index>:<name>` symbol file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolMap {
    names: HashMap<u32, String>,
}

impl SymbolMap {
    /// Parses one `<index>:<name>` pair per line. Lines that do not fit the
    /// format are skipped.
    pub fn parse(text: &str) -> Self {
        let names = text
            .lines()
            .filter_map(|line| {
                let (index, name) = line.split_once(':')?;
                let index = index.trim().parse().ok()?;
                let name = name.trim();
                (!name.is_empty()).then(|| (index, name.to_string()))
            })
            .collect();
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, index: u32) -> Option<&str> {
        self.names.get(&index).map(String::as_str)
    }

    /// Replaces every `wasm-function[<index>]` in `frame` whose index is
    /// known. Unknown frames come back unchanged.
    pub fn translate_frame(&self, frame: &str) -> String {
        let mut out = String::with_capacity(frame.len());
        let mut rest = frame;

        while let Some(start) = rest.find(FRAME_MARKER) {
            let after_marker = &rest[start + FRAME_MARKER.len()..];
            let Some(end) = after_marker.find(']') else {
                break;
            };
            let name = after_marker[..end]
                .parse()
                .ok()
                .and_then(|index| self.name(index));

            out.push_str(&rest[..start]);
            match name {
                Some(name) => out.push_str(name),
                None => out.push_str(&rest[start..start + FRAME_MARKER.len() + end + 1]),
            }
            rest = &after_marker[end + 1..];
        }

        out.push_str(rest);
        out
    }

    pub fn translate_stack(&self, stack: &str) -> String {
        stack
            .lines()
            .map(|frame| self.translate_frame(frame))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
