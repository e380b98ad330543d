//! Output buffers and final assembly (spec §3, §4.4, components A/B).
//!
//! Two append-only buffers: the pending `main` body, and the body of
//! whichever function is currently active. At finalization the runtime
//! blob, function prototypes, function bodies, and `main` are concatenated
//! in a fixed order; buffers are never interleaved.

pub mod runtime;

/// A lower bound (spec §5, §9): the distilled source grew this freely, so
/// this is advertised capacity, not a hard ceiling carved in stone.
const MIN_CAPACITY: usize = 512;

#[derive(Debug, Clone, Default)]
pub struct OutputBuffers {
    main_body: String,
    /// Insertion-ordered so the emitted prototypes/bodies are deterministic.
    functions: Vec<(String, String)>,
    active_function: Option<usize>,
}

impl OutputBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_function(&self) -> bool {
        self.active_function.is_some()
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.iter().any(|(n, _)| n == name)
    }

    /// Starts a new function body and redirects subsequent `emit` calls to
    /// it. Returns `false` if a function with this name already exists or
    /// the function-count capacity has been exceeded.
    pub fn begin_function(&mut self, name: &str) -> bool {
        if self.has_function(name) || self.functions.len() >= MIN_CAPACITY {
            return false;
        }
        self.functions.push((name.to_owned(), String::new()));
        self.active_function = Some(self.functions.len() - 1);
        true
    }

    /// Closes the active function and redirects `emit` back to `main`.
    pub fn end_function(&mut self) {
        self.active_function = None;
    }

    /// Appends a line of C to whichever buffer is currently active.
    pub fn emit(&mut self, code: &str) {
        let target = match self.active_function {
            Some(idx) => &mut self.functions[idx].1,
            None => &mut self.main_body,
        };
        target.push_str(code);
        target.push('\n');
    }

    pub fn finalize(self, runtime_blob: &str) -> String {
        let mut out = String::new();
        out.push_str(runtime_blob);
        out.push('\n');

        for (name, _) in &self.functions {
            out.push_str(&format!("void {name}(void);\n"));
        }
        out.push('\n');

        for (name, body) in &self.functions {
            out.push_str(&format!("void {name}(void) {{\n{body}}}\n\n"));
        }

        out.push_str("int main(void) {\n");
        out.push_str(&self.main_body);
        out.push_str("return 0;\n}\n");

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_to_main_body_by_default() {
        let mut buffers = OutputBuffers::new();
        buffers.emit("int x = 1;");
        let out = buffers.finalize("/* runtime */");
        assert!(out.contains("int main(void) {"));
        assert!(out.contains("int x = 1;"));
    }

    #[test]
    fn emits_to_active_function_body() {
        let mut buffers = OutputBuffers::new();
        assert!(buffers.begin_function("greet"));
        buffers.emit("printf(\"hi\\n\");");
        buffers.end_function();
        buffers.emit("greet();");

        let out = buffers.finalize("");
        assert!(out.contains("void greet(void);"));
        assert!(out.contains("void greet(void) {\nprintf(\"hi\\n\");\n}"));
        assert!(out.contains("greet();"));
    }

    #[test]
    fn rejects_duplicate_function_names() {
        let mut buffers = OutputBuffers::new();
        assert!(buffers.begin_function("f"));
        buffers.end_function();
        assert!(!buffers.begin_function("f"));
    }

    #[test]
    fn rejects_functions_past_capacity() {
        let mut buffers = OutputBuffers::new();
        for i in 0..MIN_CAPACITY {
            assert!(buffers.begin_function(&format!("f{i}")));
            buffers.end_function();
        }
        assert!(!buffers.begin_function("one_too_many"));
    }

    #[test]
    fn assembly_order_is_fixed() {
        let mut buffers = OutputBuffers::new();
        buffers.begin_function("f");
        buffers.end_function();
        let out = buffers.finalize("RUNTIME");
        let runtime_idx = out.find("RUNTIME").unwrap();
        let proto_idx = out.find("void f(void);").unwrap();
        let body_idx = out.find("void f(void) {").unwrap();
        let main_idx = out.find("int main(void)").unwrap();
        assert!(runtime_idx < proto_idx);
        assert!(proto_idx < body_idx);
        assert!(body_idx < main_idx);
    }
}
