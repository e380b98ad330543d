//! The single owned compilation-context value threaded explicitly through
//! every statement handler (spec §9's design note): rather than reaching
//! for ambient globals, handlers take `&mut CompilationContext` and mutate
//! its symbol table, block stack, diagnostics, and output buffers in place.

use crate::blocks::BlockStack;
use crate::diagnostics::Diagnostics;
use crate::emitter::OutputBuffers;
use crate::logger::{Event, EventKind};
use crate::mode::CompileMode;
use crate::symbols::SymbolTable;

pub struct CompilationContext {
    pub symbols: SymbolTable,
    pub blocks: BlockStack,
    pub diagnostics: Diagnostics,
    pub output: OutputBuffers,
    pub mode: CompileMode,
    /// Counter for the synthetic aliases a string `for ... in` introduces,
    /// so nested string loops don't collide on the same C identifier.
    alias_counter: usize,
}

impl CompilationContext {
    pub fn new(mode: CompileMode) -> Self {
        Self {
            symbols: SymbolTable::new(),
            blocks: BlockStack::new(),
            diagnostics: Diagnostics::new(),
            output: OutputBuffers::new(),
            mode,
            alias_counter: 0,
        }
    }

    /// Fresh C identifier for a string `for ... in` element alias.
    pub fn next_alias(&mut self) -> String {
        let alias = format!("__a_str{}", self.alias_counter);
        self.alias_counter += 1;
        alias
    }

    /// Emits a line of C to whichever buffer is currently active.
    pub fn emit(&mut self, code: impl AsRef<str>) {
        self.output.emit(code.as_ref());
    }

    pub fn is_list(&self, name: &str) -> bool {
        self.symbols.is_list_typed(name)
    }

    /// Renders and writes a structured event through the installed logger,
    /// at the mode selected by `self.mode.log_mode()`.
    pub fn log(&self, kind: EventKind, line: usize, detail: impl Into<String>) {
        let log_mode = self.mode.log_mode();
        let event = Event::new(kind, line, detail);
        if let Some(rendered) = event.render(log_mode) {
            log::log!(event.level(), "{rendered}");
        }
    }
}
