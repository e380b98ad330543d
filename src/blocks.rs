//! The block stack: the state machine that reconciles indentation-driven,
//! brace-delimited, and `end`-delimited A-level blocks (spec §4.1).
//!
//! Per the spec's design notes, the "extra brace obligation" of a string
//! `for ... in` is a field on the block record (`scopes_to_close`), not
//! something implicit in the block's kind.

use crate::diagnostics::Diagnostics;

const MIN_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discipline {
    Indent,
    Brace,
    End,
}

/// The statement form that opened a block. `If` mutates into `Elif`/`Else`
/// in place when the chain continues (spec §9: modeled as an explicit
/// "if-chain" state, not a string tag rewrite).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    If,
    Elif,
    Else,
    While,
    For,
    ForIn,
    Func,
}

#[derive(Debug, Clone)]
pub struct Block {
    pub opening_indent: usize,
    pub opening_line: usize,
    pub kind: BlockKind,
    /// Fixed at open time; preserved across if/elif/else chaining per the
    /// open question in spec §9 ("preserve the opening discipline").
    pub discipline: Discipline,
    /// Number of `}` to emit on closure. 2 for a string `for ... in`
    /// (the element-alias scope plus the loop body), 1 otherwise.
    pub scopes_to_close: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// Closed cleanly, discipline matched.
    Matched,
    /// Closed, but the closing token didn't match the opening discipline —
    /// downgraded to a warning (spec §4.1).
    Mismatched,
}

#[derive(Debug, Clone, Default)]
pub struct BlockStack {
    blocks: Vec<Block>,
}

impl BlockStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn top(&self) -> Option<&Block> {
        self.blocks.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut Block> {
        self.blocks.last_mut()
    }

    /// Invariant (spec §3): the stack is strictly increasing in opening
    /// indent at push time; a `func` block may only be pushed when the
    /// stack is empty or its only outer entry is itself a `func` block —
    /// this is what keeps nested functions unrepresentable.
    pub fn can_push_func(&self) -> bool {
        self.blocks.is_empty()
            || (self.blocks.len() == 1 && self.blocks[0].kind == BlockKind::Func)
    }

    pub fn push(&mut self, block: Block, diagnostics: &mut Diagnostics) -> bool {
        if self.blocks.len() >= MIN_CAPACITY {
            diagnostics.error(
                block.opening_line,
                "too many nested blocks: capacity exceeded",
            );
            return false;
        }
        self.blocks.push(block);
        true
    }

    pub fn pop(&mut self) -> Option<Block> {
        self.blocks.pop()
    }

    /// Pops and closes the top block with `closing_discipline` honored:
    /// a mismatch still closes the block but is reported as a warning.
    pub fn close_top(
        &mut self,
        closing_discipline: Discipline,
        closing_line: usize,
        diagnostics: &mut Diagnostics,
    ) -> Option<(Block, CloseOutcome)> {
        let block = self.blocks.pop()?;
        if block.discipline == closing_discipline {
            Some((block, CloseOutcome::Matched))
        } else {
            diagnostics.warning(
                block.opening_line,
                format!(
                    "block opened with {:?} discipline closed with {:?} (line {})",
                    block.discipline, closing_discipline, closing_line
                ),
            );
            Some((block, CloseOutcome::Mismatched))
        }
    }

    /// Drains every indent-discipline block whose opening indent is >= the
    /// current line's indent, i.e. the subsequent line has fallen back to or
    /// below the opener's level. Returns the drained blocks, outermost last.
    pub fn auto_close(&mut self, current_indent: usize) -> Vec<Block> {
        let mut closed = vec![];
        while let Some(top) = self.blocks.last() {
            if top.discipline == Discipline::Indent && top.opening_indent >= current_indent {
                closed.push(self.blocks.pop().unwrap());
            } else {
                break;
            }
        }
        closed
    }

    /// Drains every remaining indent-discipline block at end of input.
    pub fn drain_indent_blocks(&mut self) -> Vec<Block> {
        let mut closed = vec![];
        while let Some(top) = self.blocks.last() {
            if top.discipline == Discipline::Indent {
                closed.push(self.blocks.pop().unwrap());
            } else {
                break;
            }
        }
        closed
    }

    /// Any block discipline-opened with `brace`/`end` left on the stack at
    /// end-of-input required an explicit close and never got one.
    pub fn remaining(&self) -> &[Block] {
        &self.blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(indent: usize, line: usize, kind: BlockKind, discipline: Discipline) -> Block {
        Block {
            opening_indent: indent,
            opening_line: line,
            kind,
            discipline,
            scopes_to_close: 1,
        }
    }

    #[test]
    fn auto_close_drains_blocks_at_or_above_current_indent() {
        let mut stack = BlockStack::new();
        let mut diags = Diagnostics::new();
        stack.push(block(0, 1, BlockKind::If, Discipline::Indent), &mut diags);
        stack.push(block(4, 2, BlockKind::While, Discipline::Indent), &mut diags);
        let closed = stack.auto_close(2);
        assert_eq!(closed.len(), 1);
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn brace_block_is_not_auto_closed() {
        let mut stack = BlockStack::new();
        let mut diags = Diagnostics::new();
        stack.push(block(0, 1, BlockKind::If, Discipline::Brace), &mut diags);
        let closed = stack.auto_close(0);
        assert!(closed.is_empty());
    }

    #[test]
    fn mismatched_close_still_closes_but_warns() {
        let mut stack = BlockStack::new();
        let mut diags = Diagnostics::new();
        stack.push(block(0, 1, BlockKind::If, Discipline::Brace), &mut diags);
        let (_, outcome) = stack.close_top(Discipline::End, 5, &mut diags).unwrap();
        assert_eq!(outcome, CloseOutcome::Mismatched);
        assert!(stack.is_empty());
        assert!(!diags.is_empty());
        assert!(!diags.has_errors());
    }

    #[test]
    fn func_nesting_invariant() {
        let mut stack = BlockStack::new();
        let mut diags = Diagnostics::new();
        assert!(stack.can_push_func());
        stack.push(block(0, 1, BlockKind::Func, Discipline::Indent), &mut diags);
        assert!(stack.can_push_func());
        stack.push(block(4, 2, BlockKind::If, Discipline::Indent), &mut diags);
        assert!(!stack.can_push_func());
    }
}
