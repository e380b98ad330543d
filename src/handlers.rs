//! Statement handlers (spec §4.2, component H): each handler consumes an
//! already-classified [`Statement`], consults the symbol table, updates the
//! block stack, logs the event, and appends C to whichever output buffer is
//! currently active. Handlers never abort on malformed input (spec §4.6) —
//! they record a diagnostic and substitute a syntactically safe fallback.

use crate::blocks::{Block, BlockKind, Discipline};
use crate::context::CompilationContext;
use crate::lexer::{self, rewrite_list_indexing};
use crate::logger::EventKind;
use crate::mode::CompileMode;
use crate::statement::{self, Header, Statement};
use crate::types::{self, SemanticType};

/// One full pass over a single input line: normalizes it, auto-closes any
/// indentation blocks the line has fallen out of, classifies it, and
/// dispatches to the matching handler.
pub fn process_line(ctx: &mut CompilationContext, line_no: usize, raw_line: &str) {
    let raw_line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
    let indent = lexer::indent_of(raw_line);

    let stripped = lexer::strip_comment(raw_line);
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        return;
    }

    let rewritten = lexer::rewrite_time_calls(trimmed);
    let trimmed = rewritten.trim();
    let first = lexer::first_token(trimmed);

    if ctx.mode.auto_close() && first != "elif" && first != "else" {
        let closed = ctx.blocks.auto_close(indent);
        for block in closed {
            close_block(ctx, &block, line_no);
        }
    }

    let stmt = statement::classify(trimmed);
    dispatch(ctx, stmt, line_no, indent);
}

/// Drains whatever is left once the last input line has been processed:
/// indent-discipline blocks close implicitly, anything still requiring an
/// explicit `end`/`}` is reported as an unclosed-block error.
pub fn finalize(ctx: &mut CompilationContext, last_line: usize) {
    let closed = ctx.blocks.drain_indent_blocks();
    for block in closed {
        close_block(ctx, &block, last_line);
    }

    let remaining: Vec<Block> = ctx.blocks.remaining().to_vec();
    for block in remaining {
        ctx.diagnostics.error(
            block.opening_line,
            format!(
                "unclosed {:?} block opened with {:?} discipline requires explicit closure",
                block.kind, block.discipline
            ),
        );
    }
}

fn dispatch(ctx: &mut CompilationContext, stmt: Statement, line_no: usize, indent: usize) {
    match stmt {
        Statement::End => handle_end(ctx, line_no),
        Statement::CloseBrace => handle_close_brace(ctx, line_no),
        Statement::Decl {
            type_token,
            name,
            init,
            is_const,
        } => handle_decl(ctx, line_no, &type_token, &name, init.as_deref(), is_const),
        Statement::Print { expr } => handle_print(ctx, line_no, &expr),
        Statement::If(header) => handle_if(ctx, line_no, indent, header),
        Statement::Elif(header) => handle_chain(ctx, line_no, header, BlockKind::Elif),
        Statement::Else(header) => handle_chain(ctx, line_no, header, BlockKind::Else),
        Statement::While(header) => handle_while(ctx, line_no, indent, header),
        Statement::ForTo { var, header } => handle_for_to(ctx, line_no, indent, &var, header),
        Statement::ForIn { var, expr, header } => {
            handle_for_in(ctx, line_no, indent, &var, &expr, header)
        }
        Statement::Func { name, header } => handle_func(ctx, line_no, indent, &name, header),
        Statement::Append { list, value } => handle_append(ctx, line_no, &list, &value),
        Statement::DSet { dict, key, value } => handle_dset(ctx, line_no, &dict, &key, &value),
        Statement::DGet { dict, key } => handle_dget(ctx, line_no, &dict, &key),
        Statement::Raw(line) => handle_raw(ctx, line_no, &line),
    }
}

/// Discipline a new block opens with: an explicit trailing `{` always wins;
/// otherwise raw-family modes require `end`, everything else falls back to
/// indentation (spec §4.1, §6).
fn header_discipline(mode: CompileMode, header: &Header) -> Discipline {
    if header.brace {
        Discipline::Brace
    } else if mode.auto_close() {
        Discipline::Indent
    } else {
        Discipline::End
    }
}

fn is_list_typed(ctx: &CompilationContext, name: &str) -> bool {
    ctx.symbols.is_list_typed(name)
}

fn rewrite_expr(ctx: &CompilationContext, expr: &str) -> String {
    rewrite_list_indexing(expr, |name| is_list_typed(ctx, name))
}

/// Closes one block: emits its `}` tokens (one, or two for a string
/// `for ... in`), flips the "inside function" flag back off when a `func`
/// block closes, and logs the paired `BLOCK_CLOSE` event.
///
/// A `func` block is the one exception to "emit `}` on close": its handler
/// never wrote an opening `{` either (spec §4.4 — the emitter, not the
/// handler, wraps every function body as `void <name>(void) { <body> }`),
/// so closing it only flips the active-function flag back to `main`.
fn close_block(ctx: &mut CompilationContext, block: &Block, line_no: usize) {
    if block.kind == BlockKind::Func {
        ctx.output.end_function();
    } else {
        for _ in 0..block.scopes_to_close {
            ctx.emit("}");
        }
    }
    ctx.log(
        EventKind::BlockClose,
        block.opening_line,
        format!("{:?} block closed at line {line_no}", block.kind),
    );
}

fn handle_end(ctx: &mut CompilationContext, line_no: usize) {
    if ctx.blocks.is_empty() {
        ctx.diagnostics
            .error(line_no, "stray 'end' with no open block");
        return;
    }
    if let Some((block, _outcome)) =
        ctx.blocks
            .close_top(Discipline::End, line_no, &mut ctx.diagnostics)
    {
        close_block(ctx, &block, line_no);
    }
}

fn handle_close_brace(ctx: &mut CompilationContext, line_no: usize) {
    if ctx.blocks.is_empty() {
        ctx.diagnostics
            .error(line_no, "stray '}' with no open block");
        return;
    }
    if let Some((block, _outcome)) =
        ctx.blocks
            .close_top(Discipline::Brace, line_no, &mut ctx.diagnostics)
    {
        close_block(ctx, &block, line_no);
    }
}

fn handle_decl(
    ctx: &mut CompilationContext,
    line_no: usize,
    type_token: &str,
    name: &str,
    init: Option<&str>,
    is_const: bool,
) {
    let ty = match SemanticType::from_type_token(type_token) {
        Some(ty) => ty,
        None => {
            ctx.diagnostics
                .error(line_no, format!("unknown type '{type_token}' in declaration"));
            SemanticType::Int
        }
    };

    if !ctx.symbols.register(name, ty, is_const) {
        ctx.diagnostics.error(
            line_no,
            format!("variable capacity exceeded: cannot declare '{name}'"),
        );
    }

    let const_prefix = if is_const { "const " } else { "" };
    let c_type = ty.c_type();

    let line = match init {
        Some(expr) => {
            let rewritten = rewrite_expr(ctx, expr);
            format!("{const_prefix}{c_type} {name} = {rewritten};")
        }
        None => match ty.default_initializer() {
            Some(default) => format!("{const_prefix}{c_type} {name} = {default};"),
            None => format!("{const_prefix}{c_type} {name};"),
        },
    };

    ctx.emit(&line);
    ctx.log(EventKind::VarDecl, line_no, format!("{name}: {ty}"));
}

fn handle_print(ctx: &mut CompilationContext, line_no: usize, expr: &str) {
    let expr = expr.trim();
    let ty = types::infer_expression_type(expr, &ctx.symbols);
    let rewritten = rewrite_expr(ctx, expr);

    let line = match ty {
        SemanticType::String => format!("printf(\"%s\\n\", {rewritten});"),
        SemanticType::Bool => format!("printf(\"%s\\n\", ({rewritten}) ? \"true\" : \"false\");"),
        SemanticType::Float => format!("printf(\"%f\\n\", {rewritten});"),
        SemanticType::List => format!("print_list(&{rewritten});"),
        SemanticType::Tuple => format!("print_tuple(&{rewritten});"),
        _ => format!("printf(\"%d\\n\", (int)({rewritten}));"),
    };

    ctx.emit(&line);
    ctx.log(EventKind::Print, line_no, expr.to_owned());
}

/// Strips a block header, returning the condition (or a synthetic
/// always-true/false fallback plus a recorded error when empty).
fn condition_or_fallback(
    ctx: &mut CompilationContext,
    line_no: usize,
    header: &Header,
    fallback: &str,
    what: &str,
) -> String {
    if header.body.is_empty() {
        ctx.diagnostics
            .error(line_no, format!("missing condition in {what}"));
        fallback.to_owned()
    } else {
        rewrite_expr(ctx, &header.body)
    }
}

fn push_block(
    ctx: &mut CompilationContext,
    kind: BlockKind,
    line_no: usize,
    indent: usize,
    header: &Header,
) {
    let discipline = header_discipline(ctx.mode, header);
    ctx.blocks.push(
        Block {
            opening_indent: indent,
            opening_line: line_no,
            kind,
            discipline,
            scopes_to_close: 1,
        },
        &mut ctx.diagnostics,
    );
}

fn handle_if(ctx: &mut CompilationContext, line_no: usize, indent: usize, header: Header) {
    let cond = condition_or_fallback(ctx, line_no, &header, "1", "if");
    ctx.emit(format!("if ({cond}) {{"));
    push_block(ctx, BlockKind::If, line_no, indent, &header);
    ctx.log(EventKind::BlockOpen, line_no, format!("if ({cond})"));
}

fn handle_while(ctx: &mut CompilationContext, line_no: usize, indent: usize, header: Header) {
    let cond = condition_or_fallback(ctx, line_no, &header, "0", "while");
    ctx.emit(format!("while ({cond}) {{"));
    push_block(ctx, BlockKind::While, line_no, indent, &header);
    ctx.log(EventKind::BlockOpen, line_no, format!("while ({cond})"));
}

/// `elif`/`else` continuations: they never push a new block, they mutate
/// the kind of the block already on top (spec §9's "if-chain" state) while
/// preserving its original opening discipline.
fn handle_chain(ctx: &mut CompilationContext, line_no: usize, header: Header, new_kind: BlockKind) {
    let keyword = if new_kind == BlockKind::Elif { "elif" } else { "else" };

    let valid_predecessor = matches!(
        ctx.blocks.top().map(|b| b.kind),
        Some(BlockKind::If) | Some(BlockKind::Elif)
    );

    if !valid_predecessor {
        ctx.diagnostics
            .error(line_no, format!("'{keyword}' without a preceding 'if'"));
        return;
    }

    let rendered = if new_kind == BlockKind::Elif {
        let cond = condition_or_fallback(ctx, line_no, &header, "1", "elif");
        format!("}} else if ({cond}) {{")
    } else {
        "} else {".to_owned()
    };

    ctx.emit(&rendered);
    if let Some(top) = ctx.blocks.top_mut() {
        top.kind = new_kind;
    }
    ctx.log(EventKind::BlockChain, line_no, rendered);
}

/// True if `c` can appear inside an A identifier.
fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Finds the `to` keyword in a `for V = A to B` / `for V = A to(S) B` header
/// as a whole word, not a raw substring match — so a start expression like
/// `total` (which contains the letters `to`) is never mistaken for the
/// keyword. A candidate only counts if the character before it (if any) and
/// the character after it (if any) are not themselves identifier characters;
/// `to(` and `to ` both qualify, `total` and `autoval` do not.
fn find_to_keyword(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    let mut search_from = 0;
    while let Some(rel) = body[search_from..].find("to") {
        let idx = search_from + rel;
        let before_ok = idx == 0 || !is_ident_char(bytes[idx - 1] as char);
        let after = idx + 2;
        let after_ok = after >= bytes.len() || !is_ident_char(bytes[after] as char);
        if before_ok && after_ok {
            return Some(idx);
        }
        search_from = idx + 2;
    }
    None
}

/// Registers an induction variable, turning a capacity-exceeded registration
/// into the same recoverable error `handle_decl` reports for an explicit
/// declaration (spec §3/§5: overflow is an error for every registration,
/// not just `int`/`list`/... declarations).
fn register_induction_var(ctx: &mut CompilationContext, line_no: usize, name: &str, ty: SemanticType) {
    if !ctx.symbols.register(name, ty, false) {
        ctx.diagnostics.error(
            line_no,
            format!("variable capacity exceeded: cannot declare '{name}'"),
        );
    }
}

fn handle_for_to(ctx: &mut CompilationContext, line_no: usize, indent: usize, var: &str, header: Header) {
    let body = header.body.as_str();

    let to_idx = find_to_keyword(body);
    let (start_text, after_to) = match to_idx {
        Some(idx) => (body[..idx].trim(), body[idx + 2..].trim_start()),
        None => {
            ctx.diagnostics
                .error(line_no, "for...to loop missing 'to'");
            ("0", "0")
        }
    };

    let (step_text, end_text) = if let Some(rest) = after_to.strip_prefix('(') {
        match rest.find(')') {
            Some(close) => (Some(rest[..close].trim()), rest[close + 1..].trim_start()),
            None => {
                ctx.diagnostics
                    .error(line_no, "for...to step missing closing ')'");
                (None, rest)
            }
        }
    } else {
        (None, after_to)
    };

    let start_text = if start_text.is_empty() {
        ctx.diagnostics
            .error(line_no, "for...to loop missing start value");
        "0"
    } else {
        start_text
    };
    let end_text = if end_text.is_empty() {
        ctx.diagnostics
            .error(line_no, "for...to loop missing end value");
        "0"
    } else {
        end_text
    };

    let start = rewrite_expr(ctx, start_text);
    let end = rewrite_expr(ctx, end_text);

    let advance = match step_text {
        Some(step) => format!("{var} += {}", rewrite_expr(ctx, step)),
        None => format!("{var}++"),
    };

    register_induction_var(ctx, line_no, var, SemanticType::Int);

    let line = format!("for (int {var} = {start}; {var} <= {end}; {advance}) {{");
    ctx.emit(&line);
    push_block(ctx, BlockKind::For, line_no, indent, &header);
    ctx.log(EventKind::BlockOpen, line_no, line);
}

fn handle_for_in(
    ctx: &mut CompilationContext,
    line_no: usize,
    indent: usize,
    var: &str,
    expr: &str,
    header: Header,
) {
    let expr = expr.trim();
    let ty = types::infer_expression_type(expr, &ctx.symbols);
    let source = rewrite_expr(ctx, expr);

    let discipline = header_discipline(ctx.mode, &header);
    let mut scopes_to_close = 1u8;

    match ty {
        SemanticType::List | SemanticType::Tuple => {
            register_induction_var(ctx, line_no, var, SemanticType::Int);
            ctx.emit(format!(
                "for (int i_idx = 0; i_idx < {source}.size; i_idx++) {{ int {var} = {source}.data[i_idx];"
            ));
        }
        SemanticType::Dict => {
            register_induction_var(ctx, line_no, var, SemanticType::String);
            ctx.emit(format!(
                "for (int i_idx = 0; i_idx < {source}.size; i_idx++) {{ char* {var} = {source}.keys[i_idx];"
            ));
        }
        SemanticType::String => {
            register_induction_var(ctx, line_no, var, SemanticType::Int);
            let alias = ctx.next_alias();
            ctx.emit(format!("{{ char* {alias} = {source};"));
            ctx.emit(format!(
                "for (int i_idx = 0; {alias}[i_idx]; i_idx++) {{ char {var} = {alias}[i_idx];"
            ));
            scopes_to_close = 2;
        }
        _ => {
            // Anything that isn't a known container or declared string is
            // treated as string-like under a null guard (spec §4.2 table).
            register_induction_var(ctx, line_no, var, SemanticType::Int);
            let alias = ctx.next_alias();
            ctx.emit(format!("{{ char* {alias} = {source};"));
            ctx.emit(format!(
                "for (int i_idx = 0; {alias} && {alias}[i_idx]; i_idx++) {{ char {var} = {alias}[i_idx];"
            ));
            scopes_to_close = 2;
        }
    }

    ctx.blocks.push(
        Block {
            opening_indent: indent,
            opening_line: line_no,
            kind: BlockKind::ForIn,
            discipline,
            scopes_to_close,
        },
        &mut ctx.diagnostics,
    );
    ctx.log(EventKind::ForIn, line_no, format!("for {var} in {source}"));
}

fn handle_func(ctx: &mut CompilationContext, line_no: usize, indent: usize, name: &str, header: Header) {
    if name == "main" {
        ctx.diagnostics
            .warning(line_no, "'func main' is reserved; the emitter synthesizes main itself");
        // Still push a block so indentation/`end`/`}` closing this body has
        // something to close; no prototype or body buffer is started, so its
        // statements simply land in the ordinary main body.
        push_block(ctx, BlockKind::Func, line_no, indent, &header);
        return;
    }

    if ctx.output.has_function(name) {
        ctx.diagnostics
            .error(line_no, format!("duplicate function definition '{name}'"));
        return;
    }

    if !ctx.blocks.can_push_func() {
        ctx.diagnostics
            .error(line_no, "nested functions are not supported");
        return;
    }

    if !ctx.output.begin_function(name) {
        ctx.diagnostics.error(
            line_no,
            format!("function capacity exceeded: cannot declare '{name}'"),
        );
        return;
    }
    push_block(ctx, BlockKind::Func, line_no, indent, &header);
    ctx.log(EventKind::FuncDecl, line_no, name.to_owned());
}

fn handle_append(ctx: &mut CompilationContext, line_no: usize, list: &str, value: &str) {
    if let Some(var) = ctx.symbols.lookup(list) {
        if var.ty != SemanticType::List {
            ctx.diagnostics.error(
                line_no,
                format!("'append' target '{list}' is not a list (it is {})", var.ty),
            );
        }
    }

    let value = rewrite_expr(ctx, value);
    let line = format!("list_append(&{list}, {value});");
    ctx.emit(&line);
    ctx.log(EventKind::FuncCall, line_no, line);
}

fn handle_dset(ctx: &mut CompilationContext, line_no: usize, dict: &str, key: &str, value: &str) {
    let key = rewrite_expr(ctx, key);
    let value = rewrite_expr(ctx, value);
    let line = format!("dset(&{dict}, {key}, {value});");
    ctx.emit(&line);
    ctx.log(EventKind::FuncCall, line_no, line);
}

fn handle_dget(ctx: &mut CompilationContext, line_no: usize, dict: &str, key: &str) {
    let key = rewrite_expr(ctx, key);
    let line = format!("dget(&{dict}, {key});");
    ctx.emit(&line);
    ctx.log(EventKind::FuncCall, line_no, line);
}

fn handle_raw(ctx: &mut CompilationContext, line_no: usize, line: &str) {
    let rewritten = rewrite_expr(ctx, line);
    let with_semi = if rewritten.trim_end().ends_with(';') {
        rewritten
    } else {
        format!("{rewritten};")
    };
    ctx.emit(&with_semi);
    ctx.log(EventKind::Stmt, line_no, with_semi);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::CompileMode;

    fn compile(mode: CompileMode, src: &str) -> CompilationContext {
        let mut ctx = CompilationContext::new(mode);
        let mut last = 0;
        for (i, line) in src.lines().enumerate() {
            last = i + 1;
            process_line(&mut ctx, last, line);
        }
        finalize(&mut ctx, last);
        ctx
    }

    #[test]
    fn declares_and_prints_int_sum() {
        let ctx = compile(CompileMode::Optimized, "int x = 3\nint y = 4\nprint(x + y)");
        assert!(!ctx.diagnostics.has_errors());
        let out = ctx.output.clone().finalize("");
        assert!(out.contains("int x = 3;"));
        assert!(out.contains("int y = 4;"));
        assert!(out.contains("printf(\"%d\\n\", (int)(x + y));"));
    }

    #[test]
    fn list_append_and_index_rewrite() {
        let ctx = compile(
            CompileMode::Optimized,
            "list L\nappend(L, 10)\nappend(L, 20)\nprint(L[1])",
        );
        assert!(!ctx.diagnostics.has_errors());
        let out = ctx.output.clone().finalize("");
        assert!(out.contains("List L = new_list();"));
        assert!(out.contains("list_append(&L, 10);"));
        assert!(out.contains("printf(\"%d\\n\", (int)(L.data[1]));"));
    }

    #[test]
    fn if_else_chain_closes_with_single_brace() {
        let ctx = compile(
            CompileMode::Optimized,
            "int x = 1\nif x > 0:\n    print(\"yes\")\nelse:\n    print(\"no\")\nprint(\"done\")",
        );
        assert!(!ctx.diagnostics.has_errors());
        let out = ctx.output.clone().finalize("");
        assert!(out.contains("if (x > 0) {"));
        assert!(out.contains("} else {"));
    }

    #[test]
    fn func_greet_emits_prototype_and_body() {
        let ctx = compile(
            CompileMode::Optimized,
            "func greet:\n    print(\"hi\")\ngreet()",
        );
        assert!(!ctx.diagnostics.has_errors());
        let out = ctx.output.clone().finalize("");
        assert!(out.contains("void greet(void);"));
        assert!(out.contains("void greet(void) {"));
        assert!(out.contains("greet();"));
    }

    #[test]
    fn string_for_in_closes_two_scopes() {
        let ctx = compile(
            CompileMode::Optimized,
            "string s = \"abc\"\nfor c in s:\n    print(c)",
        );
        assert!(!ctx.diagnostics.has_errors());
        let out = ctx.output.clone().finalize("");
        assert!(out.contains("char* __a_str0 = s;"));
        assert!(out.contains("printf(\"%d\\n\", (int)(c));"));
    }

    #[test]
    fn raw_mode_without_end_is_a_structural_error() {
        let ctx = compile(CompileMode::Raw, "if x > 0:\n    print(\"hi\")");
        assert!(ctx.diagnostics.has_errors());
    }

    #[test]
    fn indent_only_close_succeeds_outside_raw_mode() {
        let ctx = compile(CompileMode::Optimized, "if x > 0:\n    print(\"hi\")");
        assert!(!ctx.diagnostics.has_errors());
    }

    #[test]
    fn stray_close_brace_is_an_error() {
        let ctx = compile(CompileMode::Optimized, "}");
        assert!(ctx.diagnostics.has_errors());
    }

    #[test]
    fn elif_without_if_is_an_error() {
        let ctx = compile(CompileMode::Optimized, "elif x > 0:\n    print(\"hi\")");
        assert!(ctx.diagnostics.has_errors());
    }

    #[test]
    fn func_main_is_a_warning_not_an_error() {
        // `end` sits at the body's indent, not the header's: an `end` at
        // column 0 would collide with auto-close already popping the block
        // on the same line (both trigger on `opening_indent >= indent`).
        let ctx = compile(CompileMode::Optimized, "func main:\n    print(\"hi\")\n    end");
        assert!(!ctx.diagnostics.has_errors());
        assert!(!ctx.diagnostics.is_empty());
    }

    #[test]
    fn for_to_start_value_containing_to_as_a_substring_is_not_mistaken_for_the_keyword() {
        let ctx = compile(
            CompileMode::Optimized,
            "int total = 5\nfor i = total to 10:\n    print(i)",
        );
        assert!(!ctx.diagnostics.has_errors());
        let out = ctx.output.clone().finalize("");
        assert!(out.contains("for (int i = total; i <= 10; i++) {"));
    }

    #[test]
    fn for_to_induction_var_capacity_overflow_is_reported() {
        let mut ctx = CompilationContext::new(CompileMode::Optimized);
        for i in 0..1024 {
            process_line(&mut ctx, 1, &format!("int v{i} = 0"));
        }
        assert!(!ctx.diagnostics.has_errors());
        process_line(&mut ctx, 2, "for i = 0 to 10:");
        process_line(&mut ctx, 3, "    print(i)");
        finalize(&mut ctx, 3);
        assert!(ctx.diagnostics.has_errors());
    }
}
