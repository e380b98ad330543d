//! The statement dispatcher (spec §4.2, component G): classifies a trimmed,
//! comment-stripped, time-call-rewritten line into a [`Statement`] — a
//! tagged variant carrying its already-parsed arguments, per the design
//! note that dynamic dispatch on statement kind should become a classifier
//! producing a variant rather than an ad-hoc chain of string checks spread
//! across handlers.

use crate::lexer::{first_token, is_close_brace};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub body: String,
    pub brace: bool,
    pub colon: bool,
}

/// Strips a trailing `{` and/or trailing `:` from a block header, in either
/// order, recording which (if either) was present.
fn parse_header(rest: &str) -> Header {
    let mut body = rest.trim();
    let mut brace = false;
    let mut colon = false;

    if let Some(stripped) = body.strip_suffix('{') {
        brace = true;
        body = stripped.trim_end();
    }
    if let Some(stripped) = body.strip_suffix(':') {
        colon = true;
        body = stripped.trim_end();
    }
    // Headers may also write `:` before `{` (`if x: {`), so check once more.
    if !brace {
        if let Some(stripped) = body.strip_suffix('{') {
            brace = true;
            body = stripped.trim_end();
        }
    }

    Header {
        body: body.trim().to_owned(),
        brace,
        colon,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    End,
    CloseBrace,
    Decl {
        type_token: String,
        name: String,
        init: Option<String>,
        is_const: bool,
    },
    Print {
        expr: String,
    },
    If(Header),
    Elif(Header),
    Else(Header),
    While(Header),
    /// `for V = A to B` / `for V = A to(S) B`
    ForTo {
        var: String,
        header: Header,
    },
    /// `for V in E`
    ForIn {
        var: String,
        expr: String,
        header: Header,
    },
    Func {
        name: String,
        header: Header,
    },
    Append {
        list: String,
        value: String,
    },
    DSet {
        dict: String,
        key: String,
        value: String,
    },
    DGet {
        dict: String,
        key: String,
    },
    Raw(String),
}

fn call_args(trimmed: &str, prefix: &str) -> Option<String> {
    let rest = trimmed.strip_prefix(prefix)?;
    let close = rest.rfind(')')?;
    Some(rest[..close].to_owned())
}

fn split_args(args: &str) -> Vec<String> {
    // A-level calls never nest parens in their arguments (non-goal: no full
    // expression parsing), so a plain top-level comma split is sufficient
    // except that commas may appear inside a string literal argument.
    let mut parts = vec![];
    let mut depth = 0i32;
    let mut in_string = false;
    let mut current = String::new();
    let mut chars = args.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                in_string = !in_string;
                current.push(c);
            }
            '(' if !in_string => {
                depth += 1;
                current.push(c);
            }
            ')' if !in_string => {
                depth -= 1;
                current.push(c);
            }
            ',' if !in_string && depth == 0 => {
                parts.push(current.trim().to_owned());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() || !parts.is_empty() {
        parts.push(current.trim().to_owned());
    }
    parts
}

/// Classifies a single trimmed, non-empty line.
pub fn classify(trimmed: &str) -> Statement {
    if trimmed == "end" {
        return Statement::End;
    }

    if is_close_brace(trimmed) {
        return Statement::CloseBrace;
    }

    let token = first_token(trimmed);

    if token == "const" {
        return parse_decl(trimmed, true);
    }

    if matches!(
        token,
        "int" | "float" | "bool" | "string" | "list" | "dict" | "tuple"
    ) {
        return parse_decl(trimmed, false);
    }

    if token == "print" {
        if let Some(args) = call_args(trimmed, "print(") {
            return Statement::Print { expr: args };
        }
    }

    if token == "if" {
        return Statement::If(parse_header(trimmed.strip_prefix("if").unwrap_or(trimmed)));
    }
    if token == "elif" {
        return Statement::Elif(parse_header(trimmed.strip_prefix("elif").unwrap_or(trimmed)));
    }
    if token == "else" {
        return Statement::Else(parse_header(trimmed.strip_prefix("else").unwrap_or(trimmed)));
    }
    if token == "while" {
        return Statement::While(parse_header(
            trimmed.strip_prefix("while").unwrap_or(trimmed),
        ));
    }
    if token == "for" {
        return parse_for(trimmed);
    }
    if token == "func" {
        let rest = trimmed.strip_prefix("func").unwrap_or(trimmed).trim();
        let header = parse_header(rest);
        // The function name is whatever's left in the header body.
        return Statement::Func {
            name: header.body.clone(),
            header,
        };
    }

    if token == "append" {
        if let Some(args) = call_args(trimmed, "append(") {
            let parts = split_args(&args);
            if parts.len() == 2 {
                return Statement::Append {
                    list: parts[0].clone(),
                    value: parts[1].clone(),
                };
            }
        }
    }

    if token == "dset" {
        if let Some(args) = call_args(trimmed, "dset(") {
            let parts = split_args(&args);
            if parts.len() == 3 {
                return Statement::DSet {
                    dict: parts[0].clone(),
                    key: parts[1].clone(),
                    value: parts[2].clone(),
                };
            }
        }
    }

    if token == "dget" {
        if let Some(args) = call_args(trimmed, "dget(") {
            let parts = split_args(&args);
            if parts.len() == 2 {
                return Statement::DGet {
                    dict: parts[0].clone(),
                    key: parts[1].clone(),
                };
            }
        }
    }

    Statement::Raw(trimmed.to_owned())
}

fn parse_decl(trimmed: &str, is_const: bool) -> Statement {
    let rest = if is_const {
        trimmed.strip_prefix("const").unwrap_or(trimmed).trim()
    } else {
        trimmed
    };

    let type_token = first_token(rest).to_owned();
    let after_type = rest[type_token.len()..].trim();

    let (name, init) = match after_type.split_once('=') {
        Some((name, init)) => (name.trim().to_owned(), Some(init.trim().to_owned())),
        None => (after_type.trim().to_owned(), None),
    };

    Statement::Decl {
        type_token,
        name,
        init,
        is_const,
    }
}

fn parse_for(trimmed: &str) -> Statement {
    let rest = trimmed.strip_prefix("for").unwrap_or(trimmed).trim();

    if let Some((var, tail)) = rest.split_once('=') {
        let var = var.trim().to_owned();
        return Statement::ForTo {
            var,
            header: parse_header(tail.trim()),
        };
    }

    if let Some((var, tail)) = rest.split_once(" in ") {
        let var = var.trim().to_owned();
        let header = parse_header(tail.trim());
        return Statement::ForIn {
            var,
            expr: header.body.clone(),
            header,
        };
    }

    // Malformed for-loop: fall through to raw so the caller can report a
    // structural error with the original text preserved.
    Statement::Raw(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_declarations() {
        match classify("int x = 3") {
            Statement::Decl {
                type_token,
                name,
                init,
                is_const,
            } => {
                assert_eq!(type_token, "int");
                assert_eq!(name, "x");
                assert_eq!(init.as_deref(), Some("3"));
                assert!(!is_const);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn classifies_print() {
        match classify("print(x + y)") {
            Statement::Print { expr } => assert_eq!(expr, "x + y"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn classifies_if_with_colon() {
        match classify("if x > 0:") {
            Statement::If(header) => {
                assert_eq!(header.body, "x > 0");
                assert!(header.colon);
                assert!(!header.brace);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn classifies_for_to() {
        match classify("for i = 0 to 10") {
            Statement::ForTo { var, header } => {
                assert_eq!(var, "i");
                assert_eq!(header.body, "0 to 10");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn classifies_for_in() {
        match classify("for c in s:") {
            Statement::ForIn { var, expr, header } => {
                assert_eq!(var, "c");
                assert_eq!(expr, "s");
                assert!(header.colon);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn classifies_append() {
        match classify("append(L, 10)") {
            Statement::Append { list, value } => {
                assert_eq!(list, "L");
                assert_eq!(value, "10");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn falls_back_to_raw() {
        match classify("x = x + 1;") {
            Statement::Raw(text) => assert_eq!(text, "x = x + 1;"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
