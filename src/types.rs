//! [`SemanticType`] and the local, single-expression type inference pass
//! described in spec §4.3. Inference never descends into subexpressions or
//! operators — callers only rely on it to pick a print format or a
//! `for ... in` emission shape.

use std::fmt;

use crate::symbols::SymbolTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticType {
    Int,
    Float,
    Bool,
    String,
    List,
    Dict,
    Tuple,
    Unknown,
}

impl SemanticType {
    /// The direct A-type-token -> SemanticType map used by typed declarations.
    pub fn from_type_token(token: &str) -> Option<Self> {
        Some(match token {
            "int" => SemanticType::Int,
            "float" => SemanticType::Float,
            "bool" => SemanticType::Bool,
            "string" => SemanticType::String,
            "list" => SemanticType::List,
            "dict" => SemanticType::Dict,
            "tuple" => SemanticType::Tuple,
            _ => return None,
        })
    }

    /// The C type emitted for a declaration of this semantic type.
    pub fn c_type(&self) -> &'static str {
        match self {
            SemanticType::Int => "int",
            SemanticType::Float => "float",
            SemanticType::Bool => "bool",
            SemanticType::String => "char*",
            SemanticType::List => "List",
            SemanticType::Dict => "Dict",
            SemanticType::Tuple => "Tuple",
            SemanticType::Unknown => "int",
        }
    }

    /// Default initializer text for a declaration without one (spec §4.2).
    /// `bool`/`float` are left uninitialized, matching the distilled source.
    pub fn default_initializer(&self) -> Option<&'static str> {
        match self {
            SemanticType::Int => Some("0"),
            SemanticType::String => Some("NULL"),
            SemanticType::List => Some("new_list()"),
            SemanticType::Dict => Some("new_dict()"),
            SemanticType::Tuple => Some("new_tuple()"),
            SemanticType::Bool | SemanticType::Float | SemanticType::Unknown => None,
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SemanticType::Int => "int",
            SemanticType::Float => "float",
            SemanticType::Bool => "bool",
            SemanticType::String => "string",
            SemanticType::List => "list",
            SemanticType::Dict => "dict",
            SemanticType::Tuple => "tuple",
            SemanticType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

fn is_numeric_literal(text: &str) -> Option<SemanticType> {
    let body = text.strip_prefix(['-', '+']).unwrap_or(text);
    if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    if body.matches('.').count() > 1 {
        return None;
    }
    if !body.chars().next()?.is_ascii_digit() {
        return None;
    }
    if body.contains('.') {
        Some(SemanticType::Float)
    } else {
        Some(SemanticType::Int)
    }
}

/// Leading-identifier extraction used both by inference rule 7/8 and by the
/// list-indexing rewrite: the longest prefix of ASCII alphanumerics/underscore.
pub fn leading_identifier(expr: &str) -> Option<&str> {
    let end = expr
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_alphanumeric() || *c == '_')
        .map(|(i, c)| i + c.len_utf8())
        .last()?;
    if end == 0 {
        return None;
    }
    let ident = &expr[..end];
    if ident.chars().next()?.is_ascii_digit() {
        return None;
    }
    Some(ident)
}

/// Expression-type inference (spec §4.3). `expr` should already be trimmed.
pub fn infer_expression_type(expr: &str, symbols: &SymbolTable) -> SemanticType {
    let expr = expr.trim();

    if expr.is_empty() {
        return SemanticType::Int;
    }

    // 1. string literal
    if expr.starts_with('"') {
        return SemanticType::String;
    }

    // 2. boolean literal
    if expr == "true" || expr == "false" {
        return SemanticType::Bool;
    }

    // 3. tuple: "(" ... "," ... ")"
    if expr.starts_with('(') && expr.contains(',') {
        return SemanticType::Tuple;
    }

    // 4. list / dict literal
    if expr.starts_with('[') {
        return SemanticType::List;
    }
    if expr.starts_with('{') {
        return SemanticType::Dict;
    }

    // 5/6. numeric literal (float if it has a '.', otherwise int)
    if let Some(ty) = is_numeric_literal(expr) {
        return ty;
    }

    // 7/8. leading identifier: symbol table lookup, or list/string indexing
    if let Some(ident) = leading_identifier(expr) {
        if let Some(variable) = symbols.lookup(ident) {
            let rest = expr[ident.len()..].trim_start();
            if rest.starts_with('[')
                && matches!(variable.ty, SemanticType::List | SemanticType::String)
            {
                return SemanticType::Int;
            }
            return variable.ty;
        }
    }

    // 9. otherwise
    SemanticType::Int
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::SymbolTable;

    #[test]
    fn infers_string_literal() {
        let symbols = SymbolTable::new();
        assert_eq!(
            infer_expression_type("\"hello\"", &symbols),
            SemanticType::String
        );
    }

    #[test]
    fn infers_bool_literal() {
        let symbols = SymbolTable::new();
        assert_eq!(infer_expression_type("true", &symbols), SemanticType::Bool);
        assert_eq!(infer_expression_type("false", &symbols), SemanticType::Bool);
    }

    #[test]
    fn infers_tuple_and_list_and_dict_literals() {
        let symbols = SymbolTable::new();
        assert_eq!(
            infer_expression_type("(1, 2)", &symbols),
            SemanticType::Tuple
        );
        assert_eq!(
            infer_expression_type("[1, 2]", &symbols),
            SemanticType::List
        );
        assert_eq!(
            infer_expression_type("{1: 2}", &symbols),
            SemanticType::Dict
        );
    }

    #[test]
    fn infers_numeric_literals() {
        let symbols = SymbolTable::new();
        assert_eq!(infer_expression_type("42", &symbols), SemanticType::Int);
        assert_eq!(infer_expression_type("-42", &symbols), SemanticType::Int);
        assert_eq!(infer_expression_type("3.14", &symbols), SemanticType::Float);
    }

    #[test]
    fn infers_from_symbol_table() {
        let mut symbols = SymbolTable::new();
        symbols.register("x", SemanticType::List, false);
        assert_eq!(infer_expression_type("x", &symbols), SemanticType::List);
        assert_eq!(infer_expression_type("x[1]", &symbols), SemanticType::Int);
    }

    #[test]
    fn falls_back_to_int() {
        let symbols = SymbolTable::new();
        assert_eq!(
            infer_expression_type("x + y", &symbols),
            SemanticType::Int
        );
    }
}
