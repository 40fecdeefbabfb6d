//! Edge case tests for lox-parse

#[cfg(test)]
mod tests {
    use crate::{Expr, LiteralValue, Parser, Stmt};
    use lox_scan::Scanner;
    use lox_util::Handler;

    fn parse(source: &str) -> (Vec<Stmt>, Handler) {
        let handler = Handler::new();
        let tokens = Scanner::new(source, &handler).scan();
        let stmts = Parser::new(tokens, &handler).parse();
        (stmts, handler)
    }

    #[test]
    fn test_edge_empty_source_has_no_statements() {
        let (stmts, handler) = parse("");
        assert!(stmts.is_empty());
        assert!(!handler.had_syntax_error());
    }

    #[test]
    fn test_edge_empty_block() {
        let (stmts, handler) = parse("{}");
        assert!(matches!(&stmts[0], Stmt::Block(inner) if inner.is_empty()));
        assert!(!handler.had_syntax_error());
    }

    #[test]
    fn test_edge_deeply_nested_grouping() {
        let source = format!("{}1{};", "(".repeat(200), ")".repeat(200));
        let (stmts, handler) = parse(&source);
        assert!(!handler.had_syntax_error());
        assert_eq!(stmts.len(), 1);
    }

    #[test]
    fn test_edge_deeply_nested_blocks() {
        let source = format!("{}{}", "{".repeat(200), "}".repeat(200));
        let (stmts, handler) = parse(&source);
        assert!(!handler.had_syntax_error());
        assert_eq!(stmts.len(), 1);
    }

    #[test]
    fn test_edge_function_with_no_parameters() {
        let (stmts, handler) = parse("fun f() {}");
        assert!(!handler.had_syntax_error());
        assert!(matches!(&stmts[0], Stmt::Function(decl) if decl.params.is_empty()));
    }

    #[test]
    fn test_edge_exactly_255_params_is_fine() {
        let params: Vec<String> = (0..255).map(|n| format!("p{n}")).collect();
        let source = format!("fun f({}) {{}}", params.join(", "));
        let (_, handler) = parse(&source);
        assert!(!handler.had_syntax_error());
    }

    #[test]
    fn test_edge_256_params_reports_error_but_still_parses() {
        let params: Vec<String> = (0..256).map(|n| format!("p{n}")).collect();
        let source = format!("fun f({}) {{}}", params.join(", "));
        let (stmts, handler) = parse(&source);
        assert!(handler.had_syntax_error());
        assert_eq!(stmts.len(), 1);
    }

    #[test]
    fn test_edge_class_with_no_methods() {
        let (stmts, handler) = parse("class Empty {}");
        assert!(!handler.had_syntax_error());
        assert!(matches!(&stmts[0], Stmt::Class(decl) if decl.methods.is_empty()));
    }

    #[test]
    fn test_edge_class_without_superclass() {
        let (stmts, _) = parse("class A {}");
        match &stmts[0] {
            Stmt::Class(decl) => assert!(decl.superclass.is_none()),
            other => panic!("expected class, got {other:?}"),
        }
    }

    #[test]
    fn test_edge_string_that_looks_like_code() {
        let (stmts, handler) = parse("print \"var x = 1;\";");
        assert!(!handler.had_syntax_error());
        match &stmts[0] {
            Stmt::Print(Expr::Literal(LiteralValue::Str(s))) => {
                assert_eq!(s, "var x = 1;")
            }
            other => panic!("expected string literal print, got {other:?}"),
        }
    }

    #[test]
    fn test_edge_unary_minus_chain() {
        let (stmts, handler) = parse("print ---1;");
        assert!(!handler.had_syntax_error());
        match &stmts[0] {
            Stmt::Print(Expr::Unary(_, inner)) => {
                assert!(matches!(**inner, Expr::Unary(..)));
            }
            other => panic!("expected nested unary, got {other:?}"),
        }
    }

    #[test]
    fn test_edge_chained_logical_operators() {
        let (stmts, handler) = parse("print 1 and 2 or 3 and 4;");
        assert!(!handler.had_syntax_error());
        assert!(matches!(&stmts[0], Stmt::Print(Expr::Logical(..))));
    }

    #[test]
    fn test_edge_trailing_comma_in_call_is_a_syntax_error() {
        // The grammar requires an expression after every comma; a trailing
        // comma leaves the argument list short one expression.
        let (_, handler) = parse("f(1, 2,);");
        assert!(handler.had_syntax_error());
    }

    #[test]
    fn test_edge_unterminated_block_reports_error() {
        let (_, handler) = parse("{ print 1;");
        assert!(handler.had_syntax_error());
    }

    #[test]
    fn test_edge_return_with_no_value() {
        let (stmts, handler) = parse("fun f() { return; }");
        assert!(!handler.had_syntax_error());
        match &stmts[0] {
            Stmt::Function(decl) => {
                assert!(matches!(decl.body[0], Stmt::Return { value: None, .. }));
            }
            other => panic!("expected function, got {other:?}"),
        }
    }

    #[test]
    fn test_edge_multiple_errors_all_reported_in_one_pass() {
        let (_, handler) = parse("1 = 2; 3 = 4; 5 = 6;");
        assert_eq!(handler.diagnostics().len(), 3);
    }

    #[test]
    fn test_edge_super_without_dot_is_an_error() {
        let (_, handler) = parse("class B < A { m() { super; } }");
        assert!(handler.had_syntax_error());
    }
}
