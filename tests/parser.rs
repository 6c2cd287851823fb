#[cfg(test)]
mod parser_tests {
    use lox_interpreter as lox;

    use lox::ast_printer::AstPrinter;
    use lox::diagnostic::Diagnostics;
    use lox::expr::Expr;
    use lox::parser::Parser;
    use lox::scanner::Scanner;
    use lox::stmt::Stmt;
    use lox::value::Value;

    /// Parses `source` and returns the printed statements plus rendered errors.
    fn parse(source: &str) -> (Vec<String>, Vec<String>) {
        let mut diagnostics = Diagnostics::new();
        let tokens = Scanner::new(source).scan_tokens(&mut diagnostics);
        let statements = Parser::new(&tokens, &mut diagnostics).parse();

        let printed = statements.iter().map(AstPrinter::print_stmt).collect();
        let errors = diagnostics.errors().map(|e| e.to_string()).collect();

        (printed, errors)
    }

    fn parse_ok(source: &str) -> Vec<String> {
        let (printed, errors) = parse(source);
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        printed
    }

    #[test]
    fn factor_binds_tighter_than_term() {
        assert_eq!(
            parse_ok("print 1 + 2 * 3;"),
            ["(print (+ 1.0 (* 2.0 3.0)))"]
        );
    }

    #[test]
    fn binary_levels_are_left_associative() {
        assert_eq!(parse_ok("1 - 2 - 3;"), ["(expr (- (- 1.0 2.0) 3.0))"]);
        assert_eq!(parse_ok("8 / 4 / 2;"), ["(expr (/ (/ 8.0 4.0) 2.0))"]);
    }

    #[test]
    fn full_precedence_ladder() {
        assert_eq!(
            parse_ok("a = b or c and d == e < f + g * -h;"),
            ["(expr (= a (or b (and c (== d (< e (+ f (* g (- h)))))))))"]
        );
    }

    #[test]
    fn comparison_and_addition_mix_without_parentheses() {
        assert_eq!(
            parse_ok("1 + 2 < 3 + 4;"),
            ["(expr (< (+ 1.0 2.0) (+ 3.0 4.0)))"]
        );
    }

    #[test]
    fn assignment_is_right_associative() {
        assert_eq!(parse_ok("a = b = 3;"), ["(expr (= a (= b 3.0)))"]);
    }

    #[test]
    fn grouping_and_unary() {
        assert_eq!(
            parse_ok("!(1 + 2) * -3;"),
            ["(expr (* (! (group (+ 1.0 2.0))) (- 3.0)))"]
        );
    }

    #[test]
    fn literals() {
        assert_eq!(
            parse_ok("print true; print false; print null; print \"hi\"; print 2.5;"),
            [
                "(print true)",
                "(print false)",
                "(print null)",
                "(print hi)",
                "(print 2.5)"
            ]
        );
    }

    #[test]
    fn statements() {
        assert_eq!(
            parse_ok("var a; var b = 1; { print a; } if (a) print 1; else print 2; while (b) b = b - 1;"),
            [
                "(var a)",
                "(var b 1.0)",
                "(block (print a))",
                "(if a (print 1.0) (print 2.0))",
                "(while b (expr (= b (- b 1.0))))",
            ]
        );
    }

    #[test]
    fn dangling_else_binds_to_nearest_if() {
        assert_eq!(
            parse_ok("if (a) if (b) print 1; else print 2;"),
            ["(if a (if b (print 1.0) (print 2.0)))"]
        );
    }

    #[test]
    fn for_loop_desugars_to_block_and_while() {
        assert_eq!(
            parse_ok("for (var i = 0; i < 3; i = i + 1) print i;"),
            ["(block (var i 0.0) (while (< i 3.0) (block (print i) (expr (= i (+ i 1.0))))))"]
        );
    }

    #[test]
    fn for_loop_with_empty_clauses() {
        assert_eq!(parse_ok("for (;;) print 1;"), ["(while true (print 1.0))"]);
    }

    #[test]
    fn for_loop_with_expression_initializer() {
        assert_eq!(
            parse_ok("for (i = 0; i < 1;) print i;"),
            ["(block (expr (= i 0.0)) (while (< i 1.0) (print i)))"]
        );
    }

    #[test]
    fn missing_variable_name_reports_at_semicolon() {
        let (printed, errors) = parse("var ;\nprint 1;");

        assert_eq!(errors, ["[line 1] Error at ';': Expect variable name."]);
        assert_eq!(printed, ["(print 1.0)"]);
    }

    #[test]
    fn error_at_end_of_input() {
        let (_, errors) = parse("print 1");

        assert_eq!(errors, ["[line 1] Error at end: Expect ';' after value."]);
    }

    #[test]
    fn synchronization_reports_each_bad_statement() {
        let (printed, errors) = parse("print ;\nvar = 2;\nprint 3;\n1 + ;");

        assert_eq!(
            errors,
            [
                "[line 1] Error at ';': Expect expression.",
                "[line 2] Error at '=': Expect variable name.",
                "[line 4] Error at ';': Expect expression.",
            ]
        );
        assert_eq!(printed, ["(print 3.0)"]);
    }

    #[test]
    fn synchronization_stops_before_statement_keyword() {
        let (printed, errors) = parse("1 + + 2 print 5;");

        assert_eq!(errors.len(), 1);
        assert_eq!(printed, ["(print 5.0)"]);
    }

    #[test]
    fn errors_inside_block_recover_locally() {
        let (printed, errors) = parse("{ var = 1; print 2; }");

        assert_eq!(errors.len(), 1);
        assert_eq!(printed, ["(block (print 2.0))"]);
    }

    #[test]
    fn unclosed_block() {
        let (printed, errors) = parse("{ print 1;");

        assert_eq!(errors, ["[line 1] Error at end: Expect '}' after block."]);
        assert!(printed.is_empty());
    }

    #[test]
    fn invalid_assignment_target_is_reported_without_unwinding() {
        let (printed, errors) = parse("1 + a = 3; print 4;");

        assert_eq!(errors, ["[line 1] Error at '=': Invalid assignment target."]);
        assert_eq!(printed, ["(expr 3.0)", "(print 4.0)"]);
    }

    #[test]
    fn parsing_twice_gives_identical_trees() {
        let mut diagnostics = Diagnostics::new();
        let tokens = Scanner::new("var a = 1; while (a < 3) { a = a + 1; }")
            .scan_tokens(&mut diagnostics);

        let mut parser = Parser::new(&tokens, &mut diagnostics);
        let first: Vec<Stmt> = parser.parse();
        let second: Vec<Stmt> = parser.parse();

        assert_eq!(first, second);
        assert_eq!(
            first,
            Parser::new(&tokens, &mut Diagnostics::new()).parse()
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn parse_expression_requires_a_single_expression() {
        let mut diagnostics = Diagnostics::new();
        let tokens = Scanner::new("(1 + 2) * 3").scan_tokens(&mut diagnostics);
        let expr = Parser::new(&tokens, &mut diagnostics).parse_expression();

        assert_eq!(
            expr.as_ref().map(AstPrinter::print).as_deref(),
            Some("(* (group (+ 1.0 2.0)) 3.0)")
        );

        let tokens = Scanner::new("1 2").scan_tokens(&mut diagnostics);
        assert!(Parser::new(&tokens, &mut diagnostics)
            .parse_expression()
            .is_none());
        assert!(diagnostics.had_error());
    }

    #[test]
    fn literal_nodes_hold_runtime_values() {
        let mut diagnostics = Diagnostics::new();
        let tokens = Scanner::new("\"x\";").scan_tokens(&mut diagnostics);
        let statements = Parser::new(&tokens, &mut diagnostics).parse();

        assert_eq!(
            statements,
            [Stmt::Expression(Expr::Literal(Value::String("x".into())))]
        );
    }

    #[test]
    fn statements_serialize_to_json() {
        let mut diagnostics = Diagnostics::new();
        let tokens = Scanner::new("print 1;").scan_tokens(&mut diagnostics);
        let statements = Parser::new(&tokens, &mut diagnostics).parse();

        let json = serde_json::to_value(&statements).unwrap();
        assert_eq!(json, serde_json::json!([{ "Print": { "Literal": { "Number": 1.0 } } }]));
    }
}
