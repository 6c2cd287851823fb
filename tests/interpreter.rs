#[cfg(test)]
mod interpreter_tests {
    use lox_interpreter as lox;

    use lox::diagnostic::Diagnostics;
    use lox::lox::Lox;
    use lox::value::Value;

    /// Runs `source` in a fresh session; returns printed lines and diagnostics.
    fn run(source: &str) -> (Vec<String>, Diagnostics) {
        let mut session = Lox::with_output(Vec::new());
        let diagnostics = session.run(source);
        let out = String::from_utf8(session.into_output()).unwrap();

        (out.lines().map(str::to_owned).collect(), diagnostics)
    }

    fn run_ok(source: &str) -> Vec<String> {
        let (out, diagnostics) = run(source);
        let errors: Vec<String> = diagnostics.errors().map(|e| e.to_string()).collect();
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        out
    }

    fn runtime_error(source: &str) -> (Vec<String>, String) {
        let (out, diagnostics) = run(source);
        assert!(!diagnostics.had_error());
        assert!(diagnostics.had_runtime_error());

        let error = diagnostics.errors().next().unwrap().to_string();
        (out, error)
    }

    #[test]
    fn arithmetic_precedence() {
        assert_eq!(run_ok("print 1 + 2 * 3;"), ["7"]);
        assert_eq!(run_ok("print (1 + 2) * 3;"), ["9"]);
        assert_eq!(run_ok("print 10 - 4 - 3;"), ["3"]);
        assert_eq!(run_ok("print 7 / 2;"), ["3.5"]);
        assert_eq!(run_ok("print -2 * -.5;"), ["1"]);
    }

    #[test]
    fn arithmetic_matches_f64() {
        assert_eq!(run_ok("print 0.1 + 0.2;"), [(0.1f64 + 0.2).to_string()]);
        assert_eq!(run_ok("print 1 / 3;"), [(1.0f64 / 3.0).to_string()]);
    }

    #[test]
    fn division_by_zero_follows_ieee() {
        assert_eq!(
            run_ok("print 1 / 0; print -1 / 0; print 0 / 0;"),
            ["Infinity", "-Infinity", "NaN"]
        );
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(run_ok("print \"foo\" + \"bar\";"), ["foobar"]);
    }

    #[test]
    fn equality_is_by_value_without_coercion() {
        assert_eq!(
            run_ok(
                "print \"a\" == \"a\"; print \"a\" == 1; print null == null; \
                 print null == false; print 1 == 1.0; print true != false;"
            ),
            ["true", "false", "true", "false", "true", "true"]
        );
    }

    #[test]
    fn comparisons() {
        assert_eq!(
            run_ok("print 1 < 2; print 2 <= 2; print 3 > 4; print 4 >= 4;"),
            ["true", "true", "false", "true"]
        );
    }

    #[test]
    fn truthiness_and_negation() {
        assert_eq!(
            run_ok("print !null; print !0; print !\"\"; print !!true;"),
            ["true", "false", "false", "true"]
        );
    }

    #[test]
    fn logical_operators_return_operands() {
        assert_eq!(
            run_ok("print null or \"x\"; print 1 or 2; print null and 1; print 1 and 2;"),
            ["x", "1", "null", "2"]
        );
    }

    #[test]
    fn logical_operators_short_circuit() {
        assert_eq!(
            run_ok("var a = 1; true or (a = 2); false and (a = 3); print a;"),
            ["1"]
        );
        // The right side would be a runtime error if evaluated.
        assert_eq!(run_ok("print true or -\"x\";"), ["true"]);
    }

    #[test]
    fn uninitialized_variable_is_null() {
        assert_eq!(run_ok("var a; print a;"), ["null"]);
    }

    #[test]
    fn block_shadowing_restores_outer_binding() {
        assert_eq!(
            run_ok("var a = 1; { var a = 2; print a; } print a;"),
            ["2", "1"]
        );
    }

    #[test]
    fn assignment_reaches_enclosing_scope() {
        assert_eq!(
            run_ok("var a = 1; { a = 2; { a = a + 1; } } print a;"),
            ["3"]
        );
    }

    #[test]
    fn assignment_is_an_expression() {
        assert_eq!(run_ok("var a; var b; a = b = 5; print a; print b;"), ["5", "5"]);
    }

    #[test]
    fn redeclaration_in_same_scope_overwrites() {
        assert_eq!(run_ok("var a = 1; var a = \"two\"; print a;"), ["two"]);
    }

    #[test]
    fn block_locals_are_dropped_on_exit() {
        let (out, error) = runtime_error("{ var inner = 1; } print inner;");

        assert!(out.is_empty());
        assert_eq!(error, "Undefined variable 'inner'.\n[line 1]");
    }

    #[test]
    fn if_else() {
        assert_eq!(
            run_ok("if (0) print \"zero is truthy\"; else print \"no\"; if (null) print 1; else print 2; if (false) print 3;"),
            ["zero is truthy", "2"]
        );
    }

    #[test]
    fn while_loop_sees_assignments_from_body() {
        assert_eq!(
            run_ok("var i = 0; while (i < 3) { print i; i = i + 1; }"),
            ["0", "1", "2"]
        );
    }

    #[test]
    fn for_loop() {
        assert_eq!(
            run_ok("for (var i = 0; i < 3; i = i + 1) print i;"),
            ["0", "1", "2"]
        );
    }

    #[test]
    fn for_loop_variable_is_scoped_to_the_loop() {
        let (out, error) = runtime_error("for (var i = 0; i < 1; i = i + 1) {} print i;");

        assert!(out.is_empty());
        assert_eq!(error, "Undefined variable 'i'.\n[line 1]");
    }

    #[test]
    fn each_loop_iteration_gets_a_fresh_scope() {
        assert_eq!(
            run_ok("var n = 0; while (n < 2) { var x; print x; x = n; n = n + 1; }"),
            ["null", "null"]
        );
    }

    #[test]
    fn fibonacci() {
        assert_eq!(
            run_ok(
                "var a = 0; var b = 1;
                 for (var i = 0; i < 8; i = i + 1) { print a; var t = a; a = b; b = t + b; }"
            ),
            ["0", "1", "1", "2", "3", "5", "8", "13"]
        );
    }

    #[test]
    fn mixed_plus_operands_is_a_runtime_error() {
        let (out, error) = runtime_error("print 1;\n1 + \"a\";\nprint 2;");

        assert_eq!(out, ["1"]);
        assert_eq!(error, "Operands must be two numbers or two strings.\n[line 2]");
    }

    #[test]
    fn numeric_operators_reject_other_types() {
        for source in ["\"a\" - 1;", "true * 2;", "null / 1;", "1 < \"b\";", "\"a\" >= \"b\";"] {
            let (_, error) = runtime_error(source);
            assert_eq!(error, "Operands must be numbers.\n[line 1]", "source: {}", source);
        }
    }

    #[test]
    fn negating_a_non_number_is_a_runtime_error() {
        let (_, error) = runtime_error("-\"x\";");

        assert_eq!(error, "Operand must be a number.\n[line 1]");
    }

    #[test]
    fn assigning_an_undeclared_variable_is_a_runtime_error() {
        let (_, error) = runtime_error("\n\nx = 1;");

        assert_eq!(error, "Undefined variable 'x'.\n[line 3]");
    }

    #[test]
    fn runtime_error_inside_block_restores_scope() {
        let mut session = Lox::with_output(Vec::new());

        session.run("var a = \"outer\";");
        let diagnostics = session.run("{ var a = \"inner\"; a + 1; }");
        assert!(diagnostics.had_runtime_error());

        let diagnostics = session.run("print a;");
        assert!(diagnostics.is_empty());

        let out = String::from_utf8(session.into_output()).unwrap();
        assert_eq!(out, "outer\n");
    }

    #[test]
    fn static_errors_suppress_execution() {
        let (out, diagnostics) = run("print 1;\nvar ;\nprint 2;");

        assert!(out.is_empty());
        assert!(diagnostics.had_error());
        assert!(!diagnostics.had_runtime_error());
    }

    #[test]
    fn lex_errors_suppress_execution() {
        let (out, diagnostics) = run("print 1; @");

        assert!(out.is_empty());
        assert!(diagnostics.had_error());
    }

    #[test]
    fn session_keeps_globals_between_runs() {
        let mut session = Lox::with_output(Vec::new());

        assert!(session.run("var count = 1;").is_empty());
        assert!(session.run("count = count + 1;").is_empty());
        assert!(session.run("print count;").is_empty());

        // A bad line does not poison the session.
        assert!(session.run("print ;").had_error());
        assert!(session.run("print undefined;").had_runtime_error());
        assert!(session.run("print count * 10;").is_empty());

        let out = String::from_utf8(session.into_output()).unwrap();
        assert_eq!(out, "2\n20\n");
    }

    #[test]
    fn evaluate_single_expression() {
        let mut session = Lox::with_output(Vec::new());

        let (value, diagnostics) = session.evaluate("\"ab\" + \"cd\"");
        assert_eq!(value, Some(Value::String("abcd".into())));
        assert!(diagnostics.is_empty());

        let (value, diagnostics) = session.evaluate("1 +");
        assert_eq!(value, None);
        assert!(diagnostics.had_error());

        let (value, diagnostics) = session.evaluate("-true");
        assert_eq!(value, None);
        assert!(diagnostics.had_runtime_error());
    }
}
