#[macro_use]
mod common;

#[cfg(test)]
mod variable {
    #[test]
    fn a_local_cannot_collide_with_a_parameter() {
        assert_stderr!(
            r#"
            fun f(a) {
                var a = "value";
            }
            "#,
            [
                "[line: 3] Syntax Error: Error at 'a': A variable is already defined with name 'a' in this scope"
            ]
        );
    }

    #[test]
    fn a_local_cannot_be_declared_twice_in_the_same_scope() {
        assert_stderr!(
            r#"
            {
                var a = "first";
                var a = "second";
            }
            "#,
            [
                "[line: 4] Syntax Error: Error at 'a': A variable is already defined with name 'a' in this scope"
            ]
        );
    }

    #[test]
    fn globals_may_be_redeclared() {
        assert_stdout!(
            r#"
            var a = "first";
            var a = "second";
            print a;
            "#,
            ["second"]
        );
    }

    #[test]
    fn a_variable_used_in_its_own_initializer_is_a_resolve_error() {
        assert_stderr!(
            r#"
            {
                var a = "outer";
                var a = a;
            }
            "#,
            [
                "[line: 4] Syntax Error: Error at 'a': A variable is already defined with name 'a' in this scope"
            ]
        );
    }

    #[test]
    fn a_local_reading_itself_before_assignment_completes_is_a_resolve_error() {
        assert_stderr!(
            r#"
            {
                var a = "outer";
                {
                    var a = a;
                }
            }
            "#,
            [
                "[line: 5] Syntax Error: Error at 'a': Cannot read local variable in its own initializer"
            ]
        );
    }

    #[test]
    fn blocks_and_nested_blocks_resolve_to_the_nearest_declaration() {
        assert_stdout!(
            r#"
            var a = "global";
            {
                var a = "outer";
                {
                    var a = "inner";
                    print a;
                }
                print a;
            }
            print a;
            "#,
            ["inner", "outer", "global"]
        );
    }

    #[test]
    fn a_function_sees_the_global_scope_it_was_declared_in() {
        assert_stdout!(
            r#"
            var value = "before";
            fun f() { print value; }
            f();
            value = "after";
            f();
            "#,
            ["before", "after"]
        );
    }

    #[test]
    fn a_method_sees_locals_declared_within_it() {
        assert_stdout!(
            r#"
            class Foo {
                method() {
                    var local = "local";
                    print local;
                }
            }
            Foo().method();
            "#,
            ["local"]
        );
    }

    #[test]
    fn reading_an_undefined_global_is_a_runtime_error() {
        assert_stderr!(
            "print notDefined;",
            ["[line: 1] Runtime Error: Undefined variable 'notDefined'"]
        );
    }

    #[test]
    fn reading_an_undefined_local_is_a_runtime_error() {
        assert_stderr!(
            r#"
            {
                print notDefined;
            }
            "#,
            ["[line: 3] Runtime Error: Undefined variable 'notDefined'"]
        );
    }

    #[test]
    fn a_declaration_with_no_initializer_defaults_to_nil() {
        assert_stdout!(
            r#"
            var a;
            print a;
            "#,
            ["nil"]
        );
    }

    #[test]
    fn code_after_an_undefined_reference_in_a_dead_branch_never_runs() {
        assert_stdout!(
            r#"
            if (false) {
                print notDefined;
            }
            print "ok";
            "#,
            ["ok"]
        );
    }

    #[test]
    fn false_is_not_a_valid_variable_name() {
        assert_stderr!(
            "var false = 1;",
            ["[line: 1] Syntax Error: Error at 'false': Expect variable name"]
        );
    }

    #[test]
    fn nil_is_not_a_valid_variable_name() {
        assert_stderr!(
            "var nil = 1;",
            ["[line: 1] Syntax Error: Error at 'nil': Expect variable name"]
        );
    }

    #[test]
    fn this_is_not_a_valid_variable_name() {
        assert_stderr!(
            "var this = 1;",
            ["[line: 1] Syntax Error: Error at 'this': Expect variable name"]
        );
    }
}
