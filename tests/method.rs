#[macro_use]
mod common;

#[cfg(test)]
mod method {
    #[test]
    fn a_method_can_take_arguments() {
        assert_stdout!(
            r#"
            class Math {
                add(a, b) { return a + b; }
            }
            print Math().add(1, 2);
            "#,
            ["3"]
        );
    }

    #[test]
    fn a_method_with_an_empty_body_returns_nil() {
        assert_stdout!(
            r#"
            class Foo {
                bar() {}
            }
            print Foo().bar();
            "#,
            ["nil"]
        );
    }

    #[test]
    fn calling_a_method_with_the_wrong_arity_is_a_runtime_error() {
        assert_stderr!(
            r#"
            class Foo {
                bar(a, b) {}
            }
            Foo().bar(1, 2, 3, 4);
            "#,
            ["[line: 5] Runtime Error: Expected 2 arguments but got 4"]
        );
    }

    #[test]
    fn calling_an_undefined_method_is_a_runtime_error() {
        assert_stderr!(
            r#"
            class Foo {}
            Foo().unknown();
            "#,
            ["[line: 3] Runtime Error: Undefined property 'unknown'"]
        );
    }

    #[test]
    fn a_bound_method_prints_like_a_function() {
        assert_stdout!(
            r#"
            class Foo {
                method() {}
            }
            print Foo().method;
            "#,
            ["<fn method()>"]
        );
    }

    #[test]
    fn referring_to_a_method_name_without_this_is_an_undefined_variable() {
        assert_stderr!(
            r#"
            class Foo {
                method() { return method; }
            }
            Foo().method();
            "#,
            ["[line: 3] Runtime Error: Undefined variable 'method'"]
        );
    }
}
