#[macro_use]
mod common;

#[cfg(test)]
mod field {
    #[test]
    fn fields_can_be_read_and_written_on_an_instance() {
        assert_stdout!(
            r#"
            class Foo {}
            var foo = Foo();
            foo.bar = 1;
            foo.baz = 2;
            print foo.bar;
            print foo.baz;
            "#,
            ["1", "2"]
        );
    }

    #[test]
    fn a_field_holding_a_function_can_be_called() {
        assert_stdout!(
            r#"
            class Box {}
            var box = Box();
            fun bar(a, b) { return a + b; }
            box.fn = bar;
            print box.fn(1, 2);
            "#,
            ["3"]
        );
    }

    #[test]
    fn fields_shadow_methods_of_the_same_name() {
        assert_stdout!(
            r#"
            class Foo {
                bar() { return "method"; }
            }
            var foo = Foo();
            print foo.bar();
            foo.bar = "field";
            print foo.bar;
            "#,
            ["method", "field"]
        );
    }

    #[test]
    fn getting_a_property_on_a_non_instance_is_a_runtime_error() {
        assert_stderr!(
            "true.foo;",
            ["[line: 1] Runtime Error: Only instances have properties"]
        );
    }

    #[test]
    fn setting_a_field_on_a_non_instance_is_a_runtime_error() {
        assert_stderr!(
            "true.foo = 1;",
            ["[line: 1] Runtime Error: Only instances have fields"]
        );
    }

    #[test]
    fn reading_an_undefined_property_is_a_runtime_error() {
        assert_stderr!(
            r#"
            class Foo {}
            var foo = Foo();
            print foo.bar;
            "#,
            ["[line: 4] Runtime Error: Undefined property 'bar'"]
        );
    }

    #[test]
    fn a_method_retrieved_as_a_value_stays_bound_to_its_instance() {
        assert_stdout!(
            r#"
            class Foo {
                method() { return this.value; }
            }
            var foo = Foo();
            foo.value = 1;
            var m = foo.method;
            print m();
            "#,
            ["1"]
        );
    }
}
