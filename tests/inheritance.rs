#[macro_use]
mod common;

#[cfg(test)]
mod inheritance {
    #[test]
    fn a_subclass_initializer_can_call_super_init() {
        assert_stdout!(
            r#"
            class A { init(v) { this.v = v; } }
            class B < A {}
            print B(10).v;
            "#,
            ["10"]
        );
    }

    #[test]
    fn inheriting_from_a_function_is_a_runtime_error() {
        assert_stderr!(
            r#"
            fun NotAClass() {}
            class Subclass < NotAClass {}
            "#,
            ["[line: 3] Runtime Error: Superclass must be a class"]
        );
    }

    #[test]
    fn inheriting_from_a_nil_global_is_a_runtime_error() {
        assert_stderr!(
            r#"
            var Foo = nil;
            class Bar < Foo {}
            "#,
            ["[line: 3] Runtime Error: Superclass must be a class"]
        );
    }

    #[test]
    fn inheriting_from_a_number_is_a_runtime_error() {
        assert_stderr!(
            r#"
            var Foo = 123;
            class Bar < Foo {}
            "#,
            ["[line: 3] Runtime Error: Superclass must be a class"]
        );
    }

    #[test]
    fn a_subclass_inherits_and_can_override_methods() {
        assert_stdout!(
            r#"
            class A {
                foo() { return "A.foo"; }
                bar() { return "A.bar"; }
            }
            class B < A {
                bar() { return "B.bar"; }
            }
            var b = B();
            print b.foo();
            print b.bar();
            "#,
            ["A.foo", "B.bar"]
        );
    }

    #[test]
    fn setting_fields_from_an_inherited_initializer_is_visible_on_the_subclass() {
        assert_stdout!(
            r#"
            class Base {
                init() { this.greeting = "hello"; }
                sayHi() { print this.greeting; }
            }
            class Derived < Base {}
            Derived().sayHi();
            "#,
            ["hello"]
        );
    }
}
