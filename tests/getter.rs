#[macro_use]
mod common;

#[cfg(test)]
mod getter {
    #[test]
    fn a_getter_is_invoked_without_parentheses_on_property_read() {
        assert_stdout!(
            r#"
            class Circle {
                init(radius) { this.radius = radius; }
                area { return 3 * this.radius * this.radius; }
            }
            print Circle(2).area;
            "#,
            ["12"]
        );
    }

    #[test]
    fn a_getter_runs_again_on_every_read() {
        assert_stdout!(
            r#"
            class Counter {
                init() { this.n = 0; }
                next { this.n = this.n + 1; return this.n; }
            }
            var c = Counter();
            print c.next;
            print c.next;
            print c.next;
            "#,
            ["1", "2", "3"]
        );
    }

    #[test]
    fn a_field_of_the_same_name_shadows_the_getter() {
        assert_stdout!(
            r#"
            class Foo {
                bar { return "getter"; }
            }
            var foo = Foo();
            print foo.bar;
            foo.bar = "field";
            print foo.bar;
            "#,
            ["getter", "field"]
        );
    }

    #[test]
    fn a_subclass_inherits_a_getter() {
        // Unlike static methods, instance methods (getters included) are inherited by walking
        // `superclass` in `Class::get_method`, so `Triangle` needs no `description` of its own.
        assert_stdout!(
            r#"
            class Shape {
                init(sides) { this.sides = sides; }
                description { return this.sides; }
            }
            class Triangle < Shape {
                init() { super.init(3); }
            }
            print Triangle().description;
            "#,
            ["3"]
        );
    }

    #[test]
    fn a_subclass_can_override_an_inherited_getter() {
        assert_stdout!(
            r#"
            class A {
                label { return "A"; }
            }
            class B < A {
                label { return "B"; }
            }
            print A().label;
            print B().label;
            "#,
            ["A", "B"]
        );
    }

    #[test]
    fn super_dot_getter_yields_a_bound_method_rather_than_auto_invoking() {
        // Unlike a plain `Get`, `super.name` always yields the bound method value rather than
        // auto-invoking — it only runs if the caller then calls it explicitly.
        assert_stdout!(
            r#"
            class A {
                label { return "A"; }
            }
            class B < A {
                label { return "B then " + super.label(); }
            }
            print B().label;
            "#,
            ["B then A"]
        );
    }

    #[test]
    fn a_getter_is_not_invoked_when_retrieved_as_a_bound_method_value() {
        assert_stdout!(
            r#"
            class Foo {
                method() { return "called"; }
            }
            var m = Foo().method;
            print m();
            "#,
            ["called"]
        );
    }
}
