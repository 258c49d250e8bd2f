#[macro_use]
mod common;

#[cfg(test)]
mod r#if {
    #[test]
    fn a_class_decleration_is_not_a_valid_if_branch() {
        assert_stderr!(
            "if (true) class Foo {}",
            ["[line: 1] Syntax Error: Error at 'class': Expected expression"]
        );
    }

    #[test]
    fn dangling_else_binds_to_the_nearest_if() {
        assert_stdout!(
            r#"
            if (true) if (false) print "bad"; else print "good";
            "#,
            ["good"]
        );
    }

    #[test]
    fn else_runs_only_when_the_condition_is_falsy() {
        assert_stdout!(
            r#"
            if (true) print "good"; else print "bad";
            if (false) print "bad"; else print "good";
            if (false) print "bad"; else { print "block"; }
            "#,
            ["good", "good", "block"]
        );
    }

    #[test]
    fn the_then_branch_runs_only_when_the_condition_is_truthy() {
        assert_stdout!(
            r#"
            if (true) print "good";
            if (false) print "bad";
            if (true) { print "block"; }
            "#,
            ["good", "block"]
        );
    }

    #[test]
    fn truthiness_matches_lox_rules() {
        assert_stdout!(
            r#"
            if (false) print "bad"; else print "false";
            if (nil) print "bad"; else print "nil";
            if (true) print "true";
            if (0) print "0";
            if ("") print "empty";
            "#,
            ["false", "nil", "true", "0", "empty"]
        );
    }
}
