#[macro_use]
mod common;

#[cfg(test)]
mod bool {
    #[test]
    fn equality_between_bools() {
        assert_stdout!(
            r#"
            print true == true;
            print true == false;
            print false == true;
            print false == false;
            "#,
            ["true", "false", "false", "true"]
        );
    }

    #[test]
    fn equality_across_types_is_always_false_and_never_errors() {
        assert_stdout!(
            r#"
            print true == 1;
            print false == nil;
            print true != "true";
            "#,
            ["false", "false", "true"]
        );
    }

    #[test]
    fn not_negates_truthiness() {
        assert_stdout!(
            r#"
            print !true;
            print !false;
            print !!true;
            "#,
            ["false", "true", "true"]
        );
    }
}
