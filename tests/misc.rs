#[macro_use]
mod common;

#[cfg(test)]
mod misc {
    #[test]
    fn an_empty_file_produces_no_output_and_no_error() {
        assert_stdout!("", []);
    }

    #[test]
    fn operator_precedence_matches_arithmetic_convention() {
        assert_stdout!(
            r#"
            print 2 + 3 * 4;
            print (2 + 3) * 4;
            print 2 - 3 - 1;
            print 10 / 2 / 5;
            print 1 < 2 == 3 < 4;
            "#,
            ["14", "20", "-2", "1", "true"]
        );
    }

    #[test]
    fn an_unexpected_character_is_a_scan_error() {
        assert_stderr!(
            r#"
            print "before";
            $
            "#,
            ["[line: 3] Syntax Error: Unexpected Character $"]
        );
    }
}
