#[macro_use]
mod common;

#[cfg(test)]
mod comment {
    #[test]
    fn a_line_comment_at_eof_does_not_error() {
        assert_stdout!(
            "print \"ok\"; // trailing comment with no newline after it",
            ["ok"]
        );
    }

    #[test]
    fn a_source_file_of_only_comments_produces_no_output() {
        assert_stdout!(
            r#"
            // nothing to see here
            /* nor here */
            "#,
            []
        );
    }

    #[test]
    fn a_block_comment_can_contain_unicode() {
        assert_stdout!(
            r#"
            /* 日本語 ümlaut ☃ */
            print "ok";
            "#,
            ["ok"]
        );
    }
}
