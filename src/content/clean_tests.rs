//! Tests for the cleaning pipeline.

use super::{CleanStep, clean};

mod steps {
    use super::*;

    #[test]
    fn strip_label_removes_label_before_real_newline() {
        assert_eq!(CleanStep::StripLabel.apply("\n: Odds Data\nbody"), "body");
    }

    #[test]
    fn strip_label_removes_label_before_escaped_newline() {
        assert_eq!(CleanStep::StripLabel.apply(": Odds Data\\nbody"), "body");
    }

    #[test]
    fn strip_label_removes_only_one_label() {
        assert_eq!(
            CleanStep::StripLabel.apply(": First\n: Second\nbody"),
            ": Second\nbody"
        );
    }

    #[test]
    fn strip_label_leaves_label_without_line_break() {
        assert_eq!(CleanStep::StripLabel.apply(": inline"), ": inline");
    }

    #[test]
    fn strip_label_requires_leading_position() {
        let text = "body\n: Odds Data\nmore";
        assert_eq!(CleanStep::StripLabel.apply(text), text);
    }

    #[test]
    fn escaped_newlines_become_spaces() {
        assert_eq!(CleanStep::EscapedNewlines.apply("a\\nb\\n"), "a b ");
    }

    #[test]
    fn line_breaks_become_spaces() {
        assert_eq!(CleanStep::LineBreaks.apply("a\nb\r\nc"), "a b  c");
    }

    #[test]
    fn edge_quotes_strip_one_on_each_side() {
        assert_eq!(CleanStep::EdgeQuotes.apply("\"quoted\""), "quoted");
        assert_eq!(CleanStep::EdgeQuotes.apply("\"\"twice\"\""), "\"twice\"");
        assert_eq!(CleanStep::EdgeQuotes.apply("  \"left"), "left");
        assert_eq!(CleanStep::EdgeQuotes.apply("right\"  "), "right");
    }

    #[test]
    fn edge_quotes_keep_inner_quotes() {
        assert_eq!(
            CleanStep::EdgeQuotes.apply("say \"hi\" now"),
            "say \"hi\" now"
        );
    }

    #[test]
    fn brace_artifacts_removed_everywhere() {
        assert_eq!(
            CleanStep::BraceArtifacts.apply("a\"}b\" }c}\"d} \"e"),
            "abcde"
        );
    }

    #[test]
    fn brace_artifacts_removed_when_spliced_together() {
        assert_eq!(CleanStep::BraceArtifacts.apply("x\"\"}}y"), "xy");
    }

    #[test]
    fn lone_braces_are_kept() {
        assert_eq!(CleanStep::BraceArtifacts.apply("{a} b"), "{a} b");
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(
            CleanStep::CollapseWhitespace.apply("a  b\t\tc \n d e"),
            "a b c d e"
        );
    }

    #[test]
    fn trim_removes_surrounding_whitespace() {
        assert_eq!(CleanStep::Trim.apply("  a b \n"), "a b");
    }

    #[test]
    fn pipeline_order_is_fixed() {
        assert_eq!(CleanStep::PIPELINE.first(), Some(&CleanStep::StripLabel));
        assert_eq!(CleanStep::PIPELINE.last(), Some(&CleanStep::Trim));
        assert_eq!(CleanStep::PIPELINE.len(), 7);
    }
}

mod pipeline {
    use super::*;

    #[test]
    fn empty_section_stays_empty() {
        assert_eq!(clean(""), "");
    }

    #[test]
    fn whitespace_only_section_becomes_empty() {
        assert_eq!(clean(" \n\t \\n "), "");
    }

    #[test]
    fn cleans_typical_model_section() {
        assert_eq!(
            clean("\n: Odds Data\\nPrates is favored\\nheavily\"}\n\n"),
            "Prates is favored heavily"
        );
    }

    #[test]
    fn cleaning_is_idempotent() {
        let once = clean("\n\"Final\\ncontent\"}\n");
        assert_eq!(once, "Final content");
        assert_eq!(clean(&once), once);
    }

    #[test]
    fn edge_quote_behind_artifact_is_removed() {
        let once = clean("}\"\"Home win\"{");
        assert_eq!(once, "Home win\"{");
        assert_eq!(clean(&once), once);
        assert_eq!(clean("\"Away win\"\"}"), "Away win");
    }
}
