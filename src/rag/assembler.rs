//! Grounded prompt assembly.
//!
//! Turns retrieved passages into the tagged source blocks the prompts refer
//! to. Pure functions; the same input always yields the same text.
//!
//! Passage names and content are escaped (`&`, `<`, `>`), so a passage can
//! never close or open a tag of its own.

use std::fmt::Write;

use quick_xml::escape::partial_escape;

use crate::core::RetrievedPassage;

/// Block emitted in place of sources when retrieval found nothing.
pub const NO_SOURCES_BLOCK: &str =
    "<source><name>none</name><content>No sources found.</content></source>";

/// Formats passages as `<source>` blocks separated by blank lines, in the
/// order given. Zero passages produce [`NO_SOURCES_BLOCK`].
#[must_use]
pub fn format_sources(passages: &[RetrievedPassage]) -> String {
    if passages.is_empty() {
        return NO_SOURCES_BLOCK.to_string();
    }

    let mut out = String::new();
    for (i, p) in passages.iter().enumerate() {
        if i > 0 {
            out.push_str("\n\n");
        }
        let _ = write!(
            out,
            "<source><name>{}</name><content>{}</content></source>",
            partial_escape(&p.source_name),
            partial_escape(&p.content)
        );
    }
    out
}

/// Builds the user turn that carries the sources and the question.
#[must_use]
pub fn build_grounded_turn(question: &str, passages: &[RetrievedPassage]) -> String {
    format!(
        "Sources:\n\n{}\n\nQuestion: {question}",
        format_sources(passages)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_passage() {
        let passages = vec![RetrievedPassage::new("Atlas", "Paris is the capital of France.")];
        assert_eq!(
            build_grounded_turn("What is its capital?", &passages),
            "Sources:\n\n<source><name>Atlas</name><content>Paris is the capital of France.</content></source>\n\nQuestion: What is its capital?"
        );
    }

    #[test]
    fn test_blocks_separated_by_blank_line() {
        let passages = vec![
            RetrievedPassage::new("a", "one"),
            RetrievedPassage::new("b", "two"),
        ];
        assert_eq!(
            format_sources(&passages),
            "<source><name>a</name><content>one</content></source>\n\n<source><name>b</name><content>two</content></source>"
        );
    }

    #[test]
    fn test_no_passages_yields_no_sources_block() {
        let turn = build_grounded_turn("Anything?", &[]);
        assert!(turn.contains(NO_SOURCES_BLOCK));
        assert_eq!(turn.matches("<source>").count(), 1);
        assert!(turn.ends_with("Question: Anything?"));
    }

    #[test]
    fn test_markup_in_passages_is_escaped() {
        let passages = vec![RetrievedPassage::new(
            "R&D <draft>",
            "torque > 20 Nm</content></source><source>",
        )];
        let text = format_sources(&passages);
        assert_eq!(
            text,
            "<source><name>R&amp;D &lt;draft&gt;</name><content>torque &gt; 20 Nm&lt;/content&gt;&lt;/source&gt;&lt;source&gt;</content></source>"
        );
        assert_eq!(text.matches("</content>").count(), 1);
        assert_eq!(text.matches("<source>").count(), 1);
    }

    fn passage() -> impl Strategy<Value = RetrievedPassage> {
        ("[A-Za-z0-9 .&<>/]{1,16}", "[A-Za-z0-9 .,&<>/]{0,48}")
            .prop_map(|(name, content)| RetrievedPassage::new(name, content))
    }

    proptest! {
        #[test]
        fn prop_assembly_is_deterministic(
            question in "[A-Za-z ?]{1,32}",
            passages in proptest::collection::vec(passage(), 0..8),
        ) {
            prop_assert_eq!(
                build_grounded_turn(&question, &passages),
                build_grounded_turn(&question, &passages)
            );
        }

        #[test]
        fn prop_passage_order_preserved(passages in proptest::collection::vec(passage(), 1..8)) {
            let text = format_sources(&passages);
            let mut cursor = 0;
            for p in &passages {
                let block = format!(
                    "<source><name>{}</name><content>{}</content></source>",
                    partial_escape(&p.source_name),
                    partial_escape(&p.content)
                );
                let found = text[cursor..].find(&block);
                prop_assert!(found.is_some());
                cursor += found.unwrap_or(0) + block.len();
            }
            prop_assert_eq!(text.matches("<source>").count(), passages.len());
            prop_assert_eq!(text.matches("</content>").count(), passages.len());
        }

        #[test]
        fn prop_escaped_content_unescapes_to_original(p in passage()) {
            let text = format_sources(std::slice::from_ref(&p));
            let start = text.find("<content>").unwrap_or(0) + "<content>".len();
            let end = text.rfind("</content>").unwrap_or(text.len());
            let restored = quick_xml::escape::unescape(&text[start..end])
                .map(std::borrow::Cow::into_owned)
                .unwrap_or_default();
            prop_assert_eq!(restored, p.content);
        }
    }
}
