use proptest::prelude::*;
use shell_relay::types::OutputChunk;

proptest! {
    #[test]
    fn chunk_is_a_bounded_prefix(text in "\\PC{0,64}", max_len in 1usize..80) {
        let chunk = OutputChunk::new(text.clone(), max_len);
        let out = chunk.as_str();

        prop_assert!(out.len() <= max_len);
        prop_assert!(text.starts_with(out));
        // Nothing is dropped that would still have fit.
        if let Some(next) = text[out.len()..].chars().next() {
            prop_assert!(out.len() + next.len_utf8() > max_len);
        }
    }

    #[test]
    fn short_text_is_untouched(text in "[a-z\\n ]{0,32}") {
        let chunk = OutputChunk::new(text.clone(), 32);
        prop_assert_eq!(chunk.into_string(), text);
    }
}
