use localrag_core::chunker::TextChunker;
use localrag_core::types::{DocType, Document};
use proptest::prelude::*;

fn doc(content: &str) -> Document {
    Document::new(content, "notes.txt", DocType::Text).with_meta("filename", "notes.txt")
}

#[test]
fn empty_document_yields_no_passages() {
    let chunker = TextChunker::default();
    assert!(chunker.split(&doc("")).is_empty());
    assert!(chunker.split(&doc("   \n\t  ")).is_empty(), "whitespace-only trims to nothing");
}

#[test]
fn short_document_is_a_single_passage() {
    let chunker = TextChunker::default();
    let passages = chunker.split(&doc("  A short note. Nothing more.  "));
    assert_eq!(passages.len(), 1);
    let p = &passages[0];
    assert_eq!(p.content, "A short note. Nothing more.");
    assert_eq!(p.chunk_index, 0);
    assert_eq!(p.start_offset, 0);
    assert_eq!(p.end_offset, 31);
    assert_eq!(p.source, "notes.txt");
    assert_eq!(p.metadata.get("filename").and_then(|v| v.as_str()), Some("notes.txt"));
}

#[test]
fn splits_on_sentence_boundaries() {
    let text = "The sky is blue. The grass is green.";
    let chunker = TextChunker::with_sizes(20, 5);
    let passages = chunker.split(&doc(text));

    assert!(passages.len() >= 2, "got {passages:?}");
    assert_eq!(passages[0].content, "The sky is blue.");
    assert_eq!(passages[0].end_offset, 16, "boundary character is included");
    assert!(passages.last().is_some_and(|p| p.content.ends_with("green.")));
    for (i, p) in passages.iter().enumerate() {
        assert_eq!(p.chunk_index, i);
        assert!(p.content.chars().count() <= 20, "passage longer than the window: {:?}", p.content);
    }
}

#[test]
fn window_without_punctuation_is_cut_at_chunk_size() {
    let text = "abcdefghij".repeat(5);
    let passages = TextChunker::with_sizes(20, 5).split(&doc(&text));
    let offsets: Vec<(usize, usize)> = passages.iter().map(|p| (p.start_offset, p.end_offset)).collect();
    assert_eq!(offsets, vec![(0, 20), (15, 35), (30, 50)]);
}

#[test]
fn offsets_count_characters_not_bytes() {
    let text = "Ünïcödé wörds hérè. Ånd mörë tëxt fôllöws hérè.";
    let passages = TextChunker::with_sizes(25, 5).split(&doc(text));
    let chars: Vec<char> = text.chars().collect();
    for p in &passages {
        let window: String = chars[p.start_offset..p.end_offset].iter().collect();
        assert_eq!(window.trim(), p.content);
    }
}

#[test]
fn overlap_not_smaller_than_chunk_size_still_terminates() {
    let text = "x".repeat(40);
    let passages = TextChunker::with_sizes(10, 50).split(&doc(&text));
    assert!(!passages.is_empty());
    assert_eq!(passages.last().map(|p| p.end_offset), Some(40));
    for pair in passages.windows(2) {
        assert!(pair[1].start_offset > pair[0].start_offset, "cursor must move forward");
    }
}

#[test]
fn split_documents_restarts_chunk_index_per_document() {
    let chunker = TextChunker::with_sizes(10, 2);
    let docs = vec![
        Document::new("first doc has words in it", "a.txt", DocType::Text),
        Document::new("second doc also has words", "b.txt", DocType::Text),
    ];
    let passages = chunker.split_documents(&docs);
    let first_b = passages.iter().position(|p| p.source == "b.txt").expect("b passages");
    assert_eq!(passages[first_b].chunk_index, 0);
    assert!(passages[..first_b].iter().all(|p| p.source == "a.txt"));
}

proptest! {
    #[test]
    fn passages_cover_the_whole_document(
        text in "[a-z .!?]{0,400}",
        chunk_size in 1usize..80,
        overlap_frac in 0.0f64..1.0,
    ) {
        let overlap = (chunk_size as f64 * overlap_frac) as usize;
        let passages = TextChunker::with_sizes(chunk_size, overlap).split(&doc(&text));
        let chars: Vec<char> = text.chars().collect();

        let mut covered = vec![false; chars.len()];
        for p in &passages {
            prop_assert!(p.start_offset < p.end_offset);
            prop_assert!(p.end_offset <= chars.len());
            for c in &mut covered[p.start_offset..p.end_offset] { *c = true; }
        }
        for (i, c) in covered.iter().enumerate() {
            // Windows that trimmed to nothing are dropped, so only whitespace may be left uncovered.
            prop_assert!(*c || chars[i] == ' ', "char {} ({:?}) not covered", i, chars[i]);
        }
    }

    #[test]
    fn terminates_within_bound_without_punctuation(
        text in "[a-z ]{0,500}",
        chunk_size in 1usize..60,
        overlap_frac in 0.0f64..1.0,
    ) {
        let overlap = (chunk_size as f64 * overlap_frac) as usize;
        prop_assume!(overlap < chunk_size);
        let len = text.chars().count();
        let passages = TextChunker::with_sizes(chunk_size, overlap).split(&doc(&text));
        let bound = len.div_ceil(chunk_size - overlap) + 1;
        prop_assert!(passages.len() <= bound, "{} passages > bound {}", passages.len(), bound);
    }
}
