mod common;

use scripture_core::Error;
use scripture_hybrid::Corpus;

use common::{chunk, shard};

#[test]
fn two_shards_concatenate_in_selection_order() {
    let a = shard("gita", 2, vec![chunk("karma and duty", Some("BG 2.47")), chunk("the field", Some("BG 13.1"))], vec![1.0, 0.0, 0.0, 1.0]);
    let b = shard("kena", 2, vec![chunk("by whom willed", Some("Kena 1.1"))], vec![0.6, 0.8]);
    let corpus = Corpus::build([&a, &b]).expect("build");

    assert_eq!(corpus.len(), 3);
    assert_eq!(corpus.dim(), 2);
    assert_eq!(corpus.shards(), ["gita".to_string(), "kena".to_string()]);
    let texts: Vec<&str> = corpus.records().iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, vec!["karma and duty", "the field", "by whom willed"]);
    assert_eq!(corpus.embeddings().len(), a.embeddings.len() + b.embeddings.len());
    assert_eq!(corpus.vector(2), Some(&[0.6f32, 0.8][..]));
    assert_eq!(corpus.record(2).and_then(|r| r.shard.as_deref()), Some("kena"));
    assert_eq!(corpus.lexical().len(), 3);

    let reversed = Corpus::build([&b, &a]).expect("build");
    assert_eq!(reversed.records()[0].text, "by whom willed");
    assert_eq!(reversed.vector(0), Some(&[0.6f32, 0.8][..]));
}

#[test]
fn empty_record_set_is_rejected() {
    assert!(matches!(Corpus::build(std::iter::empty()), Err(Error::EmptyCorpus)));
    let empty = shard("void", 4, vec![], vec![]);
    assert!(matches!(Corpus::build([&empty]), Err(Error::EmptyCorpus)));
}

#[test]
fn mismatched_dimensions_are_rejected() {
    let a = shard("a", 2, vec![chunk("x", None)], vec![1.0, 0.0]);
    let b = shard("b", 3, vec![chunk("y", None)], vec![1.0, 0.0, 0.0]);
    assert!(matches!(Corpus::build([&a, &b]), Err(Error::DimensionMismatch { expected: 2, actual: 3 })));
    let short = shard("c", 2, vec![chunk("z", None)], vec![1.0]);
    assert!(matches!(Corpus::build([&short]), Err(Error::DimensionMismatch { .. })));
}

#[test]
fn passages_are_found_by_normalized_reference() {
    let a = shard("gita", 1, vec![chunk("first", Some("BG 2.47")), chunk("second", Some("Kena 1.1\u{2013}1.3"))], vec![1.0, 1.0]);
    let corpus = Corpus::build([&a]).expect("build");
    assert_eq!(corpus.find_by_ref("BG  2.47 [Bhagavad Gita]").map(|c| c.text.as_str()), Some("first"));
    assert_eq!(corpus.find_by_ref("Kena 1.1-1.3").map(|c| c.text.as_str()), Some("second"));
    assert!(corpus.find_by_ref("RV 1.1.1").is_none());
    assert!(corpus.find_by_ref("  ").is_none());
}
