use std::fs;

use scripture_core::Error;
use scripture_vector::{load_shard, FsShardSource, MemoryShardSource};

fn f16_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| half::f16::from_f32(*v).to_bits().to_le_bytes()).collect()
}

const MANIFEST: &str = r#"{"dim":2,"combined_chunks":"chunks.jsonl","embeddings_bin":"embeddings.f16.bin","count":3}"#;

const RECORDS: &str = concat!(
    r#"{"text":"karma and duty","work":"Bhagavad Gita","canonical_ref":"BG 2.47"}"#,
    "\n\n",
    r#"  {"text":"moksha is liberation","canon_id":"Kena 1.3","shard":"ignored"}  "#,
    "\n",
    r#"{"text":"devotion to brahman","id":"RV 1.1.1"}"#,
    "\n",
);

fn memory_source(records: &str, embeddings: &[f32]) -> MemoryShardSource {
    MemoryShardSource::new()
        .with_file("gita", "manifest.json", MANIFEST)
        .with_file("gita", "chunks.jsonl", records)
        .with_file("gita", "embeddings.f16.bin", f16_bytes(embeddings))
}

#[tokio::test]
async fn loads_records_and_vectors_in_order() {
    let source = memory_source(RECORDS, &[1.0, 0.0, 0.0, 1.0, 0.5, -0.5]);
    let shard = load_shard(&source, "gita").await.expect("load");
    assert_eq!(shard.name, "gita");
    assert_eq!(shard.dim, 2);
    assert_eq!(shard.len(), 3, "blank lines are skipped");
    assert!(shard.records.iter().all(|r| r.shard.as_deref() == Some("gita")));
    assert_eq!(shard.records[1].text, "moksha is liberation");
    assert_eq!(shard.embeddings.len(), 6);
    assert_eq!(shard.vector(1), Some(&[0.0f32, 1.0][..]));
    assert_eq!(shard.vector(2), Some(&[0.5f32, -0.5][..]));
    assert_eq!(shard.vector(3), None);
}

#[tokio::test]
async fn missing_files_are_fetch_errors() {
    let source = MemoryShardSource::new();
    assert!(matches!(load_shard(&source, "gita").await, Err(Error::Fetch { .. })));

    let source = MemoryShardSource::new()
        .with_file("gita", "manifest.json", MANIFEST)
        .with_file("gita", "chunks.jsonl", RECORDS);
    assert!(matches!(load_shard(&source, "gita").await, Err(Error::Fetch { .. })));
}

#[tokio::test]
async fn malformed_record_line_is_a_parse_error() {
    let source = memory_source("{\"text\":\"ok\"}\nnot json\n{\"text\":\"ok\"}\n", &[0.0; 6]);
    match load_shard(&source, "gita").await {
        Err(Error::Parse { location, .. }) => assert_eq!(location, "gita/chunks.jsonl:2"),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[tokio::test]
async fn blank_record_text_is_a_parse_error() {
    for blank in [r#"{"text":""}"#, r#"{"text":"   ","work":"Gita"}"#] {
        let records = format!("{{\"text\":\"ok\"}}\n{blank}\n{{\"text\":\"ok\"}}\n");
        let source = memory_source(&records, &[0.0; 6]);
        match load_shard(&source, "gita").await {
            Err(Error::Parse { location, .. }) => assert_eq!(location, "gita/chunks.jsonl:2"),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn embedding_length_must_match_dim_and_records() {
    // 5 values is not a multiple of dim 2
    let source = memory_source(RECORDS, &[0.0; 5]);
    assert!(matches!(load_shard(&source, "gita").await, Err(Error::Parse { .. })));
    // 4 vectors for 3 records
    let source = memory_source(RECORDS, &[0.0; 8]);
    assert!(matches!(load_shard(&source, "gita").await, Err(Error::Parse { .. })));
    // odd byte count
    let source = memory_source(RECORDS, &[]).with_file("gita", "embeddings.f16.bin", vec![0u8; 13]);
    assert!(matches!(load_shard(&source, "gita").await, Err(Error::Parse { .. })));
}

#[tokio::test]
async fn zero_dim_manifest_is_rejected() {
    let source = memory_source(RECORDS, &[0.0; 6])
        .with_file("gita", "manifest.json", r#"{"dim":0,"combined_chunks":"chunks.jsonl","embeddings_bin":"embeddings.f16.bin"}"#);
    assert!(matches!(load_shard(&source, "gita").await, Err(Error::Parse { .. })));
}

#[tokio::test]
async fn filesystem_source_reads_shard_directories() {
    let tmp = tempfile::TempDir::new().expect("tmp");
    let dir = tmp.path().join("gita_arnold");
    fs::create_dir_all(&dir).expect("mkdir");
    fs::write(dir.join("manifest.json"), MANIFEST).expect("write");
    fs::write(dir.join("chunks.jsonl"), RECORDS).expect("write");
    fs::write(dir.join("embeddings.f16.bin"), f16_bytes(&[1.0, 0.0, 0.0, 1.0, 0.5, -0.5])).expect("write");
    fs::create_dir_all(tmp.path().join("not_a_shard")).expect("mkdir");

    let source = FsShardSource::new(tmp.path());
    assert_eq!(source.discover(), vec!["gita_arnold".to_string()]);
    let shard = load_shard(&source, "gita_arnold").await.expect("load");
    assert_eq!(shard.len(), 3);
    assert_eq!(shard.records[0].canonical_ref.as_deref(), Some("BG 2.47"));

    assert!(matches!(load_shard(&source, "missing").await, Err(Error::Fetch { .. })));
    assert!(matches!(load_shard(&source, "../gita_arnold").await, Err(Error::Fetch { .. })));
}
