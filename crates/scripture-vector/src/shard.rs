use tracing::{debug, instrument, warn};

use scripture_core::error::{Error, Result};
use scripture_core::traits::ShardSource;
use scripture_core::types::{Chunk, Manifest, Shard};
use scripture_embed::decode_half_slice;

pub const MANIFEST_FILE: &str = "manifest.json";

/// Load one shard: manifest, then the JSONL records, then the embedding blob.
///
/// Record `i` of the result owns embedding slice `[i * dim, (i + 1) * dim)`.
/// Every record is tagged with `shard_id`.
#[instrument(skip(source))]
pub async fn load_shard<S>(source: &S, shard_id: &str) -> Result<Shard>
where
    S: ShardSource + ?Sized,
{
    let raw = source.fetch_text(shard_id, MANIFEST_FILE).await?;
    let manifest = parse_manifest(shard_id, &raw)?;

    let raw = source.fetch_text(shard_id, &manifest.combined_chunks).await?;
    let records = parse_records(shard_id, &manifest.combined_chunks, &raw)?;

    let blob = source.fetch_bytes(shard_id, &manifest.embeddings_bin).await?;
    let embeddings = decode_embeddings(shard_id, &manifest, &blob, records.len())?;

    if let Some(count) = manifest.count.filter(|c| *c != records.len()) {
        warn!(shard = shard_id, declared = count, actual = records.len(), "manifest count disagrees with records");
    }
    debug!(shard = shard_id, records = records.len(), dim = manifest.dim, "shard loaded");

    Ok(Shard { name: shard_id.to_string(), records, embeddings, dim: manifest.dim })
}

pub fn parse_manifest(shard_id: &str, raw: &str) -> Result<Manifest> {
    let location = format!("{shard_id}/{MANIFEST_FILE}");
    let manifest: Manifest = serde_json::from_str(raw).map_err(|e| Error::parse(&location, e))?;
    if manifest.dim == 0 {
        return Err(Error::parse(location, "dim must be positive"));
    }
    Ok(manifest)
}

/// Parse newline-delimited JSON records, skipping blank lines. A record
/// whose `text` is blank is an error.
pub fn parse_records(shard_id: &str, file: &str, raw: &str) -> Result<Vec<Chunk>> {
    let mut records = Vec::new();
    for (i, line) in raw.split('\n').enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let location = || format!("{shard_id}/{file}:{}", i + 1);
        let mut chunk: Chunk = serde_json::from_str(line).map_err(|e| Error::parse(location(), e))?;
        if chunk.text.trim().is_empty() {
            return Err(Error::parse(location(), "record text is blank"));
        }
        chunk.shard = Some(shard_id.to_string());
        records.push(chunk);
    }
    Ok(records)
}

fn decode_embeddings(shard_id: &str, manifest: &Manifest, blob: &[u8], records: usize) -> Result<Vec<f32>> {
    let location = format!("{shard_id}/{}", manifest.embeddings_bin);
    if blob.len() % 2 != 0 {
        return Err(Error::parse(location, format!("odd byte length {}", blob.len())));
    }
    let values = blob.len() / 2;
    if values % manifest.dim != 0 {
        return Err(Error::parse(location, format!("{values} values is not a multiple of dim {}", manifest.dim)));
    }
    if values / manifest.dim != records {
        return Err(Error::parse(
            location,
            format!("{} vectors for {records} records", values / manifest.dim),
        ));
    }
    Ok(decode_half_slice(blob))
}
