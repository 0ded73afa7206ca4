use scripture_core::traits::QueryEmbedder;
use scripture_embed::{decode_half, decode_half_slice, HashEmbedder};

#[test]
fn decoder_matches_reference_for_every_bit_pattern() {
    for bits in 0..=u16::MAX {
        let ours = decode_half(bits);
        let reference = half::f16::from_bits(bits).to_f32();
        if reference.is_nan() {
            assert!(ours.is_nan(), "bits={:#06x} should be NaN", bits);
        } else {
            assert_eq!(ours.to_bits(), reference.to_bits(), "bits={:#06x}", bits);
        }
    }
}

#[test]
fn round_trip_of_reference_values() {
    let values = [1.0f32, -1.0, 0.0, 2f32.powi(-24)];
    let bytes: Vec<u8> = values
        .iter()
        .flat_map(|v| half::f16::from_f32(*v).to_bits().to_le_bytes())
        .collect();
    let decoded = decode_half_slice(&bytes);
    assert_eq!(decoded.len(), values.len());
    for (a, b) in decoded.iter().zip(values) {
        assert!((a - b).abs() <= f32::EPSILON * b.abs(), "a={} b={}", a, b);
    }
}

#[tokio::test]
async fn hash_embedder_is_deterministic_and_normalized() {
    let e = HashEmbedder::default();
    let a = e.embed("What is dharma?", 64).await.expect("embed");
    let b = e.embed("What is dharma?", 64).await.expect("embed");
    assert_eq!(a, b);
    assert_eq!(a.len(), 64);
    let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-4, "norm={}", norm);
    let other = HashEmbedder::new(7).embed("What is dharma?", 64).await.expect("embed");
    assert_ne!(a, other, "seed changes the projection");
}

#[test]
fn hash_embedder_handles_degenerate_inputs() {
    let e = HashEmbedder::default();
    assert!(e.embed_sync("", 8).iter().all(|x| *x == 0.0));
    assert!(e.embed_sync("anything", 0).is_empty());
}
