use hex_literal::hex;

use crate::bincode::FINALITY_BINCODE_CONFIG;
use crate::block::{BlockHash, BlockHeight, HeightHashPair};

#[test]
fn height_hash_pair_size_sanity() {
    let pair = HeightHashPair::new(7, BlockHash::random());

    assert_eq!(
        bincode::encode_to_vec(pair, FINALITY_BINCODE_CONFIG)
            .expect("Can't fail")
            .len(),
        40
    );
}

#[test]
fn height_hash_pair_encoding_fixture() {
    let pair = HeightHashPair::new(
        0x0102,
        BlockHash::from_bytes(hex!(
            "ff00000000000000000000000000000000000000000000000000000000000011"
        )),
    );

    assert_eq!(
        bincode::encode_to_vec(pair, FINALITY_BINCODE_CONFIG).expect("Can't fail"),
        hex!(
            "0000000000000102"
            "ff00000000000000000000000000000000000000000000000000000000000011"
        )
    );

    let (decoded, _): (HeightHashPair, _) = bincode::decode_from_slice(
        &bincode::encode_to_vec(pair, FINALITY_BINCODE_CONFIG).expect("Can't fail"),
        FINALITY_BINCODE_CONFIG,
    )
    .expect("Can't fail");
    assert_eq!(decoded, pair);
}

#[test]
fn height_hash_pair_orders_by_height_first() {
    let low_hash = BlockHash::ZERO;
    let high_hash = BlockHash::from_bytes([0xff; 32]);

    let mut pairs = vec![
        HeightHashPair::new(9, low_hash),
        HeightHashPair::new(8, high_hash),
        HeightHashPair::new(8, low_hash),
    ];
    pairs.sort();

    assert_eq!(
        pairs,
        vec![
            HeightHashPair::new(8, low_hash),
            HeightHashPair::new(8, high_hash),
            HeightHashPair::new(9, low_hash),
        ]
    );
}

#[test]
fn height_hash_pair_display_and_serde() {
    let hash = BlockHash::random();
    let pair = HeightHashPair::new(BlockHeight::GENESIS, hash);

    assert_eq!(pair.to_string(), format!("1@{hash}"));

    let json = serde_json::to_string(&pair).expect("Can't fail");
    assert_eq!(json, format!("{{\"height\":1,\"hash\":\"{hash}\"}}"));
    assert_eq!(
        serde_json::from_str::<HeightHashPair>(&json).expect("Can't fail"),
        pair
    );
}

#[test]
fn random_hashes_are_distinct() {
    let hashes = BlockHash::random_vec(4);

    assert_eq!(hashes.len(), 4);
    for (i, a) in hashes.iter().enumerate() {
        for b in &hashes[i + 1..] {
            assert_ne!(a, b);
        }
    }
}
