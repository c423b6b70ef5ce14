use bfin_finality_core::block::{BlockHash, BlockHeight, HeightHashPair};

use super::FinalizationHashTree;

fn pair(height: u64, hash: BlockHash) -> HeightHashPair {
    HeightHashPair::new(height, hash)
}

//  7 - 8 - 9 - 10      | (hashes1)
//     ||| |||          | (common hashes)
//      8 - 9 - 10 - 11 | (hashes2)
fn overlapping_branches() -> (FinalizationHashTree, Vec<BlockHash>, Vec<BlockHash>) {
    let hashes1 = BlockHash::random_vec(4);
    let mut hashes2 = BlockHash::random_vec(4);
    hashes2[0] = hashes1[1];
    hashes2[1] = hashes1[2];

    let mut tree = FinalizationHashTree::new();
    tree.add_branch(BlockHeight::new(7), &hashes1);
    tree.add_branch(BlockHeight::new(8), &hashes2);

    (tree, hashes1, hashes2)
}

#[test]
fn tree_is_initially_empty() {
    let tree = FinalizationHashTree::new();

    assert_eq!(tree.len(), 0);
    assert!(tree.is_empty());
    assert!(tree.roots().is_empty());
}

#[test]
fn contains_matches_only_exact_pairs() {
    let hashes = BlockHash::random_vec(3);
    let other_hash = BlockHash::random();

    let mut tree = FinalizationHashTree::new();
    tree.add_branch(BlockHeight::new(7), &hashes);

    assert_eq!(tree.len(), 3);
    assert!(tree.contains(&pair(7, hashes[0])));
    assert!(tree.contains(&pair(8, hashes[1])));
    assert!(tree.contains(&pair(9, hashes[2])));

    assert!(!tree.contains(&pair(11, hashes[0]))); // wrong height
    assert!(!tree.contains(&pair(8, other_hash))); // wrong hash
    assert!(!tree.contains(&pair(8, hashes[0]))); // wrong height or hash
    assert!(!tree.contains(&pair(11, other_hash))); // wrong height and hash
}

#[test]
fn can_add_non_overlapping_branches() {
    let hashes1 = BlockHash::random_vec(3);
    let hashes2 = BlockHash::random_vec(4);

    let mut tree = FinalizationHashTree::new();
    let branch1 = tree.add_branch(BlockHeight::new(7), &hashes1);
    let branch2 = tree.add_branch(BlockHeight::new(8), &hashes2);

    assert_eq!(tree.len(), 7);
    assert_eq!(tree.roots().len(), 2);
    assert!(branch1.iter().chain(&branch2).all(|node| node.is_new));
    assert_eq!(tree.parent(branch1[0].idx), None);
    assert_eq!(tree.parent(branch1[2].idx), Some(branch1[1].idx));
    assert_eq!(tree.parent(branch2[0].idx), None);
    assert_eq!(tree.key(branch2[3].idx), pair(11, hashes2[3]));
}

#[test]
fn same_hashes_at_different_heights_are_different_nodes() {
    let hashes = BlockHash::random_vec(3);

    let mut tree = FinalizationHashTree::new();
    tree.add_branch(BlockHeight::new(7), &hashes);
    tree.add_branch(BlockHeight::new(8), &hashes);

    assert_eq!(tree.len(), 6);
    assert!(tree.contains(&pair(8, hashes[0])));
    assert!(tree.contains(&pair(8, hashes[1])));
}

#[test]
fn can_add_overlapping_branches() {
    let (tree, hashes1, hashes2) = overlapping_branches();

    assert_eq!(tree.len(), 6);
    assert_eq!(tree.roots().len(), 1);
    for key in [
        pair(7, hashes1[0]),
        pair(8, hashes1[1]),
        pair(9, hashes1[2]),
        pair(10, hashes1[3]),
        pair(10, hashes2[2]),
        pair(11, hashes2[3]),
    ] {
        assert!(tree.contains(&key), "{key}");
    }

    let fork = tree.find(&pair(9, hashes1[2])).expect("Must exist");
    assert_eq!(tree.children(fork).len(), 2);
}

#[test]
fn add_branch_reports_existing_nodes() {
    let (mut tree, hashes1, _) = overlapping_branches();

    let branch = tree.add_branch(BlockHeight::new(9), &[hashes1[2], BlockHash::random()]);

    assert_eq!(branch.len(), 2);
    assert!(!branch[0].is_new);
    assert!(branch[1].is_new);
    assert_eq!(tree.parent(branch[1].idx), Some(branch[0].idx));
    assert_eq!(tree.len(), 7);
}

#[test]
fn add_branch_stops_at_max_height() {
    let mut tree = FinalizationHashTree::new();

    let branch = tree.add_branch(
        BlockHeight::new(u64::MAX - 1),
        &BlockHash::random_vec(3),
    );

    assert_eq!(branch.len(), 2);
    assert_eq!(tree.len(), 2);
}

#[test]
fn is_descendant_is_false_for_unknown_nodes() {
    let (tree, hashes1, _) = overlapping_branches();

    assert!(!tree.is_descendant(&pair(9, hashes1[2]), &pair(10, hashes1[2]))); // child unknown
    assert!(!tree.is_descendant(&pair(9, hashes1[1]), &pair(10, hashes1[3]))); // parent unknown
    assert!(!tree.is_descendant(&pair(9, hashes1[1]), &pair(10, hashes1[2]))); // both unknown
    assert!(!tree.is_descendant(&pair(9, hashes1[1]), &pair(9, hashes1[1]))); // both unknown (same)
}

#[test]
fn is_descendant_is_false_for_ancestors() {
    let (tree, hashes1, hashes2) = overlapping_branches();
    let parent = pair(9, hashes1[2]);

    assert!(!tree.is_descendant(&pair(10, hashes1[3]), &parent));
    assert!(!tree.is_descendant(&pair(10, hashes2[2]), &parent));
    assert!(!tree.is_descendant(&pair(11, hashes2[3]), &parent));
}

#[test]
fn is_descendant_is_true_for_descendants_and_self() {
    let (tree, hashes1, hashes2) = overlapping_branches();

    for parent in [pair(7, hashes1[0]), pair(9, hashes1[2])] {
        for child in [
            pair(9, hashes1[2]),
            pair(10, hashes1[3]),
            pair(10, hashes2[2]),
            pair(11, hashes2[3]),
        ] {
            assert!(tree.is_descendant(&parent, &child), "{parent} {child}");
        }
    }

    let leaf = pair(11, hashes2[3]);
    assert!(tree.is_descendant(&leaf, &leaf));
}

#[test]
fn is_descendant_is_false_across_siblings() {
    let (tree, hashes1, hashes2) = overlapping_branches();

    assert!(!tree.is_descendant(&pair(10, hashes1[3]), &pair(11, hashes2[3])));
    assert!(!tree.is_descendant(&pair(10, hashes2[2]), &pair(10, hashes1[3])));
}

#[test]
fn find_ancestors_is_empty_for_unknown_node() {
    let (tree, _, _) = overlapping_branches();

    assert!(tree.find_ancestors(&pair(9, BlockHash::random())).is_empty());
}

#[test]
fn find_ancestors_walks_to_root() {
    let (tree, hashes1, hashes2) = overlapping_branches();

    assert_eq!(
        tree.find_ancestors(&pair(7, hashes1[0])),
        vec![pair(7, hashes1[0])]
    );
    assert_eq!(
        tree.find_ancestors(&pair(9, hashes1[2])),
        vec![pair(9, hashes1[2]), pair(8, hashes1[1]), pair(7, hashes1[0])]
    );
    assert_eq!(
        tree.find_ancestors(&pair(11, hashes2[3])),
        vec![
            pair(11, hashes2[3]),
            pair(10, hashes2[2]),
            pair(9, hashes1[2]),
            pair(8, hashes1[1]),
            pair(7, hashes1[0]),
        ]
    );
}

#[test]
fn descendants_lists_whole_subtree() {
    let (tree, hashes1, hashes2) = overlapping_branches();
    let root = tree.find(&pair(8, hashes1[1])).expect("Must exist");

    let mut descendants: Vec<_> = tree
        .descendants(root)
        .into_iter()
        .map(|idx| tree.key(idx))
        .collect();
    descendants.sort();

    let mut expected = vec![
        pair(9, hashes1[2]),
        pair(10, hashes1[3]),
        pair(10, hashes2[2]),
        pair(11, hashes2[3]),
    ];
    expected.sort();

    assert_eq!(descendants, expected);

    let leaf = tree.find(&pair(11, hashes2[3])).expect("Must exist");
    assert!(tree.descendants(leaf).is_empty());
}
