#![no_main]

use arbitrary::{Arbitrary, Unstructured};

use libfuzzer_sys::fuzz_target;
use voronoi_sweep::treevec::TreeVec;

#[derive(Arbitrary, Debug)]
enum Op {
    Insert { idx: usize, val: i32 },
    Remove { idx: usize },
    Search { val: i32 },
}

// Applies `op` to both sequences, which should hold the same items.
fn apply<const B: usize>(op: &Op, vec: &mut Vec<i32>, tree_vec: &mut TreeVec<i32, B>) {
    match *op {
        Op::Insert { idx, val } => {
            let idx = idx % (vec.len() + 1);
            vec.insert(idx, val);
            tree_vec.insert(idx, val);
        }
        Op::Remove { idx } => {
            if !vec.is_empty() {
                let idx = idx % vec.len();
                assert_eq!(vec.remove(idx), tree_vec.remove(idx));
            }
        }
        Op::Search { val } => {
            let mut sorted = vec.clone();
            sorted.sort();
            let sorted_tree: TreeVec<i32, B> = sorted.iter().copied().collect();
            assert_eq!(
                sorted.partition_point(|&x| x <= val),
                sorted_tree.partition_point(|&x| x <= val)
            );
        }
    }
}

fn arbitrary_ops(mut u: Unstructured) -> Result<(), arbitrary::Error> {
    let len = u.arbitrary_len::<Op>()?;
    let mut vec = Vec::new();
    let mut tree_vec = TreeVec::<_, 4>::new();
    for _ in 0..len {
        let op: Op = u.arbitrary()?;
        apply(&op, &mut vec, &mut tree_vec);
        tree_vec.check_invariants();

        assert_eq!(tree_vec.len(), vec.len());
        assert_eq!(tree_vec.iter().cloned().collect::<Vec<_>>(), vec);
    }
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let _ = arbitrary_ops(Unstructured::new(data));
});
