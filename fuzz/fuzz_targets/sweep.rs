#![no_main]

use arbitrary::Unstructured;

use libfuzzer_sys::fuzz_target;
use voronoi_sweep::{calculate, Options};

fn sweep(mut u: Unstructured) -> Result<(), arbitrary::Error> {
    let sites = voronoi_sweep::arbitrary::sites(64, 1e3, &mut u)?;
    let optimize: bool = u.arbitrary()?;
    let options = Options::default()
        .with_optimize(optimize)
        .with_check_vertices(true);

    // Awkward inputs are allowed to fail, but never to panic.
    if let Ok(diagram) = calculate(&sites, &options) {
        for idx in 0..sites.len() {
            let _ = diagram.cell(idx);
        }
        let _ = diagram.vertices();
    }
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let _ = sweep(Unstructured::new(data));
});
