use std::env;

use types::generate_piece_attack_datfiles;

fn main() {
    // Re-run the build script if it was changed
    println!("cargo::rerun-if-changed=build.rs");

    let outdir = env::var_os("OUT_DIR").unwrap();

    // Generate attack .dat files for the leapers
    generate_piece_attack_datfiles(&outdir).unwrap();
}
