use std::env;
use std::fs;
use std::path::Path;

/// Build-time options for the fixed-capacity filter: (env var, default).
const OPTIONS: [(&str, usize); 3] = [
    ("DLBF_HASH_COUNT", 8),
    ("DLBF_SIZE_BITS", 1024),
    ("DLBF_REGION_COUNT", 16),
];

fn main() {
    let mut values = [0usize; 3];
    for (slot, (name, default)) in values.iter_mut().zip(OPTIONS) {
        // Tell cargo to rerun this build script if the option changes
        println!("cargo:rerun-if-env-changed={}", name);

        *slot = match env::var(name) {
            Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
                panic!("{} must be an unsigned integer, got {:?}", name, raw)
            }),
            Err(_) => default,
        };
    }

    let [k, m, r] = values;
    if k == 0 || m == 0 || r == 0 || r > m {
        panic!(
            "invalid fixed filter parameters: K={}, M={}, R={} (need K >= 1, M >= 1, 1 <= R <= M)",
            k, m, r
        );
    }
    // Hash indices are folded into the high word of a u64
    if k > u32::MAX as usize {
        panic!("DLBF_HASH_COUNT {} exceeds {}", k, u32::MAX);
    }
    if m.checked_add(r).is_none() {
        panic!("DLBF_SIZE_BITS + DLBF_REGION_COUNT overflows: M={}, R={}", m, r);
    }

    let out_dir = env::var("OUT_DIR").expect("cargo sets OUT_DIR for build scripts");
    let generated = format!(
        "pub const FIXED_HASH_COUNT: usize = {k};\n\
         pub const FIXED_SIZE_BITS: usize = {m};\n\
         pub const FIXED_REGION_COUNT: usize = {r};\n\
         pub const FIXED_BUFFER_BYTES: usize = {bytes};\n",
        bytes = (m + r - 1) / 8 + 1,
    );
    fs::write(Path::new(&out_dir).join("fixed_params.rs"), generated)
        .expect("Failed to write fixed_params.rs");
}
