use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=linker.ld");
    println!("cargo:rerun-if-env-changed=LEVEL_OS_BUILD_NUMBER");

    // the build number shown in the greeting; CI sets it, local builds get 0.
    let build = env::var("LEVEL_OS_BUILD_NUMBER")
        .ok()
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .unwrap_or(0);
    println!("cargo:rustc-env=LEVEL_OS_BUILD_NUMBER={build}");

    // only the freestanding kernel image needs our memory layout.
    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("none") {
        let dir = env::var("CARGO_MANIFEST_DIR").unwrap();
        println!("cargo:rustc-link-arg-bins=-T{dir}/linker.ld");
    }
}
