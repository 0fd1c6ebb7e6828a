use std::env;

fn main() {
    // Version string shown by `butterfly-encode --version`
    let version = env::var("BUTTERFLY_VERSION")
        .or_else(|_| env::var("CARGO_PKG_VERSION"))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=BUTTERFLY_VERSION={version}");

    println!("cargo:rerun-if-env-changed=BUTTERFLY_VERSION");
    println!("cargo:rerun-if-changed=Cargo.toml");
}
