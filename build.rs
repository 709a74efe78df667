fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // ESP-IDF link arguments are only needed when building the firmware
    // binary; host-side `cargo test` builds without the `espidf` feature and skips embuild.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
