//! Generates Swift and Kotlin bindings for the `indykit` library.

fn main() {
    uniffi::uniffi_bindgen_main();
}
