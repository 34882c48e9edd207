//! Basic smoke test to verify crate compiles.

#[test]
fn crate_compiles() {
    // If this test runs, the crate skeleton is valid.
    let _ = std::any::type_name::<devpayr::Config>();
    let _ = std::any::type_name::<devpayr::DevpayrError>();
}

#[test]
fn crypto_helpers_are_usable_standalone() {
    let token = devpayr::crypto::codec::encrypt(b"payload", "secret");
    let plaintext = devpayr::crypto::codec::decrypt(&token, "secret").unwrap();
    assert_eq!(plaintext, b"payload");

    let sig = devpayr::crypto::signature::sign(token.as_bytes(), "secret");
    assert!(devpayr::crypto::signature::verify(
        token.as_bytes(),
        "secret",
        &sig
    ));
}
