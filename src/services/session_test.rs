use super::*;

#[test]
fn generate_token_is_64_hex_chars() {
    let token = generate_token();
    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn generate_token_is_unique_enough() {
    assert_ne!(generate_token(), generate_token());
}

#[test]
fn bytes_to_hex_formats_lowercase_pairs() {
    assert_eq!(bytes_to_hex(&[0x00, 0xab, 0xff]), "00abff");
    assert_eq!(bytes_to_hex(&[]), "");
}

#[test]
fn password_hash_round_trips() {
    let stored = hash_password("s3cret");
    assert!(verify_password("s3cret", &stored));
    assert!(!verify_password("wrong", &stored));
}

#[test]
fn password_hash_is_salted() {
    let a = hash_password("same");
    let b = hash_password("same");
    assert_ne!(a, b);
    assert!(verify_password("same", &a));
    assert!(verify_password("same", &b));
}

#[test]
fn verify_password_rejects_malformed_stored_value() {
    assert!(!verify_password("anything", "no-separator"));
    assert!(!verify_password("anything", ""));
}

#[test]
fn normalize_email_lowercases_and_trims() {
    assert_eq!(normalize_email("  Jane.Doe@Example.COM "), Some("jane.doe@example.com".to_owned()));
}

#[test]
fn normalize_email_rejects_invalid() {
    assert_eq!(normalize_email(""), None);
    assert_eq!(normalize_email("   "), None);
    assert_eq!(normalize_email("not-an-email"), None);
    assert_eq!(normalize_email("@example.com"), None);
    assert_eq!(normalize_email("user@"), None);
    assert_eq!(normalize_email("a@b@c"), None);
}
