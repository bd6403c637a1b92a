use proptest::prelude::*;
use tasklane::auth::token::{generate_token, is_well_formed, TOKEN_HEX_LEN};

use crate::support::counting_service;

#[test]
fn generated_tokens_are_well_formed() {
    for _ in 0..100 {
        let token = generate_token().unwrap();
        assert_eq!(token.len(), TOKEN_HEX_LEN);
        assert!(is_well_formed(&token));
    }
}

proptest! {
    #[test]
    fn lowercase_hex_of_right_length_is_well_formed(token in "[0-9a-f]{64}") {
        prop_assert!(is_well_formed(&token));
    }

    #[test]
    fn other_lengths_are_rejected(token in "[0-9a-f]{0,63}|[0-9a-f]{65,80}") {
        prop_assert!(!is_well_formed(&token));
    }

    #[test]
    fn foreign_characters_are_rejected(prefix in "[0-9a-f]{63}", bad in "[g-zA-Z:*/ ]") {
        let token = format!("{}{}", prefix, bad);
        prop_assert!(!is_well_formed(&token));
    }

    #[test]
    fn malformed_lookups_skip_the_store(token in "[^0-9a-f]{1,70}") {
        let (sessions, store) = counting_service();

        let session = tokio_test::block_on(sessions.get_session(&token)).unwrap();
        prop_assert!(session.is_none());
        prop_assert_eq!(store.reads(), 0);
    }
}
