//! Common test utilities for mapping evaluation testing.

pub mod builders;
pub mod fixtures;

/// Route `log` output through env_logger; honours `RUST_LOG`.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Assert that a result failed with the given `MappingError` variant pattern.
#[macro_export]
macro_rules! assert_mapping_error {
    ($result:expr, $error_variant:pat) => {
        match $result {
            Err($error_variant) => {
                // Specific error type matched
            }
            Ok(_) => panic!("Expected mapping error, but evaluation passed"),
            Err(other) => panic!("Expected specific mapping error, got {:?}", other),
        }
    };
}

/// Custom assertion macro for specific error messages
#[macro_export]
macro_rules! assert_error_message_contains {
    ($result:expr, $substring:expr) => {
        match $result {
            Err(err) => assert!(
                err.to_string().contains($substring),
                "Error message '{}' does not contain '{}'",
                err.to_string(),
                $substring
            ),
            Ok(_) => panic!("Expected error containing '{}', but call passed", $substring),
        }
    };
}
