use rand::{Rng, distr::Alphanumeric};

/// Generates the random `state` parameter for the authorization request.
///
/// The value is echoed back by the authorization server and verified in the
/// callback handler as a CSRF guard.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}
