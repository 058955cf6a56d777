//! Removing credentials from query strings.

use percent_encoding::percent_decode_str;

/// Query keys that carry credentials. Compared ignoring ASCII case.
pub const CREDENTIAL_KEYS: &[&str] = &["user", "username", "password"];

/// Remove credential-bearing parameters from a raw query string.
///
/// Keys are percent-decoded before comparison, so `pass%77ord=x` is removed
/// too. Remaining parameters keep their original encoding and order.
/// Returns `None` when nothing is left.
///
/// ```rust
/// use chjdbc_url::remove_credentials_from_query;
///
/// assert_eq!(
///     remove_credentials_from_query(Some("user=u&x=1&PASSWORD=p")),
///     Some("x=1".to_string())
/// );
/// assert_eq!(remove_credentials_from_query(Some("password=p")), None);
/// assert_eq!(remove_credentials_from_query(None), None);
/// ```
pub fn remove_credentials_from_query(raw_query: Option<&str>) -> Option<String> {
    let query = raw_query?.trim();

    let kept: Vec<&str> = query
        .split('&')
        .filter(|pair| !pair.is_empty() && !is_credential(pair))
        .collect();

    if kept.is_empty() {
        None
    } else {
        Some(kept.join("&"))
    }
}

fn is_credential(pair: &str) -> bool {
    let raw_key = pair.split_once('=').map_or(pair, |(key, _)| key);
    let key = percent_decode_str(raw_key).decode_utf8_lossy();
    CREDENTIAL_KEYS
        .iter()
        .any(|candidate| key.trim().eq_ignore_ascii_case(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_other_params_in_order() {
        assert_eq!(
            remove_credentials_from_query(Some("a=1&user=u&b=2&password=p&c=3")),
            Some("a=1&b=2&c=3".to_string())
        );
    }

    #[test]
    fn test_multiple_credential_keys() {
        assert_eq!(
            remove_credentials_from_query(Some("username=a&User=b&password=c&Password=d")),
            None
        );
    }

    #[test]
    fn test_encoded_and_valueless_keys() {
        assert_eq!(
            remove_credentials_from_query(Some("pass%77ord=x&password&compress=1")),
            Some("compress=1".to_string())
        );
    }

    #[test]
    fn test_empty_and_blank() {
        assert_eq!(remove_credentials_from_query(Some("")), None);
        assert_eq!(remove_credentials_from_query(Some("  ")), None);
        assert_eq!(remove_credentials_from_query(Some("&&")), None);
    }

    #[test]
    fn test_user_prefixed_keys_survive() {
        assert_eq!(
            remove_credentials_from_query(Some("user_agent=x&users=2")),
            Some("user_agent=x&users=2".to_string())
        );
    }
}
