//! Output and environment variable name normalization.

/// Turn a key into an output or environment variable name.
///
/// The first `.` becomes `__`, every `-` is dropped, and then anything that
/// is not a letter, digit or `_` is dropped. With `upper`, the result is
/// upper-cased. Established pipelines depend on these exact names.
pub fn normalize_output_key(key: &str, upper: bool) -> String {
    let name: String = key
        .replacen('.', "__", 1)
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    if upper { name.to_uppercase() } else { name }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_plain_names() {
        assert_eq!(normalize_output_key("password", false), "password");
        assert_eq!(normalize_output_key("DB_USER", false), "DB_USER");
    }

    #[test]
    fn upper_cases_on_request() {
        assert_eq!(normalize_output_key("password", true), "PASSWORD");
        assert_eq!(normalize_output_key("münchen", true), "MÜNCHEN");
    }

    #[test]
    fn first_dot_becomes_double_underscore() {
        assert_eq!(normalize_output_key("tls.crt", false), "tls__crt");
        assert_eq!(normalize_output_key("a.b.c", false), "a__bc");
    }

    #[test]
    fn strips_dashes_and_symbols() {
        assert_eq!(normalize_output_key("api-key", true), "APIKEY");
        assert_eq!(normalize_output_key("my key/with:stuff!", false), "mykeywithstuff");
        assert_eq!(normalize_output_key("*", false), "");
    }
}
