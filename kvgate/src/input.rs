//! The secrets input: one request per line.
//!
//! ```text
//! secret/data/ci password
//! secret/data/ci "db-host" | DATABASE_HOST
//! secret/data/tls ** | TLS_
//! secret/data/app *
//! ```
//!
//! Entries are separated by newlines or `;`. Each is a path, a selector and
//! an optional `| NAME`.

use kvgate_engine::{normalize_output_key, query_selector};
use kvgate_selector::{Expr, StepKind};
use kvgate_types::{SecretRequest, Selector};
use thiserror::Error;

/// A malformed secrets input entry.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// `| ` with nothing after it.
    #[error("you must provide a value when mapping a secret to a name: \"{entry}\"")]
    EmptyName {
        /// The offending entry.
        entry: String,
    },

    /// Not exactly a path and a selector.
    #[error("you must provide a valid path and key: \"{entry}\"")]
    InvalidEntry {
        /// The offending entry.
        entry: String,
    },

    /// An expression selector without an explicit name.
    #[error("you must provide a name for the output key when using json selectors: \"{entry}\"")]
    NameRequired {
        /// The offending entry.
        entry: String,
    },

    /// The selector does not parse.
    #[error("invalid selector in \"{entry}\": {message}")]
    InvalidSelector {
        /// The offending entry.
        entry: String,
        /// Parser message.
        message: String,
    },
}

/// Parse the secrets input into requests, in input order.
pub fn parse_secrets_input(input: &str) -> Result<Vec<SecretRequest>, InputError> {
    input
        .split([';', '\n'])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(parse_entry)
        .collect()
}

fn parse_entry(entry: &str) -> Result<SecretRequest, InputError> {
    let (path_spec, name) = match entry.rfind('|') {
        Some(at) => {
            let name = entry[at + 1..].trim();
            if name.is_empty() {
                return Err(InputError::EmptyName {
                    entry: entry.to_owned(),
                });
            }
            (&entry[..at], Some(name))
        }
        None => (entry, None),
    };

    let parts: Vec<&str> = path_spec.split_whitespace().collect();
    let [path, quoted] = parts.as_slice() else {
        return Err(InputError::InvalidEntry {
            entry: entry.to_owned(),
        });
    };
    let unquoted = quoted.replace('"', "");
    let selector = Selector::parse(&unquoted);
    if selector.is_wildcard() {
        return Ok(match name {
            Some(prefix) => SecretRequest::new(*path, selector, prefix, prefix),
            None => SecretRequest::new(*path, selector, "", "").with_key_as_name(true),
        });
    }

    // Dotted selectors are evaluated as written, so their quoting is kept.
    let stored = if unquoted.contains('.') {
        (*quoted).to_owned()
    } else {
        unquoted.clone()
    };
    let expr = Expr::parse(&query_selector(&stored)).map_err(|message| {
        InputError::InvalidSelector {
            entry: entry.to_owned(),
            message,
        }
    })?;
    let selector = Selector::Query(stored);
    let request = match name {
        Some(name) => SecretRequest::new(*path, selector, name, name),
        None if is_field_path(&expr) => SecretRequest::new(
            *path,
            selector,
            normalize_output_key(&unquoted, false),
            normalize_output_key(&unquoted, true),
        ),
        None => {
            return Err(InputError::NameRequired {
                entry: entry.to_owned(),
            });
        }
    };
    Ok(request)
}

/// Selectors that yield a usable name on their own.
fn is_field_path(expr: &Expr) -> bool {
    match expr {
        Expr::Literal(_) => true,
        Expr::Path(steps) => steps
            .first()
            .is_some_and(|first| matches!(first.kind, StepKind::Name(_)) && first.stages.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvgate_types::WildcardCase;

    fn one(input: &str) -> SecretRequest {
        let mut requests = parse_secrets_input(input).unwrap();
        assert_eq!(requests.len(), 1, "input: {input:?}");
        requests.remove(0)
    }

    #[test]
    fn simple_key() {
        let request = one("secret/data/ci password");
        assert_eq!(request.path, "secret/data/ci");
        assert_eq!(request.selector, Selector::Query("password".into()));
        assert_eq!(request.output_var_name, "password");
        assert_eq!(request.env_var_name, "PASSWORD");
        assert!(!request.use_key_as_name);
    }

    #[test]
    fn explicit_name_is_verbatim() {
        let request = one("secret/data/ci password | db-Pass");
        assert_eq!(request.output_var_name, "db-Pass");
        assert_eq!(request.env_var_name, "db-Pass");
    }

    #[test]
    fn quoted_selector_is_unquoted() {
        let request = one("secret/data/ci \"db-host\"");
        assert_eq!(request.selector, Selector::Query("db-host".into()));
        assert_eq!(request.output_var_name, "dbhost");
        assert_eq!(request.env_var_name, "DBHOST");
    }

    #[test]
    fn dotted_path_without_name() {
        let request = one("secret/data/tls tls.crt");
        assert_eq!(request.selector, Selector::Query("tls.crt".into()));
        assert_eq!(request.output_var_name, "tls__crt");
        assert_eq!(request.env_var_name, "TLS__CRT");
    }

    #[test]
    fn dashed_key_needs_no_quotes() {
        let request = one("secret/data/app db-user");
        assert_eq!(request.selector, Selector::Query("db-user".into()));
        assert_eq!(request.output_var_name, "dbuser");
        assert_eq!(request.env_var_name, "DBUSER");
    }

    #[test]
    fn quoted_step_in_dotted_path_keeps_its_quotes() {
        let request = one("secret/data/app config.\"db-host\" | DB");
        assert_eq!(request.selector, Selector::Query("config.\"db-host\"".into()));
        assert_eq!(request.env_var_name, "DB");

        let request = one("secret/data/app config.\"db-host\"");
        assert_eq!(request.env_var_name, "CONFIG__DBHOST");
    }

    #[test]
    fn quoted_dotted_key_stays_one_key() {
        let request = one("secret/data/tls \"tls.crt\"");
        assert_eq!(request.selector, Selector::Query("\"tls.crt\"".into()));
        assert_eq!(request.output_var_name, "tls__crt");
    }

    #[test]
    fn dot_free_selector_is_a_literal_key() {
        let request = one("secret/x hosts[0]");
        assert_eq!(request.selector, Selector::Query("hosts[0]".into()));
        assert_eq!(request.env_var_name, "HOSTS0");
    }

    #[test]
    fn unbalanced_quotes_in_dotted_path_are_rejected() {
        let err = parse_secrets_input("secret/x config.\"db-host | DB").unwrap_err();
        assert!(matches!(err, InputError::InvalidSelector { .. }));
    }

    #[test]
    fn expression_selectors_need_a_name() {
        for input in ["secret/x hosts[0].name", "secret/x *.name"] {
            let err = parse_secrets_input(input).unwrap_err();
            assert!(matches!(err, InputError::NameRequired { .. }), "input: {input:?}");
        }
        let request = one("secret/x hosts[0].name | FIRST_HOST");
        assert_eq!(request.selector, Selector::Query("hosts[0].name".into()));
        assert_eq!(request.env_var_name, "FIRST_HOST");
    }

    #[test]
    fn wildcards() {
        let request = one("secret/data/app *");
        assert_eq!(request.selector, Selector::Wildcard(WildcardCase::Preserve));
        assert!(request.use_key_as_name);

        let request = one("secret/data/app ** | APP_");
        assert_eq!(request.selector, Selector::Wildcard(WildcardCase::Upper));
        assert_eq!(request.output_var_name, "APP_");
        assert_eq!(request.env_var_name, "APP_");
        assert!(!request.use_key_as_name);
    }

    #[test]
    fn separators_and_blank_entries() {
        let input = "secret/a one ; secret/b two\n\n  secret/c three | THREE\r\n;";
        let requests = parse_secrets_input(input).unwrap();
        let paths: Vec<_> = requests.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, ["secret/a", "secret/b", "secret/c"]);
        assert_eq!(requests[2].env_var_name, "THREE");
        assert!(parse_secrets_input("  \n ; ").unwrap().is_empty());
    }

    #[test]
    fn last_pipe_starts_the_name() {
        let request = one("secret/a a | b");
        assert_eq!(request.selector, Selector::Query("a".into()));
        assert_eq!(request.env_var_name, "b");

        let err = parse_secrets_input("secret/a a | b | NAME").unwrap_err();
        assert!(matches!(err, InputError::InvalidEntry { .. }));
    }

    #[test]
    fn malformed_entries() {
        assert!(matches!(
            parse_secrets_input("secret/a password |").unwrap_err(),
            InputError::EmptyName { .. }
        ));
        assert!(matches!(
            parse_secrets_input("secret/a").unwrap_err(),
            InputError::InvalidEntry { .. }
        ));
        assert!(matches!(
            parse_secrets_input("secret/a b c").unwrap_err(),
            InputError::InvalidEntry { .. }
        ));
        assert!(matches!(
            parse_secrets_input("secret/a a..b | X").unwrap_err(),
            InputError::InvalidSelector { .. }
        ));
    }

    #[test]
    fn error_names_the_entry() {
        let err = parse_secrets_input("ok/path key\nsecret/a").unwrap_err();
        assert_eq!(
            err.to_string(),
            "you must provide a valid path and key: \"secret/a\""
        );
    }
}
