use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};
use tracing::debug;

use crate::{
    config::Config,
    error::ConfigError,
    identity::{AccountLookup, SystemAccounts},
    options::parse_config_with,
};

/// Reads `name=value` assignments from the file at `path` into `config`.
///
/// Stops at the first bad line. Assignments from earlier lines stay applied.
pub fn load_config(config: &mut Config, path: impl AsRef<Path>) -> Result<(), ConfigError> {
    load_config_with(config, path, &SystemAccounts)
}

pub fn load_config_with(
    config: &mut Config,
    path: impl AsRef<Path>,
    accounts: &dyn AccountLookup,
) -> Result<(), ConfigError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ConfigError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(config_file = %path.display(), "Loading configuration file");
    load_from_reader(config, BufReader::new(file), accounts)
}

/// Line loop behind [`load_config`]. Blank lines and lines starting with `#` are skipped;
/// every other line is split on its first `=` with no trimming.
pub fn load_from_reader<R: BufRead>(
    config: &mut Config,
    reader: R,
    accounts: &dyn AccountLookup,
) -> Result<(), ConfigError> {
    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.map_err(|source| ConfigError::Read {
            line: line_number,
            source,
        })?;

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((name, value)) = line.split_once('=') else {
            return Err(ConfigError::MalformedLine { line: line_number });
        };

        parse_config_with(config, name, value, accounts).map_err(|source| {
            ConfigError::InvalidLine {
                line: line_number,
                source: Box::new(source),
            }
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Account;
    use std::{io, io::Write, time::Duration};

    struct NoAccounts;

    impl AccountLookup for NoAccounts {
        fn lookup(&self, _name: &str) -> io::Result<Account> {
            Err(io::Error::new(io::ErrorKind::NotFound, "no such account"))
        }
    }

    fn load_str(config: &mut Config, content: &str) -> Result<(), ConfigError> {
        load_from_reader(config, content.as_bytes(), &NoAccounts)
    }

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("create temp config");
        file.write_all(content.as_bytes()).expect("write temp config");
        file
    }

    mod parsing {
        use super::*;

        #[test]
        fn applies_assignments_in_order() {
            let mut config = Config::new();
            load_str(
                &mut config,
                "frontend=0.0.0.0,3000\nbackend=127.0.0.1,80\nworkers=2\nworkers=4\n",
            )
            .unwrap();

            assert_eq!(config.frontend_host.as_deref(), Some("0.0.0.0"));
            assert_eq!(config.frontend_port, 3000);
            assert_eq!(config.backend_hostport().as_deref(), Some("127.0.0.1:80"));
            assert_eq!(config.workers, 4);
        }

        #[test]
        fn comments_and_blank_lines_leave_defaults() {
            let mut config = Config::new();
            load_str(&mut config, "# proxy settings\n\n#workers=8\n\n").unwrap();
            assert_eq!(config, Config::new());
        }

        #[test]
        fn empty_input_succeeds() {
            let mut config = Config::new();
            load_str(&mut config, "").unwrap();
            assert_eq!(config, Config::new());
        }

        #[test]
        fn value_keeps_everything_after_first_equals() {
            let mut config = Config::new();
            load_str(&mut config, "pid-file=/run/a=b.pid\n").unwrap();
            assert_eq!(config.pid_file.as_deref(), Some("/run/a=b.pid"));
        }

        #[test]
        fn whitespace_is_not_trimmed() {
            let mut config = Config::new();
            load_str(&mut config, "private-key-file= /etc/key.pem\n").unwrap();
            assert_eq!(config.private_key_file.as_deref(), Some(" /etc/key.pem"));

            let err = load_str(&mut config, "workers = 4\n").unwrap_err();
            assert!(matches!(err, ConfigError::InvalidLine { line: 1, .. }));
        }

        #[test]
        fn trailing_space_after_backend_port_is_ignored() {
            let mut config = Config::new();
            load_str(&mut config, "backend=backend.local,8080 \n").unwrap();
            assert_eq!(config.backend_hostport().as_deref(), Some("backend.local:8080"));
        }

        #[test]
        fn crlf_line_endings_are_stripped() {
            let mut config = Config::new();
            load_str(&mut config, "backend-read-timeout=30\r\nworkers=3\r\n").unwrap();
            assert_eq!(config.timeouts.backend_read, Duration::from_secs(30));
            assert_eq!(config.workers, 3);
        }

        #[test]
        fn names_are_case_insensitive() {
            let mut config = Config::new();
            load_str(&mut config, "DAEMON=yes\nAccessLog=YES\n").unwrap();
            assert!(config.daemon);
            assert!(config.accesslog);
        }

        #[test]
        fn indented_comment_is_not_a_comment() {
            let mut config = Config::new();
            let err = load_str(&mut config, " # not a comment\n").unwrap_err();
            assert!(matches!(err, ConfigError::MalformedLine { line: 1 }));
        }
    }

    mod failures {
        use super::*;

        #[test]
        fn missing_equals_stops_at_that_line() {
            let mut config = Config::new();
            let err = load_str(&mut config, "workers=2\n# comment\nbackend\nworkers=9\n").unwrap_err();

            assert!(matches!(err, ConfigError::MalformedLine { line: 3 }));
            assert_eq!(err.line(), Some(3));
            assert_eq!(err.to_string(), "Bad configuration format at line 3");
            assert_eq!(config.workers, 2);
        }

        #[test]
        fn invalid_option_reports_line_and_cause() {
            let mut config = Config::new();
            let err = load_str(&mut config, "daemon=yes\n\nfrontend-spdy-window-bits=31\nworkers=5\n")
                .unwrap_err();

            match err {
                ConfigError::InvalidLine { line, source } => {
                    assert_eq!(line, 3);
                    assert!(matches!(*source, ConfigError::OutOfRange { .. }));
                }
                other => panic!("expected InvalidLine, got {other:?}"),
            }
            assert!(config.daemon);
            assert_eq!(config.workers, 0);
        }

        #[test]
        fn unknown_option_in_file_fails() {
            let mut config = Config::new();
            let err = load_str(&mut config, "listen=0.0.0.0,80\n").unwrap_err();
            match err {
                ConfigError::InvalidLine { source, .. } => assert!(matches!(
                    *source,
                    ConfigError::UnknownOption(ref name) if name == "listen"
                )),
                other => panic!("expected InvalidLine, got {other:?}"),
            }
        }

        #[test]
        fn failed_user_lookup_aborts_load() {
            let mut config = Config::new();
            let err = load_str(&mut config, "user=proxy\n").unwrap_err();
            assert_eq!(err.line(), Some(1));
            assert_eq!((config.uid, config.gid), (0, 0));
        }

        #[test]
        fn invalid_utf8_is_a_read_error() {
            let mut config = Config::new();
            let err = load_from_reader(&mut config, &b"workers=1\npid-file=\xff\n"[..], &NoAccounts)
                .unwrap_err();
            assert!(matches!(err, ConfigError::Read { line: 2, .. }));
            assert_eq!(config.workers, 1);
        }
    }

    mod files {
        use super::*;

        #[test]
        fn loads_from_disk() {
            let file = write_config("# frontend\nfrontend=localhost,8443\nbackend-keep-alive-timeout=2\n");
            let mut config = Config::new();
            load_config_with(&mut config, file.path(), &NoAccounts).unwrap();

            assert_eq!(config.frontend_host.as_deref(), Some("localhost"));
            assert_eq!(config.frontend_port, 8443);
            assert_eq!(config.timeouts.backend_keep_alive, Duration::from_secs(2));
        }

        #[test]
        fn missing_file_names_the_path() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("absent.conf");
            let mut config = Config::new();

            let err = load_config(&mut config, &path).unwrap_err();
            assert!(matches!(&err, ConfigError::Open { path: p, .. } if *p == path));
            assert!(err.to_string().contains("absent.conf"));
        }
    }
}
