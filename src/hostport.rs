use crate::error::ConfigError;

/// Longest hostname accepted from a `host,port` token, terminator included (`NI_MAXHOST`).
pub const MAX_HOSTNAME_LEN: usize = 1025;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPort {
    pub host: String,
    pub port: u16,
}

/// Splits a `<host>,<port>` token on its first comma.
///
/// The host must fit in `max_host_len` bytes with room left for a terminator. The port is
/// read like `strtoul`: leading whitespace and a `+` are skipped, the longest run of
/// decimal digits is taken and anything after it is ignored. It must land in `[1, 65535]`.
pub fn split_host_port(token: &str, max_host_len: usize) -> Result<HostPort, ConfigError> {
    let Some((host, port)) = token.split_once(',') else {
        return Err(ConfigError::InvalidHostPort(token.to_string()));
    };

    if max_host_len < host.len() + 1 {
        return Err(ConfigError::HostnameTooLong(token.to_string()));
    }

    let port = leading_port(port).ok_or_else(|| ConfigError::InvalidPort(port.to_string()))?;

    Ok(HostPort {
        host: host.to_string(),
        port,
    })
}

fn leading_port(text: &str) -> Option<u16> {
    let text = text.trim_start_matches([' ', '\t', '\n', '\x0B', '\x0C', '\r']);
    let text = text.strip_prefix('+').unwrap_or(text);
    let digits = text.bytes().take_while(u8::is_ascii_digit).count();

    // Empty or overflowing digit runs fail to parse.
    let value: u64 = text[..digits].parse().ok()?;
    u16::try_from(value).ok().filter(|port| *port != 0)
}
