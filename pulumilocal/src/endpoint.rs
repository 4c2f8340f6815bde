//! Emulator endpoint resolution.
//!
//! Turns [`EndpointSettings`] into the single base URL every overridden
//! service endpoint points at.

use url::Url;

use crate::config::EndpointSettings;
use crate::logging::Logger;

/// Resolves the emulator base URL.
///
/// A combined `endpoint_url` supplies host and port, taking precedence
/// over the discrete hostname and port. A combined URL without an explicit
/// port keeps the discrete port. The scheme always follows
/// `use_ssl`. A combined URL that cannot be parsed, or has no host, is
/// ignored with a warning.
///
/// # Examples
///
/// ```
/// use pulumilocal::config::EndpointSettings;
/// use pulumilocal::endpoint::resolve_endpoint;
/// use pulumilocal::Logger;
///
/// let settings = EndpointSettings::default();
/// assert_eq!(resolve_endpoint(&settings, &Logger::default()), "http://localhost:4566");
///
/// let settings = EndpointSettings {
///     endpoint_url: Some("http://emulator:4510".to_string()),
///     use_ssl: true,
///     ..EndpointSettings::default()
/// };
/// assert_eq!(resolve_endpoint(&settings, &Logger::default()), "https://emulator:4510");
/// ```
#[must_use]
pub fn resolve_endpoint(settings: &EndpointSettings, logger: &Logger) -> String {
    let mut hostname = settings.hostname.clone();
    let mut port = settings.port;

    if let Some(raw) = &settings.endpoint_url {
        match combined_host_port(raw) {
            Some((host, url_port)) => {
                hostname = host;
                if let Some(url_port) = url_port {
                    port = url_port;
                }
            }
            None => logger.warn(&format!(
                "ignoring AWS_ENDPOINT_URL '{raw}': expected a URL such as http://localhost:4566"
            )),
        }
    }

    let scheme = if settings.use_ssl { "https" } else { "http" };
    format!("{scheme}://{hostname}:{port}")
}

/// Extracts host and explicit port from a combined URL.
///
/// `Url::port` hides a port equal to the scheme default, so `:80` and `:443`
/// are detected from the raw authority.
fn combined_host_port(raw: &str) -> Option<(String, Option<u16>)> {
    let url = Url::parse(raw).ok()?;
    let host = url.host_str()?.to_string();
    let port = if has_explicit_port(raw) {
        url.port_or_known_default()
    } else {
        None
    };
    Some((host, port))
}

/// Returns true if the authority of `raw` ends in `:<digits>`.
fn has_explicit_port(raw: &str) -> bool {
    let Some((_, rest)) = raw.split_once("://") else {
        return false;
    };
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit('@').next().unwrap_or(authority);
    let after_host = match host_port.rfind(']') {
        Some(end) => &host_port[end + 1..],
        None => host_port,
    };
    after_host
        .rsplit_once(':')
        .is_some_and(|(_, port)| !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LogLevel;

    fn quiet() -> Logger {
        Logger::new(LogLevel::Quiet)
    }

    #[test]
    fn test_discrete_settings() {
        let settings = EndpointSettings {
            hostname: "localhost.localstack.cloud".to_string(),
            port: 4567,
            ..EndpointSettings::default()
        };
        assert_eq!(
            resolve_endpoint(&settings, &quiet()),
            "http://localhost.localstack.cloud:4567"
        );
    }

    #[test]
    fn test_combined_url_overrides_discrete_values() {
        let settings = EndpointSettings {
            endpoint_url: Some("http://ls.internal:4510".to_string()),
            hostname: "ignored".to_string(),
            port: 1234,
            use_ssl: false,
        };
        assert_eq!(
            resolve_endpoint(&settings, &quiet()),
            "http://ls.internal:4510"
        );
    }

    #[test]
    fn test_tls_flag_independent_of_combined_scheme() {
        let settings = EndpointSettings {
            endpoint_url: Some("https://ls.internal:4510".to_string()),
            use_ssl: false,
            ..EndpointSettings::default()
        };
        assert_eq!(
            resolve_endpoint(&settings, &quiet()),
            "http://ls.internal:4510"
        );
    }

    #[test]
    fn test_combined_url_without_port_keeps_discrete_port() {
        let settings = EndpointSettings {
            endpoint_url: Some("https://emulator.example".to_string()),
            use_ssl: true,
            ..EndpointSettings::default()
        };
        assert_eq!(
            resolve_endpoint(&settings, &quiet()),
            "https://emulator.example:4566"
        );
    }

    #[test]
    fn test_unparseable_combined_url_ignored() {
        let settings = EndpointSettings {
            endpoint_url: Some("not a url".to_string()),
            ..EndpointSettings::default()
        };
        assert_eq!(resolve_endpoint(&settings, &quiet()), "http://localhost:4566");
    }

    #[test]
    fn test_combined_url_keeps_explicit_default_ports() {
        let http = EndpointSettings {
            endpoint_url: Some("http://emulator:80".to_string()),
            ..EndpointSettings::default()
        };
        assert_eq!(resolve_endpoint(&http, &quiet()), "http://emulator:80");

        let https = EndpointSettings {
            endpoint_url: Some("https://localhost.localstack.cloud:443/".to_string()),
            use_ssl: true,
            ..EndpointSettings::default()
        };
        assert_eq!(
            resolve_endpoint(&https, &quiet()),
            "https://localhost.localstack.cloud:443"
        );
    }

    #[test]
    fn test_has_explicit_port() {
        assert!(has_explicit_port("http://emulator:80"));
        assert!(has_explicit_port("http://user:pw@emulator:443/path"));
        assert!(has_explicit_port("http://[::1]:4566"));
        assert!(!has_explicit_port("http://emulator"));
        assert!(!has_explicit_port("http://user:pw@emulator/path"));
        assert!(!has_explicit_port("http://[::1]/"));
    }
}
