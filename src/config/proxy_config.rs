//! Proxy resolution.
//!
//! A non-empty `proxy` URL always wins. Otherwise, when `proxy_enabled` is
//! `true`, the URL is composed from the structured `proxy_*` keys written by
//! the app's setup page.

use super::get_str;
use crate::domain::errors::CollectorError;
use crate::domain::ports::SettingsSource;
use url::Url;

pub fn resolve_proxy(source: &dyn SettingsSource) -> Result<Option<String>, CollectorError> {
    let proxy = get_str(source, "proxy");
    if !proxy.is_empty() {
        return Ok(Some(proxy));
    }

    if !get_str(source, "proxy_enabled").eq_ignore_ascii_case("true") {
        return Ok(None);
    }

    let scheme = match get_str(source, "proxy_scheme") {
        scheme if scheme.is_empty() => "http".to_string(),
        scheme => scheme.to_lowercase(),
    };
    let host = get_str(source, "proxy_host");
    let port = get_str(source, "proxy_port");

    if host.is_empty() || port.is_empty() {
        return Err(CollectorError::config(
            "Proxy enabled but host/port missing",
        ));
    }

    let port: u16 = port
        .parse()
        .map_err(|_| CollectorError::config(format!("Invalid proxy_port: {}", port)))?;

    let mut url = Url::parse(&format!("{}://{}:{}", scheme, host, port))
        .map_err(|e| CollectorError::config(format!("Invalid proxy settings: {}", e)))?;

    let username = get_str(source, "proxy_username");
    let password = get_str(source, "proxy_password");
    if !username.is_empty() && !password.is_empty() {
        url.set_username(&username)
            .and_then(|_| url.set_password(Some(&password)))
            .map_err(|_| CollectorError::config("Proxy URL cannot carry credentials"))?;
    }

    Ok(Some(url.to_string()))
}
