use crate::error::{CoreError, CoreResult};
use std::net::IpAddr;

pub fn is_loopback_endpoint(endpoint: &str) -> CoreResult<bool> {
    // Expect URL like http://127.0.0.1:port
    let url = url::Url::parse(endpoint)
        .map_err(|_| CoreError::InvalidInput("invalid model endpoint URL".to_string()))?;
    let host = url
        .host_str()
        .ok_or_else(|| CoreError::InvalidInput("model endpoint missing host".to_string()))?;
    if host.eq_ignore_ascii_case("localhost") {
        return Ok(true);
    }
    // IPv6 hosts come back bracketed.
    let host = host.trim_start_matches('[').trim_end_matches(']');
    let ip: IpAddr = host.parse().map_err(|_| {
        CoreError::InvalidInput("model endpoint host must be an IP address or localhost".to_string())
    })?;
    Ok(ip.is_loopback())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_loopback_hosts() {
        assert!(is_loopback_endpoint("http://127.0.0.1:8080").unwrap());
        assert!(is_loopback_endpoint("http://[::1]:8080/generate").unwrap());
        assert!(is_loopback_endpoint("http://localhost:3000").unwrap());
        assert!(!is_loopback_endpoint("http://10.0.0.4:8080").unwrap());
    }

    #[test]
    fn rejects_names_and_garbage() {
        assert!(is_loopback_endpoint("http://models.example.com").is_err());
        assert!(is_loopback_endpoint("not a url").is_err());
    }
}
