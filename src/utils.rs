use crate::error::ConfigError;
use url::Url;

/// Log target for events that should also be treated as actionable alerts
pub const ALERT_TARGET: &str = "job_crawler::alert";

/// Log a critical failure on both the regular and the alert target
pub fn alert(message: &str) {
    ::log::error!("{}", message);
    ::log::error!(target: ALERT_TARGET, "{}", message);
}

/// Origin of `base_url` as a string, e.g. `https://timviec365.vn`
pub fn permission_origin(base_url: &str) -> Result<String, ConfigError> {
    let url = Url::parse(base_url).map_err(|source| ConfigError::Url {
        url: base_url.to_string(),
        source,
    })?;
    match url.origin() {
        origin @ url::Origin::Tuple(..) => Ok(origin.ascii_serialization()),
        url::Origin::Opaque(_) => Err(ConfigError::OpaqueOrigin {
            url: base_url.to_string(),
        }),
    }
}
