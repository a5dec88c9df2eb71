//! Static AccessKey credential resolution.
//!
//! Credentials are never read from disk: explicit flags win, otherwise the
//! standard `ALIBABA_CLOUD_*` environment variables are consulted. Missing
//! credentials are a fatal error raised before any API call is made.

use miette::bail;

pub const ACCESS_KEY_ID_ENV: &str = "ALIBABA_CLOUD_ACCESS_KEY_ID";
pub const ACCESS_KEY_SECRET_ENV: &str = "ALIBABA_CLOUD_ACCESS_KEY_SECRET";

#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_key_id: String,
    pub access_key_secret: String,
}

impl Credentials {
    /// Resolve credentials from explicit flag values, falling back to the
    /// environment.
    pub fn resolve(
        flag_id: Option<String>,
        flag_secret: Option<String>,
    ) -> miette::Result<Self> {
        let access_key_id = flag_id.or_else(|| env_var(ACCESS_KEY_ID_ENV));
        let access_key_secret = flag_secret.or_else(|| env_var(ACCESS_KEY_SECRET_ENV));

        match (access_key_id, access_key_secret) {
            (Some(access_key_id), Some(access_key_secret)) => Ok(Self {
                access_key_id,
                access_key_secret,
            }),
            _ => bail!(
                "missing AccessKey credentials: pass --access-key-id and \
                 --access-key-secret or set {ACCESS_KEY_ID_ENV} and {ACCESS_KEY_SECRET_ENV}"
            ),
        }
    }

    /// Environment-only resolution, for commands that take no credential flags.
    pub fn from_env() -> miette::Result<Self> {
        Self::resolve(None, None)
    }

    /// The AccessKey id, masked for reports and logs.
    pub fn masked_key_id(&self) -> String {
        mask(&self.access_key_id)
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Keep only the first and last four characters of a secret-adjacent value.
pub fn mask(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    if value.len() <= 8 {
        return "***".to_string();
    }
    format!("{}****{}", &value[..4], &value[value.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_hides_the_middle_of_long_values() {
        assert_eq!(mask("LTAI4FabcdefGHijklMN"), "LTAI****klMN");
    }

    #[test]
    fn mask_collapses_short_values() {
        assert_eq!(mask("short"), "***");
        assert_eq!(mask("12345678"), "***");
    }

    #[test]
    fn mask_of_empty_is_empty() {
        assert_eq!(mask(""), "");
    }

    #[test]
    fn explicit_flags_win_over_everything() {
        let credentials =
            Credentials::resolve(Some("flag-id".into()), Some("flag-secret".into()))
                .expect("flags alone must resolve");

        assert_eq!(credentials.access_key_id, "flag-id");
        assert_eq!(credentials.access_key_secret, "flag-secret");
    }
}
