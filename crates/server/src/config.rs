use shared_types::{AppConfig, AuthLinks, FeatureFlags};
use std::sync::{Once, OnceLock};

static FLAGS: OnceLock<FeatureFlags> = OnceLock::new();
static DOTENV: Once = Once::new();

/// Path to the config file, relative to the project root.
const CONFIG_PATH: &str = "config.toml";

/// Read `config.toml`, parse feature flags, and store them in the global
/// `OnceLock`. Only the first call has an effect.
///
/// If the file is missing or unparseable, all flags default to `false`.
pub fn load_feature_flags() {
    FLAGS.get_or_init(|| match std::fs::read_to_string(CONFIG_PATH) {
        Ok(contents) => {
            let config = parse_config(&contents);
            tracing::info!(flags = ?config.features, "Feature flags loaded");
            config.features
        }
        Err(e) => {
            tracing::warn!(path = CONFIG_PATH, error = %e, "Config file not found, all flags off");
            FeatureFlags::default()
        }
    });
}

fn parse_config(contents: &str) -> AppConfig {
    toml::from_str(contents).unwrap_or_else(|e| {
        tracing::error!(path = CONFIG_PATH, error = %e, "Failed to parse config, all flags off");
        AppConfig::default()
    })
}

/// Loaded feature flags, or all-false defaults before `load_feature_flags()`.
pub fn feature_flags() -> &'static FeatureFlags {
    static DEFAULT: FeatureFlags = FeatureFlags {
        telemetry: false,
        sign_up: false,
    };
    FLAGS.get().unwrap_or(&DEFAULT)
}

/// Load `.env` into the process environment. Only the first call touches
/// the filesystem; variables already set are never overridden.
pub fn load_dotenv() {
    DOTENV.call_once(|| {
        let _ = dotenvy::dotenv();
    });
}

/// Settings for the external identity provider, read from the environment.
///
/// - `IDENTITY_JWT_SECRET`: HMAC secret the provider signs session tokens with
/// - `IDENTITY_ISSUER`: expected `iss` claim (optional)
/// - `IDENTITY_SIGN_IN_URL` / `IDENTITY_SIGN_UP_URL`: hosted screens
/// - `APP_URL`: where the provider sends the user back
#[derive(Debug, Clone, Default)]
pub struct IdentityConfig {
    pub jwt_secret: Option<String>,
    pub issuer: Option<String>,
    pub sign_in_url: Option<String>,
    pub sign_up_url: Option<String>,
    pub app_url: Option<String>,
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl IdentityConfig {
    pub fn from_env() -> Self {
        load_dotenv();
        Self {
            jwt_secret: non_empty_env("IDENTITY_JWT_SECRET"),
            issuer: non_empty_env("IDENTITY_ISSUER"),
            sign_in_url: non_empty_env("IDENTITY_SIGN_IN_URL"),
            sign_up_url: non_empty_env("IDENTITY_SIGN_UP_URL"),
            app_url: non_empty_env("APP_URL"),
        }
    }

    /// Hosted sign-in/sign-up URLs with the return address appended.
    pub fn auth_links(&self, flags: &FeatureFlags) -> AuthLinks {
        let with_return = |base: &String| match &self.app_url {
            Some(app_url) => {
                let sep = if base.contains('?') { '&' } else { '?' };
                format!("{base}{sep}redirect_url={}", urlencoding::encode(app_url))
            }
            None => base.clone(),
        };
        AuthLinks {
            sign_in_url: self.sign_in_url.as_ref().map(with_return),
            sign_up_url: if flags.sign_up {
                self.sign_up_url.as_ref().map(with_return)
            } else {
                None
            },
        }
    }
}
