use std::env;

/// AppConfig
///
/// Holds the application's entire configuration state. This struct is designed to be
/// immutable once loaded, ensuring consistency across all threads and services.
/// It is carried inside the shared application state and handed to the token
/// service at startup.
#[derive(Clone)]
pub struct AppConfig {
    // Runtime environment marker. Controls log formatting and secret resolution.
    pub env: Env,
    // Secret key used to sign and verify the session tokens issued at login.
    pub jwt_secret: String,
}

/// Env
///
/// Defines the runtime context, used to switch between development conveniences
/// (pretty logs, fallback secret) and hardened production behavior (JSON logs,
/// mandatory secret).
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// default
    ///
    /// Provides a safe, non-panicking AppConfig instance primarily used for test setup.
    /// This allows us to instantiate the configuration without needing to set environment
    /// variables for lightweight unit or integration testing state scaffolding.
    fn default() -> Self {
        Self {
            env: Env::Local,
            jwt_secret: "super-secure-test-secret-value-local".to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// The canonical function for initializing the application configuration at startup.
    /// It reads all parameters from environment variables and implements the **fail-fast** principle.
    ///
    /// # Panics
    /// Panics if a critical environment variable required for the current runtime environment
    /// (especially Production) is not found. This prevents the application from starting
    /// with an incomplete or insecure configuration.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        // JWT Secret Resolution
        // The production secret is mandatory and must be explicitly set.
        let jwt_secret = match env {
            Env::Production => {
                env::var("JWT_SECRET").expect("FATAL: JWT_SECRET must be set in production.")
            }
            // In local, we provide a fallback so the server can start out of the box.
            _ => env::var("JWT_SECRET")
                .unwrap_or_else(|_| "super-secure-test-secret-value-local".to_string()),
        };

        Self { env, jwt_secret }
    }
}
