//! Process configuration, read once from the environment by the
//! composition root. Nothing below the root consults the environment.

use std::env;
use std::path::PathBuf;

use crate::auth::AdminSeed;

pub const APP_NAME: &str = "Docuvault";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Upload size cap, enforced at the HTTP boundary.
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

const DEFAULT_PORT: u16 = 5000;
const DEV_TOKEN_SECRET: &str = "your-secret-key";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Root for the database file and the uploads directory.
    pub data_dir: PathBuf,
    /// Process-wide token signing secret.
    pub token_secret: String,
    pub admin_email: String,
    pub admin_password: String,
    pub admin_name: String,
}

impl Config {
    /// Read configuration from the environment, with the stock defaults
    /// for anything unset.
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let data_dir = env::var("DOCUVAULT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        let token_secret = env::var("TOKEN_SECRET").unwrap_or_else(|_| {
            tracing::warn!("TOKEN_SECRET not set, using the development default");
            DEV_TOKEN_SECRET.into()
        });

        Self {
            port,
            data_dir,
            token_secret,
            admin_email: env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@example.com".into()),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".into()),
            admin_name: env::var("ADMIN_NAME").unwrap_or_else(|_| "Admin User".into()),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("docuvault.db")
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }

    pub fn admin_seed(&self) -> AdminSeed {
        AdminSeed {
            email: self.admin_email.clone(),
            password: self.admin_password.clone(),
            name: self.admin_name.clone(),
        }
    }
}

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "docuvault=info,tower_http=warn"
}

/// `~/Docuvault`, user-visible like the rest of the app's data.
fn default_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join(APP_NAME)
}
