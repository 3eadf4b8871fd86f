use std::path::PathBuf;

pub const DEFAULT_INPUT: &str = "cv_data.yaml";
pub const DEFAULT_OUTPUT: &str = "professional_cv.pdf";
pub const DEFAULT_GITHUB_URL: &str = "https://github.com/Gnehsbob/Gnehsbob.git";
pub const DEFAULT_LINKEDIN_URL: &str = "https://www.linkedin.com/in/bokgosi-letebele-537b7a207?lipi=urn%3Ali%3Apage%3Ad_flagship3_profile_view_base_contact_details%3BfeAwj0okRNmpnV43K8cp3w%3D%3D";

/// Runtime configuration loaded from environment variables (and `.env` if present).
/// Every key is optional; unset keys fall back to the built-in defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub default_input: PathBuf,
    pub output: PathBuf,
    pub links: ProfileLinks,
    pub rust_log: String,
}

/// Targets of the two fixed "GitHub" / "LinkedIn" labels on the contact line.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileLinks {
    pub github: String,
    pub linkedin: String,
}

impl Default for ProfileLinks {
    fn default() -> Self {
        Self {
            github: DEFAULT_GITHUB_URL.to_string(),
            linkedin: DEFAULT_LINKEDIN_URL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Config {
            default_input: get("CV_DEFAULT_INPUT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT)),
            output: get("CV_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            links: ProfileLinks {
                github: get("CV_GITHUB_URL").unwrap_or_else(|| DEFAULT_GITHUB_URL.to_string()),
                linkedin: get("CV_LINKEDIN_URL")
                    .unwrap_or_else(|| DEFAULT_LINKEDIN_URL.to_string()),
            },
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        }
    }
}
