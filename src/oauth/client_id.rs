use serde::Serialize;

use crate::utils::app_config::PLACEHOLDER_GOOGLE_CLIENT_ID;

pub const GOOGLE_CLIENT_ID_SUFFIX: &str = ".apps.googleusercontent.com";

/// What a client id looks like. Inspection is advisory, the value is never rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClientIdShape {
    Placeholder,
    /// `<project-number>-<suffix>.apps.googleusercontent.com`
    GoogleIssued { project_number: String },
    Unrecognized,
}

impl ClientIdShape {
    pub fn inspect(client_id: &str) -> Self {
        if client_id == PLACEHOLDER_GOOGLE_CLIENT_ID {
            return Self::Placeholder;
        }

        let Some(head) = client_id.strip_suffix(GOOGLE_CLIENT_ID_SUFFIX) else {
            return Self::Unrecognized;
        };
        let Some((project_number, rest)) = head.split_once('-') else {
            return Self::Unrecognized;
        };

        let numeric = !project_number.is_empty()
            && project_number.chars().all(|c| c.is_ascii_digit());
        let alnum = !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric());

        if numeric && alnum {
            Self::GoogleIssued {
                project_number: project_number.to_string(),
            }
        } else {
            Self::Unrecognized
        }
    }

    /// The placeholder itself is already reported by `AppConfig::from_source`.
    pub fn log(&self, client_id: &str) {
        match self {
            Self::Placeholder => tracing::debug!("Google client id is the placeholder"),
            Self::GoogleIssued { project_number } => {
                tracing::info!("Google client id for project {}", project_number)
            }
            Self::Unrecognized => tracing::warn!(
                "Google client id {:?} is not in the <project-number>-<id>{} form",
                client_id,
                GOOGLE_CLIENT_ID_SUFFIX
            ),
        }
    }
}
