//! Authentication descriptors attached to a script.

use serde::{Deserialize, Serialize};

/// Credentials a host should supply while running a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ZestAuthentication {
    /// HTTP basic/digest credentials for one site and realm.
    Http {
        site: String,
        realm: String,
        username: String,
        password: String,
    },
}

impl ZestAuthentication {
    pub fn http(
        site: impl Into<String>,
        realm: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        ZestAuthentication::Http {
            site: site.into(),
            realm: realm.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// The site these credentials apply to.
    pub fn site(&self) -> &str {
        match self {
            ZestAuthentication::Http { site, .. } => site,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let auth = ZestAuthentication::http("example.com", "admin", "bob", "hunter2");
        let json = serde_json::to_value(&auth).unwrap();
        assert_eq!(json["type"], "Http");
        assert_eq!(json["site"], "example.com");
        let back: ZestAuthentication = serde_json::from_value(json).unwrap();
        assert_eq!(back, auth);
        assert_eq!(back.site(), "example.com");
    }
}
