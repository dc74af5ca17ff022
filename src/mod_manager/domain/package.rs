use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------- Package Index ----------------
/// A package as listed in search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModSummary {
    pub name: String,
    pub full_name: String,
    pub owner: String,
    #[serde(rename = "uuid4")]
    pub uuid: String,
    pub package_url: String,
    pub categories: Vec<String>,
    pub rating_score: i32,
    pub has_nsfw_content: bool,
    pub is_deprecated: bool,
    pub is_pinned: bool,
    pub date_created: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
    /// Newest first.
    pub versions: Vec<Version>,
}

impl ModSummary {
    /// The representative version shown in lists and installed by default.
    pub fn latest(&self) -> Option<&Version> {
        self.versions.first()
    }

    pub fn days_since_update(&self, now: DateTime<Utc>) -> i64 {
        (now - self.date_updated).num_days()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Version {
    pub name: String,
    /// `Owner-Name-1.2.3`, the identity the backend installs by.
    pub full_name: String,
    pub version_number: String,
    #[serde(rename = "uuid4")]
    pub uuid: String,
    pub description: String,
    pub icon: String,
    pub download_url: String,
    pub website_url: String,
    pub downloads: u64,
    pub file_size: u64,
    pub dependencies: Vec<String>,
    pub is_active: bool,
    pub date_created: DateTime<Utc>,
}

/// Splits `Owner-Name-1.2.3` into (`Owner-Name`, `1.2.3`).
pub fn split_version_name(version_name: &str) -> Option<(&str, &str)> {
    version_name
        .rsplit_once('-')
        .filter(|(full_name, number)| !full_name.is_empty() && !number.is_empty())
}

// ---------------- Installed Mod ----------------
/// A mod installed in a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModInfo {
    pub name: String,
    pub full_name: String,
    pub description: String,
    pub author: String,
    pub version_number: String,
    pub dependencies: Vec<String>,
    pub folder: String,
    pub icon: Option<String>,
    pub enabled: bool,
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_split_version_name() {
        assert_eq!(
            split_version_name("Evaisa-LethalLib-0.16.1"),
            Some(("Evaisa-LethalLib", "0.16.1"))
        );
        assert_eq!(split_version_name("NoVersion"), None);
        assert_eq!(split_version_name("Trailing-"), None);
    }

    #[test]
    fn test_latest_is_first_version() {
        let m = fixtures::mod_summary("Evaisa", "LethalLib");
        assert_eq!(m.latest().unwrap().full_name, "Evaisa-LethalLib-1.1.0");
    }

    #[test]
    fn test_days_since_update() {
        let m = fixtures::mod_summary("Evaisa", "LethalLib");
        let now = Utc.with_ymd_and_hms(2024, 1, 20, 12, 0, 0).unwrap();
        assert_eq!(m.days_since_update(now), 10);
    }

    #[test]
    fn test_decodes_backend_package() {
        let raw = serde_json::json!({
            "name": "LethalLib",
            "full_name": "Evaisa-LethalLib",
            "owner": "Evaisa",
            "uuid4": "abc",
            "package_url": "https://thunderstore.io/c/lethal-company/p/Evaisa/LethalLib/",
            "categories": ["Libraries"],
            "rating_score": 500,
            "has_nsfw_content": false,
            "is_deprecated": false,
            "is_pinned": true,
            "date_created": "2023-11-01T10:00:00Z",
            "date_updated": "2024-01-02T10:00:00Z",
            "versions": [{
                "name": "LethalLib",
                "full_name": "Evaisa-LethalLib-0.16.1",
                "version_number": "0.16.1",
                "uuid4": "def",
                "description": "Library",
                "icon": "https://gcdn.thunderstore.io/icon.png",
                "download_url": "https://thunderstore.io/package/download/Evaisa/LethalLib/0.16.1/",
                "website_url": "",
                "downloads": 1000000,
                "file_size": 120000,
                "dependencies": ["BepInEx-BepInExPack-5.4.2100"],
                "is_active": true,
                "date_created": "2024-01-02T10:00:00Z"
            }]
        });
        let m: ModSummary = serde_json::from_value(raw).unwrap();
        assert_eq!(m.uuid, "abc");
        assert_eq!(m.latest().unwrap().dependencies.len(), 1);
    }
}
