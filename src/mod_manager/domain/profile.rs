use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub icon: Option<String>,
    pub folder: String,
}

/// Profile listing entry, includes the installed mod count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileInfo {
    pub name: String,
    pub icon: Option<String>,
    pub mods_amount: usize,
    pub folder: String,
}

impl ProfileInfo {
    pub fn to_profile(&self) -> Profile {
        Profile {
            name: self.name.clone(),
            icon: self.icon.clone(),
            folder: self.folder.clone(),
        }
    }
}
