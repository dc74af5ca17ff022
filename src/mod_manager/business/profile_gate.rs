use crate::mod_manager::business::download::InstallRequest;
use crate::mod_manager::domain::ProfileInfo;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOption {
    Existing(ProfileInfo),
    /// Create a profile named after the mod, using the version's icon.
    CreateNew { name: String, icon: Option<String> },
}

/// Profile picker shown when an install has no target profile yet.
#[derive(Debug, Default)]
pub struct ProfileGate {
    request: Option<InstallRequest>,
    profiles: Vec<ProfileInfo>,
    creating: bool,
    error: Option<String>,
}

impl ProfileGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, request: InstallRequest, profiles: Vec<ProfileInfo>) {
        self.request = Some(request);
        self.profiles = profiles;
        self.creating = false;
        self.error = None;
    }

    pub fn is_open(&self) -> bool {
        self.request.is_some()
    }

    pub fn request(&self) -> Option<&InstallRequest> {
        self.request.as_ref()
    }

    pub fn set_profiles(&mut self, profiles: Vec<ProfileInfo>) {
        self.profiles = profiles;
    }

    pub fn options(&self) -> Vec<GateOption> {
        let Some(request) = &self.request else {
            return Vec::new();
        };
        let mut options: Vec<GateOption> = self
            .profiles
            .iter()
            .cloned()
            .map(GateOption::Existing)
            .collect();
        if !self.profiles.iter().any(|p| p.name == request.mod_name) {
            options.push(GateOption::CreateNew {
                name: request.mod_name.clone(),
                icon: request.icon.clone(),
            });
        }
        options
    }

    pub fn has_profile(&self, name: &str) -> bool {
        self.profiles.iter().any(|p| p.name == name)
    }

    /// Marks the create step as running. Returns the profile to create.
    pub fn begin_create(&mut self) -> Option<(String, Option<String>)> {
        if self.creating {
            return None;
        }
        let request = self.request.as_ref()?;
        if self.has_profile(&request.mod_name) {
            return None;
        }
        self.creating = true;
        self.error = None;
        Some((request.mod_name.clone(), request.icon.clone()))
    }

    pub fn on_create_failed(&mut self, reason: String) {
        self.creating = false;
        self.error = Some(reason);
    }

    pub fn is_creating(&self) -> bool {
        self.creating
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn close(&mut self) -> Option<InstallRequest> {
        self.creating = false;
        self.error = None;
        self.request.take()
    }
}
