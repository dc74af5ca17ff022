use crate::mod_manager::domain::ModSummary;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::{Display, Formatter};

// ---------------- Sort Order ----------------
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Rating,
    Created,
    Updated,
    Downloads,
    Name,
}

pub const SORT_ORDERS: [SortOrder; 5] = [
    SortOrder::Rating,
    SortOrder::Created,
    SortOrder::Updated,
    SortOrder::Downloads,
    SortOrder::Name,
];

impl SortOrder {
    pub fn id(&self) -> &'static str {
        match self {
            Self::Rating => "rating",
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Downloads => "downloads",
            Self::Name => "name",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Rating => "Rating",
            Self::Created => "Newest",
            Self::Updated => "Updated",
            Self::Downloads => "Downloads",
            Self::Name => "Name",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        SORT_ORDERS.into_iter().find(|s| s.id() == id)
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

// ---------------- Type Filter ----------------
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModType {
    Mods,
    Modpacks,
}

pub const MOD_TYPES: [ModType; 2] = [ModType::Mods, ModType::Modpacks];

impl ModType {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Mods => "Mods",
            Self::Modpacks => "Modpacks",
        }
    }
}

/// Tri-state checkbox value. Stored as -1 / 0 / 1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum TypeToggle {
    Indeterminate,
    #[default]
    Unset,
    Selected,
}

impl TypeToggle {
    /// 0 -> 1 -> -1 -> 0
    pub fn next(self) -> Self {
        match self {
            Self::Unset => Self::Selected,
            Self::Selected => Self::Indeterminate,
            Self::Indeterminate => Self::Unset,
        }
    }

    /// Anything but `Selected` goes out as unset.
    pub fn wire_value(self) -> i8 {
        match self {
            Self::Selected => 1,
            _ => 0,
        }
    }
}

impl From<TypeToggle> for i8 {
    fn from(val: TypeToggle) -> Self {
        match val {
            TypeToggle::Indeterminate => -1,
            TypeToggle::Unset => 0,
            TypeToggle::Selected => 1,
        }
    }
}

impl TryFrom<i8> for TypeToggle {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Indeterminate),
            0 => Ok(Self::Unset),
            1 => Ok(Self::Selected),
            other => Err(format!("invalid type toggle value: {other}")),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSelection {
    #[serde(rename = "Mods")]
    pub mods: TypeToggle,
    #[serde(rename = "Modpacks")]
    pub modpacks: TypeToggle,
}

impl TypeSelection {
    pub fn get(&self, mod_type: ModType) -> TypeToggle {
        match mod_type {
            ModType::Mods => self.mods,
            ModType::Modpacks => self.modpacks,
        }
    }

    pub fn set(&mut self, mod_type: ModType, toggle: TypeToggle) {
        match mod_type {
            ModType::Mods => self.mods = toggle,
            ModType::Modpacks => self.modpacks = toggle,
        }
    }

    pub fn cycle(&mut self, mod_type: ModType) -> TypeToggle {
        let next = self.get(mod_type).next();
        self.set(mod_type, next);
        next
    }

    pub fn to_wire(self) -> WireTypes {
        WireTypes {
            mods: self.mods.wire_value(),
            modpacks: self.modpacks.wire_value(),
        }
    }
}

/// Type filter as the backend receives it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireTypes {
    #[serde(rename = "Mods")]
    pub mods: i8,
    #[serde(rename = "Modpacks")]
    pub modpacks: i8,
}

pub type CategorySelection = BTreeMap<String, bool>;

// ---------------- Filters & Requests ----------------
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub query: String,
    pub page: usize,
    pub sort_order: SortOrder,
    pub categories: CategorySelection,
    pub types: TypeSelection,
}

impl SearchFilters {
    pub fn selected_categories(&self) -> Vec<String> {
        self.categories
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn to_request(&self) -> SearchRequest {
        SearchRequest {
            query: self.query.clone(),
            page: self.page,
            sort: self.sort_order,
            categories: self.selected_categories(),
            types: self.types.to_wire(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub page: usize,
    pub sort: SortOrder,
    pub categories: Vec<String>,
    pub types: WireTypes,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SearchResultPage {
    #[serde(rename = "categories")]
    pub available_categories: Vec<String>,
    #[serde(rename = "mods")]
    pub items: Vec<ModSummary>,
    #[serde(rename = "pages")]
    pub total_pages: usize,
}

impl SearchResultPage {
    pub fn is_empty(&self) -> bool {
        self.available_categories.is_empty() && self.items.is_empty()
    }
}

/// Identifies one submitted search; only the latest one may be applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchTicket(pub u64);
