use crate::mod_manager::domain::{
    MOD_TYPES, ModInfo, ModSummary, ModType, SearchFilters, SearchResultPage, SortOrder,
    TypeToggle,
};
use chrono::{DateTime, Utc};
use regex::RegexBuilder;
use std::cmp::Ordering;

// ---------------- Search Results ----------------
#[derive(Debug, Clone, PartialEq)]
pub struct ModCard {
    pub name: String,
    pub full_name: String,
    pub owner: String,
    pub icon: Option<String>,
    pub description: String,
    pub categories: Vec<String>,
    pub rating: i32,
    pub downloads: u64,
    pub version_number: String,
    pub days_since_update: i64,
    pub deprecated: bool,
    /// Version identity the install button targets.
    pub install_version: Option<String>,
}

impl ModCard {
    pub fn from_summary(m: &ModSummary, now: DateTime<Utc>) -> Self {
        let latest = m.latest();
        Self {
            name: m.name.clone(),
            full_name: m.full_name.clone(),
            owner: m.owner.clone(),
            icon: latest.map(|v| v.icon.clone()).filter(|i| !i.is_empty()),
            description: latest.map(|v| v.description.clone()).unwrap_or_default(),
            categories: m.categories.clone(),
            rating: m.rating_score,
            downloads: latest.map(|v| v.downloads).unwrap_or_default(),
            version_number: latest
                .map(|v| v.version_number.clone())
                .unwrap_or_default(),
            days_since_update: m.days_since_update(now),
            deprecated: m.is_deprecated,
            install_version: latest.map(|v| v.full_name.clone()),
        }
    }

    pub fn updated_label(&self) -> String {
        format!("Updated {} days ago", self.days_since_update)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchPresentation {
    pub query: String,
    pub sort_order: SortOrder,
    pub loading: bool,
    pub cards: Vec<ModCard>,
    /// Every category the backend knows, with its checkbox state.
    pub categories: Vec<(String, bool)>,
    pub types: Vec<(ModType, TypeToggle)>,
    /// 1-based for display.
    pub current_page: usize,
    pub total_pages: usize,
    pub show_pagination: bool,
}

pub fn present_search(
    filters: &SearchFilters,
    results: &SearchResultPage,
    loading: bool,
    now: DateTime<Utc>,
) -> SearchPresentation {
    SearchPresentation {
        query: filters.query.clone(),
        sort_order: filters.sort_order,
        loading,
        cards: results
            .items
            .iter()
            .map(|m| ModCard::from_summary(m, now))
            .collect(),
        categories: results
            .available_categories
            .iter()
            .map(|c| {
                let selected = filters.categories.get(c).copied().unwrap_or(false);
                (c.clone(), selected)
            })
            .collect(),
        types: MOD_TYPES
            .iter()
            .map(|t| (*t, filters.types.get(*t)))
            .collect(),
        current_page: filters.page + 1,
        total_pages: results.total_pages,
        show_pagination: results.total_pages != 0,
    }
}

// ---------------- Profile Mod Table ----------------
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModTableQuery {
    pub filter: String,
    pub direction: SortDirection,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModTablePage {
    pub rows: Vec<ModInfo>,
    pub filtered_count: usize,
    pub total_pages: usize,
    pub show_pagination: bool,
}

pub fn present_profile_mods(mods: &[ModInfo], query: &ModTableQuery) -> ModTablePage {
    let matcher = NameMatcher::new(&query.filter);
    let mut filtered: Vec<&ModInfo> = mods.iter().filter(|m| matcher.matches(&m.name)).collect();

    filtered.sort_by(|a, b| {
        let ord = compare_names(&a.name, &b.name);
        match query.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });

    let page_size = query.page_size.max(1);
    let filtered_count = filtered.len();
    let start = query.page.saturating_sub(1) * page_size;

    ModTablePage {
        rows: filtered
            .into_iter()
            .skip(start)
            .take(page_size)
            .cloned()
            .collect(),
        filtered_count,
        total_pages: filtered_count.div_ceil(page_size),
        show_pagination: filtered_count > page_size,
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Case-insensitive pattern; a pattern that does not compile is matched literally.
enum NameMatcher {
    Pattern(regex::Regex),
    Literal(String),
}

impl NameMatcher {
    fn new(filter: &str) -> Self {
        match RegexBuilder::new(filter).case_insensitive(true).build() {
            Ok(re) => Self::Pattern(re),
            Err(_) => Self::Literal(filter.to_lowercase()),
        }
    }

    fn matches(&self, name: &str) -> bool {
        match self {
            Self::Pattern(re) => re.is_match(name),
            Self::Literal(needle) => name.to_lowercase().contains(needle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mod_manager::domain::{TypeSelection, fixtures};
    use chrono::TimeZone;

    fn table(mods: &[ModInfo], filter: &str, direction: SortDirection, page: usize) -> ModTablePage {
        present_profile_mods(
            mods,
            &ModTableQuery {
                filter: filter.to_string(),
                direction,
                page,
                page_size: 20,
            },
        )
    }

    #[test]
    fn test_card_uses_first_version() {
        let m = fixtures::mod_summary("Evaisa", "LethalLib");
        let now = Utc.with_ymd_and_hms(2024, 1, 13, 0, 0, 0).unwrap();
        let card = ModCard::from_summary(&m, now);

        assert_eq!(card.version_number, "1.1.0");
        assert_eq!(card.install_version.as_deref(), Some("Evaisa-LethalLib-1.1.0"));
        assert_eq!(card.updated_label(), "Updated 3 days ago");
    }

    #[test]
    fn test_card_without_versions() {
        let mut m = fixtures::mod_summary("Evaisa", "LethalLib");
        m.versions.clear();
        let card = ModCard::from_summary(&m, Utc::now());
        assert!(card.install_version.is_none());
        assert!(card.icon.is_none());
    }

    #[test]
    fn test_search_presentation_marks_categories() {
        let mut filters = SearchFilters::default();
        filters.categories.insert("Libraries".to_string(), true);
        filters.types = TypeSelection {
            mods: TypeToggle::Indeterminate,
            modpacks: TypeToggle::Unset,
        };
        let results = SearchResultPage {
            available_categories: vec!["Libraries".to_string(), "Suits".to_string()],
            items: vec![fixtures::mod_summary("A", "B")],
            total_pages: 0,
        };

        let view = present_search(&filters, &results, false, Utc::now());
        assert_eq!(
            view.categories,
            vec![("Libraries".to_string(), true), ("Suits".to_string(), false)]
        );
        assert_eq!(view.types[0], (ModType::Mods, TypeToggle::Indeterminate));
        assert_eq!(view.current_page, 1);
        assert!(!view.show_pagination);
    }

    #[test]
    fn test_profile_mods_filter_is_case_insensitive() {
        let mods = vec![
            fixtures::mod_info("LethalLib", true),
            fixtures::mod_info("MoreSuits", true),
            fixtures::mod_info("lethalThings", false),
        ];
        let page = table(&mods, "LETHAL", SortDirection::Ascending, 1);
        let names: Vec<_> = page.rows.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["LethalLib", "lethalThings"]);
    }

    #[test]
    fn test_invalid_pattern_matches_literally() {
        let mods = vec![
            fixtures::mod_info("Suits(Extra", true),
            fixtures::mod_info("Suits", true),
        ];
        let page = table(&mods, "(extra", SortDirection::Ascending, 1);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].name, "Suits(Extra");
    }

    #[test]
    fn test_profile_mods_sort_and_paginate() {
        let mods: Vec<ModInfo> = (0..45)
            .map(|i| fixtures::mod_info(&format!("Mod{i:02}"), true))
            .collect();

        let first = table(&mods, "", SortDirection::Ascending, 1);
        assert_eq!(first.total_pages, 3);
        assert!(first.show_pagination);
        assert_eq!(first.rows.len(), 20);
        assert_eq!(first.rows[0].name, "Mod00");

        let last = table(&mods, "", SortDirection::Ascending, 3);
        assert_eq!(last.rows.len(), 5);

        let desc = table(&mods, "", SortDirection::Descending, 1);
        assert_eq!(desc.rows[0].name, "Mod44");

        let few = table(&mods[..3], "", SortDirection::Ascending, 1);
        assert!(!few.show_pagination);
        assert_eq!(few.total_pages, 1);
    }
}
