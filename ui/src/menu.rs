//! Sidebar menu model, loaded from a flat JSON list.
//!
//! An entry with `"group": true` starts a new titled section; the entries
//! that follow belong to it until the next group marker.

use serde::Deserialize;
use std::collections::BTreeSet;

/// Group expanded when the shell first renders.
pub const DEFAULT_EXPANDED: &str = "System";

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MenuEntry {
    pub title: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub home: bool,
    #[serde(default)]
    pub group: bool,
    #[serde(default)]
    pub children: Vec<MenuChild>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MenuChild {
    pub title: String,
    #[serde(default)]
    pub link: Option<String>,
}

fn enabled_by_default() -> bool {
    true
}

/// `"#"` and empty links lead nowhere.
fn real_link(link: Option<&String>) -> Option<&str> {
    link.map(String::as_str)
        .filter(|l| !l.is_empty() && *l != "#")
}

impl MenuChild {
    pub fn href(&self) -> Option<&str> {
        real_link(self.link.as_ref())
    }

    pub fn is_active(&self, path: &str) -> bool {
        self.href() == Some(path)
    }
}

impl MenuEntry {
    pub fn href(&self) -> Option<&str> {
        real_link(self.link.as_ref())
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Neither a link nor a submenu.
    pub fn is_inert(&self) -> bool {
        self.href().is_none() && !self.has_children()
    }

    /// Active when its own link is the current path or one of its children
    /// is.
    pub fn is_active(&self, path: &str) -> bool {
        self.href() == Some(path) || self.children.iter().any(|c| c.is_active(path))
    }

    /// Target used in the collapsed sidebar, where submenus cannot open.
    pub fn first_child_link(&self) -> Option<&str> {
        self.children.iter().find_map(MenuChild::href)
    }

    pub fn icon(&self) -> Icon {
        Icon::from_name(self.icon.as_deref())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MenuSection {
    pub title: Option<String>,
    pub items: Vec<MenuEntry>,
}

pub fn parse_menu(json: &str) -> serde_json::Result<Vec<MenuEntry>> {
    serde_json::from_str(json)
}

/// Splits the flat list into sections, dropping disabled entries and
/// sections left empty.
pub fn menu_sections(entries: &[MenuEntry]) -> Vec<MenuSection> {
    let mut sections = Vec::new();
    let mut current = MenuSection {
        title: None,
        items: Vec::new(),
    };

    for entry in entries {
        if entry.group {
            let next = MenuSection {
                title: Some(entry.title.clone()),
                items: Vec::new(),
            };
            let done = std::mem::replace(&mut current, next);
            if !done.items.is_empty() {
                sections.push(done);
            }
        } else if entry.enabled {
            current.items.push(entry.clone());
        }
    }

    if !current.items.is_empty() {
        sections.push(current);
    }

    sections
}

/// Link of the first entry flagged `"home"`, the landing page of the shell.
pub fn home_link(sections: &[MenuSection]) -> Option<&str> {
    sections
        .iter()
        .flat_map(|s| &s.items)
        .filter(|e| e.home)
        .find_map(MenuEntry::href)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Icon {
    Cart,
    House,
    Folder,
    Pencil,
    Grid,
    Square,
    Message,
    Map,
    Chart,
    Text,
    Table,
    Wrench,
    Lock,
}

impl Icon {
    /// Maps outline icon names from the menu file. Unknown or missing
    /// names fall back to a folder.
    pub fn from_name(name: Option<&str>) -> Self {
        match name.unwrap_or_default() {
            "shopping-cart-outline" => Icon::Cart,
            "home-outline" => Icon::House,
            "edit-outline" => Icon::Pencil,
            "grid-outline" => Icon::Grid,
            "square-outline" => Icon::Square,
            "message-outline" => Icon::Message,
            "map-outline" => Icon::Map,
            "chart-outline" => Icon::Chart,
            "text-outline" => Icon::Text,
            "table-outline" => Icon::Table,
            "wrench-outline" => Icon::Wrench,
            "lock-outline" => Icon::Lock,
            _ => Icon::Folder,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Icon::Cart => "🛒",
            Icon::House => "🏠",
            Icon::Folder => "📁",
            Icon::Pencil => "✏️",
            Icon::Grid => "▦",
            Icon::Square => "□",
            Icon::Message => "💬",
            Icon::Map => "🗺️",
            Icon::Chart => "📈",
            Icon::Text => "¶",
            Icon::Table => "▤",
            Icon::Wrench => "🔧",
            Icon::Lock => "🔒",
        }
    }
}

/// Sidebar interaction state: which groups are open and whether the
/// sidebar is collapsed to icons.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuState {
    expanded: BTreeSet<String>,
    collapsed: bool,
}

impl Default for MenuState {
    fn default() -> Self {
        Self {
            expanded: BTreeSet::from([DEFAULT_EXPANDED.to_string()]),
            collapsed: false,
        }
    }
}

impl MenuState {
    pub fn is_expanded(&self, title: &str) -> bool {
        self.expanded.contains(title)
    }

    pub fn toggle_group(&mut self, title: &str) {
        if !self.expanded.remove(title) {
            self.expanded.insert(title.to_string());
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn toggle_sidebar(&mut self) {
        self.collapsed = !self.collapsed;
    }
}
