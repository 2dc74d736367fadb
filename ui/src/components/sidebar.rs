use dioxus::prelude::*;

use crate::menu::{MenuEntry, MenuSection, MenuState};

/// Sectioned navigation menu.
///
/// Expanded groups show their children. When `menu` is collapsed only icons
/// render, and a group links straight to its first child.
#[component]
pub fn Sidebar(sections: Vec<MenuSection>, current_path: String, menu: Signal<MenuState>) -> Element {
    let collapsed = menu.read().is_collapsed();

    rsx! {
        nav { class: if collapsed { "sidebar-nav collapsed" } else { "sidebar-nav" },
            for section in sections {
                div { class: "sidebar-section",
                    if let Some(title) = section.title.as_ref().filter(|_| !collapsed) {
                        div { class: "sidebar-section-title", "{title}" }
                    }
                    for entry in section.items.iter().cloned() {
                        MenuItem { key: "{entry.title}", entry, current_path: current_path.clone(), menu }
                    }
                }
            }
        }
    }
}

#[component]
fn MenuItem(entry: MenuEntry, current_path: String, mut menu: Signal<MenuState>) -> Element {
    let state = menu.read();
    let collapsed = state.is_collapsed();
    let active = entry.is_active(&current_path);
    let class = if active { "sidebar-item active" } else { "sidebar-item" };
    let glyph = entry.icon().glyph();
    let title = entry.title.clone();

    if collapsed {
        let target = entry.href().or_else(|| entry.first_child_link());
        return rsx! {
            if let Some(to) = target {
                Link { class: "{class}", to: to.to_string(), title: "{title}",
                    span { class: "sidebar-icon", "{glyph}" }
                }
            } else {
                span { class: "{class}", title: "{title}",
                    span { class: "sidebar-icon", "{glyph}" }
                }
            }
        };
    }

    if !entry.has_children() {
        return rsx! {
            if let Some(to) = entry.href() {
                Link { class: "{class}", to: to.to_string(),
                    span { class: "sidebar-icon", "{glyph}" }
                    span { class: "sidebar-label", "{title}" }
                }
            } else {
                span { class: "{class} inert",
                    span { class: "sidebar-icon", "{glyph}" }
                    span { class: "sidebar-label", "{title}" }
                }
            }
        };
    }

    let expanded = state.is_expanded(&entry.title);
    let children = entry.children.clone();

    rsx! {
        div { class: "sidebar-group",
            button {
                class,
                onclick: move |_| menu.write().toggle_group(&title),
                span { class: "sidebar-icon", "{glyph}" }
                span { class: "sidebar-label", "{entry.title}" }
                span { class: "sidebar-chevron", if expanded { "▾" } else { "▸" } }
            }
            if expanded {
                div { class: "sidebar-children",
                    for child in children {
                        {
                            let child_class = if child.is_active(&current_path) {
                                "sidebar-child active"
                            } else {
                                "sidebar-child"
                            };
                            match child.href() {
                                Some(to) => rsx! {
                                    Link { key: "{child.title}", class: "{child_class}", to: to.to_string(), "{child.title}" }
                                },
                                None => rsx! {
                                    span { key: "{child.title}", class: "{child_class} inert", "{child.title}" }
                                },
                            }
                        }
                    }
                }
            }
        }
    }
}
