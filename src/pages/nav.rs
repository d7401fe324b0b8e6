//! Sidebar navigation items and active-item detection.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub href: &'static str,
}

pub const SIDEBAR_ITEMS: &[NavItem] = &[
    NavItem { label: "Dashboard", href: "/dashboard" },
    NavItem { label: "Goals", href: "/goals" },
    NavItem { label: "Logs", href: "/logs" },
    NavItem { label: "Events", href: "/events" },
    NavItem { label: "Projects", href: "/projects" },
    NavItem { label: "Points", href: "/points" },
];

/// `path` equals `href` or sits below it (`/goals/abc` under `/goals`).
#[must_use]
pub fn is_active(path: &str, href: &str) -> bool {
    path == href
        || path
            .strip_prefix(href)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// The sidebar item to highlight for `path`, if any.
#[must_use]
pub fn active_item(path: &str) -> Option<&'static NavItem> {
    SIDEBAR_ITEMS.iter().find(|item| is_active(path, item.href))
}
