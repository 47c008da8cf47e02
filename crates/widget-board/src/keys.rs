use std::fmt;
use std::str::FromStr;

/// Storage namespaces used by the dashboard.
///
/// Each namespace is an independent JSON value in the key-value store.
/// Only [`DashboardLayout`](StorageKey::DashboardLayout) and
/// [`BoxContents`](StorageKey::BoxContents) are interpreted by the core;
/// the rest are owned by individual widgets and travel in backups as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// `{ widgetIds, layouts }` of the layout engine.
    DashboardLayout,
    /// Widget id to content record map.
    BoxContents,
    /// Task tag definitions.
    Tags,
    /// Goal tracker entries.
    Goals,
    /// Task list.
    Tasks,
    /// Completed pomodoro counts.
    PomodoroCounters,
    /// User-authored custom widget definitions.
    CustomWidgets,
    /// Theme variables.
    Theme,
    /// User-saved layout templates.
    LayoutTemplates,
    /// User profile.
    UserProfile,
}

impl StorageKey {
    /// Every namespace, in backup order.
    pub const ALL: [StorageKey; 10] = [
        StorageKey::DashboardLayout,
        StorageKey::BoxContents,
        StorageKey::Tags,
        StorageKey::Goals,
        StorageKey::Tasks,
        StorageKey::PomodoroCounters,
        StorageKey::CustomWidgets,
        StorageKey::Theme,
        StorageKey::LayoutTemplates,
        StorageKey::UserProfile,
    ];

    /// Key string used in the storage backend.
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::DashboardLayout => "dashboard-layout",
            StorageKey::BoxContents => "box-contents",
            StorageKey::Tags => "tags",
            StorageKey::Goals => "goals",
            StorageKey::Tasks => "tasks",
            StorageKey::PomodoroCounters => "pomodoro-counters",
            StorageKey::CustomWidgets => "custom-widgets",
            StorageKey::Theme => "theme",
            StorageKey::LayoutTemplates => "layout-templates",
            StorageKey::UserProfile => "user-profile",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StorageKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown namespace: {s}"))
    }
}
