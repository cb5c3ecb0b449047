//! Static HTML widgets rendered by the host next to tool results
//!
//! The templates are plain files compiled into the binary. Each one hydrates
//! from `window.openai.toolOutput` on load and re-renders whenever the host
//! posts new globals.

/// Mime type the Apps host expects for widget templates
pub const WIDGET_MIME_TYPE: &str = "text/html+skybridge";

/// A widget template and the metadata advertised for it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Widget {
    pub uri: &'static str,
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub html: &'static str,
}

pub const WEATHER: Widget = Widget {
    uri: "ui://widget/weather.html",
    name: "weather-widget",
    title: "Weather card",
    description: "Current conditions and today's high, low and precipitation chance for a city.",
    html: include_str!("weather.html"),
};

pub const AGE: Widget = Widget {
    uri: "ui://widget/age.html",
    name: "age-widget",
    title: "Age prediction card",
    description: "Predicted age for a first name and the number of records behind it.",
    html: include_str!("age.html"),
};

pub const FAST_FOOD: Widget = Widget {
    uri: "ui://widget/fast-food.html",
    name: "fast-food-widget",
    title: "Fast-food list",
    description: "Nearby fast-food places sorted by distance.",
    html: include_str!("fast-food.html"),
};

pub static ALL: [Widget; 3] = [WEATHER, AGE, FAST_FOOD];

/// Look up a widget by its resource URI
#[must_use]
pub fn find(uri: &str) -> Option<&'static Widget> {
    ALL.iter().find(|widget| widget.uri == uri)
}
