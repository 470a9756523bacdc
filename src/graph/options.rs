//! Graph-wide rendering options

/// Options applied to the whole graph
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphOptions {
    /// Label of the vertical axis (`--vertical-label`)
    pub vertical_label: Option<String>,
    /// Lower bound of the vertical axis (`-l`)
    pub lower_limit: Option<f64>,
    /// Upper bound of the vertical axis (`-u`)
    pub upper_limit: Option<f64>,
    /// Graph title (`--title`)
    pub title: Option<String>,
}

impl GraphOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vertical_label(mut self, label: impl Into<String>) -> Self {
        self.vertical_label = Some(label.into());
        self
    }

    pub fn with_lower_limit(mut self, limit: f64) -> Self {
        self.lower_limit = Some(limit);
        self
    }

    pub fn with_upper_limit(mut self, limit: f64) -> Self {
        self.upper_limit = Some(limit);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}
