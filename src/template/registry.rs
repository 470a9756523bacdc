//! Template registry for looking up graph templates by check name

use std::collections::{BTreeMap, HashMap};

use crate::graph::GraphSpec;

use super::{
    GraphTemplate, SteelheadConnections, SystemTimeOffset, TemplateContext, TemplateError,
};

/// Registry of graph templates, keyed by name with optional aliases
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, Box<dyn GraphTemplate>>,
    /// alias -> template name
    aliases: HashMap<String, String>,
}

impl TemplateRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in template
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        let builtins: [Box<dyn GraphTemplate>; 2] =
            [Box::new(SteelheadConnections), Box::new(SystemTimeOffset)];
        for template in builtins {
            // built-in names and aliases are distinct
            if let Err(e) = registry.register(template) {
                tracing::error!(error = %e, "built-in template rejected");
            }
        }
        registry
    }

    /// Register a template under its name and aliases
    pub fn register(&mut self, template: Box<dyn GraphTemplate>) -> Result<(), TemplateError> {
        let name = template.name();
        if self.contains(name) {
            return Err(TemplateError::Duplicate {
                name: name.to_string(),
            });
        }
        if let Some(alias) = template.aliases().iter().find(|a| self.contains(a)) {
            return Err(TemplateError::Duplicate {
                name: alias.to_string(),
            });
        }

        for alias in template.aliases() {
            self.aliases.insert(alias.to_string(), name.to_string());
        }
        tracing::debug!(template = name, "registered graph template");
        self.templates.insert(name.to_string(), template);
        Ok(())
    }

    /// Get a template by name or alias
    pub fn get(&self, name: &str) -> Option<&dyn GraphTemplate> {
        let key = self.aliases.get(name).map(String::as_str).unwrap_or(name);
        self.templates.get(key).map(|t| t.as_ref())
    }

    /// Check if a name or alias is registered
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name) || self.aliases.contains_key(name)
    }

    /// Template names in sorted order, aliases excluded
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(|s| s.as_str())
    }

    /// All registered templates in name order
    pub fn templates(&self) -> impl Iterator<Item = &dyn GraphTemplate> {
        self.templates.values().map(|t| t.as_ref())
    }

    /// Look up `name` and build its graph for `ctx`
    pub fn build(&self, name: &str, ctx: &TemplateContext) -> Result<GraphSpec, TemplateError> {
        let template = self.get(name).ok_or_else(|| TemplateError::NotFound {
            name: name.to_string(),
        })?;
        tracing::debug!(
            template = template.name(),
            host = %ctx.hostname,
            "building graph"
        );
        template.build(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Named(&'static str, &'static [&'static str]);

    impl GraphTemplate for Named {
        fn name(&self) -> &'static str {
            self.0
        }

        fn aliases(&self) -> &'static [&'static str] {
            self.1
        }

        fn description(&self) -> &'static str {
            "test template"
        }

        fn build(&self, _ctx: &TemplateContext) -> Result<GraphSpec, TemplateError> {
            Ok(GraphSpec::default())
        }
    }

    #[test]
    fn test_builtin_names_are_sorted() {
        let registry = TemplateRegistry::builtin();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(
            names,
            vec!["check_mk-steelhead_connections", "check_mk-systemtime"]
        );
    }

    #[test]
    fn test_lookup_by_alias() {
        let registry = TemplateRegistry::builtin();
        assert_eq!(
            registry.get("systemtime").map(|t| t.name()),
            Some("check_mk-systemtime")
        );
        assert_eq!(
            registry.get("connections").map(|t| t.name()),
            Some("check_mk-steelhead_connections")
        );
        assert!(registry.get("check_mk-df").is_none());
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = TemplateRegistry::new();
        registry
            .register(Box::new(Named("custom", &["c"])))
            .expect("Should register");
        assert!(registry.contains("custom"));
        assert!(registry.contains("c"));
        assert_eq!(registry.templates().count(), 1);
    }

    #[test]
    fn test_duplicate_name_error() {
        let mut registry = TemplateRegistry::new();
        registry
            .register(Box::new(Named("custom", &[])))
            .expect("First register should succeed");
        let result = registry.register(Box::new(Named("custom", &[])));
        assert!(matches!(result, Err(TemplateError::Duplicate { .. })));
    }

    #[test]
    fn test_alias_clash_error() {
        let mut registry = TemplateRegistry::builtin();
        let result = registry.register(Box::new(Named("other", &["systemtime"])));
        assert!(matches!(
            result,
            Err(TemplateError::Duplicate { ref name }) if name == "systemtime"
        ));
        assert!(!registry.contains("other"));
    }

    #[test]
    fn test_build_unknown_template() {
        let registry = TemplateRegistry::builtin();
        let result = registry.build("nope", &TemplateContext::new("h"));
        assert!(matches!(result, Err(TemplateError::NotFound { ref name }) if name == "nope"));
    }
}
