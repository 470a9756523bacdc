//! A complete graph definition and its static checks

use std::collections::HashSet;

use super::{Directive, GraphError, GraphOptions};

/// Graph options plus the ordered directive list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphSpec {
    pub options: GraphOptions,
    pub directives: Vec<Directive>,
}

impl GraphSpec {
    pub fn new(options: GraphOptions) -> Self {
        Self {
            options,
            directives: Vec::new(),
        }
    }

    /// Append a directive; order is significant for stacking and legends
    pub fn push(&mut self, directive: Directive) -> &mut Self {
        self.directives.push(directive);
        self
    }

    /// Check the definition the way rrdtool would before drawing
    ///
    /// Variables must be defined once and before any use, every CDEF must
    /// leave exactly one value on the stack and the first drawable cannot
    /// be stacked.
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut defined: HashSet<&str> = HashSet::new();
        let mut seen_drawable = false;

        for (index, directive) in self.directives.iter().enumerate() {
            for name in directive.references() {
                if !defined.contains(name) {
                    return Err(GraphError::UndefinedVariable {
                        name: name.to_string(),
                        index,
                        keyword: directive.keyword(),
                    });
                }
            }

            if let Directive::Cdef { vname, expr } = directive {
                let depth = expr.result_depth();
                if depth != Some(1) {
                    return Err(GraphError::StackDepth {
                        vname: vname.clone(),
                        depth,
                    });
                }
            }

            if let Some(name) = directive.defines() {
                if !defined.insert(name) {
                    return Err(GraphError::DuplicateVariable {
                        name: name.to_string(),
                    });
                }
            }

            match directive {
                Directive::Area { stack: true, .. } | Directive::Line { stack: true, .. }
                    if !seen_drawable =>
                {
                    return Err(GraphError::StackWithoutBase { index });
                }
                d if d.is_drawable() => seen_drawable = true,
                _ => {}
            }
        }

        tracing::trace!(
            directives = self.directives.len(),
            variables = defined.len(),
            "graph definition validated"
        );
        Ok(())
    }
}
