//! Named seating templates and their alternates, loaded from TOML catalogs

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::error::CatalogError;
use crate::geometry::{Axis, Edge};

use super::arrangement::Arrangement;

/// A named seating template
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateDefinition {
    pub name: String,
    pub description: Option<String>,
    pub arrangement: Arrangement,
    /// Next template in this template's cycle of variations
    pub alternate: Option<String>,
}

impl TemplateDefinition {
    pub fn new(name: impl Into<String>, arrangement: Arrangement) -> Self {
        Self {
            name: name.into(),
            description: None,
            arrangement,
            alternate: None,
        }
    }

    pub fn with_alternate(mut self, alternate: impl Into<String>) -> Self {
        self.alternate = Some(alternate.into());
        self
    }
}

/// TOML structure for deserializing catalogs
#[derive(Deserialize)]
struct TomlCatalog {
    #[serde(default, rename = "template")]
    templates: Vec<TomlTemplate>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlTemplate {
    name: String,
    description: Option<String>,
    arrangement: TomlArrangement,
    edge: Option<Edge>,
    columns: Option<usize>,
    axis: Option<Axis>,
    alternate: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum TomlArrangement {
    Strip,
    Opposed,
}

impl TryFrom<TomlTemplate> for TemplateDefinition {
    type Error = CatalogError;

    fn try_from(raw: TomlTemplate) -> Result<Self, Self::Error> {
        if raw.name.trim().is_empty() {
            return Err(CatalogError::invalid(raw.name, "name must not be empty"));
        }
        let arrangement = match raw.arrangement {
            TomlArrangement::Strip => {
                if raw.axis.is_some() {
                    return Err(CatalogError::invalid(
                        raw.name,
                        "axis only applies to opposed arrangements",
                    ));
                }
                let Some(edge) = raw.edge else {
                    return Err(CatalogError::invalid(raw.name, "strip arrangement needs an edge"));
                };
                if raw.columns == Some(0) {
                    return Err(CatalogError::invalid(raw.name, "columns must be at least 1"));
                }
                Arrangement::Strip {
                    edge,
                    columns: raw.columns,
                }
            }
            TomlArrangement::Opposed => {
                if raw.edge.is_some() || raw.columns.is_some() {
                    return Err(CatalogError::invalid(
                        raw.name,
                        "edge and columns only apply to strip arrangements",
                    ));
                }
                let Some(axis) = raw.axis else {
                    return Err(CatalogError::invalid(raw.name, "opposed arrangement needs an axis"));
                };
                Arrangement::Opposed { axis }
            }
        };
        Ok(TemplateDefinition {
            name: raw.name,
            description: raw.description,
            arrangement,
            alternate: raw.alternate,
        })
    }
}

/// Built-in catalog: the portrait and landscape families cycle through
/// their multi-column variants, the face-to-face pair cycles between
/// top/bottom and left/right seating
const BUILTIN_CATALOG: &str = r#"
[[template]]
name = "portrait"
description = "one column of panels below the board"
arrangement = "strip"
edge = "bottom"
columns = 1
alternate = "portrait-2x"

[[template]]
name = "portrait-2x"
description = "two columns of panels below the board"
arrangement = "strip"
edge = "bottom"
columns = 2
alternate = "portrait-3x"

[[template]]
name = "portrait-3x"
description = "three columns of panels below the board"
arrangement = "strip"
edge = "bottom"
columns = 3
alternate = "portrait"

[[template]]
name = "landscape"
description = "one column of panels right of the board"
arrangement = "strip"
edge = "right"
columns = 1
alternate = "landscape-2x"

[[template]]
name = "landscape-2x"
description = "two columns of panels right of the board"
arrangement = "strip"
edge = "right"
columns = 2
alternate = "landscape-3x"

[[template]]
name = "landscape-3x"
description = "three columns of panels right of the board"
arrangement = "strip"
edge = "right"
columns = 3
alternate = "landscape"

[[template]]
name = "across"
description = "every panel in one row below the board"
arrangement = "strip"
edge = "bottom"

[[template]]
name = "face-to-face"
description = "players split between the bottom and top edges"
arrangement = "opposed"
axis = "vertical"
alternate = "face-to-face-sides"

[[template]]
name = "face-to-face-sides"
description = "players split between the left and right edges"
arrangement = "opposed"
axis = "horizontal"
alternate = "face-to-face"
"#;

/// Registry of seating templates, in definition order
#[derive(Debug, Default, Clone)]
pub struct TemplateRegistry {
    templates: HashMap<String, TemplateDefinition>,
    order: Vec<String>,
}

impl TemplateRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in templates
    pub fn builtin() -> Self {
        Self::from_str(BUILTIN_CATALOG).expect("Built-in catalog should be valid TOML")
    }

    /// Load a catalog from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a catalog from a TOML string. Every alternate must name a
    /// template in the same catalog.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, CatalogError> {
        let parsed: TomlCatalog = toml::from_str(content)?;
        let mut registry = Self::new();
        for raw in parsed.templates {
            registry.register(TemplateDefinition::try_from(raw)?)?;
        }
        registry.validate()?;
        Ok(registry)
    }

    /// Check that every alternate resolves
    pub fn validate(&self) -> Result<(), CatalogError> {
        for def in self.iter() {
            if let Some(alternate) = &def.alternate {
                if !self.contains(alternate) {
                    return Err(CatalogError::UnknownAlternate {
                        name: def.name.clone(),
                        alternate: alternate.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Register a template definition
    pub fn register(&mut self, def: TemplateDefinition) -> Result<(), CatalogError> {
        if self.templates.contains_key(&def.name) {
            return Err(CatalogError::Duplicate { name: def.name });
        }
        self.order.push(def.name.clone());
        self.templates.insert(def.name.clone(), def);
        Ok(())
    }

    /// Get a template by name
    pub fn get(&self, name: &str) -> Option<&TemplateDefinition> {
        self.templates.get(name)
    }

    /// Check if a template exists
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Template names in definition order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(String::as_str)
    }

    /// Templates in definition order
    pub fn iter(&self) -> impl Iterator<Item = &TemplateDefinition> + '_ {
        self.order.iter().filter_map(|name| self.templates.get(name))
    }

    /// `name` followed by its chain of alternates, stopping before the
    /// chain returns to a template already listed or reaches a missing one
    pub fn alternates(&self, name: &str) -> Result<Vec<&TemplateDefinition>, CatalogError> {
        let first = self.get(name).ok_or_else(|| CatalogError::not_found(name))?;
        let mut seen = HashSet::new();
        let mut chain = Vec::new();
        let mut next = Some(first);
        while let Some(def) = next {
            if !seen.insert(def.name.as_str()) {
                break;
            }
            chain.push(def);
            next = def.alternate.as_deref().and_then(|alt| self.get(alt));
        }
        Ok(chain)
    }
}
