//! Integration tests for template catalogs

use pretty_assertions::assert_eq;

use seat_layout::geometry::{Edge, Size};
use seat_layout::selector::{LayoutSelector, SelectorConfig};
use seat_layout::template::{Arrangement, LinearPanel, TemplateRegistry};
use seat_layout::CatalogError;

const CUSTOM: &str = r#"
[[template]]
name = "sidebar"
description = "panels stacked left of the board"
arrangement = "strip"
edge = "left"
columns = 1
alternate = "sidebar-wide"

[[template]]
name = "sidebar-wide"
arrangement = "strip"
edge = "left"
columns = 2
alternate = "sidebar"
"#;

#[test]
fn test_builtin_names() {
    let registry = TemplateRegistry::builtin();
    let names: Vec<&str> = registry.names().collect();
    assert_eq!(
        names,
        vec![
            "portrait",
            "portrait-2x",
            "portrait-3x",
            "landscape",
            "landscape-2x",
            "landscape-3x",
            "across",
            "face-to-face",
            "face-to-face-sides",
        ]
    );
}

#[test]
fn test_custom_catalog() {
    let registry = TemplateRegistry::from_str(CUSTOM).expect("Should parse");
    assert_eq!(registry.len(), 2);
    let sidebar = registry.get("sidebar").unwrap();
    assert_eq!(
        sidebar.arrangement,
        Arrangement::Strip {
            edge: Edge::Left,
            columns: Some(1),
        }
    );
    assert_eq!(sidebar.description.as_deref(), Some("panels stacked left of the board"));
    assert_eq!(registry.alternates("sidebar-wide").unwrap().len(), 2);
}

#[test]
fn test_custom_catalog_drives_selection() {
    let registry = TemplateRegistry::from_str(CUSTOM).unwrap();
    let config = SelectorConfig::default()
        .with_fallback(Vec::<String>::new())
        .with_default_template("sidebar");
    let mut selector = LayoutSelector::new(&registry, config);
    let plan = selector
        .plan(3, Size::new(1280, 800), Some("sidebar"), &LinearPanel::new(4.0, 3.0))
        .unwrap();
    assert!(plan.result.template.starts_with("sidebar"));
    let board_left = plan.allocator.main().left;
    assert!(plan.seats.iter().all(|seat| seat.cell.right() <= board_left));
}

#[test]
fn test_duplicate_template() {
    let source = r#"
[[template]]
name = "twin"
arrangement = "opposed"
axis = "vertical"

[[template]]
name = "twin"
arrangement = "opposed"
axis = "horizontal"
"#;
    let err = TemplateRegistry::from_str(source).unwrap_err();
    assert!(matches!(err, CatalogError::Duplicate { ref name } if name == "twin"));
}

#[test]
fn test_unknown_alternate() {
    let source = r#"
[[template]]
name = "solo"
arrangement = "strip"
edge = "top"
alternate = "duet"
"#;
    let err = TemplateRegistry::from_str(source).unwrap_err();
    assert_eq!(
        err.to_string(),
        "template 'solo' names unknown alternate 'duet'"
    );
}

#[test]
fn test_mixed_arrangement_fields_rejected() {
    let source = r#"
[[template]]
name = "odd"
arrangement = "opposed"
axis = "vertical"
edge = "top"
"#;
    let err = TemplateRegistry::from_str(source).unwrap_err();
    assert!(matches!(err, CatalogError::InvalidTemplate { .. }));
}

#[test]
fn test_toml_error_formatting() {
    let source = "[[template]]\nname = \"broken\"\narrangement = \"spiral\"\n";
    let err = TemplateRegistry::from_str(source).unwrap_err();
    assert!(matches!(err, CatalogError::Toml(_)));

    let report = err.format(source, "catalog.toml");
    assert!(report.contains("catalog.toml"), "report: {}", report);
    assert!(report.contains("invalid template catalog"), "report: {}", report);
}

#[test]
fn test_missing_catalog_file() {
    let err = TemplateRegistry::from_file(std::path::Path::new("/nonexistent/catalog.toml"))
        .unwrap_err();
    assert!(matches!(err, CatalogError::Io(_)));
}
