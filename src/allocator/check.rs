//! Consistency checks for allocator state.
//!
//! Verifies the bookkeeping the allocator promises after every public
//! operation: no two owned rectangles overlap, everything stays inside the
//! window, and free plus allocated area adds up to the window area.

use std::fmt;

use crate::geometry::Rect;

use super::Allocator;

/// A broken allocator invariant
#[derive(Debug)]
pub struct Violation {
    pub kind: ViolationKind,
    pub message: String,
}

/// Category of broken invariant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    Overlap,
    Containment,
    Conservation,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::Overlap => write!(f, "overlap"),
            ViolationKind::Containment => write!(f, "containment"),
            ViolationKind::Conservation => write!(f, "conservation"),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Run all checks on an allocator
pub fn check(alloc: &Allocator) -> Vec<Violation> {
    let regions = labelled_regions(alloc);
    let mut violations = Vec::new();
    check_overlaps(&regions, &mut violations);
    check_containment(alloc.window(), &regions, &mut violations);
    check_conservation(alloc, &mut violations);
    violations
}

fn labelled_regions(alloc: &Allocator) -> Vec<(String, Rect)> {
    let spares = alloc
        .spares()
        .iter()
        .enumerate()
        .map(|(i, r)| (format!("spare #{}", i), *r));
    let main = std::iter::once(("main".to_string(), alloc.main()));
    let allocated = alloc
        .allocated()
        .iter()
        .enumerate()
        .map(|(i, a)| (format!("allocation #{}", i), a.rect));
    spares
        .chain(main)
        .chain(allocated)
        .filter(|(_, r)| !r.is_empty())
        .collect()
}

fn check_overlaps(regions: &[(String, Rect)], violations: &mut Vec<Violation>) {
    for (i, (name_a, a)) in regions.iter().enumerate() {
        for (name_b, b) in &regions[i + 1..] {
            if a.intersects(b) {
                violations.push(Violation {
                    kind: ViolationKind::Overlap,
                    message: format!("{} {} overlaps {} {}", name_a, a, name_b, b),
                });
            }
        }
    }
}

fn check_containment(window: Rect, regions: &[(String, Rect)], violations: &mut Vec<Violation>) {
    for (name, r) in regions {
        if !window.contains_rect(r) {
            violations.push(Violation {
                kind: ViolationKind::Containment,
                message: format!("{} {} extends outside window {}", name, r, window),
            });
        }
    }
}

fn check_conservation(alloc: &Allocator, violations: &mut Vec<Violation>) {
    let accounted = alloc.free_area()
        + alloc.main().area()
        + alloc.allocated().iter().map(|a| a.rect.area()).sum::<i64>();
    let window = alloc.window().area();
    if accounted != window {
        violations.push(Violation {
            kind: ViolationKind::Conservation,
            message: format!(
                "free, main and allocated area add up to {} but the window holds {}",
                accounted, window
            ),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::{Allocation, AllocationKind, AllocatorConfig};
    use crate::geometry::Edge;

    #[test]
    fn test_fresh_allocator_is_clean() {
        let alloc = Allocator::new(Rect::new(0, 0, 100, 100), AllocatorConfig::default());
        assert!(check(&alloc).is_empty());
    }

    #[test]
    fn test_unaccounted_strip_breaks_conservation() {
        let mut alloc = Allocator::new(Rect::new(0, 0, 100, 100), AllocatorConfig::default());
        alloc.main = Rect::new(0, 10, 100, 90);
        let violations = check(&alloc);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::Conservation);
    }

    #[test]
    fn test_stray_allocation_reported() {
        let mut alloc = Allocator::new(Rect::new(0, 0, 100, 100), AllocatorConfig::default());
        alloc.allocated.push(Allocation {
            rect: Rect::new(90, 90, 20, 20),
            kind: AllocationKind::Reserved,
        });
        let kinds: Vec<ViolationKind> = check(&alloc).into_iter().map(|v| v.kind).collect();
        assert!(kinds.contains(&ViolationKind::Overlap));
        assert!(kinds.contains(&ViolationKind::Containment));
        assert!(kinds.contains(&ViolationKind::Conservation));
    }

    #[test]
    fn test_carving_keeps_state_clean() {
        let mut alloc = Allocator::new(Rect::new(0, 0, 100, 100), AllocatorConfig::default());
        alloc.split_main(Edge::Top, 10);
        assert!(alloc.reserve(Rect::new(0, 0, 30, 10)));
        assert!(!alloc.reserve(Rect::new(90, 90, 20, 20)));
        assert!(check(&alloc).is_empty());
    }
}
