//! Integration tests for the free-rectangle allocator

use insta::assert_snapshot;
use pretty_assertions::assert_eq;

use seat_layout::allocator::{
    check, Alignment, Allocator, AllocatorConfig, Anomaly, PlacementRequest, Shape,
};
use seat_layout::geometry::{Edge, Rect, Size};

fn assert_consistent(alloc: &Allocator) {
    let violations = check(alloc);
    assert!(
        violations.is_empty(),
        "allocator state is inconsistent: {:?}",
        violations.iter().map(|v| v.to_string()).collect::<Vec<_>>()
    );
}

fn assert_within(size: Size, shape: Shape) {
    assert!(
        size.width >= shape.min.width && size.width <= shape.max.width,
        "width {} outside {}-{}",
        size.width,
        shape.min,
        shape.max
    );
    assert!(
        size.height >= shape.min.height && size.height <= shape.max.height,
        "height {} outside {}-{}",
        size.height,
        shape.min,
        shape.max
    );
}

/// Whether some spare could hold the request's minimum footprint unaided
fn spare_holds(alloc: &Allocator, request: &PlacementRequest) -> bool {
    let margin = 2 * alloc.margin();
    std::iter::once(request.primary)
        .chain(request.alternate)
        .map(|shape| shape.grown(margin).min)
        .any(|need| {
            alloc
                .spares()
                .iter()
                .any(|s| s.width >= need.width && s.height >= need.height)
        })
}

/// Deterministic stream of request shapes
fn shapes(seed: u32, count: usize) -> Vec<Shape> {
    let mut state = seed;
    let mut next = move |range: i32| {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        ((state >> 16) % range as u32) as i32
    };
    (0..count)
        .map(|_| {
            let (w, h) = (10 + next(90), 10 + next(60));
            Shape::new(w, h, w + next(40), h + next(30))
        })
        .collect()
}

#[test]
fn test_centered_request_in_free_window() {
    let mut alloc = Allocator::from_free(
        Rect::new(0, 0, 1000, 800),
        AllocatorConfig::new().with_margin(4),
    );
    let shape = Shape::new(200, 100, 300, 150);
    let placed = alloc
        .place(
            &PlacementRequest::new(shape)
                .with_align(Alignment::Center)
                .with_preserve_aspect(true),
        )
        .expect("Should place");

    assert_snapshot!(placed.footprint.to_string(), @"304x158+348+0");
    assert_eq!(placed.rect, Rect::new(352, 4, 296, 150));
    assert_within(placed.rect.size(), shape);
    assert_eq!(alloc.free_area(), 800_000 - placed.footprint.area());
    assert!(alloc.spares().len() <= 4);
    assert_consistent(&alloc);
}

#[test]
fn test_sequence_keeps_invariants() {
    for seed in [1, 7, 42] {
        let mut alloc = Allocator::from_free(
            Rect::new(0, 0, 640, 480),
            AllocatorConfig::new().with_margin(2),
        );
        let mut placed = Vec::new();
        for shape in shapes(seed, 40) {
            if let Some(p) = alloc.place(&PlacementRequest::new(shape)) {
                assert_within(p.rect.size(), shape);
                placed.push(p);
            }
            assert_consistent(&alloc);
        }
        assert!(!placed.is_empty());

        for p in placed.iter().step_by(2) {
            assert!(alloc.free(p.footprint));
            assert_consistent(&alloc);
        }
        for shape in shapes(seed + 1, 10) {
            alloc.place(&PlacementRequest::new(shape).with_align(Alignment::Edge));
            assert_consistent(&alloc);
        }
    }
}

#[test]
fn test_sequence_without_chips() {
    let mut alloc = Allocator::from_free(
        Rect::new(0, 0, 500, 500),
        AllocatorConfig::new().with_margin(1).with_chips(false),
    );
    for shape in shapes(3, 30) {
        if let Some(p) = alloc.place(&PlacementRequest::new(shape).with_align(Alignment::Left)) {
            assert_within(p.rect.size(), shape);
        }
        assert_consistent(&alloc);
    }
}

#[test]
fn test_spares_before_main() {
    let mut alloc = Allocator::new(Rect::new(0, 0, 1000, 800), AllocatorConfig::default());
    let strip = alloc.split_main(Edge::Right, 200).unwrap();
    assert_eq!(alloc.spares(), &[strip]);
    let main = alloc.main();
    assert_eq!(main, Rect::new(0, 0, 800, 800));

    let small = alloc
        .place(&PlacementRequest::new(Shape::new(100, 100, 150, 150)))
        .unwrap();
    assert!(strip.contains_rect(&small.footprint));
    assert_eq!(alloc.main(), main);

    // too wide for the spare strip, so it comes out of main at its minimum
    let wide = alloc
        .place(&PlacementRequest::new(Shape::new(300, 100, 400, 200)))
        .unwrap();
    assert_eq!(wide.rect.size(), Size::new(300, 100));
    assert!(wide.footprint.intersects(&main));
    assert_ne!(alloc.main(), main);
    assert_consistent(&alloc);
}

#[test]
fn test_failed_placement_changes_nothing() {
    let mut alloc = Allocator::from_free(Rect::new(0, 0, 100, 100), AllocatorConfig::default());
    let before = alloc.spares().to_vec();
    assert_eq!(alloc.place(&PlacementRequest::new(Shape::exact(200, 50))), None);
    assert_eq!(alloc.spares(), before.as_slice());
    assert!(alloc.allocated().is_empty());
    assert_eq!(
        alloc.anomalies(),
        &[Anomaly::PlacementFailed(Size::new(200, 50))]
    );
}

#[test]
fn test_alternate_shape_used_when_primary_does_not_fit() {
    let mut alloc = Allocator::from_free(Rect::new(0, 0, 100, 300), AllocatorConfig::default());
    let placed = alloc
        .place(&PlacementRequest::new(Shape::exact(200, 50)).with_alternate(Shape::exact(50, 200)))
        .unwrap();
    assert!(placed.alternate);
    assert_eq!(placed.rect.size(), Size::new(50, 200));
    assert_consistent(&alloc);
}

#[test]
fn test_coalescing() {
    let window = Rect::new(0, 0, 400, 400);
    let mut alloc = Allocator::empty(window, AllocatorConfig::default());
    alloc.release(Rect::new(0, 0, 100, 50));
    alloc.release(Rect::new(100, 0, 60, 50));
    assert_eq!(alloc.spares(), &[Rect::new(0, 0, 160, 50)]);

    // same top, different height
    alloc.release(Rect::new(160, 0, 40, 80));
    assert_eq!(alloc.spares().len(), 2);
    assert_eq!(alloc.free_area(), 160 * 50 + 40 * 80);
}

#[test]
fn test_board_handoff() {
    let mut alloc = Allocator::new(
        Rect::new(0, 0, 800, 600),
        AllocatorConfig::new().with_margin(5),
    );
    let cell = alloc.split_main(Edge::Bottom, 100).unwrap();
    assert!(alloc.reserve(cell));
    assert!(alloc.spares().is_empty());
    assert_eq!(alloc.peek_main(), Rect::new(0, 0, 800, 500));
    assert_eq!(alloc.take_main(), Some(Rect::new(5, 5, 790, 490)));
    assert_eq!(alloc.take_main(), None);
    assert_consistent(&alloc);
}

#[test]
fn test_optimize_after_free() {
    let mut alloc = Allocator::from_free(Rect::new(0, 0, 400, 100), AllocatorConfig::default());
    let first = alloc
        .place(&PlacementRequest::new(Shape::new(100, 100, 100, 100)).with_align(Alignment::Left))
        .unwrap();
    let second = alloc
        .place(&PlacementRequest::new(Shape::new(100, 100, 300, 100)).with_align(Alignment::Left))
        .unwrap();
    assert_eq!(first.footprint, Rect::new(0, 0, 100, 100));
    assert_eq!(second.footprint, Rect::new(100, 0, 300, 100));

    assert!(alloc.free(first.footprint));
    assert!(alloc.optimize().is_empty());
    assert_consistent(&alloc);
}

#[test]
fn test_exact_spare_leaves_main_alone() {
    let mut alloc = Allocator::new(Rect::new(0, 0, 130, 100), AllocatorConfig::default());
    alloc.split_main(Edge::Left, 100).unwrap();
    let main = alloc.main();
    assert_eq!(main, Rect::new(100, 0, 30, 100));

    let placed = alloc
        .place(&PlacementRequest::new(Shape::exact(100, 100)))
        .expect("Should fit the spare");
    assert_eq!(placed.footprint, Rect::new(0, 0, 100, 100));
    assert_eq!(alloc.main(), main);
    assert!(alloc.spares().is_empty());
    assert_eq!(alloc.take_main(), Some(main));
    assert_consistent(&alloc);
}

#[test]
fn test_spare_fit_beats_chip_from_main() {
    let mut alloc = Allocator::new(Rect::new(0, 0, 260, 100), AllocatorConfig::default());
    // a short spare touching main comes first, an exact one second
    alloc.split_main(Edge::Left, 80).unwrap();
    alloc.split_main(Edge::Right, 100).unwrap();
    let main = alloc.main();
    assert_eq!(main, Rect::new(80, 0, 80, 100));
    assert_eq!(
        alloc.spares(),
        &[Rect::new(0, 0, 80, 100), Rect::new(160, 0, 100, 100)]
    );

    let placed = alloc
        .place(&PlacementRequest::new(Shape::exact(100, 100)))
        .unwrap();
    assert_eq!(placed.footprint, Rect::new(160, 0, 100, 100));
    assert_eq!(alloc.main(), main);
    assert_consistent(&alloc);
}

#[test]
fn test_main_lends_chip_when_no_spare_fits() {
    let mut alloc = Allocator::new(Rect::new(0, 0, 130, 100), AllocatorConfig::default());
    alloc.split_main(Edge::Left, 80).unwrap();

    let placed = alloc
        .place(&PlacementRequest::new(Shape::exact(120, 100)))
        .expect("Should borrow width from main");
    assert_eq!(placed.footprint, Rect::new(10, 0, 120, 100));
    assert!(alloc.main().is_empty());
    assert_eq!(alloc.spares(), &[Rect::new(0, 0, 10, 100)]);
    assert_eq!(alloc.take_main(), None);
    assert_consistent(&alloc);
}

#[test]
fn test_edge_alignment_hugs_the_board() {
    let mut alloc = Allocator::new(Rect::new(0, 0, 400, 300), AllocatorConfig::default());
    alloc.split_main(Edge::Top, 100).unwrap();
    let main = alloc.main();

    let placed = alloc
        .place(&PlacementRequest::new(Shape::exact(100, 50)).with_align(Alignment::Edge))
        .unwrap();
    // cut from the right end of the band, bottom edge against the board
    assert_eq!(placed.footprint, Rect::new(300, 50, 100, 50));
    assert_eq!(placed.footprint.bottom(), main.top);
    assert_eq!(alloc.main(), main);
    assert_eq!(
        alloc.spares(),
        &[Rect::new(0, 0, 300, 100), Rect::new(300, 0, 100, 50)]
    );
    assert_consistent(&alloc);
}

#[test]
fn test_main_last_through_sequence() {
    for seed in [5, 11, 23] {
        let mut alloc = Allocator::new(
            Rect::new(0, 0, 640, 480),
            AllocatorConfig::new().with_margin(2),
        );
        alloc.split_main(Edge::Left, 120).unwrap();
        alloc.split_main(Edge::Top, 90).unwrap();
        alloc.split_main(Edge::Right, 60).unwrap();

        let aligns = [Alignment::Edge, Alignment::Center, Alignment::Bottom];
        let mut placed = Vec::new();
        for (i, shape) in shapes(seed, 30).into_iter().enumerate() {
            let turned = Shape::new(
                shape.min.height,
                shape.min.width,
                shape.max.height,
                shape.max.width,
            );
            let request = PlacementRequest::new(shape)
                .with_alternate(turned)
                .with_align(aligns[i % aligns.len()]);
            let main = alloc.main();
            let spare_fit = spare_holds(&alloc, &request);
            if let Some(p) = alloc.place(&request) {
                placed.push(p.footprint);
            }
            if spare_fit {
                assert_eq!(alloc.main(), main, "seed {} request {}", seed, i);
            }
            assert!(alloc.main().area() <= main.area());
            assert_consistent(&alloc);

            if i % 4 == 3 && !placed.is_empty() {
                let footprint = placed.remove(0);
                assert!(alloc.free(footprint));
                assert_consistent(&alloc);
            }
        }
    }
}
