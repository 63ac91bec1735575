//! End-to-end behaviour of the two drawing entry points.

use raster_draw::basics::PI;
use raster_draw::rasterizer::fill;
use raster_draw::{
    blend, fill_region, stroke, stroke_path, AlphaCompositionMode, Bgra8, BlendMode, Brush,
    ColorBlendingMode, DrawError, Gray16, Gray8, GraphicsOptions, ImageBuffer, LineCap, LineJoin,
    Path, Pixel, PointD, Region, Rgb8, Rgba, Rgba16, Rgba8, RgbaF32, Segment, StrokeStyle, SubPath,
    DEFAULT_ANTIALIAS_SAMPLES, DEFAULT_TOLERANCE,
};

// ============================================================================
// Helpers
// ============================================================================

fn p(x: f64, y: f64) -> PointD {
    PointD::new(x, y)
}

fn options(antialias: bool) -> GraphicsOptions {
    GraphicsOptions {
        antialias,
        antialias_samples: DEFAULT_ANTIALIAS_SAMPLES,
        blend_percentage: 1.0,
        color_blending_mode: ColorBlendingMode::Normal,
        alpha_composition_mode: AlphaCompositionMode::SrcOver,
        tolerance: DEFAULT_TOLERANCE,
    }
}

/// Circle of four cubic arcs, clockwise in y-down space.
fn circle(cx: f64, cy: f64, r: f64) -> Path {
    let k = 0.552_284_749_831 * r;
    let mut path = Path::new();
    path.append_segment(Segment::cubic(
        p(cx + r, cy),
        p(cx + r, cy + k),
        p(cx + k, cy + r),
        p(cx, cy + r),
    ));
    path.append_segment(Segment::cubic(
        p(cx, cy + r),
        p(cx - k, cy + r),
        p(cx - r, cy + k),
        p(cx - r, cy),
    ));
    path.append_segment(Segment::cubic(
        p(cx - r, cy),
        p(cx - r, cy - k),
        p(cx - k, cy - r),
        p(cx, cy - r),
    ));
    path.append_segment(Segment::cubic(
        p(cx, cy - r),
        p(cx + k, cy - r),
        p(cx + r, cy - k),
        p(cx + r, cy),
    ));
    path.close_subpath();
    path
}

fn rect_points(x0: f64, y0: f64, x1: f64, y1: f64) -> [PointD; 4] {
    [p(x0, y0), p(x1, y0), p(x1, y1), p(x0, y1)]
}

fn coverage_at(spans: &[raster_draw::rasterizer::CoverageSpan], x: u32, y: u32) -> f32 {
    spans
        .iter()
        .find(|s| s.row == y && (s.x_start..s.x_end).contains(&x))
        .map_or(0.0, |s| s.coverage)
}

fn red() -> Brush {
    Brush::solid(Rgba::new(1.0, 0.0, 0.0, 1.0))
}

// ============================================================================
// Coverage
// ============================================================================

#[test_log::test]
fn interior_coverage_is_exactly_one() {
    let path = circle(32.0, 32.0, 20.0);
    for antialias in [true, false] {
        let spans = fill(&path, &options(antialias), Region::new(0, 0, 64, 64)).unwrap();
        assert!(!spans.is_empty());
        for s in &spans {
            assert!(s.coverage > 0.0 && s.coverage <= 1.0, "{s:?}");
        }
        for (x, y) in [(32, 32), (20, 30), (40, 40), (32, 15)] {
            assert_eq!(coverage_at(&spans, x, y), 1.0, "aa={antialias} ({x}, {y})");
        }
        assert_eq!(coverage_at(&spans, 2, 2), 0.0);
    }
}

#[test]
fn antialiasing_yields_fractional_edges() {
    let path = circle(32.0, 32.0, 20.0);
    let aa = fill(&path, &options(true), Region::new(0, 0, 64, 64)).unwrap();
    assert!(aa.iter().any(|s| s.coverage < 1.0));
    let hard = fill(&path, &options(false), Region::new(0, 0, 64, 64)).unwrap();
    assert!(hard.iter().all(|s| s.coverage == 1.0));
}

#[test]
fn opposite_windings_cancel_same_windings_fill() {
    let square = rect_points(4.0, 4.0, 16.0, 16.0);
    let mut reversed = square;
    reversed.reverse();

    let cancel = Path::from_subpaths(vec![SubPath::polygon(&square), SubPath::polygon(&reversed)]);
    let spans = fill(&cancel, &options(true), Region::new(0, 0, 20, 20)).unwrap();
    assert!(spans.is_empty(), "{spans:?}");

    let twice = Path::from_subpaths(vec![SubPath::polygon(&square), SubPath::polygon(&square)]);
    let spans = fill(&twice, &options(true), Region::new(0, 0, 20, 20)).unwrap();
    assert_eq!(coverage_at(&spans, 10, 10), 1.0);
    assert_eq!(spans.len(), 12);
}

// ============================================================================
// Stroking
// ============================================================================

#[test]
fn butt_stroke_area_is_length_times_width() {
    let mut path = Path::new();
    path.append_segment(Segment::line(p(3.0, 7.0), p(27.0, 25.0))); // length 30
    for join in [LineJoin::Miter, LineJoin::Round, LineJoin::Bevel] {
        let style = StrokeStyle::new(3.0, LineCap::Butt, join);
        let outline = stroke(&path, &style, DEFAULT_TOLERANCE).unwrap();
        assert!((outline.area().abs() - 90.0).abs() < 1e-9, "{join:?}");
    }
}

#[test]
fn zero_length_round_cap_is_disc() {
    let mut path = Path::new();
    path.append_segment(Segment::line(p(20.0, 20.0), p(20.0, 20.0)));
    let width = 10.0;

    let round = StrokeStyle::new(width, LineCap::Round, LineJoin::Round);
    let outline = stroke(&path, &round, 0.01).unwrap();
    let expected = PI * (width / 2.0) * (width / 2.0);
    assert!((outline.area().abs() - expected).abs() / expected < 0.01);
    for v in &outline.polygons()[0] {
        assert!((v.distance(p(20.0, 20.0)) - width / 2.0).abs() < 1e-9);
    }

    let butt = StrokeStyle::new(width, LineCap::Butt, LineJoin::Round);
    assert!(stroke(&path, &butt, 0.01).unwrap().is_empty());

    let mut buf = ImageBuffer::new(40, 40, Rgba8::default());
    let bounds = buf.bounds();
    stroke_path(&mut buf, bounds, &path, &round, &red(), &options(true)).unwrap();
    assert_eq!(buf.get(20, 20), Some(Rgba8::new(255, 0, 0, 255)));
    assert_eq!(buf.get(20, 28), Some(Rgba8::default()));

    let mut empty = ImageBuffer::new(40, 40, Rgba8::default());
    stroke_path(&mut empty, bounds, &path, &butt, &red(), &options(true)).unwrap();
    assert!(empty.pixels().iter().all(|&px| px == Rgba8::default()));
}

#[test]
fn dashed_stroke_leaves_gaps() {
    let mut path = Path::new();
    path.append_segment(Segment::line(p(0.0, 5.0), p(40.0, 5.0)));
    let mut style = StrokeStyle::new(4.0, LineCap::Butt, LineJoin::Miter);
    style.dash = Some(vec![10.0, 10.0]);

    let mut buf = ImageBuffer::new(40, 10, Gray8::new(0, 0));
    let bounds = buf.bounds();
    let white = Brush::solid(Rgba::WHITE);
    stroke_path(&mut buf, bounds, &path, &style, &white, &options(true)).unwrap();
    assert_eq!(buf.get(5, 5), Some(Gray8::new(255, 255)));
    assert_eq!(buf.get(15, 5), Some(Gray8::new(0, 0)));
    assert_eq!(buf.get(25, 5), Some(Gray8::new(255, 255)));
}

#[test]
fn closed_stroke_leaves_interior_empty() {
    let path = Path::from_subpaths(vec![SubPath::polygon(&rect_points(5.0, 5.0, 25.0, 25.0))]);
    let style = StrokeStyle::new(2.0, LineCap::Butt, LineJoin::Miter);
    let mut buf = ImageBuffer::new(30, 30, Rgb8::new(0, 0, 0));
    let bounds = buf.bounds();
    stroke_path(&mut buf, bounds, &path, &style, &red(), &options(true)).unwrap();
    assert_eq!(buf.get(15, 15), Some(Rgb8::new(0, 0, 0)));
    assert_eq!(buf.get(15, 4), Some(Rgb8::new(255, 0, 0)));
    assert_eq!(buf.get(4, 4), Some(Rgb8::new(255, 0, 0)));
    assert_eq!(buf.get(25, 15), Some(Rgb8::new(255, 0, 0)));
}

// ============================================================================
// Compositing
// ============================================================================

fn check_boundaries<P: Pixel>(samples: &[P]) {
    let src = BlendMode::new(ColorBlendingMode::Normal, AlphaCompositionMode::Src);
    for &existing in samples {
        for &brush in samples {
            let color = brush.to_rgba();
            assert_eq!(blend(existing, color, 0.0, BlendMode::NORMAL), existing);
            assert_eq!(blend(existing, color, 0.0, src), existing);
            assert_eq!(blend(existing, color, 1.0, src), brush);
            if color.a >= 1.0 {
                assert_eq!(blend(existing, color, 1.0, BlendMode::NORMAL), brush);
            }
        }
    }
}

#[test]
fn compositor_boundaries_for_every_encoding() {
    check_boundaries(&[
        Rgba8::new(0, 0, 0, 0),
        Rgba8::new(255, 128, 1, 255),
        Rgba8::new(10, 20, 30, 40),
    ]);
    check_boundaries(&[
        Bgra8::new(0, 0, 0, 0),
        Bgra8::new(1, 2, 3, 255),
        Bgra8::new(200, 100, 50, 77),
    ]);
    check_boundaries(&[Rgb8::new(0, 0, 0), Rgb8::new(255, 7, 99), Rgb8::new(1, 2, 3)]);
    check_boundaries(&[Gray8::new(0, 0), Gray8::new(200, 255), Gray8::new(17, 90)]);
    check_boundaries(&[Gray16::new(0, 0), Gray16::new(65535, 65535), Gray16::new(1234, 40000)]);
    check_boundaries(&[
        Rgba16::new(0, 0, 0, 0),
        Rgba16::new(65535, 1, 32768, 65535),
        Rgba16::new(100, 200, 300, 400),
    ]);
    check_boundaries(&[
        RgbaF32::new(0.0, 0.0, 0.0, 0.0),
        RgbaF32::new(1.0, 0.25, 0.5, 1.0),
        RgbaF32::new(0.1, 0.2, 0.3, 0.4),
    ]);
}

#[test]
fn multiply_darkens_existing_content() {
    let mut buf = ImageBuffer::new(4, 4, Rgba8::new(200, 200, 200, 255));
    let mut opts = options(true);
    opts.color_blending_mode = ColorBlendingMode::Multiply;
    let path = Path::from_subpaths(vec![SubPath::polygon(&rect_points(0.0, 0.0, 4.0, 4.0))]);
    let half_gray = Brush::solid(Rgba::new(0.5, 0.5, 0.5, 1.0));
    let bounds = buf.bounds();
    fill_region(&mut buf, bounds, &path, &half_gray, &opts).unwrap();
    assert_eq!(buf.get(1, 1), Some(Rgba8::new(100, 100, 100, 255)));
}

// ============================================================================
// Bounds and validation
// ============================================================================

#[test]
fn single_pixel_region_changes_one_pixel() {
    let mut buf = ImageBuffer::new(16, 16, Rgba8::default());
    let before = buf.clone();
    let everything =
        Path::from_subpaths(vec![SubPath::polygon(&rect_points(-10.0, -10.0, 40.0, 40.0))]);
    fill_region(&mut buf, Region::new(7, 9, 1, 1), &everything, &red(), &options(true)).unwrap();

    let changed: Vec<(u32, u32)> = (0..16)
        .flat_map(|y| (0..16).map(move |x| (x, y)))
        .filter(|&(x, y)| buf.get(x, y) != before.get(x, y))
        .collect();
    assert_eq!(changed, vec![(7, 9)]);
}

#[test]
fn oversized_shape_stays_inside_region() {
    let mut buf = ImageBuffer::new(32, 32, Rgba8::default());
    let region = Region::new(4, 6, 10, 12);
    let path = circle(16.0, 16.0, 30.0);
    let mut style = StrokeStyle::new(5.0, LineCap::Round, LineJoin::Round);
    style.dash = Some(vec![7.0, 3.0]);
    stroke_path(&mut buf, region, &path, &style, &red(), &options(true)).unwrap();
    fill_region(&mut buf, region, &path, &red(), &options(true)).unwrap();
    for y in 0..32 {
        for x in 0..32 {
            if !region.contains(x, y) {
                assert_eq!(buf.get(x, y), Some(Rgba8::default()), "({x}, {y})");
            }
        }
    }
}

#[test]
fn failed_calls_leave_buffer_untouched() {
    let mut buf = ImageBuffer::new(12, 12, Rgba16::new(1, 2, 3, 4));
    let before = buf.clone();
    let bounds = buf.bounds();
    let good = Path::from_subpaths(vec![SubPath::polygon(&rect_points(1.0, 1.0, 10.0, 10.0))]);

    let open_ended = Path::from_subpaths(vec![SubPath::new(
        vec![
            Segment::line(p(1.0, 1.0), p(10.0, 1.0)),
            Segment::line(p(10.0, 1.0), p(10.0, 10.0)),
        ],
        true,
    )]);
    let err = fill_region(&mut buf, bounds, &open_ended, &red(), &options(true)).unwrap_err();
    assert!(matches!(err, DrawError::InvalidGeometry { .. }));

    let mut dashed = StrokeStyle::new(2.0, LineCap::Butt, LineJoin::Miter);
    dashed.dash = Some(Vec::new());
    let err = stroke_path(&mut buf, bounds, &good, &dashed, &red(), &options(true)).unwrap_err();
    assert!(matches!(err, DrawError::InvalidGeometry { .. }));

    let err = fill_region(&mut buf, Region::new(0, 0, 13, 1), &good, &red(), &options(true))
        .unwrap_err();
    assert!(matches!(err, DrawError::OutOfBounds { .. }));

    let mut bad = options(true);
    bad.antialias_samples = 0;
    let err = fill_region(&mut buf, bounds, &good, &red(), &bad).unwrap_err();
    assert!(matches!(err, DrawError::InvalidOptions { .. }));

    assert_eq!(buf.as_bytes(), before.as_bytes());
}

// ============================================================================
// Determinism
// ============================================================================

fn render_scene() -> ImageBuffer<RgbaF32> {
    let mut buf = ImageBuffer::new(96, 80, RgbaF32::new(0.1, 0.2, 0.3, 0.5));
    let bounds = buf.bounds();
    let mut opts = options(true);
    opts.antialias_samples = 7;
    opts.blend_percentage = 0.8;

    let brush = Brush::from(raster_draw::PatternBrush::forward_diagonal(
        Rgba::new(0.9, 0.4, 0.1, 0.7),
        Rgba::new(0.0, 0.5, 1.0, 0.3),
    ));
    fill_region(&mut buf, bounds, &circle(48.0, 40.0, 33.0), &brush, &opts).unwrap();

    let mut wave = Path::new();
    wave.append_segment(Segment::cubic(
        p(5.0, 70.0),
        p(30.0, -20.0),
        p(60.0, 120.0),
        p(90.0, 10.0),
    ));
    let mut style = StrokeStyle::new(6.5, LineCap::Square, LineJoin::Round);
    style.dash = Some(vec![9.0, 4.0, 2.0]);
    style.dash_offset = 3.0;
    opts.color_blending_mode = ColorBlendingMode::Screen;
    stroke_path(&mut buf, bounds, &wave, &style, &red(), &opts).unwrap();
    buf
}

#[test]
fn identical_inputs_give_identical_bytes() {
    let a = render_scene();
    let b = render_scene();
    assert_eq!(a.as_bytes(), b.as_bytes());
}

/// Blend every span of `path` one pixel at a time, top row to bottom.
fn render_sequential(
    buf: &mut ImageBuffer<RgbaF32>,
    region: Region,
    path: &Path,
    brush: &Brush,
    opts: &GraphicsOptions,
) {
    for span in fill(path, opts, region).unwrap() {
        let amount = span.coverage * opts.blend_percentage;
        for x in span.x_start..span.x_end {
            let px = buf.pixel_mut(x, span.row).unwrap();
            *px = blend(*px, brush.sample(x as i32, span.row as i32), amount, opts.blend_mode());
        }
    }
}

#[test_log::test]
fn banded_render_matches_sequential_spans() {
    // Taller than several bands and offset from the buffer origin.
    let region = Region::new(3, 5, 88, 70);
    let background = RgbaF32::new(0.1, 0.2, 0.3, 0.5);
    let mut opts = options(true);
    opts.antialias_samples = 7;
    opts.blend_percentage = 0.8;
    let pattern = Brush::from(raster_draw::PatternBrush::forward_diagonal(
        Rgba::new(0.9, 0.4, 0.1, 0.7),
        Rgba::new(0.0, 0.5, 1.0, 0.3),
    ));
    let disc = circle(48.0, 40.0, 33.0);

    let mut wave = Path::new();
    wave.append_segment(Segment::cubic(
        p(5.0, 70.0),
        p(30.0, -20.0),
        p(60.0, 120.0),
        p(90.0, 10.0),
    ));
    let mut style = StrokeStyle::new(6.5, LineCap::Round, LineJoin::Miter);
    style.dash = Some(vec![9.0, 4.0, 2.0]);
    let mut stroke_opts = opts;
    stroke_opts.color_blending_mode = ColorBlendingMode::Screen;

    let mut banded = ImageBuffer::new(96, 80, background);
    fill_region(&mut banded, region, &disc, &pattern, &opts).unwrap();
    stroke_path(&mut banded, region, &wave, &style, &red(), &stroke_opts).unwrap();

    let mut sequential = ImageBuffer::new(96, 80, background);
    render_sequential(&mut sequential, region, &disc, &pattern, &opts);
    let outline = stroke(&wave, &style, stroke_opts.tolerance).unwrap().as_path();
    render_sequential(&mut sequential, region, &outline, &red(), &stroke_opts);

    assert_ne!(banded.as_bytes(), ImageBuffer::new(96, 80, background).as_bytes());
    assert_eq!(banded.as_bytes(), sequential.as_bytes());
}
