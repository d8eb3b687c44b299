use egui::{pos2, Color32};
use sticker_sketchpad::export::{encode_png, export_surface};
use sticker_sketchpad::glyph::GlyphRasterizer;
use sticker_sketchpad::{factory, CanvasSettings, HistoryEngine, MarkerParams, Point, StickerParams, Surface, ToolParams};

const WHITE: [u8; 4] = [255, 255, 255, 255];

fn marker(color: Color32) -> ToolParams {
    ToolParams::Marker(MarkerParams { thickness: 4.0, color })
}

fn sticker(glyph: &str, rotation: f32) -> ToolParams {
    ToolParams::Sticker(StickerParams {
        glyph: glyph.to_owned(),
        size: 40.0,
        rotation,
    })
}

fn draw(engine: &mut HistoryEngine, points: &[Point], color: Color32) {
    engine.begin_mark(points[0], &marker(color)).unwrap();
    for point in &points[1..] {
        engine.extend_mark(*point);
    }
    engine.commit_mark();
}

fn place(engine: &mut HistoryEngine, at: Point, glyph: &str, rotation: f32) {
    engine.begin_mark(at, &sticker(glyph, rotation)).unwrap();
    engine.commit_mark();
}

fn render(engine: &HistoryEngine, size: u32) -> Surface {
    let mut surface = Surface::new(size, size);
    engine.render_all(&mut surface, 1.0, Color32::WHITE);
    surface
}

/// Bounding box (x0, y0, x1, y1) of every pixel that is not white
fn ink_bounds(surface: &Surface) -> Option<(u32, u32, u32, u32)> {
    surface
        .as_image()
        .enumerate_pixels()
        .filter(|(_, _, pixel)| pixel.0 != WHITE)
        .fold(None, |acc, (x, y, _)| {
            Some(match acc {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            })
        })
}

#[test]
fn test_render_all_is_deterministic() {
    let mut engine = HistoryEngine::new();
    draw(&mut engine, &[pos2(10.0, 10.0), pos2(60.0, 40.0), pos2(20.0, 80.0)], Color32::RED);
    place(&mut engine, pos2(50.0, 50.0), "★", 30.0);
    engine.set_preview(Some(factory::create_sticker(
        pos2(70.0, 70.0),
        &StickerParams {
            glyph: "🎈".to_owned(),
            size: 20.0,
            rotation: 0.0,
        },
    )));

    let first = render(&engine, 100);
    let second = render(&engine, 100);
    assert_eq!(first.as_image(), second.as_image());

    // Rendering over a dirty surface gives the same result
    let mut reused = render(&engine, 100);
    engine.render_all(&mut reused, 1.0, Color32::WHITE);
    assert_eq!(reused.as_image(), first.as_image());
}

#[test]
fn test_single_point_stroke_renders_nothing() {
    let mut engine = HistoryEngine::new();
    draw(&mut engine, &[pos2(20.0, 20.0)], Color32::RED);
    assert_eq!(engine.committed().len(), 1);
    assert_eq!(ink_bounds(&render(&engine, 40)), None);
}

#[test]
fn test_preview_draws_on_top_at_half_opacity() {
    let mut engine = HistoryEngine::new();
    draw(&mut engine, &[pos2(5.0, 20.0), pos2(35.0, 20.0)], Color32::RED);
    let preview = factory::create_stroke(
        &[pos2(20.0, 5.0), pos2(20.0, 35.0)],
        &MarkerParams {
            thickness: 4.0,
            color: Color32::BLUE,
        },
    )
    .unwrap();
    engine.set_preview(Some(preview));

    let surface = render(&engine, 40);
    let [r, g, b, a] = surface.pixel(20, 20).unwrap();
    assert!((127..=128).contains(&r));
    assert_eq!(g, 0);
    assert!((127..=128).contains(&b));
    assert_eq!(a, 255);

    // Blue half over white where only the preview is
    let [r, _, b, _] = surface.pixel(20, 8).unwrap();
    assert!((127..=128).contains(&r));
    assert_eq!(b, 255);
}

#[test]
fn test_live_ink_shows_in_progress_mark() {
    let mut engine = HistoryEngine::new();
    engine.begin_mark(pos2(5.0, 10.0), &marker(Color32::BLACK)).unwrap();
    engine.extend_mark(pos2(35.0, 10.0));

    let mut live = Surface::new(40, 20);
    engine.render_live(&mut live, 1.0, Color32::WHITE);
    assert_eq!(live.pixel(20, 10), Some([0, 0, 0, 255]));

    assert_eq!(ink_bounds(&render(&engine, 40)), None);
}

#[test]
fn test_sticker_rotation_turns_the_glyph() {
    let mut upright = HistoryEngine::new();
    place(&mut upright, pos2(50.0, 50.0), "I", 0.0);
    let (x0, y0, x1, y1) = ink_bounds(&render(&upright, 100)).unwrap();
    assert!(y1 - y0 > (x1 - x0) * 3);

    let mut turned = HistoryEngine::new();
    place(&mut turned, pos2(50.0, 50.0), "I", 90.0);
    let (x0, y0, x1, y1) = ink_bounds(&render(&turned, 100)).unwrap();
    assert!(x1 - x0 > (y1 - y0) * 3);
    // Still centered on the anchor
    assert!(x0 < 50 && x1 > 50);
    assert!(y0 <= 51 && y1 >= 49);
}

#[test]
fn test_rotation_is_local_to_the_sticker() {
    let stroke = [pos2(5.0, 10.0), pos2(95.0, 10.0)];

    let mut plain = HistoryEngine::new();
    draw(&mut plain, &stroke, Color32::RED);
    let expected = render(&plain, 100);

    let mut with_sticker = HistoryEngine::new();
    draw(&mut with_sticker, &stroke, Color32::RED);
    place(&mut with_sticker, pos2(50.0, 70.0), "A", 135.0);
    let actual = render(&with_sticker, 100);

    for y in 0..25 {
        for x in 0..100 {
            assert_eq!(actual.pixel(x, y), expected.pixel(x, y), "pixel ({x}, {y})");
        }
    }
    assert_ne!(actual.as_image(), expected.as_image());
}

#[test]
fn test_export_is_a_read_only_projection() {
    let mut engine = HistoryEngine::new();
    draw(&mut engine, &[pos2(4.0, 4.0), pos2(12.0, 4.0)], Color32::RED);
    draw(&mut engine, &[pos2(4.0, 12.0), pos2(12.0, 12.0)], Color32::BLUE);
    engine.undo();
    engine.begin_mark(pos2(2.0, 14.0), &marker(Color32::GREEN)).unwrap();
    engine.set_preview(Some(factory::begin_stroke(
        pos2(14.0, 14.0),
        &MarkerParams {
            thickness: 2.0,
            color: Color32::GREEN,
        },
    )));

    let committed = engine.committed().to_vec();
    let redo: Vec<_> = engine.redo_buffer().cloned().collect();
    let in_progress = engine.in_progress().cloned();
    let preview = engine.preview().cloned();

    let settings = CanvasSettings {
        width: 16,
        height: 16,
        ..Default::default()
    };
    let surface = export_surface(&engine, &settings, GlyphRasterizer::shared());
    assert_eq!((surface.width(), surface.height()), (64, 64));
    // Committed red stroke, scaled 4x
    assert_eq!(surface.pixel(32, 16), Some([255, 0, 0, 255]));
    // Neither the undone stroke nor the preview dot reach the export
    assert_eq!(surface.pixel(32, 48), Some(WHITE));
    assert_eq!(surface.pixel(56, 56), Some(WHITE));

    let png = encode_png(&surface).unwrap();
    assert_eq!(&png[..4], b"\x89PNG");

    assert_eq!(engine.committed(), committed.as_slice());
    assert_eq!(engine.redo_buffer().cloned().collect::<Vec<_>>(), redo);
    assert_eq!(engine.in_progress().cloned(), in_progress);
    assert_eq!(engine.preview().cloned(), preview);
}
