use std::sync::Arc;

use tourmap_core::{
    ColorSource, GeoPosition, HrZoneContext, MetricKind, Projector, Rgb, Track, TrackMarker,
    Waypoint, WebMercator,
};
use tourmap_render::{
    build_tile_grid, draw_legend, export_png, paint_tiles, Canvas, DrawOp, ExportMetadata, PaintConfig,
    RecordingCanvas, RenderBuffer, RenderContext, TileOverlayPainter, TileViewport, TILE_SIZE,
};

const ZOOM: u32 = 14;

fn tour() -> Track {
    let positions: Vec<GeoPosition> = (0..400)
        .map(|i| GeoPosition::new(47.00 + i as f64 * 0.0001, 8.30 + i as f64 * 0.00015))
        .collect();
    let mut track = Track::from_positions(&positions);
    track.name = "Pilatus approach".into();
    track.altitude = Some((0..400).map(|i| 440.0 + i as f64 * 2.5).collect());
    track.pulse = Some((0..400).map(|i| 100.0 + (i % 80) as f64).collect());
    track.hr_zones = Some(HrZoneContext::from_max_pulse(190.0).unwrap());
    track.markers.push(TrackMarker::new(200, "Halfway"));
    track.waypoints.push(Waypoint {
        latitude: 47.01,
        longitude: 8.315,
        label: "Hut".into(),
    });
    track
}

fn painter_for(metric: MetricKind, track: Track) -> TileOverlayPainter {
    let mut source = ColorSource::for_metric(metric);
    if let ColorSource::Gradient(provider) = &mut source {
        provider.configure_from_tracks(300, [&track]);
    }
    let context = RenderContext::new(vec![Arc::new(track)], source, PaintConfig::default());
    TileOverlayPainter::new(context, Arc::new(WebMercator::default()), ZOOM)
}

fn tiles_of(painter: &TileOverlayPainter) -> Vec<TileViewport> {
    let projector = WebMercator::default();
    let bounds = painter.context().tracks[0]
        .world_bounds(&projector, ZOOM)
        .unwrap();
    build_tile_grid(bounds, 64, TILE_SIZE, projector.map_size(ZOOM)).unwrap()
}

#[test]
fn end_to_end_tile_paint() {
    let painter = painter_for(MetricKind::Altitude, tour());
    let tiles = tiles_of(&painter);
    assert!(!tiles.is_empty());

    let run = paint_tiles(&painter, &tiles, 1).unwrap();
    assert!(!run.images.is_empty());
    assert_eq!(run.tiles_requested, tiles.len());
    assert_eq!(run.images.len() + run.tiles_skipped, tiles.len());

    let segments: usize = run.images.iter().map(|i| i.result.segments).sum();
    assert!(segments > 0);
    assert!(run.images.iter().map(|i| i.result.markers).sum::<usize>() >= 1);
    assert!(run.images.iter().any(|i| i.buffer.painted_pixel_count() > 0));
}

#[test]
fn parallel_paint_matches_sequential() {
    let painter = painter_for(MetricKind::Altitude, tour());
    let tiles = tiles_of(&painter);
    let run = paint_tiles(&painter, &tiles, 1).unwrap();

    for image in &run.images {
        let mut buffer = RenderBuffer::transparent(TILE_SIZE, TILE_SIZE);
        let result = painter.do_paint(&image.tile, 1, &mut buffer);
        assert_eq!(result, image.result);
        assert_eq!(buffer, image.buffer);
    }
}

#[test]
fn far_away_tile_is_not_painted() {
    let painter = painter_for(MetricKind::Altitude, tour());
    let tile = TileViewport::from_tile_index(0, 0, TILE_SIZE).unwrap();
    assert!(!painter.is_painting_needed(&tile));
    let run = paint_tiles(&painter, &[tile], 1).unwrap();
    assert!(run.images.is_empty());
    assert_eq!(run.tiles_skipped, 1);
}

#[test]
fn three_part_raster_center_equals_single_tile() {
    let painter = painter_for(MetricKind::Altitude, tour());
    let tiles = tiles_of(&painter);

    for tile in tiles.iter().filter(|t| painter.is_painting_needed(t)) {
        let mut single = RenderBuffer::transparent(TILE_SIZE, TILE_SIZE);
        let mut triple = RenderBuffer::transparent(3 * TILE_SIZE, 3 * TILE_SIZE);
        painter.do_paint(tile, 1, &mut single);
        painter.do_paint(tile, 3, &mut triple);

        let size = TILE_SIZE as i32;
        for y in 0..size {
            for x in 0..size {
                assert_eq!(single.pixel(x, y), triple.pixel(x + size, y + size));
            }
        }
    }
}

#[test]
fn even_parts_are_rejected() {
    let painter = painter_for(MetricKind::Altitude, tour());
    assert!(paint_tiles(&painter, &[], 2).is_err());
}

#[test]
fn hr_zone_tiles_use_zone_colors() {
    let painter = painter_for(MetricKind::HrZone, tour());
    let pixels = painter.context().tracks[0].world_pixels(painter.projector(), ZOOM);
    let tile = tiles_of(&painter)
        .into_iter()
        .find(|t| pixels.iter().filter(|&&p| t.contains(p)).count() > 1)
        .unwrap();

    let mut canvas = RecordingCanvas::new(TILE_SIZE, TILE_SIZE);
    let result = painter.do_paint(&tile, 1, &mut canvas);
    assert!(result.segments > 0);
    assert_eq!(canvas.width(), TILE_SIZE);

    // every pulse lies inside a zone, so no fill line falls back to black
    let fill_width = PaintConfig::default().line_width;
    assert!(canvas.lines().all(|op| !matches!(
        op,
        DrawOp::Line { width, color, .. } if *width == fill_width && *color == Rgb::BLACK
    )));
}

#[test]
fn legend_exports_as_png() {
    let mut source = ColorSource::for_metric(MetricKind::Pulse);
    if let ColorSource::Gradient(provider) = &mut source {
        provider.configure(300, 90.0, 180.0);
    }
    let provider = source.gradient().unwrap();
    let legend = draw_legend(provider, 150, 300, true).unwrap();

    let dir = std::env::temp_dir().join("tourmap_integration_legend");
    let _ = std::fs::create_dir_all(&dir);
    let path = dir.join("legend.png");
    let meta = ExportMetadata {
        metric: MetricKind::Pulse.id().into(),
        ..ExportMetadata::default()
    };
    export_png(&legend, &path, &meta).unwrap();
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
    let _ = std::fs::remove_dir_all(&dir);
}
