//! One export run: tour file in, overlay tiles, overview and legend out.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tourmap_core::{
    ColorSource, GradientColorProvider, MetricKind, PixelBounds, Projector, Track, WebMercator,
};
use tourmap_render::{
    build_tile_grid, draw_legend, export_png, paint_tiles, ExportMetadata, RenderContext,
    TileOverlayPainter, TILE_SIZE,
};
use tracing::{info, warn};

use crate::color_profiles;
use crate::error::{AppError, Result};
use crate::overview::stitch_overview;
use crate::preferences::AppPreferences;
use crate::tour_file;

/// What a run wrote.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub tiles_written: usize,
    pub tiles_skipped: usize,
    pub overview: Option<PathBuf>,
    pub legend: Option<PathBuf>,
}

/// Color source for `metric`, its gradient legend taken from the stored
/// profile and fitted to the values of `tracks`.
pub fn color_source_for(
    metric: MetricKind,
    tracks: &[Track],
    profiles_dir: &Path,
    legend_height: u32,
) -> ColorSource {
    if metric.is_discrete() {
        return ColorSource::for_metric(metric);
    }
    if !tracks.iter().any(|t| t.metric_serie(metric).is_some()) {
        warn!(metric = metric.id(), "No track carries this metric, tour is painted in the default color");
    }
    let legend = color_profiles::load_profile(profiles_dir, metric);
    let mut provider = GradientColorProvider::new(metric, legend);
    provider.configure_from_tracks(legend_height, tracks);
    ColorSource::Gradient(provider)
}

fn tour_bounds(tracks: &[Track], projector: &dyn Projector, zoom: u32) -> Option<PixelBounds> {
    tracks
        .iter()
        .filter_map(|t| t.world_bounds(projector, zoom))
        .reduce(PixelBounds::union)
}

fn tour_name(tracks: &[Track], tour_path: &Path) -> String {
    tracks
        .iter()
        .map(|t| t.name.as_str())
        .find(|name| !name.is_empty())
        .map(str::to_string)
        .or_else(|| {
            tour_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
        })
        .unwrap_or_default()
}

pub fn run(tour_path: &Path, prefs: &AppPreferences, profiles_dir: &Path) -> Result<RunSummary> {
    let mut tracks = tour_file::load_tracks(tour_path)?;
    tour_file::fill_missing_hr_zones(&mut tracks, prefs.max_pulse)?;

    let projector = WebMercator::default();
    let zoom = prefs.zoom;
    if zoom < projector.min_zoom() || zoom > projector.max_zoom() {
        return Err(AppError::Usage(format!(
            "zoom {zoom} is outside {}..={}",
            projector.min_zoom(),
            projector.max_zoom()
        )));
    }

    let metric = prefs.metric;
    let source = color_source_for(metric, &tracks, profiles_dir, prefs.legend_height);
    let name = tour_name(&tracks, tour_path);

    let bounds = tour_bounds(&tracks, &projector, zoom)
        .ok_or_else(|| AppError::NoTracks(tour_path.to_path_buf()))?;
    let grid = build_tile_grid(bounds, prefs.tile_margin, TILE_SIZE, projector.map_size(zoom))?;
    info!(zoom, metric = metric.id(), tiles = grid.len(), "Tile grid ready");

    let context = RenderContext::new(
        tracks.into_iter().map(Arc::new).collect(),
        source,
        prefs.paint.clone(),
    );
    let painter = TileOverlayPainter::new(context, Arc::new(projector), zoom);
    let paint_run = paint_tiles(&painter, &grid, prefs.parts)?;

    let out_dir = prefs.output_directory();
    let mut summary = RunSummary {
        tiles_skipped: paint_run.tiles_skipped,
        ..RunSummary::default()
    };
    let base_meta = ExportMetadata {
        zoom,
        parts: prefs.parts,
        projection: painter.projector().projection_id().to_string(),
        metric: metric.id().to_string(),
        tour_name: name,
        ..ExportMetadata::default()
    };

    for image in &paint_run.images {
        let (tile_x, tile_y) = (image.tile.tile_x(), image.tile.tile_y());
        let dir = out_dir
            .join("tiles")
            .join(zoom.to_string())
            .join(tile_x.to_string());
        fs::create_dir_all(&dir)?;
        let meta = ExportMetadata {
            tile_x,
            tile_y,
            ..base_meta.clone()
        };
        export_png(&image.buffer, &dir.join(format!("{tile_y}.png")), &meta)?;
        summary.tiles_written += 1;
    }

    if prefs.export_overview {
        if let Some(overview) = stitch_overview(&grid, &paint_run.images) {
            fs::create_dir_all(&out_dir)?;
            let path = out_dir.join("overview.png");
            overview.save(&path)?;
            summary.overview = Some(path);
        }
    }

    if prefs.export_legend {
        match painter.context().color_source.gradient() {
            Some(provider) => {
                let legend = draw_legend(
                    provider,
                    prefs.legend_width,
                    prefs.legend_height,
                    prefs.legend_vertical,
                )?;
                fs::create_dir_all(&out_dir)?;
                let path = out_dir.join("legend.png");
                export_png(&legend, &path, &base_meta)?;
                summary.legend = Some(path);
            }
            None => info!(metric = metric.id(), "Metric has no gradient legend"),
        }
    }

    info!(
        tiles = summary.tiles_written,
        skipped = summary.tiles_skipped,
        out = %out_dir.display(),
        "Export complete"
    );
    Ok(summary)
}
