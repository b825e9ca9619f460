//! PNG export with embedded metadata (tEXt chunks).

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use tracing::debug;

use crate::buffer::RenderBuffer;

/// Metadata to embed in an exported tile or legend PNG as tEXt chunks.
#[derive(Debug, Clone, Default)]
pub struct ExportMetadata {
    pub zoom: u32,
    pub tile_x: u32,
    pub tile_y: u32,
    pub parts: u32,
    pub projection: String,
    pub metric: String,
    pub tour_name: String,
}

/// Write an RGBA buffer as a PNG file with embedded tile metadata.
///
/// Uses the `png` crate directly (rather than `image`) to inject custom tEXt
/// chunks readable by exiftool and most image viewers.
pub fn export_png(buffer: &RenderBuffer, path: &Path, metadata: &ExportMetadata) -> crate::Result<()> {
    RenderBuffer::check_dimensions(buffer.width, buffer.height)?;

    let writer = BufWriter::new(File::create(path)?);

    let mut encoder = png::Encoder::new(writer, buffer.width, buffer.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    encoder.add_text_chunk("Software".to_string(), "TourMap".to_string())?;
    encoder.add_text_chunk("Description".to_string(), build_description(metadata))?;
    for (key, value) in build_metadata_pairs(metadata) {
        encoder.add_text_chunk(key, value)?;
    }

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&buffer.pixels)?;

    debug!(
        width = buffer.width,
        height = buffer.height,
        path = %path.display(),
        "Exported PNG"
    );
    Ok(())
}

fn build_description(meta: &ExportMetadata) -> String {
    let mut desc = format!(
        "{} overlay - Zoom: {}, Tile: {}/{}",
        meta.metric, meta.zoom, meta.tile_x, meta.tile_y
    );
    if !meta.tour_name.is_empty() {
        desc.push_str(&format!(", Tour: {}", meta.tour_name));
    }
    desc
}

fn build_metadata_pairs(meta: &ExportMetadata) -> Vec<(String, String)> {
    let mut pairs = vec![
        ("TourMap.Zoom".into(), meta.zoom.to_string()),
        ("TourMap.TileX".into(), meta.tile_x.to_string()),
        ("TourMap.TileY".into(), meta.tile_y.to_string()),
        ("TourMap.Parts".into(), meta.parts.to_string()),
        ("TourMap.Projection".into(), meta.projection.clone()),
        ("TourMap.Metric".into(), meta.metric.clone()),
    ];
    if !meta.tour_name.is_empty() {
        pairs.push(("TourMap.Tour".into(), meta.tour_name.clone()));
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn metadata() -> ExportMetadata {
        ExportMetadata {
            zoom: 14,
            tile_x: 8560,
            tile_y: 5760,
            parts: 1,
            projection: "epsg:3857".into(),
            metric: "altitude".into(),
            tour_name: "Pilatus".into(),
        }
    }

    #[test]
    fn export_creates_valid_png() {
        let buffer = RenderBuffer::transparent(4, 4);
        let dir = std::env::temp_dir().join("tourmap_test_export");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("test_export.png");
        export_png(&buffer, &path, &metadata()).expect("export should succeed");

        let mut file = std::fs::File::open(&path).expect("file should exist");
        let mut header = [0u8; 8];
        file.read_exact(&mut header).expect("should read header");
        assert_eq!(&header, b"\x89PNG\r\n\x1a\n", "valid PNG signature");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn export_embeds_text_chunks() {
        let buffer = RenderBuffer::new(2, 2);
        let dir = std::env::temp_dir().join("tourmap_test_export_meta");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("test_meta.png");
        export_png(&buffer, &path, &metadata()).expect("export should succeed");

        let decoder = png::Decoder::new(std::fs::File::open(&path).expect("file should exist"));
        let reader = decoder.read_info().expect("should read info");
        let texts = &reader.info().uncompressed_latin1_text;
        assert!(
            texts.iter().any(|t| t.keyword == "Software" && t.text == "TourMap"),
            "Should contain Software text chunk"
        );
        assert!(
            texts.iter().any(|t| t.keyword == "TourMap.Zoom" && t.text == "14"),
            "Should contain zoom chunk"
        );
        assert!(
            texts.iter().any(|t| t.keyword == "TourMap.Tour" && t.text == "Pilatus"),
            "Should contain tour chunk"
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn export_rejects_empty_buffer() {
        let buffer = RenderBuffer::transparent(0, 4);
        let path = std::env::temp_dir().join("tourmap_never_written.png");
        assert!(export_png(&buffer, &path, &metadata()).is_err());
    }
}
