//! Command line arguments. Options override the stored preferences for one run.

use std::path::PathBuf;

use clap::{Parser, ValueHint};
use tourmap_core::MetricKind;

use crate::preferences::AppPreferences;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "tourmap", version, about = "Paint tour overlays onto map tiles", long_about = None)]
pub struct CliArgs {
    /// Tour JSON file holding one track or a list of tracks
    #[arg(value_hint = ValueHint::FilePath)]
    pub tour: PathBuf,

    /// Metric the tour is colored by: altitude, gradient, pulse, speed, pace or hr_zone
    #[arg(long, value_parser = parse_metric)]
    pub metric: Option<MetricKind>,

    /// Map zoom level
    #[arg(long)]
    pub zoom: Option<u32>,

    /// Odd number of tiles per raster side, at most 9
    #[arg(long)]
    pub parts: Option<u32>,

    /// Output directory for tiles, overview and legend
    #[arg(long = "out", value_hint = ValueHint::DirPath)]
    pub output_dir: Option<PathBuf>,

    /// Do not write the stitched overview image
    #[arg(long)]
    pub no_overview: bool,

    /// Do not write the legend image
    #[arg(long)]
    pub no_legend: bool,

    /// Store the given options as new defaults
    #[arg(long)]
    pub save: bool,
}

fn parse_metric(id: &str) -> Result<MetricKind, String> {
    MetricKind::from_id(id).ok_or_else(|| {
        let known: Vec<&str> = MetricKind::ALL.iter().map(|m| m.id()).collect();
        format!("unknown metric '{id}', expected one of {}", known.join(", "))
    })
}

impl CliArgs {
    /// Copy the given options into `prefs`.
    pub fn apply(&self, prefs: &mut AppPreferences) {
        if let Some(metric) = self.metric {
            prefs.metric = metric;
        }
        if let Some(zoom) = self.zoom {
            prefs.zoom = zoom;
        }
        if let Some(parts) = self.parts {
            prefs.parts = parts;
        }
        if let Some(dir) = &self.output_dir {
            prefs.output_dir = dir.to_string_lossy().into_owned();
        }
        if self.no_overview {
            prefs.export_overview = false;
        }
        if self.no_legend {
            prefs.export_legend = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(std::iter::once("tourmap").chain(args.iter().copied()))
    }

    #[test]
    fn options_and_tour_in_any_order() {
        let args = parse(&["--zoom", "12", "tour.json", "--metric", "hr_zone", "--no-legend"]).unwrap();
        assert_eq!(args.tour, PathBuf::from("tour.json"));
        assert_eq!(args.zoom, Some(12));
        assert_eq!(args.metric, Some(MetricKind::HrZone));
        assert!(args.no_legend);
        assert!(!args.no_overview);
        assert!(!args.save);
    }

    #[test]
    fn help_is_reported_as_display() {
        let err = parse(&["--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn invalid_arguments_are_rejected() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["a.json", "b.json"]).is_err());
        assert!(parse(&["t.json", "--zoom"]).is_err());
        assert!(parse(&["t.json", "--zoom", "x"]).is_err());
        assert!(parse(&["t.json", "--parts", "-3"]).is_err());
        assert!(parse(&["t.json", "--fast"]).is_err());

        let err = parse(&["t.json", "--metric", "cadence"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn every_metric_id_is_accepted() {
        for metric in MetricKind::ALL {
            let args = parse(&["t.json", "--metric", metric.id()]).unwrap();
            assert_eq!(args.metric, Some(metric));
        }
    }

    #[test]
    fn apply_overrides_only_given_options() {
        let args = parse(&["t.json", "--parts", "3", "--out", "/tmp/x", "--no-overview"]).unwrap();
        let mut prefs = AppPreferences::default();
        args.apply(&mut prefs);
        assert_eq!(prefs.parts, 3);
        assert_eq!(prefs.zoom, AppPreferences::default().zoom);
        assert_eq!(prefs.output_dir, "/tmp/x");
        assert!(!prefs.export_overview);
        assert!(prefs.export_legend);
    }
}
