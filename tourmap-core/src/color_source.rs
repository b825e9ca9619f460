use std::collections::HashMap;

use crate::color::Rgb;
use crate::gradient::GradientColorProvider;
use crate::hr_zone::HrZoneColorProvider;
use crate::metric::MetricKind;
use crate::track::Track;

/// The active coloring strategy of a paint cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorSource {
    Gradient(GradientColorProvider),
    Discrete(HrZoneColorProvider),
}

impl ColorSource {
    /// Builtin source for `metric`.
    pub fn for_metric(metric: MetricKind) -> Self {
        if metric.is_discrete() {
            ColorSource::Discrete(HrZoneColorProvider::default())
        } else {
            ColorSource::Gradient(GradientColorProvider::builtin(metric))
        }
    }

    pub fn metric(&self) -> MetricKind {
        match self {
            ColorSource::Gradient(provider) => provider.metric(),
            ColorSource::Discrete(_) => MetricKind::HrZone,
        }
    }

    /// Color of sample `index`, or `None` when the gradient metric has no value there.
    pub fn color_for(&self, track: &Track, index: usize, is_line_segment: bool) -> Option<Rgb> {
        match self {
            ColorSource::Gradient(provider) => {
                let value = *track.metric_serie(provider.metric())?.get(index)?;
                Some(provider.color_for_value(value))
            }
            ColorSource::Discrete(provider) => {
                Some(provider.color_for(track, index, is_line_segment))
            }
        }
    }

    /// [`color_for`](Self::color_for) memoized by metric value in `cache`.
    pub fn cached_color_for(
        &self,
        cache: &mut ColorCache,
        track: &Track,
        index: usize,
        is_line_segment: bool,
    ) -> Option<Rgb> {
        match self {
            ColorSource::Gradient(provider) => {
                let value = *track.metric_serie(provider.metric())?.get(index)?;
                Some(
                    *cache
                        .colors
                        .entry(value.to_bits())
                        .or_insert_with(|| provider.color_for_value(value)),
                )
            }
            ColorSource::Discrete(_) => self.color_for(track, index, is_line_segment),
        }
    }

    pub fn gradient(&self) -> Option<&GradientColorProvider> {
        match self {
            ColorSource::Gradient(provider) => Some(provider),
            ColorSource::Discrete(_) => None,
        }
    }
}

/// Value to color memo owned by a single paint call.
#[derive(Debug, Default)]
pub struct ColorCache {
    colors: HashMap<u64, Rgb>,
}

impl ColorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track() -> Track {
        let mut track = Track::new(vec![0.0; 4], vec![0.0; 4]).unwrap();
        track.altitude = Some(vec![0.0, 500.0, 500.0, 3000.0]);
        track.pulse = Some(vec![80.0, 120.0, 140.0, 160.0]);
        track
    }

    #[test]
    fn gradient_uses_metric_serie() {
        let source = ColorSource::for_metric(MetricKind::Altitude);
        let legend = source.gradient().unwrap().legend().clone();
        assert_eq!(source.color_for(&track(), 1, true), Some(legend.anchors[1].rgb));
        assert_eq!(source.metric(), MetricKind::Altitude);
    }

    #[test]
    fn gradient_without_serie_is_none() {
        let source = ColorSource::for_metric(MetricKind::Speed);
        assert_eq!(source.color_for(&track(), 0, false), None);
        assert_eq!(
            ColorSource::for_metric(MetricKind::Altitude).color_for(&track(), 9, false),
            None
        );
    }

    #[test]
    fn cache_memoizes_equal_values() {
        let source = ColorSource::for_metric(MetricKind::Altitude);
        let track = track();
        let mut cache = ColorCache::new();
        for index in 0..4 {
            assert_eq!(
                source.cached_color_for(&mut cache, &track, index, false),
                source.color_for(&track, index, false)
            );
        }
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn discrete_source_reports_hr_zone() {
        let source = ColorSource::for_metric(MetricKind::HrZone);
        assert_eq!(source.metric(), MetricKind::HrZone);
        assert!(source.gradient().is_none());
    }
}
