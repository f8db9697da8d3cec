/// Title of the single data series.
pub const SERIES_TITLE: &str = "x Values Over Iterations";

/// Title of the horizontal axis.
pub const X_AXIS_TITLE: &str = "Iteration";

/// Title of the vertical axis.
pub const Y_AXIS_TITLE: &str = "x value";

/// A line chart of iterates, one point per iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    /// Category labels, `Iteration 0` through `Iteration k-1`.
    pub labels: Vec<String>,
    pub series_title: &'static str,
    pub values: Vec<f64>,
    pub x_axis_title: &'static str,
    pub y_axis_title: &'static str,
}

impl LineChart {
    /// Builds the convergence chart for an ordered list of iterates.
    #[must_use]
    pub fn convergence(values: Vec<f64>) -> Self {
        let labels = (0..values.len()).map(|i| format!("Iteration {i}")).collect();

        Self {
            labels,
            series_title: SERIES_TITLE,
            values,
            x_axis_title: X_AXIS_TITLE,
            y_axis_title: Y_AXIS_TITLE,
        }
    }

    /// Points as `[index, value]` pairs, ready for plotting.
    pub fn points(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, &value)| [i as f64, value])
    }
}

/// The chart currently drawn, if any.
///
/// At most one chart exists at a time. Rendering replaces the existing chart
/// and destroying an absent chart does nothing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ChartHandle {
    #[default]
    Absent,
    Present { canvas: String, chart: LineChart },
}

impl ChartHandle {
    /// Destroys any existing chart, then draws `values` on `canvas`.
    pub fn render(&mut self, canvas: &str, values: Vec<f64>) {
        self.destroy();
        *self = Self::Present {
            canvas: canvas.to_string(),
            chart: LineChart::convergence(values),
        };
    }

    /// Clears the chart, returning whether one was present.
    pub fn destroy(&mut self) -> bool {
        matches!(std::mem::take(self), Self::Present { .. })
    }

    #[must_use]
    pub fn chart(&self) -> Option<&LineChart> {
        match self {
            Self::Present { chart, .. } => Some(chart),
            Self::Absent => None,
        }
    }

    #[must_use]
    pub fn canvas(&self) -> Option<&str> {
        match self {
            Self::Present { canvas, .. } => Some(canvas),
            Self::Absent => None,
        }
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_iteration_index() {
        let chart = LineChart::convergence(vec![1.5, 0.07, 0.99]);

        assert_eq!(chart.labels, ["Iteration 0", "Iteration 1", "Iteration 2"]);
        assert_eq!(chart.series_title, "x Values Over Iterations");
        assert_eq!(chart.x_axis_title, "Iteration");
        assert_eq!(chart.y_axis_title, "x value");
        assert_eq!(
            chart.points().collect::<Vec<_>>(),
            [[0.0, 1.5], [1.0, 0.07], [2.0, 0.99]]
        );
    }

    #[test]
    fn render_replaces_existing_chart() {
        let mut handle = ChartHandle::default();
        assert!(!handle.is_present());

        handle.render("first", vec![1.0, 2.0]);
        handle.render("second", vec![3.0]);

        let chart = handle.chart().expect("chart is drawn");
        assert_eq!(chart.values, [3.0]);
        assert_eq!(chart.labels, ["Iteration 0"]);
        assert_eq!(handle.canvas(), Some("second"));
    }

    #[test]
    fn rendering_twice_equals_rendering_once() {
        let mut once = ChartHandle::default();
        once.render("canvas", vec![1.5, 0.07]);

        let mut twice = ChartHandle::default();
        twice.render("canvas", vec![1.5, 0.07]);
        twice.render("canvas", vec![1.5, 0.07]);

        assert_eq!(once, twice);
    }

    #[test]
    fn destroy_is_idempotent() {
        let mut handle = ChartHandle::default();
        assert!(!handle.destroy());

        handle.render("canvas", vec![1.0]);
        assert!(handle.destroy());
        assert!(!handle.destroy());
        assert_eq!(handle, ChartHandle::Absent);
    }

    #[test]
    fn empty_series_still_draws_a_chart() {
        let mut handle = ChartHandle::default();
        handle.render("canvas", Vec::new());
        assert!(handle.chart().is_some_and(|chart| chart.labels.is_empty()));
    }
}
