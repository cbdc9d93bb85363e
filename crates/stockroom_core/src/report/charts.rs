//! SVG chart rendering with plotters.
//!
//! # Responsibility
//! - Draw the quantity bar, stock distribution pie and value bar charts.
//! - Map `ChartTheme` onto background, text and series colors.
//!
//! # Invariants
//! - Every chart is `CHART_SIZE` pixels and a complete SVG document.
//! - A pie over zero total units draws a placeholder message instead.

use crate::model::item::InventoryItem;
use log::debug;
use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Pixel size of every rendered chart.
pub const CHART_SIZE: (u32, u32) = (800, 480);

const FONT_FAMILY: &str = "sans-serif";

const SERIES_COLORS: [RGBColor; 8] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(23, 190, 207),
];

pub type ReportResult<T> = Result<T, ReportError>;

#[derive(Debug)]
pub enum ReportError {
    /// The listing is empty; there is nothing to chart.
    NoData,
    Render(String),
}

impl Display for ReportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoData => write!(f, "no data to display in reports"),
            Self::Render(message) => write!(f, "failed to render chart: {message}"),
        }
    }
}

impl Error for ReportError {}

/// Colour scheme of rendered charts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChartTheme {
    #[default]
    Light,
    Dark,
}

impl ChartTheme {
    fn background(self) -> RGBColor {
        match self {
            Self::Light => WHITE,
            Self::Dark => RGBColor(30, 30, 30),
        }
    }

    fn foreground(self) -> RGBColor {
        match self {
            Self::Light => BLACK,
            Self::Dark => WHITE,
        }
    }
}

/// The three inventory charts, each a complete SVG document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub quantity_by_item: String,
    pub stock_distribution: String,
    pub value_by_item: String,
}

impl Report {
    /// Suggested file name and SVG body for each chart.
    pub fn files(&self) -> [(&'static str, &str); 3] {
        [
            ("quantity_by_item.svg", self.quantity_by_item.as_str()),
            ("stock_distribution.svg", self.stock_distribution.as_str()),
            ("value_by_item.svg", self.value_by_item.as_str()),
        ]
    }
}

/// Renders all report charts for `items`.
///
/// # Errors
/// - `NoData` when `items` is empty.
/// - `Render` when the drawing backend fails.
pub fn render_report(items: &[InventoryItem], theme: ChartTheme) -> ReportResult<Report> {
    if items.is_empty() {
        return Err(ReportError::NoData);
    }

    let names = items.iter().map(|item| item.name.clone()).collect::<Vec<_>>();
    let quantities = items
        .iter()
        .map(|item| item.quantity as f64)
        .collect::<Vec<_>>();
    let values = items.iter().map(InventoryItem::value).collect::<Vec<_>>();

    let report = Report {
        quantity_by_item: bar_chart(
            "Stock Quantity by Item",
            "Quantity",
            &names,
            &quantities,
            theme,
        )?,
        stock_distribution: pie_chart("Stock Distribution", &names, &quantities, theme)?,
        value_by_item: bar_chart("Inventory Value by Item", "Total Value", &names, &values, theme)?,
    };
    debug!(
        "event=report_render module=report status=ok items={}",
        items.len()
    );
    Ok(report)
}

fn bar_chart(
    title: &str,
    y_desc: &str,
    names: &[String],
    values: &[f64],
    theme: ChartTheme,
) -> ReportResult<String> {
    let fg = theme.foreground();
    let peak = values.iter().copied().fold(0.0_f64, f64::max);
    let y_max = if peak > 0.0 { peak * 1.1 } else { 1.0 };
    let bar_count = u32::try_from(names.len())
        .map_err(|_| ReportError::Render(format!("too many items: {}", names.len())))?;

    render_svg(theme, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT_FAMILY, 24).into_font().color(&fg))
            .margin(16)
            .x_label_area_size(48)
            .y_label_area_size(72)
            .build_cartesian_2d((0u32..bar_count).into_segmented(), 0f64..y_max)
            .map_err(render_err)?;

        let label_for = |value: &SegmentValue<u32>| match value {
            SegmentValue::CenterOf(index) => names
                .get(*index as usize)
                .cloned()
                .unwrap_or_default(),
            _ => String::new(),
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(names.len())
            .x_label_formatter(&label_for)
            .y_desc(y_desc)
            .axis_style(&fg)
            .label_style((FONT_FAMILY, 13).into_font().color(&fg))
            .axis_desc_style((FONT_FAMILY, 15).into_font().color(&fg))
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(SERIES_COLORS[0].filled())
                    .margin(8)
                    .data(
                        values
                            .iter()
                            .enumerate()
                            .map(|(index, value)| (index as u32, *value)),
                    ),
            )
            .map_err(render_err)?;

        Ok(())
    })
}

fn pie_chart(
    title: &str,
    names: &[String],
    quantities: &[f64],
    theme: ChartTheme,
) -> ReportResult<String> {
    let fg = theme.foreground();

    render_svg(theme, |root| {
        let body = root
            .titled(title, (FONT_FAMILY, 24).into_font().color(&fg))
            .map_err(render_err)?;
        let (width, height) = body.dim_in_pixel();
        let center = (width as i32 / 2, height as i32 / 2);

        if quantities.iter().sum::<f64>() <= 0.0 {
            body.draw(&Text::new(
                "No stock on hand",
                (center.0 - 70, center.1),
                (FONT_FAMILY, 18).into_font().color(&fg),
            ))
            .map_err(render_err)?;
            return Ok(());
        }

        let radius = f64::from(width.min(height)) * 0.38;
        let colors = (0..names.len())
            .map(|index| SERIES_COLORS[index % SERIES_COLORS.len()])
            .collect::<Vec<_>>();

        let mut pie = Pie::new(&center, &radius, quantities, &colors, names);
        pie.label_style((FONT_FAMILY, 14).into_font().color(&fg));
        pie.percentages((FONT_FAMILY, 12).into_font().color(&WHITE));
        body.draw(&pie).map_err(render_err)?;

        Ok(())
    })
}

fn render_svg(
    theme: ChartTheme,
    draw: impl FnOnce(&DrawingArea<SVGBackend<'_>, Shift>) -> ReportResult<()>,
) -> ReportResult<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&theme.background()).map_err(render_err)?;
        draw(&root)?;
        root.present().map_err(render_err)?;
    }
    Ok(svg)
}

fn render_err(err: impl Display) -> ReportError {
    ReportError::Render(err.to_string())
}
