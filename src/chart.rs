//! Chart generation for the expense breakdown.
//!
//! The breakdown is derived as plain `{labels, values}` data and handed to a
//! [ChartRenderer]. The default renderer builds an ECharts doughnut with
//! `charming` and emits the HTML container plus the script that draws it.

use charming::{
    Chart,
    component::Legend,
    element::{Color, ItemStyle, JsFunction, Label, Orient, Tooltip, Trigger},
    series::Pie,
};
use maud::{Markup, PreEscaped, html};

use crate::{aggregation::expenses_by_category, html::CURRENCY_SYMBOL, transaction::Transaction};

/// The colours used for chart segments, in order.
pub const PALETTE: [&str; 12] = [
    "#ef4444", "#f97316", "#f59e0b", "#eab308", "#84cc16", "#10b981", "#06b6d4", "#3b82f6",
    "#6366f1", "#8b5cf6", "#a855f7", "#ec4899",
];

/// The HTML element ID of the chart container.
pub const CHART_ID: &str = "expense-chart";

/// Expense totals per category in the shape a chart library expects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryChartData {
    /// Human-readable category names.
    pub labels: Vec<String>,
    /// The total spent in each category, in the same order as `labels`.
    pub values: Vec<f64>,
}

impl CategoryChartData {
    /// Derive the chart data from the expenses in `transactions`.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let (labels, values) = expenses_by_category(transactions)
            .iter()
            .map(|(category, total)| (category.label().to_owned(), total))
            .unzip();

        Self { labels, values }
    }

    /// Whether there is nothing to chart.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// One palette colour per value, cycling through [PALETTE] when there are
    /// more values than colours.
    pub fn colors(&self) -> Vec<&'static str> {
        PALETTE.iter().copied().cycle().take(self.values.len()).collect()
    }
}

/// Turns chart data into markup that draws the chart.
///
/// A renderer must replace any chart it drew before rather than stacking a
/// new chart on top of it.
pub trait ChartRenderer: Send + Sync {
    /// Render `data`, which is never empty.
    fn render(&self, data: &CategoryChartData) -> Markup;

    /// URLs of scripts the page must load before any chart is rendered.
    fn head_scripts(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Draws charts in the browser with ECharts.
#[derive(Debug, Clone, Copy, Default)]
pub struct EChartsRenderer;

/// The URL of the ECharts script the page must load for [EChartsRenderer].
pub const ECHARTS_SCRIPT_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@5.6.0/dist/echarts.min.js";

impl ChartRenderer for EChartsRenderer {
    fn render(&self, data: &CategoryChartData) -> Markup {
        let options = expense_chart(data).to_string();

        html!(
            div id=(CHART_ID) class="w-full min-h-[320px] rounded dark:bg-gray-100" {}
            script { (PreEscaped(chart_script(CHART_ID, &options))) }
        )
    }

    fn head_scripts(&self) -> Vec<String> {
        vec![ECHARTS_SCRIPT_URL.to_owned()]
    }
}

fn expense_chart(data: &CategoryChartData) -> Chart {
    let points: Vec<(f64, &str)> = data
        .values
        .iter()
        .copied()
        .zip(data.labels.iter().map(String::as_str))
        .collect();

    Chart::new()
        .color(data.colors().into_iter().map(Color::from).collect())
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .formatter(percentage_tooltip()),
        )
        .legend(
            Legend::new()
                .orient(Orient::Vertical)
                .right("0")
                .top("middle"),
        )
        .series(
            Pie::new()
                .name("Expenses")
                .radius(vec!["45%", "70%"])
                .center(vec!["40%", "50%"])
                .item_style(ItemStyle::new().border_color("#fff").border_width(1))
                .label(Label::new().show(false))
                .data(points),
        )
}

/// Shows the category, its total and its share of all expenses.
fn percentage_tooltip() -> JsFunction {
    JsFunction::new_with_args(
        "params",
        &format!(
            "return params.name + ': {CURRENCY_SYMBOL}' + params.value.toFixed(2) \
                + ' (' + Math.round(params.percent) + '%)';"
        ),
    )
}

/// Draws the chart into the element `id`, disposing of any chart already
/// bound to that element first.
fn chart_script(id: &str, options: &str) -> String {
    format!(
        r#"(function() {{
            const chartDom = document.getElementById("{id}");
            const previous = echarts.getInstanceByDom(chartDom);
            if (previous) {{
                previous.dispose();
            }}

            const chart = echarts.init(chartDom);
            chart.setOption({options});

            if (window.ledgerChartResize) {{
                window.removeEventListener('resize', window.ledgerChartResize);
            }}
            window.ledgerChartResize = () => chart.resize();
            window.addEventListener('resize', window.ledgerChartResize);
        }})();"#
    )
}
