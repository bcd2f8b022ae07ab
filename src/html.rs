use maud::{DOCTYPE, Markup, html};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

/// The symbol shown in front of every amount of money.
pub const CURRENCY_SYMBOL: &str = "₽";

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "w-full px-4 py-2 bg-blue-500
    dark:bg-blue-600 disabled:bg-blue-700 hover:enabled:bg-blue-600 \
    hover:enabled:dark:bg-blue-700 text-white rounded";

pub const BUTTON_DELETE_STYLE: &str = "px-2 text-lg leading-none text-red-600 \
    hover:text-red-500 dark:text-red-500 dark:hover:text-red-400 bg-transparent \
    border-none cursor-pointer";

// Form styles
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium text-gray-900 dark:text-white";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white disabled:text-gray-500 bg-gray-50 \
    dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    dark:placeholder-gray-400 focus:ring-blue-600 focus:border-blue-600 \
    focus:dark:border-blue-500 focus:dark:ring-blue-500";

// Card styles
pub const CARD_STYLE: &str = "w-full p-4 rounded bg-white dark:bg-gray-800 shadow";

// Page container
pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white";

pub enum HeadElement {
    /// The file path or URL to a JavaScript script.
    ScriptLink(String),
}

/// The page layout shared by every full page.
///
/// `alert` is shown in the alert container when the page loads, e.g. a
/// notification that is still visible from the previous request.
pub fn base(
    title: &str,
    head_elements: &[HeadElement],
    content: &Markup,
    alert: Option<Markup>,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Pocket Ledger" }
                script src="https://cdn.tailwindcss.com" {}
                script src="https://unpkg.com/htmx.org@2.0.8/dist/htmx.min.js" {}
                script src="https://unpkg.com/htmx-ext-response-targets@2.0.4/response-targets.js" {}

                style
                {
                    r#"
                    .echarts-tooltip {
                        z-index: 30 !important;
                    }
                    "#
                }

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::ScriptLink(path) => script src=(path) {}
                    }
                }

                script src="/static/app.js" defer {}
            }

            body
                hx-ext="response-targets"
                class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900"
            {
                (content)

                // Alert container for out-of-band swaps
                div
                    id="alert-container"
                    class="w-full max-w-md px-4"
                    style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
                {
                    @if let Some(alert) = alert {
                        (alert)
                    }
                }
            }
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    // Template adapted from https://flowbite.com/blocks/marketing/404/
    let content = html!(
        section class="bg-white dark:bg-gray-900"
        {
            div class="py-8 px-4 mx-auto max-w-screen-xl lg:py-16 lg:px-6"
            {
                div class="mx-auto max-w-screen-sm text-center"
                {
                    h1
                        class="mb-4 text-7xl tracking-tight font-extrabold
                            lg:text-9xl text-blue-600 dark:text-blue-500"
                    {
                        (header)
                    }

                    p
                        class="mb-4 text-3xl md:text-4xl tracking-tight
                            font-bold text-gray-900 dark:text-white"
                    {
                        (description)
                    }

                    p
                        class="mb-4 text-1xl md:text-2xl tracking-tight
                            text-gray-900 dark:text-white"
                    {
                        (fix)
                    }

                    a
                        href="/"
                        class="inline-flex text-white bg-blue-600
                            hover:bg-blue-800 focus:ring-4 focus:outline-hidden
                            focus:ring-blue-300 font-medium rounded text-sm px-5
                            py-2.5 text-center dark:focus:ring-blue-900 my-4"
                    {
                        "Back to Ledger"
                    }
                }
            }
        }
    );

    base(title, &[], &content, None)
}

/// Format `number` as money with exactly two decimal places, e.g. "₽1234.50"
/// or "-₽12.00".
pub fn format_currency(number: f64) -> String {
    // Round first so that tiny negative values do not render as "-₽0.00".
    let rounded = (number * 100.0).round() / 100.0;

    if rounded < 0.0 {
        format!("-{CURRENCY_SYMBOL}{:.2}", rounded.abs())
    } else {
        format!("{CURRENCY_SYMBOL}{:.2}", rounded.abs())
    }
}

const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[day].[month].[year]");

/// Format `date` for display, e.g. "02.01.2024".
pub fn format_date(date: Date) -> String {
    date.format(DISPLAY_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{format_currency, format_date};

    #[test]
    fn formats_currency_with_two_decimals() {
        assert_eq!(format_currency(0.0), "₽0.00");
        assert_eq!(format_currency(500.0), "₽500.00");
        assert_eq!(format_currency(12.3), "₽12.30");
        assert_eq!(format_currency(1234.567), "₽1234.57");
        assert_eq!(format_currency(-12.0), "-₽12.00");
    }

    #[test]
    fn formats_tiny_negative_as_zero() {
        assert_eq!(format_currency(-0.001), "₽0.00");
        assert_eq!(format_currency(0.1 + 0.2 - 0.3), "₽0.00");
    }

    #[test]
    fn formats_date_day_first() {
        assert_eq!(format_date(date!(2024 - 01 - 02)), "02.01.2024");
    }
}
