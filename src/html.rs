use maud::{DOCTYPE, Markup, html};
use rust_decimal::{Decimal, RoundingStrategy};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

// Link styles
pub const LINK_STYLE: &str = "text-blue-600 hover:text-blue-500 \
    dark:text-blue-500 dark:hover:text-blue-400 underline";

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "px-4 py-2 bg-blue-500 \
    dark:bg-blue-600 disabled:bg-blue-700 hover:enabled:bg-blue-600 \
    hover:enabled:dark:bg-blue-700 text-white rounded";

// Form styles
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium text-gray-900 dark:text-white";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white disabled:text-gray-500 bg-gray-50 \
    dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    dark:placeholder-gray-400 focus:ring-blue-600 focus:border-blue-600 \
    focus:dark:border-blue-500 focus:dark:ring-blue-500";

// Table styles
pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

// Transaction type badge style
pub const TYPE_BADGE_STYLE: &str = "inline-flex items-center px-2.5 py-0.5 \
    text-xs font-semibold text-blue-800 bg-blue-100 rounded-full \
    dark:bg-blue-900 dark:text-blue-300";

// Page container
pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white";

/// The document shell shared by every page.
pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Credit Manager" }
                script src="https://cdn.tailwindcss.com" {}
            }

            body class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900"
            {
                (content)
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
                        "Back to Homepage"
                    }
                }
            }
        }
    );

    base(title, &content)
}

/// Format `amount` with `decimal_places` digits after the point and Indian
/// digit grouping, e.g. 1234567.891 with two places is "12,34,567.89".
///
/// Midpoints round away from zero.
pub fn format_indian_number(amount: Decimal, decimal_places: u32) -> String {
    let rounded =
        amount.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = format!("{:.*}", decimal_places as usize, rounded.abs());

    let (integer, fraction) = match digits.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (digits.as_str(), None),
    };

    let grouped = group_indian(integer);

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Insert commas after the thousands and then every two digits, the way
/// lakh and crore amounts are written.
fn group_indian(integer: &str) -> String {
    if integer.len() <= 3 {
        return integer.to_owned();
    }

    let (head, thousands) = integer.split_at(integer.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;

    while rest.len() > 2 {
        let (front, group) = rest.split_at(rest.len() - 2);
        groups.push(group);
        rest = front;
    }

    groups.push(rest);
    groups.reverse();
    groups.push(thousands);

    groups.join(",")
}

/// Format `amount` as rupees with two decimal places, e.g. "₹1,23,456.50".
pub fn format_rupees(amount: Decimal) -> String {
    with_rupee_symbol(format_indian_number(amount, 2))
}

/// Format `amount` as whole rupees, e.g. "₹1,23,457".
pub fn format_rupees_rounded(amount: Decimal) -> String {
    with_rupee_symbol(format_indian_number(amount, 0))
}

fn with_rupee_symbol(number: String) -> String {
    match number.strip_prefix('-') {
        Some(number) => format!("-₹{number}"),
        None => format!("₹{number}"),
    }
}

/// Creates a span with `amount` in whole rupees and a tooltip (title) that
/// shows `amount` to two decimal places.
pub fn rupees_rounded_with_tooltip(amount: Decimal) -> Markup {
    html!(
        span title=(format_rupees(amount)) { (format_rupees_rounded(amount)) }
    )
}

const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[month repr:short] [day padding:zero], [year]");

/// Format `date` like "Oct 05, 2025".
pub fn format_date(date: Date) -> String {
    date.format(DISPLAY_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}
