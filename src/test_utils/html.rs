use axum::{body::Body, response::Response};
use scraper::{ElementRef, Html, Selector};

pub(crate) async fn parse_html_document(response: Response<Body>) -> Html {
    let body = response.into_body();
    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Could not get response body");
    let text = String::from_utf8_lossy(&body).to_string();

    Html::parse_document(&text)
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}

/// Get the trimmed text of every cell (`th` or `td`) in each body row of the first table.
#[track_caller]
pub(crate) fn table_body_text(html: &Html) -> Vec<Vec<String>> {
    let table_selector = Selector::parse("table").unwrap();
    let row_selector = Selector::parse("tbody tr").unwrap();
    let cell_selector = Selector::parse("th, td").unwrap();

    let table = html
        .select(&table_selector)
        .next()
        .expect("Could not find table in HTML");

    table
        .select(&row_selector)
        .map(|row| {
            row.select(&cell_selector)
                .map(|cell| element_text(cell))
                .collect()
        })
        .collect()
}

/// Get the trimmed text of the first element matching `selector`.
#[track_caller]
pub(crate) fn must_get_text(html: &Html, selector: &str) -> String {
    let parsed_selector = Selector::parse(selector).unwrap();

    html.select(&parsed_selector)
        .next()
        .map(element_text)
        .unwrap_or_else(|| panic!("Could not find element matching {selector}"))
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
