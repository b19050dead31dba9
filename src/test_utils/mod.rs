#![allow(missing_docs, dead_code)]

pub(crate) mod html;
pub(crate) mod http;
pub(crate) mod ledger;

pub(crate) use html::{assert_valid_html, must_get_text, parse_html_document, table_body_text};
pub(crate) use http::{assert_content_type, assert_status_ok, get_body_text, get_header};
pub(crate) use ledger::{
    FIRST_DATE, customer_with, get_test_connection, get_test_ledger, input, transaction,
    transactions,
};
