//! Defines the endpoints for reading customers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::{
    Error, customer::Customer, database_id::CustomerId, ledger::Ledger,
    stores::sqlite::SQLiteCustomerStore,
};

/// The query parameters for searching customers.
#[derive(Debug, Default, Deserialize)]
pub struct CustomerSearch {
    /// Case-insensitive text to find in the customer's name or phone number.
    pub search: Option<String>,
}

/// A route handler that responds with every customer and their ledgers,
/// optionally narrowed down by `?search=`.
pub async fn list_customers_endpoint(
    State(ledger): State<Ledger<SQLiteCustomerStore>>,
    Query(query): Query<CustomerSearch>,
) -> Result<Json<Vec<Customer>>, Error> {
    let customers = ledger.list_customers()?;

    Ok(Json(filter_customers(customers, query.search.as_deref())))
}

/// A route handler that responds with a single customer and its ledger.
pub async fn get_customer_endpoint(
    State(ledger): State<Ledger<SQLiteCustomerStore>>,
    Path(customer_id): Path<CustomerId>,
) -> Result<Json<Customer>, Error> {
    ledger.get_customer(customer_id).map(Json)
}

/// Keep the customers whose name or phone contains `search`, ignoring case.
///
/// A missing or blank search keeps every customer.
pub(crate) fn filter_customers(customers: Vec<Customer>, search: Option<&str>) -> Vec<Customer> {
    let search = match search.map(str::trim) {
        None | Some("") => return customers,
        Some(search) => search.to_lowercase(),
    };

    customers
        .into_iter()
        .filter(|customer| {
            customer.name.to_lowercase().contains(&search)
                || customer.phone.to_lowercase().contains(&search)
        })
        .collect()
}

#[cfg(test)]
mod filter_customers_tests {
    use crate::test_utils::customer_with;

    use super::filter_customers;

    fn customers() -> Vec<crate::customer::Customer> {
        let mut asha = customer_with(&[]);
        asha.name = "Asha Traders".to_owned();
        asha.phone = "98450 11111".to_owned();

        let mut ravi = customer_with(&[]);
        ravi.id = 2;
        ravi.name = "Ravi Stores".to_owned();
        ravi.phone = "99000 22222".to_owned();

        vec![asha, ravi]
    }

    #[test]
    fn blank_search_keeps_everyone() {
        assert_eq!(filter_customers(customers(), None).len(), 2);
        assert_eq!(filter_customers(customers(), Some("  ")).len(), 2);
    }

    #[test]
    fn matches_name_ignoring_case() {
        let got = filter_customers(customers(), Some("rAVI"));

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].name, "Ravi Stores");
    }

    #[test]
    fn matches_phone() {
        let got = filter_customers(customers(), Some("11111"));

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].name, "Asha Traders");
    }

    #[test]
    fn no_match_is_empty() {
        assert!(filter_customers(customers(), Some("nobody")).is_empty());
    }
}
