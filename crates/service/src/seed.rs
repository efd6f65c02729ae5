//! Demo customers and products for local development.
//!
//! Rows are created through the resource services, so they pass the same
//! validation as API writes. Rows whose unique key already exists are
//! skipped, which makes loading repeatable.

use tracing::{debug, info};

use crate::errors::ServiceError;
use crate::resource::customer::{CustomerInput, CustomerService, Customers};
use crate::resource::product::{ProductInput, ProductService, Products};
use crate::resource::ResourceRepository;

/// Outcome of one seeding run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    pub skipped: usize,
}

impl SeedReport {
    fn record(&mut self, outcome: Result<(), ServiceError>) -> Result<(), ServiceError> {
        match outcome {
            Ok(()) => self.inserted += 1,
            Err(ServiceError::Duplicate(msg)) => {
                debug!(reason = %msg, "demo row already present");
                self.skipped += 1;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }
}

fn customer(name: &str, email: &str, company: &str, city: &str, country: &str) -> CustomerInput {
    CustomerInput {
        name: Some(name.into()),
        email: Some(email.into()),
        company: Some(company.into()),
        city: Some(city.into()),
        country: Some(country.into()),
        ..Default::default()
    }
}

fn product(name: &str, sku: &str, category: &str, price: f64, cost: f64, stock: i64) -> ProductInput {
    ProductInput {
        name: Some(name.into()),
        sku: Some(sku.into()),
        category: Some(category.into()),
        price: Some(price),
        cost: Some(cost),
        stock_quantity: Some(stock),
        ..Default::default()
    }
}

pub fn demo_customers() -> Vec<CustomerInput> {
    vec![
        customer("Aiko Tanaka", "aiko.tanaka@example.com", "Tanaka Trading", "Osaka", "Japan"),
        customer("Liam Walsh", "liam.walsh@example.com", "Walsh & Sons", "Dublin", "Ireland"),
        customer("Sofia Rossi", "sofia.rossi@example.com", "Rossi Design", "Milan", "Italy"),
        customer("Noah Becker", "noah.becker@example.com", "Becker GmbH", "Hamburg", "Germany"),
        customer("Emma Clark", "emma.clark@example.com", "Clark Retail", "Austin", "USA"),
    ]
}

pub fn demo_products() -> Vec<ProductInput> {
    vec![
        product("Wireless Mouse", "ELEC-001", "Electronics", 29.99, 12.50, 150),
        product("Mechanical Keyboard", "ELEC-002", "Electronics", 89.99, 45.00, 80),
        product("27\" Monitor", "ELEC-003", "Electronics", 249.00, 170.00, 25),
        product("Office Chair", "FURN-001", "Furniture", 199.00, 110.00, 40),
        product("Standing Desk", "FURN-002", "Furniture", 449.00, 260.00, 12),
        product("A4 Paper (500 sheets)", "SUPP-001", "Supplies", 6.49, 3.10, 500),
    ]
}

/// Insert the demo rows that are not present yet.
pub async fn seed_demo_data<CR, PR>(
    customers: &CustomerService<CR>,
    products: &ProductService<PR>,
) -> Result<SeedReport, ServiceError>
where
    CR: ResourceRepository<Customers>,
    PR: ResourceRepository<Products>,
{
    let mut report = SeedReport::default();
    for input in demo_customers() {
        report.record(customers.create(input).await.map(|_| ()))?;
    }
    for input in demo_products() {
        report.record(products.create(input).await.map(|_| ()))?;
    }
    info!(inserted = report.inserted, skipped = report.skipped, "demo data seeded");
    Ok(report)
}
