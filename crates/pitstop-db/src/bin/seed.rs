//! # Seed Data Generator
//!
//! Populates the database with sample front-desk data for development.
//!
//! ## Usage
//! ```bash
//! # Generate 25 customers with a handful of orders each (default)
//! cargo run -p pitstop-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p pitstop-db --bin seed -- --count 100
//!
//! # Specify database path
//! cargo run -p pitstop-db --bin seed -- --db ./data/pitstop.db
//! ```
//!
//! ## Generated Data
//! Creates a mix of customer classifications with vehicles, plus orders
//! across the three order types. Roughly a third of the orders are
//! completed so job cards and invoices exist to look at.

use chrono::Utc;
use std::env;

use pitstop_core::{
    ident, ConsultationDetails, Customer, CustomerType, OrderDetails, Priority, ServiceDetails,
    TireSalesDetails, CUSTOMER_ID_PREFIX,
};
use pitstop_db::{Database, DbConfig, NewOrder, OrderFilter};

const NAMES: &[&str] = &[
    "Jane Mwangi",
    "Peter Okello",
    "Amina Hassan",
    "Joseph Kato",
    "Grace Nakimuli",
    "David Ouma",
    "Sarah Achieng",
    "Moses Ssemakula",
    "Esther Wanjiru",
    "Brian Odhiambo",
];

const MAKES: &[(&str, &str)] = &[
    ("Toyota", "Hiace"),
    ("Toyota", "Corolla"),
    ("Nissan", "Hardbody"),
    ("Isuzu", "D-Max"),
    ("Mitsubishi", "Canter"),
    ("Honda", "Fit"),
];

const SERVICE_TYPES: &[&str] = &[
    "car-service",
    "car-wash",
    "tire-sales",
    "wheel-alignment",
    "consultation",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Quiet by default; RUST_LOG=debug shows the repository logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 25;
    let mut db_path = String::from("./pitstop_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(25);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Pitstop Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of customers to generate (default: 25)");
                println!("  -d, --db <PATH>    Database file path (default: ./pitstop_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Pitstop Seed Data Generator");
    println!("==============================");
    println!("Database:  {}", db_path);
    println!("Customers: {}", count);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing customers
    let existing = db.customers().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} customers", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating customers and orders...");

    let start = std::time::Instant::now();
    let mut orders_created = 0;
    let mut orders_completed = 0;

    for n in 0..count {
        let customer = generate_customer(n);
        db.customers().insert(&customer).await?;

        // One to three orders per customer
        for k in 0..(n % 3 + 1) {
            let new_order = generate_order(&customer.id, n + k);
            let record = db.orders().create(new_order).await?;
            orders_created += 1;

            // Complete roughly a third so documents exist
            if (n + k) % 3 == 0 {
                db.orders()
                    .set_status(&record.order.id, pitstop_core::OrderStatus::Completed)
                    .await?;
                orders_completed += 1;
            }
        }
    }

    let elapsed = start.elapsed();
    let active = db.orders().list(&OrderFilter::default()).await?.len();

    println!();
    println!("✓ Seeded {} customers", count);
    println!("✓ Created {} orders ({} completed)", orders_created, orders_completed);
    println!("✓ {} orders in the default listing", active);
    println!("✓ Done in {:.2}s", elapsed.as_secs_f64());

    db.close().await;
    Ok(())
}

fn generate_customer(n: usize) -> Customer {
    let customer_type = match n % 5 {
        0 => CustomerType::Personal,
        1 => CustomerType::Company,
        2 => CustomerType::Bodaboda,
        3 => CustomerType::Government,
        _ => CustomerType::Ngo,
    };

    Customer {
        id: ident::opaque_id(CUSTOMER_ID_PREFIX),
        name: NAMES[n % NAMES.len()].to_string(),
        phone: format!("+25570{:07}", n),
        email: format!("customer{}@example.com", n),
        address: String::new(),
        customer_type,
        organization_name: if customer_type == CustomerType::Company {
            "Acme Transport Ltd".to_string()
        } else {
            String::new()
        },
        tax_number: String::new(),
        personal_subtype: if customer_type == CustomerType::Personal {
            "owner".to_string()
        } else {
            String::new()
        },
        notes: String::new(),
        total_visits: 0,
        total_spent_cents: 0,
        last_visit: None,
        created_at: Utc::now(),
    }
}

fn generate_order(customer_id: &str, n: usize) -> NewOrder {
    let service_type = SERVICE_TYPES[n % SERVICE_TYPES.len()];
    let (make, model) = MAKES[n % MAKES.len()];

    // Only the offerings that carry a detail record get one
    let details = match service_type {
        "car-service" => Some(OrderDetails::Service(ServiceDetails {
            plate_number: format!("UAX {:03}K", n % 900 + 100),
            vehicle_make: make.to_string(),
            vehicle_model: model.to_string(),
            vehicle_type: "sedan".to_string(),
            problem_description: "routine check".to_string(),
            services_selected: vec!["oil-change".to_string(), "brake-check".to_string()],
        })),
        "tire-sales" => Some(OrderDetails::TireSales(TireSalesDetails {
            item_name: "Radial 195/65R15".to_string(),
            brand: "Yana".to_string(),
            quantity: (n % 4 + 1) as i64,
            tire_condition: "new".to_string(),
        })),
        "consultation" => Some(OrderDetails::Consultation(ConsultationDetails {
            inquiry_type: "general".to_string(),
            questions: "fleet service rates".to_string(),
            contact_preference: "phone".to_string(),
            follow_up_date: None,
        })),
        _ => None,
    };

    NewOrder {
        id: None,
        customer_id: customer_id.to_string(),
        service_type: service_type.to_string(),
        priority: Priority::Normal,
        description: format!("seeded order {}", n),
        estimated_duration_min: 60 + (n as i64 % 4) * 30,
        details,
    }
}
