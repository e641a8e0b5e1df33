//! # Seed Data Generator
//!
//! Populates a collection file with test customers for development.
//!
//! ## Usage
//! ```bash
//! # Generate 500 customers (default)
//! cargo run -p atrium-service --bin seed
//!
//! # Generate custom amount
//! cargo run -p atrium-service --bin seed -- --count 2000
//!
//! # Specify data file
//! cargo run -p atrium-service --bin seed -- --data ./data/dev.json
//! ```
//!
//! ## Generated Customers
//! Even indexes are people with a CPF, odd indexes are companies with a
//! CNPJ. Every tax id carries correct check digits, and every record goes
//! through `CustomerService::create`, so the seeded file only holds data
//! the service itself would accept.

use std::env;
use std::path::PathBuf;

use atrium_core::taxid::{cnpj_check_digits, cpf_check_digits, format_tax_id};
use atrium_core::CustomerPayload;
use atrium_service::{telemetry, CustomerService, ServiceConfig};

const FIRST_NAMES: &[&str] = &[
    "Ana", "Bruno", "Camila", "Diego", "Eduarda", "Felipe", "Gabriela", "Henrique", "Isabela",
    "João", "Larissa", "Marcos", "Natália", "Otávio", "Paula", "Rafael", "Sofia", "Tiago",
];

const LAST_NAMES: &[&str] = &[
    "Silva", "Santos", "Oliveira", "Souza", "Lima", "Pereira", "Costa", "Araújo", "Ribeiro",
    "Almeida", "Carvalho", "Gomes",
];

const COMPANY_WORDS: &[&str] = &[
    "Acme", "Horizonte", "Aurora", "Atlântico", "Serra", "Vértice", "Prisma", "Lumen", "Delta",
];

const COMPANY_KINDS: &[&str] = &["Comércio", "Tecnologia", "Logística", "Alimentos", "Serviços"];

const CITIES: &[(&str, &str, &str)] = &[
    ("São Paulo", "SP", "11"),
    ("Rio de Janeiro", "RJ", "21"),
    ("Belo Horizonte", "MG", "31"),
    ("Curitiba", "PR", "41"),
    ("Porto Alegre", "RS", "51"),
    ("Recife", "PE", "81"),
];

const STATUSES: &[&str] = &["active", "active", "active", "lead", "inactive"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 500;
    let mut data_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(500);
                    i += 1;
                }
            }
            "--data" | "-d" => {
                if i + 1 < args.len() {
                    data_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--config" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Atrium Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>     Number of customers to generate (default: 500)");
                println!("  -d, --data <PATH>   Collection file (default: from config)");
                println!("      --config <PATH> Config file (default: platform config dir)");
                println!("  -h, --help          Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let mut config = ServiceConfig::load(config_path)?;
    if let Some(path) = data_path {
        config.storage.data_path = path;
    }
    telemetry::init(&config.logging.filter);

    println!("🌱 Atrium Seed Data Generator");
    println!("============================");
    println!("Data file: {}", config.storage.data_path.display());
    println!("Customers: {}", count);
    println!();

    let service = CustomerService::open(&config)?;
    println!("✓ Opened record store");

    // Check existing customers
    let existing = service.count().await;
    if existing > 0 {
        println!("⚠ Collection already has {} customers", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the data file to regenerate.");
        service.close();
        return Ok(());
    }

    println!();
    println!("Generating customers...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    for seed in 0..count {
        let payload = generate_customer(seed);

        if let Err(e) = service.create(payload).await {
            eprintln!("Failed to create customer #{}: {}", seed, e);
            continue;
        }

        generated += 1;

        if generated % 100 == 0 {
            println!("  Generated {} customers...", generated);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} customers in {:?}", generated, elapsed);
    println!(
        "  Rate: {:.0} customers/second",
        generated as f64 / elapsed.as_secs_f64()
    );

    // Spot-check the query path
    println!();
    println!("Verifying search...");
    let page = service
        .list(atrium_core::ListQuery::new().search("acme").limit(10))
        .await?;
    println!("  Search 'acme': {} matches", page.total);

    let page = service
        .list(atrium_core::ListQuery::new().status("lead"))
        .await?;
    println!("  Status 'lead': {} matches", page.total);

    service.close();

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds one customer payload from `seed`.
fn generate_customer(seed: usize) -> CustomerPayload {
    let (city, state, area_code) = CITIES[seed % CITIES.len()];
    let phone = format!("({}) 9{:04}-{:04}", area_code, (seed * 37) % 10_000, seed % 10_000);

    let base = if seed % 2 == 0 {
        let first = FIRST_NAMES[seed % FIRST_NAMES.len()];
        let last = LAST_NAMES[(seed / FIRST_NAMES.len()) % LAST_NAMES.len()];
        let slug = ascii_slug(&format!("{}.{}", first, last));

        CustomerPayload {
            tax_id: format_tax_id(&generate_cpf(seed)),
            ..CustomerPayload::new(
                format!("{} {}", first, last),
                format!("{}.{}@example.com", slug, seed),
            )
        }
    } else {
        let word = COMPANY_WORDS[seed % COMPANY_WORDS.len()];
        let kind = COMPANY_KINDS[(seed / COMPANY_WORDS.len()) % COMPANY_KINDS.len()];
        let name = format!("{} {} Ltda", word, kind);

        CustomerPayload {
            tax_id: format_tax_id(&generate_cnpj(seed)),
            company: Some(name.clone()),
            ..CustomerPayload::new(
                name,
                format!("contato{}@{}.com.br", seed, ascii_slug(word)),
            )
        }
    };

    CustomerPayload {
        phone: Some(phone),
        city: Some(city.to_string()),
        state: Some(state.to_string()),
        status: Some(STATUSES[seed % STATUSES.len()].to_string()),
        tags: Some(vec!["seed".to_string()]),
        ..base
    }
}

/// A valid CPF derived from `seed`.
fn generate_cpf(seed: usize) -> String {
    let mut base = spread_digits::<9>(seed as u64 * 7_919 + 104_729);

    // All-equal digit strings are never valid CPFs
    if base.iter().all(|&d| d == base[0]) {
        base[8] = (base[8] + 1) % 10;
    }

    let check = cpf_check_digits(base);
    digits_to_string(base.iter().chain(check.iter()))
}

/// A valid CNPJ (head office, branch 0001) derived from `seed`.
fn generate_cnpj(seed: usize) -> String {
    let root = spread_digits::<8>(seed as u64 * 6_131 + 10_007);

    let mut base = [0u8; 12];
    base[..8].copy_from_slice(&root);
    base[8..].copy_from_slice(&[0, 0, 0, 1]);

    let check = cnpj_check_digits(base);
    digits_to_string(base.iter().chain(check.iter()))
}

/// The last `N` decimal digits of `n`, most significant first.
fn spread_digits<const N: usize>(mut n: u64) -> [u8; N] {
    let mut digits = [0u8; N];
    for slot in digits.iter_mut().rev() {
        *slot = (n % 10) as u8;
        n /= 10;
    }
    digits
}

fn digits_to_string<'a>(digits: impl Iterator<Item = &'a u8>) -> String {
    digits.map(|d| char::from(b'0' + d)).collect()
}

/// Lowercase ASCII version of `s` for email local parts and domains.
fn ascii_slug(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'Á' | 'Â' => 'a',
            'é' | 'ê' | 'É' | 'Ê' => 'e',
            'í' | 'Í' => 'i',
            'ó' | 'ô' | 'õ' | 'Ó' => 'o',
            'ú' | 'Ú' => 'u',
            'ç' | 'Ç' => 'c',
            other => other,
        })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.')
        .collect::<String>()
        .to_lowercase()
}
