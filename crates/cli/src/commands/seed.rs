//! `products seed`: create products from a YAML file.
//!
//! The file is a YAML list of product drafts:
//!
//! ```yaml
//! - title: Trail Runner
//!   price: 89.99
//!   stock: 25
//!   SKU: TR-001
//!   category: Shoes
//!   gender: Men
//!   tags: [running, trail]
//! ```
//!
//! Fields other than `title` and `price` may be omitted.

use std::path::Path;

use ark_admin::backend::AdminBackend;
use ark_core::{BackendCookie, ProductDraft};
use tracing::{error, info};

use super::CliError;

/// Outcome of a seed run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub created: usize,
    pub failed: usize,
}

/// Parse a seed file body.
///
/// # Errors
///
/// Returns an error if the body is not a YAML list of drafts.
pub fn parse(content: &str) -> Result<Vec<ProductDraft>, CliError> {
    Ok(serde_yaml::from_str(content)?)
}

/// Problems that make a draft pointless to send.
#[must_use]
pub fn validate(drafts: &[ProductDraft]) -> Vec<String> {
    drafts
        .iter()
        .enumerate()
        .flat_map(|(i, draft)| {
            let mut problems = Vec::new();
            if draft.title.trim().is_empty() {
                problems.push(format!("entry {}: title is empty", i + 1));
            }
            if draft.stock < 0 {
                problems.push(format!("entry {}: stock is negative", i + 1));
            }
            problems
        })
        .collect()
}

/// Create each draft in order. A failure is logged and the run continues.
pub async fn create_all(
    backend: &AdminBackend,
    jar: &mut BackendCookie,
    drafts: &[ProductDraft],
) -> SeedReport {
    let mut report = SeedReport::default();
    for draft in drafts {
        match backend.create_product(draft, jar).await {
            Ok(()) => {
                info!(title = %draft.title, "Created product");
                report.created += 1;
            }
            Err(e) => {
                error!(title = %draft.title, "Failed to create product: {e}");
                report.failed += 1;
            }
        }
    }
    report
}

/// Seed products from `file`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, fails validation,
/// or the login fails. Individual create failures only count towards
/// [`SeedReport::failed`].
pub async fn products(file: &Path, dry_run: bool) -> Result<(), CliError> {
    info!(path = %file.display(), "Loading products from file");

    let content = tokio::fs::read_to_string(file)
        .await
        .map_err(|source| CliError::Io {
            path: file.display().to_string(),
            source,
        })?;
    let drafts = parse(&content)?;
    info!(products = drafts.len(), "Parsed seed file");

    let problems = validate(&drafts);
    if !problems.is_empty() {
        error!("Seed file validation failed:");
        for problem in &problems {
            error!("  - {problem}");
        }
        return Err(CliError::Invalid(problems.len()));
    }

    if dry_run {
        for draft in &drafts {
            info!(title = %draft.title, price = %draft.price, "Would create product");
        }
        info!("Dry run complete, nothing created");
        return Ok(());
    }

    let mut session = super::connect().await?;
    let report = create_all(&session.backend, &mut session.jar, &drafts).await;

    info!("Seeding complete!");
    info!("  Created: {}", report.created);
    info!("  Failed: {}", report.failed);

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use ark_core::{Email, Gender};
    use secrecy::SecretString;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const SEED: &str = r"
- title: Trail Runner
  price: 89.99
  discountPrice: 79.99
  stock: 25
  SKU: TR-001
  category: Shoes
  gender: Men
  tags: [running, trail]
- title: Kids Cap
  price: 12
";

    #[test]
    fn test_parse_fills_defaults() {
        let drafts = parse(SEED).unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].sku, "TR-001");
        assert_eq!(drafts[0].gender, Gender::Men);
        assert!(drafts[0].discount_price.is_some());
        assert_eq!(drafts[1].stock, 0);
        assert_eq!(drafts[1].gender, Gender::Unisex);
        assert!(drafts[1].tags.is_empty());
    }

    #[test]
    fn test_parse_rejects_non_list() {
        assert!(parse("title: Lonely").is_err());
    }

    #[test]
    fn test_validate_reports_each_entry() {
        let mut drafts = parse(SEED).unwrap();
        assert!(validate(&drafts).is_empty());

        drafts[1].title = "  ".to_string();
        drafts[1].stock = -1;
        let problems = validate(&drafts);
        assert_eq!(problems.len(), 2);
        assert!(problems[0].starts_with("entry 2"));
    }

    #[tokio::test]
    async fn test_create_all_counts_failures_and_continues() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/admin/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "jwt=abc; Path=/")
                    .set_body_json(json!({"_id": "a1", "name": "Root", "email": "root@ark.shop"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/admin/products"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/admin/products"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"_id": "p1"})))
            .mount(&server)
            .await;

        let backend = AdminBackend::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let email = Email::parse("root@ark.shop").unwrap();
        let password = SecretString::from("pw".to_string());
        let mut session = super::super::login(backend, &email, &password).await.unwrap();
        assert!(!session.jar.is_empty());

        let drafts = parse(SEED).unwrap();
        let report = create_all(&session.backend, &mut session.jar, &drafts).await;
        assert_eq!(report, SeedReport { created: 1, failed: 1 });
    }
}
