use url::Url;

use crate::{FailureKind, ServiceError};

pub const EXTRACT_PATH: &str = "extract";
pub const COUNTS_PATH: &str = "fhir/resources/count";
pub const RESOURCES_PATH: &str = "fhir/resources";
pub const VALIDATE_URLS_PATH: &str = "fhir/resources/validate-urls";
pub const CSV_EXPORT_PATH: &str = "fhir/resources/export/csv";

/// Absolute URLs of every remote operation, resolved once against the base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    base: Url,
    extract: Url,
    counts: Url,
    resources: Url,
    validate_urls: Url,
    csv_export: Url,
}

impl ServiceEndpoints {
    /// Any path on the base is kept as a prefix: `http://host/api` serves
    /// `http://host/api/extract`.
    pub fn new(base_url: &str) -> Result<Self, ServiceError> {
        let mut base = Url::parse(base_url.trim())
            .map_err(|err| ServiceError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ServiceError::new(
                FailureKind::InvalidUrl,
                format!("unsupported scheme {}", base.scheme()),
            ));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.set_query(None);
        base.set_fragment(None);

        let join = |path: &str| {
            base.join(path)
                .map_err(|err| ServiceError::new(FailureKind::InvalidUrl, err.to_string()))
        };
        Ok(Self {
            extract: join(EXTRACT_PATH)?,
            counts: join(COUNTS_PATH)?,
            resources: join(RESOURCES_PATH)?,
            validate_urls: join(VALIDATE_URLS_PATH)?,
            csv_export: join(CSV_EXPORT_PATH)?,
            base,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn extract(&self) -> &Url {
        &self.extract
    }

    pub fn counts(&self) -> &Url {
        &self.counts
    }

    pub fn resources(&self) -> &Url {
        &self.resources
    }

    pub fn validate_urls(&self) -> &Url {
        &self.validate_urls
    }

    /// Direct link to the tabular export; the service streams the file.
    pub fn csv_export(&self) -> &Url {
        &self.csv_export
    }
}
