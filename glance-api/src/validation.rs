//! Request body validation
//!
//! Shape-only checks: required fields present and non-empty, correct JSON
//! types. Anything semantic (name syntax, port ranges, selector rules) is
//! left to the Kubernetes API server, whose rejection comes back as a
//! remote error.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::kubernetes::types::{
    CreateConfigMapRequest, CreateDeploymentRequest, CreateIngressRequest, CreateSecretRequest,
    CreateServiceRequest, UpdateConfigMapRequest, UpdateDeploymentRequest, UpdateIngressRequest,
    UpdateSecretRequest, UpdateServiceRequest,
};

/// Validation result type
pub type ValidationResult = Result<(), String>;

/// Shape check run after deserialization
pub trait Validate {
    fn validate(&self) -> ValidationResult {
        Ok(())
    }
}

fn required(field: &str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(format!("field '{}' is required", field));
    }
    Ok(())
}

fn non_empty<T>(field: &str, items: &[T]) -> ValidationResult {
    if items.is_empty() {
        return Err(format!("field '{}' must not be empty", field));
    }
    Ok(())
}

fn non_negative(field: &str, value: i32) -> ValidationResult {
    if value < 0 {
        return Err(format!("field '{}' must not be negative", field));
    }
    Ok(())
}

impl Validate for CreateDeploymentRequest {
    fn validate(&self) -> ValidationResult {
        required("name", &self.name)?;
        required("image", &self.image)?;
        non_negative("replicas", self.replicas)?;
        for var in self.env_vars.iter().flatten() {
            required("envVars.name", &var.name)?;
        }
        Ok(())
    }
}

impl Validate for UpdateDeploymentRequest {
    fn validate(&self) -> ValidationResult {
        if let Some(replicas) = self.replicas {
            non_negative("replicas", replicas)?;
        }
        Ok(())
    }
}

impl Validate for CreateServiceRequest {
    fn validate(&self) -> ValidationResult {
        required("name", &self.name)?;
        required("type", &self.service_type)?;
        non_empty("ports", &self.ports)?;
        if self.selector.is_empty() {
            return Err("field 'selector' must not be empty".to_string());
        }
        Ok(())
    }
}

impl Validate for UpdateServiceRequest {}

impl Validate for CreateConfigMapRequest {
    fn validate(&self) -> ValidationResult {
        required("name", &self.name)
    }
}

impl Validate for UpdateConfigMapRequest {}

impl Validate for CreateSecretRequest {
    fn validate(&self) -> ValidationResult {
        required("name", &self.name)
    }
}

impl Validate for UpdateSecretRequest {}

impl Validate for CreateIngressRequest {
    fn validate(&self) -> ValidationResult {
        required("name", &self.name)?;
        non_empty("rules", &self.rules)?;
        for rule in &self.rules {
            non_empty("rules.paths", &rule.paths)?;
            for path in &rule.paths {
                required("rules.paths.path", &path.path)?;
                required("rules.paths.pathType", &path.path_type)?;
                required("rules.paths.serviceName", &path.service_name)?;
            }
        }
        Ok(())
    }
}

impl Validate for UpdateIngressRequest {}

/// JSON body extractor that maps every failure to 400
///
/// Deserialization errors and [`Validate`] failures are both reported as
/// `Invalid request format: <detail>`.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| invalid_format(rejection.body_text()))?;

        value.validate().map_err(invalid_format)?;

        Ok(ValidJson(value))
    }
}

fn invalid_format(detail: String) -> ApiError {
    ApiError::BadRequest(format!("Invalid request format: {}", detail))
}
