use url::Url;
use worker::{Cors, Env, Method};

use crate::error::ApiError;
use crate::models::{DEFAULT_ALLOWED_ORIGIN, DEFAULT_CLASSIFIER_MODEL, DEFAULT_CLASSIFIER_URL};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub classifier_url: Url,
    pub classifier_model: String,
    pub api_key: Option<String>,
    pub allowed_origin: String,
}

impl AppConfig {
    pub fn from_env(env: &Env) -> Result<Self, ApiError> {
        Self::from_lookup(env_lookup(env))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let classifier_url = non_empty("CLASSIFIER_URL")
            .unwrap_or_else(|| DEFAULT_CLASSIFIER_URL.to_string());

        Ok(Self {
            classifier_url: Url::parse(&classifier_url)?,
            classifier_model: non_empty("CLASSIFIER_MODEL")
                .unwrap_or_else(|| DEFAULT_CLASSIFIER_MODEL.to_string()),
            api_key: non_empty("OPENAI_API_KEY"),
            allowed_origin: allowed_origin_from_lookup(&lookup),
        })
    }

    pub fn cors(&self) -> Cors {
        cors_for_origin(&self.allowed_origin)
    }
}

/// Reads plain vars first, then secrets, for every binding.
pub fn env_lookup(env: &Env) -> impl Fn(&str) -> Option<String> + '_ {
    move |name: &str| {
        env.var(name)
            .map(|value| value.to_string())
            .or_else(|_| env.secret(name).map(|value| value.to_string()))
            .ok()
    }
}

/// The CORS origin on its own, so responses still carry it when the rest
/// of the configuration is invalid.
pub fn allowed_origin_from_lookup<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup("ALLOWED_ORIGIN")
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string())
}

pub fn cors_for_origin(origin: &str) -> Cors {
    Cors::new()
        .with_origins(vec![origin.to_string()])
        .with_methods(vec![Method::Get, Method::Post, Method::Options])
        .with_allowed_headers(vec!["Content-Type"])
        .with_max_age(86_400)
}
