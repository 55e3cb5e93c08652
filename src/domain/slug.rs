//! Slug derivation for store vanity URLs.
//!
//! Store names come from merchants and are not unique; the slug under which
//! a storefront is served must be. Derivation is pure, and uniqueness is
//! checked through an async predicate supplied by the caller so this module
//! stays free of persistence concerns.

use std::future::Future;

use slug::slugify;
use thiserror::Error;

const MAX_SUFFIX_ATTEMPTS: u32 = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug source text is empty")]
    EmptyInput,
    #[error("could not derive a slug from `{input}`")]
    Unrepresentable { input: String },
    #[error("exhausted attempts to find a unique slug for `{base}`")]
    Exhausted { base: String },
}

/// Errors from [`unique_store_slug`]: either derivation failed or the
/// caller's uniqueness predicate did.
#[derive(Debug, Error)]
pub enum SlugLookupError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    #[error(transparent)]
    Slug(#[from] SlugError),
    #[error(transparent)]
    Predicate(E),
}

/// Derive the base slug for a store name.
pub fn store_slug(name: &str) -> Result<String, SlugError> {
    if name.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let candidate = slugify(name);
    if candidate.is_empty() {
        return Err(SlugError::Unrepresentable {
            input: name.to_string(),
        });
    }

    Ok(candidate)
}

/// Derive a slug that is unique according to `is_unique`.
///
/// Tries the base slug first, then `base-2`, `base-3`, ... up to a bounded
/// number of attempts. The predicate returns `true` when the candidate does
/// not collide with an existing store.
pub async fn unique_store_slug<F, Fut, E>(
    name: &str,
    mut is_unique: F,
) -> Result<String, SlugLookupError<E>>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    let base = store_slug(name)?;

    for attempt in 1..=MAX_SUFFIX_ATTEMPTS {
        let candidate = if attempt == 1 {
            base.clone()
        } else {
            format!("{base}-{attempt}")
        };

        if is_unique(candidate.clone())
            .await
            .map_err(SlugLookupError::Predicate)?
        {
            return Ok(candidate);
        }
    }

    Err(SlugError::Exhausted { base }.into())
}
