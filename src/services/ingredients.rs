use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::check_role;
use serde::{Deserialize, Serialize};

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::ingredient::{Ingredient, IngredientListQuery};
use crate::forms::ingredients::{IngredientUploadError, UploadIngredientsForm};
use crate::repository::{IngredientReader, IngredientWriter};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the ingredient search.
#[derive(Debug, Default, Deserialize)]
pub struct IngredientQuery {
    /// Case-insensitive name prefix.
    pub name: Option<String>,
}

/// Outcome of a catalogue upload.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ImportSummary {
    /// Rows found in the upload.
    pub received: usize,
    /// Rows that were not yet in the catalogue.
    pub created: usize,
}

impl From<IngredientUploadError> for ServiceError {
    fn from(value: IngredientUploadError) -> Self {
        ServiceError::Validation(value.to_string())
    }
}

pub fn list_ingredients<R>(repo: &R, query: IngredientQuery) -> ServiceResult<Vec<Ingredient>>
where
    R: IngredientReader + ?Sized,
{
    let mut list_query = IngredientListQuery::new();

    let prefix = query.name.as_deref().map(str::trim).unwrap_or_default();
    if !prefix.is_empty() {
        list_query = list_query.name_prefix(prefix);
    }

    repo.list_ingredients(list_query).map_err(ServiceError::from)
}

pub fn get_ingredient<R>(repo: &R, ingredient_id: i32) -> ServiceResult<Ingredient>
where
    R: IngredientReader + ?Sized,
{
    repo.get_ingredient_by_id(ingredient_id)?
        .ok_or_else(|| ServiceError::not_found("ingredient"))
}

/// Imports an uploaded CSV catalogue, skipping ingredients that already exist.
pub fn import_ingredients<R>(
    repo: &R,
    identity: &AuthenticatedUser,
    mut form: UploadIngredientsForm,
) -> ServiceResult<ImportSummary>
where
    R: IngredientWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &identity.roles) {
        return Err(ServiceError::Forbidden);
    }

    let ingredients = form.into_new_ingredients()?;
    let created = repo.create_ingredients(&ingredients)?;

    log::info!(
        "Imported {created} of {} uploaded ingredients",
        ingredients.len()
    );

    Ok(ImportSummary {
        received: ingredients.len(),
        created,
    })
}

#[cfg(test)]
mod tests {
    use std::io::{Seek, SeekFrom, Write};

    use actix_multipart::form::tempfile::TempFile;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::repository::mock::{MockIngredientReader, MockIngredientWriter};
    use crate::services::test_support::identity_with_roles;

    fn upload(csv: &str) -> UploadIngredientsForm {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(csv.as_bytes()).expect("write csv file");
        file.as_file_mut()
            .seek(SeekFrom::Start(0))
            .expect("seek to start");

        UploadIngredientsForm {
            csv: TempFile {
                file,
                content_type: None,
                file_name: Some("ingredients.csv".to_string()),
                size: csv.len(),
            },
        }
    }

    #[test]
    fn list_ingredients_passes_trimmed_prefix() {
        let mut repo = MockIngredientReader::new();
        repo.expect_list_ingredients()
            .times(1)
            .withf(|query| query.name.as_deref() == Some("мол"))
            .returning(|_| {
                Ok(vec![Ingredient {
                    id: 1,
                    name: "молоко".to_string(),
                    measurement_unit: "мл".to_string(),
                }])
            });

        let items = list_ingredients(
            &repo,
            IngredientQuery {
                name: Some(" мол ".to_string()),
            },
        )
        .expect("expected ingredients");

        assert_eq!(items.len(), 1);
    }

    #[test]
    fn blank_prefix_lists_everything() {
        let mut repo = MockIngredientReader::new();
        repo.expect_list_ingredients()
            .withf(|query| query.name.is_none())
            .returning(|_| Ok(Vec::new()));

        let items = list_ingredients(
            &repo,
            IngredientQuery {
                name: Some("  ".to_string()),
            },
        )
        .expect("expected ingredients");

        assert!(items.is_empty());
    }

    #[test]
    fn import_requires_role() {
        let repo = MockIngredientWriter::new();

        let result = import_ingredients(&repo, &identity_with_roles(&[]), upload("salt,g\n"));

        assert!(matches!(result, Err(ServiceError::Forbidden)));
    }

    #[test]
    fn import_reports_created_rows() {
        let mut repo = MockIngredientWriter::new();
        repo.expect_create_ingredients()
            .times(1)
            .withf(|rows| rows.len() == 3)
            .returning(|_| Ok(2));

        let summary = import_ingredients(
            &repo,
            &identity_with_roles(&[SERVICE_ACCESS_ROLE]),
            upload("salt,g\nsugar,g\nmilk,ml\n"),
        )
        .expect("expected import");

        assert_eq!(
            summary,
            ImportSummary {
                received: 3,
                created: 2
            }
        );
    }

    #[test]
    fn import_rejects_incomplete_rows() {
        let repo = MockIngredientWriter::new();

        let result = import_ingredients(
            &repo,
            &identity_with_roles(&[SERVICE_ACCESS_ROLE]),
            upload("salt\n"),
        );

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }
}
