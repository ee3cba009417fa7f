use std::io::{Read, Seek};

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use csv::Trim;
use thiserror::Error;

use crate::domain::ingredient::NewIngredient;
use crate::forms::sanitize_inline_text;

const NAME_MAX_LEN: usize = 128;
const UNIT_MAX_LEN: usize = 64;

#[derive(MultipartForm)]
/// Multipart form for uploading the ingredient catalogue as CSV.
pub struct UploadIngredientsForm {
    #[multipart(limit = "10MB")]
    /// Headerless `name,measurement_unit` rows; a leading header row is skipped.
    pub csv: TempFile,
}

#[derive(Debug, Error)]
/// Errors that can occur while parsing an ingredient catalogue.
pub enum IngredientUploadError {
    #[error("Error reading csv file")]
    FileReadError,
    #[error("Error parsing csv file")]
    CsvParseError,
    #[error("row {row} must contain a name and a measurement unit")]
    IncompleteRow { row: usize },
    #[error("row {row} exceeds the allowed length")]
    ValueTooLong { row: usize },
}

impl From<std::io::Error> for IngredientUploadError {
    fn from(_: std::io::Error) -> Self {
        IngredientUploadError::FileReadError
    }
}

impl From<csv::Error> for IngredientUploadError {
    fn from(_: csv::Error) -> Self {
        IngredientUploadError::CsvParseError
    }
}

impl UploadIngredientsForm {
    /// Parse the uploaded CSV file into [`NewIngredient`] records.
    pub fn into_new_ingredients(&mut self) -> Result<Vec<NewIngredient>, IngredientUploadError> {
        self.csv.file.rewind()?;
        parse_ingredients(self.csv.file.by_ref())
    }
}

/// Read `name,measurement_unit` rows. Blank lines are skipped, as is a first
/// row that spells out the column names.
pub fn parse_ingredients<R: Read>(reader: R) -> Result<Vec<NewIngredient>, IngredientUploadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut ingredients = Vec::new();

    for (index, row) in csv_reader.records().enumerate() {
        let record = row?;
        let row_number = index + 1;

        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let name = sanitize_inline_text(record.get(0).unwrap_or_default());
        let unit = sanitize_inline_text(record.get(1).unwrap_or_default());

        if index == 0
            && name.eq_ignore_ascii_case("name")
            && unit.eq_ignore_ascii_case("measurement_unit")
        {
            continue;
        }

        if name.is_empty() || unit.is_empty() {
            return Err(IngredientUploadError::IncompleteRow { row: row_number });
        }

        if name.chars().count() > NAME_MAX_LEN || unit.chars().count() > UNIT_MAX_LEN {
            return Err(IngredientUploadError::ValueTooLong { row: row_number });
        }

        ingredients.push(NewIngredient::new(name, unit));
    }

    Ok(ingredients)
}
