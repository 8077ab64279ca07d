//! Field-level validation of JSON request bodies.
//!
//! Every validator collects all field errors before failing so the client can
//! show them together.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::database::models::{Category, ExpensePatch, NewExpense, DEFAULT_CATEGORY_COLOR, DESCRIPTION_MAX_LEN};
use crate::error::{ApiError, FieldErrors};
use crate::filter::parse_timestamp;

pub const PASSWORD_MIN_LEN: usize = 6;

/// Largest accepted amount, 999,999,999,999.99. Mirrored by the `expenses.amount` CHECK.
pub const AMOUNT_MAX: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

const AMOUNT_NOT_NUMERIC: &str = "Amount must be a number";
const AMOUNT_NEGATIVE: &str = "Amount must be zero or greater";
const AMOUNT_TOO_LARGE: &str = "Amount is too large";
const DESCRIPTION_REQUIRED: &str = "Description is required";
const CATEGORY_REQUIRED: &str = "Category is required";
const DATE_INVALID: &str = "Valid date is required";

/// Registration input after validation. Email is lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

fn as_object(payload: &Value) -> Result<&Map<String, Value>, ApiError> {
    payload
        .as_object()
        .ok_or_else(|| ApiError::invalid_json("Request body must be a JSON object"))
}

fn check<T>(errors: &mut FieldErrors, field: &str, result: Result<T, &str>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(message) => {
            errors.insert(field.to_string(), message.to_string());
            None
        }
    }
}

fn finish(errors: FieldErrors) -> Result<(), ApiError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_error("Validation failed", Some(errors)))
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw).or_else(|_| Decimal::from_scientific(raw)).ok()
}

/// Accepts JSON numbers and numeric strings.
pub fn validate_amount(value: &Value) -> Result<Decimal, &'static str> {
    let amount = match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    }
    .ok_or(AMOUNT_NOT_NUMERIC)?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AMOUNT_NEGATIVE);
    }
    if amount > AMOUNT_MAX {
        return Err(AMOUNT_TOO_LARGE);
    }
    Ok(amount.normalize())
}

pub fn validate_description(value: &Value) -> Result<String, &'static str> {
    let text = required_text(value, DESCRIPTION_REQUIRED)?;
    if text.chars().count() > DESCRIPTION_MAX_LEN {
        return Err("Description must be at most 200 characters");
    }
    Ok(text)
}

pub fn validate_category(value: &Value) -> Result<String, &'static str> {
    required_text(value, CATEGORY_REQUIRED)
}

pub fn validate_date(value: &Value) -> Result<DateTime<Utc>, &'static str> {
    value.as_str().and_then(parse_timestamp).ok_or(DATE_INVALID)
}

fn required_text(value: &Value, message: &'static str) -> Result<String, &'static str> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or(message)
}

/// Create payload. `date` defaults to `now` when the key is absent.
pub fn parse_new_expense(payload: &Value, owner: Uuid, now: DateTime<Utc>) -> Result<NewExpense, ApiError> {
    let body = as_object(payload)?;
    let mut errors = FieldErrors::new();

    let amount = check(
        &mut errors,
        "amount",
        body.get("amount").ok_or(AMOUNT_NOT_NUMERIC).and_then(validate_amount),
    );
    let description = check(
        &mut errors,
        "description",
        body.get("description")
            .ok_or(DESCRIPTION_REQUIRED)
            .and_then(validate_description),
    );
    let category = check(
        &mut errors,
        "category",
        body.get("category").ok_or(CATEGORY_REQUIRED).and_then(validate_category),
    );
    let date = match body.get("date") {
        None => Some(now),
        Some(value) => check(&mut errors, "date", validate_date(value)),
    };

    finish(errors)?;

    match (amount, description, category, date) {
        (Some(amount), Some(description), Some(category), Some(date)) => Ok(NewExpense {
            user: owner,
            amount,
            description,
            category,
            date,
        }),
        _ => Err(ApiError::internal_server_error("Validation state inconsistent")),
    }
}

/// Update payload. Only keys present in the body are validated and applied.
pub fn parse_expense_patch(payload: &Value) -> Result<ExpensePatch, ApiError> {
    let body = as_object(payload)?;
    let mut errors = FieldErrors::new();

    let patch = ExpensePatch {
        amount: body
            .get("amount")
            .and_then(|v| check(&mut errors, "amount", validate_amount(v))),
        description: body
            .get("description")
            .and_then(|v| check(&mut errors, "description", validate_description(v))),
        category: body
            .get("category")
            .and_then(|v| check(&mut errors, "category", validate_category(v))),
        date: body.get("date").and_then(|v| check(&mut errors, "date", validate_date(v))),
    };

    finish(errors)?;
    Ok(patch)
}

pub fn parse_registration(payload: &Value) -> Result<Registration, ApiError> {
    let body = as_object(payload)?;
    let mut errors = FieldErrors::new();

    let name = check(
        &mut errors,
        "name",
        body.get("name")
            .map_or(Err("Name is required"), |v| required_text(v, "Name is required")),
    );
    let email = check(
        &mut errors,
        "email",
        body.get("email").map_or(Err("Valid email is required"), validate_email),
    );
    let password = check(
        &mut errors,
        "password",
        body.get("password")
            .and_then(Value::as_str)
            .filter(|p| p.chars().count() >= PASSWORD_MIN_LEN)
            .map(str::to_string)
            .ok_or("Password must be at least 6 characters"),
    );

    finish(errors)?;

    match (name, email, password) {
        (Some(name), Some(email), Some(password)) => Ok(Registration { name, email, password }),
        _ => Err(ApiError::internal_server_error("Validation state inconsistent")),
    }
}

pub fn parse_credentials(payload: &Value) -> Result<Credentials, ApiError> {
    let body = as_object(payload)?;
    let mut errors = FieldErrors::new();

    let email = check(
        &mut errors,
        "email",
        body.get("email").map_or(Err("Valid email is required"), validate_email),
    );
    let password = check(
        &mut errors,
        "password",
        body.get("password")
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .ok_or("Password is required"),
    );

    finish(errors)?;

    match (email, password) {
        (Some(email), Some(password)) => Ok(Credentials { email, password }),
        _ => Err(ApiError::internal_server_error("Validation state inconsistent")),
    }
}

pub fn validate_email(value: &Value) -> Result<String, &'static str> {
    let email = required_text(value, "Valid email is required")?.to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') && !domain.starts_with('.') => {
            Ok(email)
        }
        _ => Err("Valid email is required"),
    }
}

/// `{categories: [{name, color}]}`. Names are trimmed and must be non-empty;
/// duplicates are allowed.
pub fn parse_categories(payload: &Value) -> Result<Vec<Category>, ApiError> {
    let body = as_object(payload)?;
    let items = body
        .get("categories")
        .and_then(Value::as_array)
        .ok_or_else(|| ApiError::invalid_field("categories", "Categories must be an array"))?;

    let mut errors = FieldErrors::new();
    let mut categories = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let name = item
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|n| !n.is_empty());
        let color = match item.get("color") {
            None | Some(Value::Null) => Some(DEFAULT_CATEGORY_COLOR.to_string()),
            Some(Value::String(c)) if !c.trim().is_empty() => Some(c.trim().to_string()),
            Some(_) => None,
        };

        match (name, color) {
            (Some(name), Some(color)) => categories.push(Category::new(name, color)),
            (None, _) => {
                errors.insert(format!("categories[{}].name", index), "Category name is required".to_string());
            }
            (_, None) => {
                errors.insert(format!("categories[{}].color", index), "Color must be a string".to_string());
            }
        }
    }

    finish(errors)?;
    Ok(categories)
}
