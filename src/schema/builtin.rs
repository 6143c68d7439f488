//! Built-in schemas for the User, Product and Lead record kinds

use serde_json::json;
use std::sync::OnceLock;

use super::types::{Constraint, FieldDef, FieldType, Schema};
use crate::record::RecordKind;

static USER: OnceLock<Schema> = OnceLock::new();
static PRODUCT: OnceLock<Schema> = OnceLock::new();
static LEAD: OnceLock<Schema> = OnceLock::new();

/// Returns the static schema for a built-in kind
pub fn schema_for(kind: RecordKind) -> &'static Schema {
    match kind {
        RecordKind::User => USER.get_or_init(user_schema),
        RecordKind::Product => PRODUCT.get_or_init(product_schema),
        RecordKind::Lead => LEAD.get_or_init(lead_schema),
    }
}

/// Returns every built-in schema in registration order
pub fn builtin_schemas() -> impl Iterator<Item = &'static Schema> {
    RecordKind::ALL.into_iter().map(schema_for)
}

fn user_schema() -> Schema {
    Schema::new(
        "User",
        vec![
            FieldDef::required("name", FieldType::String).described("Full name"),
            FieldDef::required("email", FieldType::String).described("Email address"),
            FieldDef::required("address", FieldType::String).described("Address"),
            FieldDef::optional("age", FieldType::Int)
                .constrained(Constraint::Ge(0.0))
                .constrained(Constraint::Le(120.0))
                .described("Age in years"),
            FieldDef::with_default("is_active", FieldType::Bool, json!(true))
                .described("Whether user is active"),
        ],
    )
    .described("Users collection schema")
}

fn product_schema() -> Schema {
    Schema::new(
        "Product",
        vec![
            FieldDef::required("title", FieldType::String).described("Product title"),
            FieldDef::optional("description", FieldType::String).described("Product description"),
            FieldDef::required("price", FieldType::Float)
                .constrained(Constraint::Ge(0.0))
                .described("Price in dollars"),
            FieldDef::required("category", FieldType::String).described("Product category"),
            FieldDef::with_default("in_stock", FieldType::Bool, json!(true))
                .described("Whether product is in stock"),
        ],
    )
    .described("Products collection schema")
}

fn lead_schema() -> Schema {
    Schema::new(
        "Lead",
        vec![
            FieldDef::required("name", FieldType::String).described("Customer full name"),
            FieldDef::required("email", FieldType::String).described("Customer email"),
            FieldDef::optional("phone", FieldType::String).described("Customer phone number"),
            FieldDef::optional("message", FieldType::String)
                .described("Customer message or requirements"),
            FieldDef::optional("preferred_datetime", FieldType::Timestamp)
                .described("Requested meeting datetime (ISO)"),
            FieldDef::optional("property_type", FieldType::String)
                .described("Buy/Sell/Rent and type (penthouse, villa, etc.)"),
            FieldDef::optional("budget_min", FieldType::Float).described("Minimum budget"),
            FieldDef::optional("budget_max", FieldType::Float).described("Maximum budget"),
            FieldDef::with_default("source", FieldType::String, json!("website"))
                .described("Where the lead originated (website/chatbot/form)"),
            FieldDef::with_default("status", FieldType::String, json!("new"))
                .described("Lead status"),
        ],
    )
    .described("Leads generated from the website/chatbot")
}
