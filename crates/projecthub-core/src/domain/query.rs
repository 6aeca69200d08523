//! Filter state and its translation into a store query
//!
//! The builder performs no I/O. It produces a [`QuerySpec`] that a
//! [`crate::storage::ProjectStore`] adapter evaluates.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::identity::Identity;
use super::project::{Category, Location, RawProjectRecord};
use crate::error::Result;

/// Name of the collection projects live in
pub const PROJECTS_COLLECTION: &str = "projects";

/// Active directory filters. `None` means "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub location: Option<Location>,
    pub category: Option<Category>,
    /// Only has an effect while someone is signed in
    pub my_projects_only: bool,
}

impl FilterState {
    /// Build filters from form-style inputs.
    ///
    /// Empty strings mean "no restriction"; any other value must name a
    /// known location or category.
    pub fn from_inputs(location: &str, category: &str, my_projects_only: bool) -> Result<Self> {
        let location = match location.trim() {
            "" => None,
            value => Some(value.parse()?),
        };
        let category = match category.trim() {
            "" => None,
            value => Some(value.parse()?),
        };

        Ok(Self {
            location,
            category,
            my_projects_only,
        })
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn mine_only(mut self) -> Self {
        self.my_projects_only = true;
        self
    }
}

/// Record field a predicate applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryField {
    Location,
    Category,
    Contributors,
}

impl QueryField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Category => "category",
            Self::Contributors => "contributors",
        }
    }
}

/// A single condition; a query is the AND of its predicates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Predicate {
    /// Field equals value
    Eq { field: QueryField, value: String },
    /// Array field contains value
    ArrayContains { field: QueryField, value: String },
}

impl Predicate {
    /// Evaluate against a raw record
    pub fn matches(&self, record: &RawProjectRecord) -> bool {
        match self {
            Self::Eq { field, value } => match field {
                QueryField::Location => record.location.as_deref() == Some(value.as_str()),
                QueryField::Category => record.category.as_deref() == Some(value.as_str()),
                QueryField::Contributors => false,
            },
            Self::ArrayContains { field, value } => match field {
                QueryField::Contributors => record
                    .contributors
                    .as_ref()
                    .is_some_and(|ids| ids.iter().any(|id| id == value)),
                QueryField::Location | QueryField::Category => false,
            },
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq { field, value } => write!(f, "{} == {:?}", field.as_str(), value),
            Self::ArrayContains { field, value } => {
                write!(f, "{} array-contains {:?}", field.as_str(), value)
            }
        }
    }
}

/// Query description handed to the store adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySpec {
    pub collection: String,
    pub predicates: Vec<Predicate>,
}

impl QuerySpec {
    /// Unrestricted query over the projects collection
    pub fn all() -> Self {
        Self {
            collection: PROJECTS_COLLECTION.to_string(),
            predicates: Vec::new(),
        }
    }

    /// True when every predicate holds for the record
    pub fn matches(&self, record: &RawProjectRecord) -> bool {
        self.predicates.iter().all(|p| p.matches(record))
    }

    pub fn is_unrestricted(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl fmt::Display for QuerySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.collection)?;
        for (i, predicate) in self.predicates.iter().enumerate() {
            let joiner = if i == 0 { " WHERE " } else { " AND " };
            write!(f, "{}{}", joiner, predicate)?;
        }
        Ok(())
    }
}

/// Translate filters into a query.
///
/// "My projects only" without a signed-in identity is dropped rather than
/// turned into a predicate nothing can satisfy.
pub fn build_query(filters: &FilterState, identity: Option<&Identity>) -> QuerySpec {
    let mut query = QuerySpec::all();

    if let Some(location) = filters.location {
        query.predicates.push(Predicate::Eq {
            field: QueryField::Location,
            value: location.as_str().to_string(),
        });
    }

    if let Some(category) = filters.category {
        query.predicates.push(Predicate::Eq {
            field: QueryField::Category,
            value: category.as_str().to_string(),
        });
    }

    if filters.my_projects_only {
        if let Some(identity) = identity {
            query.predicates.push(Predicate::ArrayContains {
                field: QueryField::Contributors,
                value: identity.id.clone(),
            });
        }
    }

    query
}
