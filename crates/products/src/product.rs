use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::Entity;

use crate::params::ProductParams;
use crate::validation::{NAME_MAX_CHARS, ProductField, ValidationErrors, ViolationKind};

storefront_core::uuid_newtype! {
    /// Product identifier, assigned by the store when a product is first saved.
    pub struct ProductId;
}

/// Opaque reference to the product's featured image (blob key or URL).
///
/// The catalog never inspects the referenced file; it only stores the reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeaturedImage(String);

impl FeaturedImage {
    /// Wrap a reference; blank input means "no image".
    pub fn new(reference: impl Into<String>) -> Option<Self> {
        let reference = reference.into();
        if reference.trim().is_empty() {
            None
        } else {
            Some(Self(reference))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The user-editable attributes of a product.
///
/// A default value is the unsaved, empty product bound to the creation form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAttributes {
    pub name: String,
    pub description: String,
    pub featured_image: Option<FeaturedImage>,
}

impl ProductAttributes {
    /// Build a new candidate from allow-listed params; unsubmitted keys keep defaults.
    pub fn from_params(params: ProductParams) -> Self {
        let mut attributes = Self::default();
        attributes.assign(params);
        attributes
    }

    /// Apply submitted params. Keys that were not submitted are left untouched.
    pub fn assign(&mut self, params: ProductParams) {
        if let Some(name) = params.name {
            self.name = name;
        }
        if let Some(description) = params.description {
            self.description = description;
        }
        if let Some(featured_image) = params.featured_image {
            self.featured_image = FeaturedImage::new(featured_image);
        }
    }

    /// Check the entity-level rules.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.name.trim().is_empty() {
            errors.add(ProductField::Name, ViolationKind::Blank);
        } else if self.name.chars().count() > NAME_MAX_CHARS {
            errors.add(
                ProductField::Name,
                ViolationKind::TooLong {
                    max: NAME_MAX_CHARS,
                },
            );
        }

        errors.into_result()
    }
}

/// Entity: Product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    attributes: ProductAttributes,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    /// A freshly persisted product (`updated_at == created_at`).
    pub fn new(id: ProductId, attributes: ProductAttributes, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            attributes,
            created_at,
            updated_at: created_at,
        }
    }

    /// Rehydrate a product loaded from storage.
    pub fn restore(
        id: ProductId,
        attributes: ProductAttributes,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            attributes,
            created_at,
            updated_at,
        }
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.attributes.name
    }

    pub fn description(&self) -> &str {
        &self.attributes.description
    }

    pub fn featured_image(&self) -> Option<&FeaturedImage> {
        self.attributes.featured_image.as_ref()
    }

    pub fn attributes(&self) -> &ProductAttributes {
        &self.attributes
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Apply submitted params in memory. The identifier never changes.
    pub fn assign(&mut self, params: ProductParams) {
        self.attributes.assign(params);
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        self.attributes.validate()
    }

    /// Record a successful save.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}
