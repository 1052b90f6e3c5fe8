//! Role-tagged file attachments owned by products.

use crate::ids::{AttachmentId, ProductId};
use serde::{Deserialize, Serialize};

/// The role an attachment plays for its product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttachmentRole {
    /// The image shown on listings and the product page.
    DefaultImage,
    /// A downloadable specification sheet.
    DataSheet,
    /// Any additional file.
    Extra,
}

impl AttachmentRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttachmentRole::DefaultImage => "default_image",
            AttachmentRole::DataSheet => "data_sheet",
            AttachmentRole::Extra => "extra",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "default_image" => Some(AttachmentRole::DefaultImage),
            "data_sheet" => Some(AttachmentRole::DataSheet),
            "extra" => Some(AttachmentRole::Extra),
            _ => None,
        }
    }
}

/// A file reference owned by a product.
///
/// Storage and upload handling live outside this crate; the catalog only
/// keeps the reference and its role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attachment {
    /// Unique attachment identifier.
    pub id: AttachmentId,
    /// Owning product.
    pub product_id: ProductId,
    /// Role of this attachment.
    pub role: AttachmentRole,
    /// File reference (name or storage key).
    pub file_name: String,
}

impl Attachment {
    /// Create a new attachment.
    pub fn new(
        product_id: ProductId,
        role: AttachmentRole,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            id: AttachmentId::generate(),
            product_id,
            role,
            file_name: file_name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [
            AttachmentRole::DefaultImage,
            AttachmentRole::DataSheet,
            AttachmentRole::Extra,
        ] {
            assert_eq!(AttachmentRole::from_str(role.as_str()), Some(role));
        }
        assert_eq!(AttachmentRole::from_str("thumbnail"), None);
    }

    #[test]
    fn test_attachment_creation() {
        let product_id = ProductId::generate();
        let attachment =
            Attachment::new(product_id.clone(), AttachmentRole::DefaultImage, "front.jpg");
        assert_eq!(attachment.product_id, product_id);
        assert_eq!(attachment.role, AttachmentRole::DefaultImage);
    }
}
