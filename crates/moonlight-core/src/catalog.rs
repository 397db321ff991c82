//! Catalog and back-office vocabulary: the closed sets of categories and
//! statuses the store recognises, with string forms matching what is
//! persisted and what clients send.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid category: {0}")]
    InvalidCategory(String),
    #[error("invalid sub-category: {0}")]
    InvalidSubCategory(String),
    #[error("invalid product status: {0}")]
    InvalidProductStatus(String),
    #[error("invalid order status: {0}")]
    InvalidOrderStatus(String),
    #[error("invalid payment status: {0}")]
    InvalidPaymentStatus(String),
    #[error("invalid offer kind: {0}")]
    InvalidOfferKind(String),
    #[error("invalid offer status: {0}")]
    InvalidOfferStatus(String),
    #[error("invalid contact status: {0}")]
    InvalidContactStatus(String),
    #[error("invalid review status: {0}")]
    InvalidReviewStatus(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Attar,
    Perfume,
    Oud,
    GiftSet,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Attar,
        Category::Perfume,
        Category::Oud,
        Category::GiftSet,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Attar => "Attar",
            Category::Perfume => "Perfume",
            Category::Oud => "Oud",
            Category::GiftSet => "Gift Set",
        }
    }
}

impl FromStr for Category {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Attar" => Ok(Category::Attar),
            "Perfume" => Ok(Category::Perfume),
            "Oud" => Ok(Category::Oud),
            "Gift Set" => Ok(Category::GiftSet),
            other => Err(CatalogError::InvalidCategory(other.to_string())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubCategory {
    Male,
    Female,
    Unisex,
    Traditional,
    Modern,
}

impl SubCategory {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SubCategory::Male => "Male",
            SubCategory::Female => "Female",
            SubCategory::Unisex => "Unisex",
            SubCategory::Traditional => "Traditional",
            SubCategory::Modern => "Modern",
        }
    }
}

impl FromStr for SubCategory {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(SubCategory::Male),
            "Female" => Ok(SubCategory::Female),
            "Unisex" => Ok(SubCategory::Unisex),
            "Traditional" => Ok(SubCategory::Traditional),
            "Modern" => Ok(SubCategory::Modern),
            other => Err(CatalogError::InvalidSubCategory(other.to_string())),
        }
    }
}

impl fmt::Display for SubCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display-facing product status. Set only by explicit admin action; never
/// inferred from stock levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductStatus {
    Active,
    Inactive,
    OutOfStock,
}

impl ProductStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProductStatus::Active => "Active",
            ProductStatus::Inactive => "Inactive",
            ProductStatus::OutOfStock => "Out of Stock",
        }
    }
}

impl FromStr for ProductStatus {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(ProductStatus::Active),
            "Inactive" => Ok(ProductStatus::Inactive),
            "Out of Stock" => Ok(ProductStatus::OutOfStock),
            other => Err(CatalogError::InvalidProductStatus(other.to_string())),
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fulfilment status. The admin surface may set any value; there is no
/// enforced state machine (forward-only movement is an operating
/// convention, not an invariant).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(OrderStatus::Pending),
            "Processing" => Ok(OrderStatus::Processing),
            "Shipped" => Ok(OrderStatus::Shipped),
            "Delivered" => Ok(OrderStatus::Delivered),
            "Cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(CatalogError::InvalidOrderStatus(other.to_string())),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

impl PaymentStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Failed => "Failed",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(PaymentStatus::Pending),
            "Paid" => Ok(PaymentStatus::Paid),
            "Failed" => Ok(PaymentStatus::Failed),
            other => Err(CatalogError::InvalidPaymentStatus(other.to_string())),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discount shape for an offer. Lowercase string forms match the stored
/// values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferKind {
    Percentage,
    Fixed,
}

impl OfferKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OfferKind::Percentage => "percentage",
            OfferKind::Fixed => "fixed",
        }
    }
}

impl FromStr for OfferKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(OfferKind::Percentage),
            "fixed" => Ok(OfferKind::Fixed),
            other => Err(CatalogError::InvalidOfferKind(other.to_string())),
        }
    }
}

impl fmt::Display for OfferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferStatus {
    Active,
    Inactive,
    Expired,
}

impl OfferStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OfferStatus::Active => "Active",
            OfferStatus::Inactive => "Inactive",
            OfferStatus::Expired => "Expired",
        }
    }
}

impl FromStr for OfferStatus {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(OfferStatus::Active),
            "Inactive" => Ok(OfferStatus::Inactive),
            "Expired" => Ok(OfferStatus::Expired),
            other => Err(CatalogError::InvalidOfferStatus(other.to_string())),
        }
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactStatus {
    New,
    Read,
    Replied,
}

impl ContactStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContactStatus::New => "New",
            ContactStatus::Read => "Read",
            ContactStatus::Replied => "Replied",
        }
    }
}

impl FromStr for ContactStatus {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "New" => Ok(ContactStatus::New),
            "Read" => Ok(ContactStatus::Read),
            "Replied" => Ok(ContactStatus::Replied),
            other => Err(CatalogError::InvalidContactStatus(other.to_string())),
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Moderation status for a review. New reviews default to `Approved`;
/// only approved reviews count toward a product's aggregate rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewStatus::Pending => "Pending",
            ReviewStatus::Approved => "Approved",
            ReviewStatus::Rejected => "Rejected",
        }
    }
}

impl FromStr for ReviewStatus {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(ReviewStatus::Pending),
            "Approved" => Ok(ReviewStatus::Approved),
            "Rejected" => Ok(ReviewStatus::Rejected),
            other => Err(CatalogError::InvalidReviewStatus(other.to_string())),
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_strings() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn gift_set_uses_spaced_form() {
        assert_eq!(Category::GiftSet.as_str(), "Gift Set");
        assert_eq!("Gift Set".parse::<Category>().unwrap(), Category::GiftSet);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let err = "Candle".parse::<Category>().unwrap_err();
        assert!(matches!(err, CatalogError::InvalidCategory(ref v) if v == "Candle"));
    }

    #[test]
    fn out_of_stock_uses_spaced_form() {
        assert_eq!(ProductStatus::OutOfStock.as_str(), "Out of Stock");
        assert_eq!(
            "Out of Stock".parse::<ProductStatus>().unwrap(),
            ProductStatus::OutOfStock
        );
    }

    #[test]
    fn order_status_accepts_all_admin_values() {
        for s in ["Pending", "Processing", "Shipped", "Delivered", "Cancelled"] {
            assert!(s.parse::<OrderStatus>().is_ok(), "{s} should parse");
        }
        assert!("Returned".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn offer_kind_is_lowercase() {
        assert_eq!(OfferKind::Percentage.as_str(), "percentage");
        assert!("Percentage".parse::<OfferKind>().is_err());
    }

    #[test]
    fn contact_status_rejects_unknown() {
        assert!("Archived".parse::<ContactStatus>().is_err());
    }

    #[test]
    fn review_status_round_trips() {
        for s in ["Pending", "Approved", "Rejected"] {
            assert_eq!(s.parse::<ReviewStatus>().unwrap().as_str(), s);
        }
    }
}
