//! Wire-format snapshots of the platform's entities. All of these are
//! fetched read-only from the remote services; nothing here is locally
//! authoritative.

pub mod coupon;
pub mod course;
pub mod payment;
pub mod purchase;

pub use coupon::Discount;
pub use course::{Course, CourseModule, Video};
pub use payment::{PaymentOrder, PaymentProof};
pub use purchase::PurchaseRecord;
