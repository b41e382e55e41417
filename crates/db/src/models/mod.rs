//! Row models for the integration-layer tables.

pub mod address;
pub mod appointment;
pub mod benefit;
pub mod cache;
pub mod license;
pub mod sync;
pub mod tax;
pub mod token;

pub use address::{AddressChange, PackageTracking, ValidatedAddress};
pub use appointment::UserAppointment;
pub use benefit::{UserBenefitHistory, UserDisabilityStatus, UserWorkCredits};
pub use cache::CachedGovernmentData;
pub use license::{AccommodationRequest, LicenseRenewal, NewUserLicense, UserLicense};
pub use sync::GovernmentSyncStatus;
pub use tax::{UserMedicalDeduction, UserTaxCredit};
pub use token::GovernmentApiToken;
