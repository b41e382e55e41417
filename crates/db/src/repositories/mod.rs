//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Writes land on the tables'
//! natural keys via `INSERT ... ON CONFLICT ... DO UPDATE`.

pub mod accommodation_repo;
pub mod address_repo;
pub mod api_token_repo;
pub mod appointment_repo;
pub mod benefit_repo;
pub mod cached_data_repo;
pub mod license_repo;
pub mod sync_status_repo;
pub mod tax_repo;

pub use accommodation_repo::{AccommodationRequestRepo, LicenseRenewalRepo};
pub use address_repo::{AddressChangeRepo, PackageTrackingRepo, ValidatedAddressRepo};
pub use api_token_repo::ApiTokenRepo;
pub use appointment_repo::AppointmentRepo;
pub use benefit_repo::{BenefitHistoryRepo, DisabilityStatusRepo, WorkCreditsRepo};
pub use cached_data_repo::CachedDataRepo;
pub use license_repo::LicenseRepo;
pub use sync_status_repo::SyncStatusRepo;
pub use tax_repo::{MedicalDeductionRepo, TaxCreditRepo};
