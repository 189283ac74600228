mod client;
mod driver;
mod fuel_record;
mod invitation;
mod invoice;
mod maintenance_record;
mod money;
mod organization;
mod promotion_attempt;
mod settings;
mod transaction;
mod user;
mod vehicle;

pub use client::{Client, ClientChanges, NewClient};
pub use driver::{Driver, DriverChanges, DriverStatus, NewDriver};
pub use fuel_record::{FuelRecord, FuelRecordChanges, NewFuelRecord};
pub use invitation::{Invitation, InvitationState, INVITATION_TTL_DAYS};
pub use invoice::{Invoice, InvoiceChanges, InvoiceStatus, NewInvoice};
pub use maintenance_record::{MaintenanceChanges, MaintenanceRecord, MaintenanceUrgency, NewMaintenanceRecord};
pub use money::{check_money, checked_total};
pub use organization::{Organization, OrganizationChanges, SubscriptionStatus};
pub use promotion_attempt::PromotionAttempt;
pub use settings::{normalize_features, OrganizationSettings, SettingsChanges, FEATURES};
pub use transaction::{NewTransaction, Transaction, TransactionChanges, TransactionKind};
pub use user::{normalize_email, Role, User};
pub use vehicle::{NewVehicle, Vehicle, VehicleChanges, VehicleStatus};
