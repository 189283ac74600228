use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "vehicle_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Available,
    Rented,
    InMaintenance,
    OutOfService,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub license_plate: String,
    pub make: String,
    pub model: String,
    pub kind: String,
    pub year: Option<i32>,
    pub mileage: i32,
    pub work_hours: i32,
    pub status: VehicleStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVehicle {
    pub license_plate: String,
    pub make: String,
    pub model: String,
    pub kind: String,
    pub year: Option<i32>,
    pub mileage: Option<i32>,
    pub work_hours: Option<i32>,
    pub status: Option<VehicleStatus>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleChanges {
    pub license_plate: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub kind: Option<String>,
    pub year: Option<i32>,
    pub mileage: Option<i32>,
    pub work_hours: Option<i32>,
    pub status: Option<VehicleStatus>,
}

impl NewVehicle {
    pub fn validate(&self) -> Result<(), String> {
        VehicleChanges {
            license_plate: Some(self.license_plate.clone()),
            make: Some(self.make.clone()),
            model: Some(self.model.clone()),
            kind: Some(self.kind.clone()),
            year: self.year,
            mileage: self.mileage,
            work_hours: self.work_hours,
            status: self.status,
        }
        .validate()
    }
}

impl VehicleChanges {
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("licensePlate", &self.license_plate),
            ("make", &self.make),
            ("model", &self.model),
            ("kind", &self.kind),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(format!("{field} must not be empty"));
            }
        }
        if self.year.is_some_and(|y| !(1900..=2100).contains(&y)) {
            return Err("year must be between 1900 and 2100".to_string());
        }
        if self.mileage.is_some_and(|m| m < 0) || self.work_hours.is_some_and(|h| h < 0) {
            return Err("mileage and workHours must not be negative".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_vehicle() -> NewVehicle {
        NewVehicle {
            license_plate: "12345-116-16".to_string(),
            make: "Renault".to_string(),
            model: "Master".to_string(),
            kind: "utilitaire".to_string(),
            year: Some(2020),
            mileage: None,
            work_hours: None,
            status: None,
        }
    }

    #[test]
    fn accepts_a_complete_vehicle() {
        assert!(new_vehicle().validate().is_ok());
    }

    #[test]
    fn rejects_blank_plate_and_bad_year() {
        let mut v = new_vehicle();
        v.license_plate = "  ".to_string();
        assert!(v.validate().unwrap_err().contains("licensePlate"));

        let mut v = new_vehicle();
        v.year = Some(1850);
        assert!(v.validate().is_err());
    }

    #[test]
    fn partial_changes_only_check_present_fields() {
        assert!(VehicleChanges::default().validate().is_ok());
        let changes = VehicleChanges {
            mileage: Some(-1),
            ..Default::default()
        };
        assert!(changes.validate().is_err());
    }

    #[test]
    fn client_supplied_organization_is_ignored_by_the_payload() {
        let v: NewVehicle = serde_json::from_value(serde_json::json!({
            "licensePlate": "AB-1",
            "make": "Iveco",
            "model": "Daily",
            "kind": "camion",
            "organizationId": "org-other"
        }))
        .unwrap();
        assert_eq!(v.make, "Iveco");
    }
}
