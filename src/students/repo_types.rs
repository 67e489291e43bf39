use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Year of study; travels as the strings "1" to "4".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Year {
    #[serde(rename = "1")]
    First,
    #[serde(rename = "2")]
    Second,
    #[serde(rename = "3")]
    Third,
    #[serde(rename = "4")]
    Fourth,
}

impl Year {
    pub fn as_str(&self) -> &'static str {
        match self {
            Year::First => "1",
            Year::Second => "2",
            Year::Third => "3",
            Year::Fourth => "4",
        }
    }
}

impl std::str::FromStr for Year {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(Year::First),
            "2" => Ok(Year::Second),
            "3" => Ok(Year::Third),
            "4" => Ok(Year::Fourth),
            other => anyhow::bail!("unknown year `{other}`"),
        }
    }
}

impl std::fmt::Display for Year {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field whose uniqueness a submission violated.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConflictField {
    Phone,
    Email,
}

impl ConflictField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictField::Phone => "phone",
            ConflictField::Email => "email",
        }
    }

    /// Maps a unique constraint name (`students_phone_key`, ...) to its field.
    pub fn from_constraint(name: &str) -> Option<Self> {
        if name.contains("phone") {
            Some(ConflictField::Phone)
        } else if name.contains("email") {
            Some(ConflictField::Email)
        } else {
            None
        }
    }
}

/// Row as stored in the `students` table.
#[derive(Debug, FromRow)]
pub struct StudentRow {
    pub id: Uuid,
    pub name: String,
    pub year: String,
    pub institute: String,
    pub department: String,
    pub phone: String,
    pub email: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Attendance record as returned to clients.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: Uuid,
    pub name: String,
    pub year: Year,
    pub institute: String,
    pub department: String,
    pub phone: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl TryFrom<StudentRow> for Student {
    type Error = anyhow::Error;

    fn try_from(r: StudentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            name: r.name,
            year: r.year.parse()?,
            institute: r.institute,
            department: r.department,
            phone: r.phone,
            email: r.email,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

/// Validated candidate record. Only `validate::validate_submission` builds one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub(super) name: String,
    pub(super) year: Year,
    pub(super) institute: String,
    pub(super) department: String,
    pub(super) phone: String,
    pub(super) email: String,
}

impl NewStudent {
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn year(&self) -> Year {
        self.year
    }
    pub fn institute(&self) -> &str {
        &self.institute
    }
    pub fn department(&self) -> &str {
        &self.department
    }
    pub fn phone(&self) -> &str {
        &self.phone
    }
    pub fn email(&self) -> &str {
        &self.email
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_serializes_as_plain_string() {
        assert_eq!(serde_json::to_string(&Year::Second).unwrap(), "\"2\"");
        let y: Year = serde_json::from_str("\"4\"").unwrap();
        assert_eq!(y, Year::Fourth);
        assert!(serde_json::from_str::<Year>("\"5\"").is_err());
    }

    #[test]
    fn constraint_names_map_to_fields() {
        assert_eq!(
            ConflictField::from_constraint("students_phone_key"),
            Some(ConflictField::Phone)
        );
        assert_eq!(
            ConflictField::from_constraint("students_email_key"),
            Some(ConflictField::Email)
        );
        assert_eq!(ConflictField::from_constraint("students_pkey"), None);
    }

    #[test]
    fn row_with_unknown_year_is_rejected() {
        let now = OffsetDateTime::now_utc();
        let row = StudentRow {
            id: Uuid::new_v4(),
            name: "Alice".into(),
            year: "7".into(),
            institute: "X".into(),
            department: "CS".into(),
            phone: "9876543210".into(),
            email: "alice@x.com".into(),
            created_at: now,
            updated_at: now,
        };
        assert!(Student::try_from(row).is_err());
    }

    #[test]
    fn student_serializes_camel_case_timestamps() {
        let now = OffsetDateTime::now_utc();
        let student = Student {
            id: Uuid::new_v4(),
            name: "Alice".into(),
            year: Year::Second,
            institute: "X".into(),
            department: "CS".into(),
            phone: "9876543210".into(),
            email: "alice@x.com".into(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&student).unwrap();
        assert_eq!(json["year"], "2");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("created_at").is_none());
    }
}
