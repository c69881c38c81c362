use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::AppError;

/// The lookup tables a work proposal refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    City,
    Ward,
    Scheme,
    Department,
    Agency,
    Sdo,
    TypeOfWork,
    TypeOfLocation,
}

impl ReferenceKind {
    pub const ALL: [ReferenceKind; 8] = [
        ReferenceKind::City,
        ReferenceKind::Ward,
        ReferenceKind::Scheme,
        ReferenceKind::Department,
        ReferenceKind::Agency,
        ReferenceKind::Sdo,
        ReferenceKind::TypeOfWork,
        ReferenceKind::TypeOfLocation,
    ];

    /// Value stored in `reference_items.kind`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::City => "city",
            ReferenceKind::Ward => "ward",
            ReferenceKind::Scheme => "scheme",
            ReferenceKind::Department => "department",
            ReferenceKind::Agency => "agency",
            ReferenceKind::Sdo => "sdo",
            ReferenceKind::TypeOfWork => "type_of_work",
            ReferenceKind::TypeOfLocation => "type_of_location",
        }
    }

    /// URL path segment, e.g. `/references/cities`.
    pub fn path_segment(&self) -> &'static str {
        match self {
            ReferenceKind::City => "cities",
            ReferenceKind::Ward => "wards",
            ReferenceKind::Scheme => "schemes",
            ReferenceKind::Department => "departments",
            ReferenceKind::Agency => "agencies",
            ReferenceKind::Sdo => "sdos",
            ReferenceKind::TypeOfWork => "work-types",
            ReferenceKind::TypeOfLocation => "location-types",
        }
    }

    /// Kind a row's `parent_id` must point at. Only wards have a parent.
    pub fn parent_kind(&self) -> Option<ReferenceKind> {
        match self {
            ReferenceKind::Ward => Some(ReferenceKind::City),
            _ => None,
        }
    }

    /// JSON paths inside the proposal document that hold ids of this kind.
    pub fn proposal_paths(&self) -> &'static [&'static [&'static str]] {
        match self {
            ReferenceKind::City => &[&["location", "city_id"]],
            ReferenceKind::Ward => &[&["location", "ward_id"]],
            ReferenceKind::TypeOfLocation => &[&["location", "type_of_location_id"]],
            ReferenceKind::Scheme => &[&["scheme_id"]],
            ReferenceKind::Department => &[&["department_id"], &["approving_department_id"]],
            ReferenceKind::Agency => &[&["work_agency_id"]],
            ReferenceKind::Sdo => &[&["appointed_sdo_id"]],
            ReferenceKind::TypeOfWork => &[&["type_of_work_id"]],
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts either the stored name (`type_of_work`) or the path segment (`work-types`).
impl FromStr for ReferenceKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReferenceKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s || k.path_segment() == s)
            .ok_or_else(|| AppError::validation("kind", format!("unknown reference kind '{s}'")))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReferenceItem {
    pub id: i64,
    pub kind: String,
    pub name: String,
    pub parent_id: Option<i64>,
    pub is_active: bool,
    pub created_at: String,
}

/// Create/update request for a reference row. An update replaces `parent_id`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceForm {
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_from_name_or_segment() {
        assert_eq!("wards".parse::<ReferenceKind>().unwrap(), ReferenceKind::Ward);
        assert_eq!("type_of_work".parse::<ReferenceKind>().unwrap(), ReferenceKind::TypeOfWork);
        assert_eq!("work-types".parse::<ReferenceKind>().unwrap(), ReferenceKind::TypeOfWork);
        assert!("villages".parse::<ReferenceKind>().is_err());
    }

    #[test]
    fn department_is_referenced_from_two_fields() {
        assert_eq!(ReferenceKind::Department.proposal_paths().len(), 2);
    }

    #[test]
    fn only_wards_have_a_parent() {
        assert_eq!(ReferenceKind::Ward.parent_kind(), Some(ReferenceKind::City));
        for kind in ReferenceKind::ALL.into_iter().filter(|k| *k != ReferenceKind::Ward) {
            assert_eq!(kind.parent_kind(), None, "{kind}");
        }
    }
}
