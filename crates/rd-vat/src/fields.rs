//! Canonical taxpayer fields and the aliases the remote service uses for them.

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Number of canonical fields in every output record.
pub const FIELD_COUNT: usize = 17;

/// One logical attribute of a taxpayer registration record, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CanonicalField {
    #[serde(rename = "NID")]
    Nid,
    BranchNumber,
    BranchTitle,
    BranchName,
    BuildingName,
    RoomNumber,
    FloorNumber,
    VillageName,
    HouseNumber,
    MooNumber,
    SoiName,
    StreetName,
    ThumbolName,
    AmphurName,
    ProvinceName,
    PostCode,
    BusinessFirstDate,
}

impl CanonicalField {
    /// All fields in output order.
    pub const ALL: [CanonicalField; FIELD_COUNT] = [
        CanonicalField::Nid,
        CanonicalField::BranchNumber,
        CanonicalField::BranchTitle,
        CanonicalField::BranchName,
        CanonicalField::BuildingName,
        CanonicalField::RoomNumber,
        CanonicalField::FloorNumber,
        CanonicalField::VillageName,
        CanonicalField::HouseNumber,
        CanonicalField::MooNumber,
        CanonicalField::SoiName,
        CanonicalField::StreetName,
        CanonicalField::ThumbolName,
        CanonicalField::AmphurName,
        CanonicalField::ProvinceName,
        CanonicalField::PostCode,
        CanonicalField::BusinessFirstDate,
    ];

    /// Position of this field in output order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Output key.
    pub fn key(self) -> &'static str {
        match self {
            CanonicalField::Nid => "NID",
            CanonicalField::BranchNumber => "BranchNumber",
            CanonicalField::BranchTitle => "BranchTitle",
            CanonicalField::BranchName => "BranchName",
            CanonicalField::BuildingName => "BuildingName",
            CanonicalField::RoomNumber => "RoomNumber",
            CanonicalField::FloorNumber => "FloorNumber",
            CanonicalField::VillageName => "VillageName",
            CanonicalField::HouseNumber => "HouseNumber",
            CanonicalField::MooNumber => "MooNumber",
            CanonicalField::SoiName => "SoiName",
            CanonicalField::StreetName => "StreetName",
            CanonicalField::ThumbolName => "ThumbolName",
            CanonicalField::AmphurName => "AmphurName",
            CanonicalField::ProvinceName => "ProvinceName",
            CanonicalField::PostCode => "PostCode",
            CanonicalField::BusinessFirstDate => "BusinessFirstDate",
        }
    }

    /// Find a field by its output key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    /// Thai display label, as printed by the Revenue Department.
    pub fn label_th(self) -> &'static str {
        match self {
            CanonicalField::Nid => "เลขประจำตัวผู้เสียภาษี 13 หลัก (NID)",
            CanonicalField::BranchNumber => "เลขที่สาขา (BranchNumber)",
            CanonicalField::BranchTitle => "คำนำหน้าชื่อ (BranchTitle)",
            CanonicalField::BranchName => "ชื่อสถานประกอบการ (BranchName)",
            CanonicalField::BuildingName => "ชื่ออาคาร (BuildingName)",
            CanonicalField::RoomNumber => "ห้องที่ (RoomNumber)",
            CanonicalField::FloorNumber => "ชั้นที่ (FloorNumber)",
            CanonicalField::VillageName => "หมู่บ้าน (VillageName)",
            CanonicalField::HouseNumber => "เลขที่ตั้งของสถานประกอบการ (HouseNumber)",
            CanonicalField::MooNumber => "หมู่ที่ (MooNumber)",
            CanonicalField::SoiName => "ซอย (SoiName)",
            CanonicalField::StreetName => "ถนน (StreetName)",
            CanonicalField::ThumbolName => "ตำบล (ThumbolName)",
            CanonicalField::AmphurName => "อำเภอ (AmphurName)",
            CanonicalField::ProvinceName => "จังหวัด (ProvinceName)",
            CanonicalField::PostCode => "รหัสไปรษณีย์ (PostCode)",
            CanonicalField::BusinessFirstDate => {
                "วันที่กรมสรรพากรอนุมัติให้เป็นผู้ประกอบการจดทะเบียนภาษีมูลค่าเพิ่ม ซึ่งมีสิทธิ์ออกใบกำกับภาษีซื้อ (BusinessFirstDate)"
            }
        }
    }

    /// English display label.
    pub fn label_en(self) -> &'static str {
        match self {
            CanonicalField::Nid => "Tax ID",
            CanonicalField::BranchNumber => "Branch number",
            CanonicalField::BranchTitle => "Branch title",
            CanonicalField::BranchName => "Branch name",
            CanonicalField::BuildingName => "Building name",
            CanonicalField::RoomNumber => "Room number",
            CanonicalField::FloorNumber => "Floor number",
            CanonicalField::VillageName => "Village name",
            CanonicalField::HouseNumber => "House number",
            CanonicalField::MooNumber => "Moo number",
            CanonicalField::SoiName => "Soi",
            CanonicalField::StreetName => "Street",
            CanonicalField::ThumbolName => "Subdistrict",
            CanonicalField::AmphurName => "District",
            CanonicalField::ProvinceName => "Province",
            CanonicalField::PostCode => "Postal code",
            CanonicalField::BusinessFirstDate => "VAT registration approval date",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Aliases seen across service versions, highest priority first.
///
/// Plain names come first, then the `v`-prefixed names used by the array
/// service, then snake_case keys emitted by earlier proxy releases.
const STANDARD_ALIASES: [(CanonicalField, &[&str]); FIELD_COUNT] = [
    (CanonicalField::Nid, &["NID", "vNID", "nid"]),
    (CanonicalField::BranchNumber, &["BranchNumber", "vBranchNumber", "branch_number"]),
    (CanonicalField::BranchTitle, &["BranchTitle", "vBranchTitleName", "branch_title"]),
    (CanonicalField::BranchName, &["BranchName", "vBranchName", "branch_name"]),
    (CanonicalField::BuildingName, &["BuildingName", "vBuildingName", "building_name"]),
    (CanonicalField::RoomNumber, &["RoomNumber", "vRoomNumber", "room_number"]),
    (CanonicalField::FloorNumber, &["FloorNumber", "vFloorNumber", "floor_number"]),
    (
        CanonicalField::VillageName,
        &[
            "VillageName",
            "vVillageName",
            "vVillage",
            "vMubanName",
            "vMooName",
            "vVillageNo",
            "vVillageNameTh",
            "vVillageNameTH",
            "vMuban",
            "village_name",
        ],
    ),
    (CanonicalField::HouseNumber, &["HouseNumber", "vHouseNumber", "house_number"]),
    (CanonicalField::MooNumber, &["MooNumber", "vMooNumber", "moo_number"]),
    (CanonicalField::SoiName, &["SoiName", "vSoiName", "soi_name"]),
    (CanonicalField::StreetName, &["StreetName", "vStreetName", "street_name"]),
    (
        CanonicalField::ThumbolName,
        &["ThumbolName", "vThumbolName", "vThambol", "subdistrict_name"],
    ),
    (CanonicalField::AmphurName, &["AmphurName", "vAmphur", "district_name"]),
    (CanonicalField::ProvinceName, &["ProvinceName", "vProvince", "province_name"]),
    (CanonicalField::PostCode, &["PostCode", "vPostCode", "postcode"]),
    (
        CanonicalField::BusinessFirstDate,
        &["BusinessFirstDate", "vBusinessFirstDate", "business_first_date"],
    ),
];

/// Read-only mapping from each canonical field to its ordered alias list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    entries: Vec<(CanonicalField, Vec<String>)>,
}

impl AliasTable {
    /// Build a table from explicit entries.
    ///
    /// Fields without an entry never match and always resolve to the placeholder.
    pub fn new<I, A, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (CanonicalField, A)>,
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(field, aliases)| (field, aliases.into_iter().map(Into::into).collect()))
            .collect();
        Self { entries }
    }

    /// The process-wide table of known aliases.
    pub fn standard() -> &'static AliasTable {
        static TABLE: OnceLock<AliasTable> = OnceLock::new();
        TABLE.get_or_init(|| AliasTable::new(STANDARD_ALIASES.iter().map(|(f, a)| (*f, a.iter().copied()))))
    }

    /// Aliases for a field in priority order; empty when the table has none.
    pub fn aliases(&self, field: CanonicalField) -> &[String] {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, aliases)| aliases.as_slice())
            .unwrap_or(&[])
    }

    /// The canonical field a remote name maps to, if any.
    pub fn field_for(&self, name: &str) -> Option<CanonicalField> {
        self.entries
            .iter()
            .find(|(_, aliases)| aliases.iter().any(|a| a == name))
            .map(|(f, _)| *f)
    }
}
