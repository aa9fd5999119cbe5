use super::record::ledger_record;

ledger_record! {
    /// A fund bill raised against a fixed asset.
    ///
    /// Blank optional fields are left out of the encoded document; the
    /// certificate, usage and location fields are always written.
    pub struct FundBill keyed by id as "id" {
        #[serde(skip_serializing_if = "String::is_empty")]
        id => "id",
        #[serde(skip_serializing_if = "String::is_empty")]
        district => "district",
        #[serde(skip_serializing_if = "String::is_empty")]
        asset_no => "assetNo",
        #[serde(skip_serializing_if = "String::is_empty")]
        asset_name => "assetName",
        #[serde(skip_serializing_if = "String::is_empty")]
        asset_type => "assetType",
        #[serde(skip_serializing_if = "String::is_empty")]
        house_jg => "houseJg",
        build_year => "buildYear",
        #[serde(skip_serializing_if = "String::is_empty")]
        building_type => "buildingType",
        #[serde(skip_serializing_if = "String::is_empty")]
        area => "area",
        #[serde(skip_serializing_if = "String::is_empty")]
        floor_area => "floorArea",
        #[serde(skip_serializing_if = "String::is_empty")]
        rentable_area => "rentableArea",
        #[serde(skip_serializing_if = "String::is_empty")]
        unrentable_area => "unrentableArea",
        house_cert => "houseCert",
        land_cert => "landCert",
        /// Spelled `assetsUserd` on the wire.
        assets_used => "assetsUserd",
        is_mortgage => "is_mortage",
        #[serde(skip_serializing_if = "String::is_empty")]
        account => "account",
        location_detail => "locationDetail",
        longitude => "longitude",
        latitude => "latitude",
        #[serde(skip_serializing_if = "String::is_empty")]
        remark => "remark",
    }
}
