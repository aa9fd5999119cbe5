use super::record::ledger_record;

ledger_record! {
    /// A fixed asset (building or plot) registered on the ledger.
    pub struct Asset keyed by id as "id" {
        id => "id",
        location => "location",
        asset_no => "assetNo",
        asset_name => "assetName",
        asset_type => "assetType",
        /// Building structure.
        house_jg => "houseJg",
        build_year => "buildYear",
        building_type => "buildingType",
        area => "area",
        floor_area => "floorArea",
        rentable_area => "rentableArea",
        unrentable_area => "unrentableArea",
        house_cert => "houseCert",
        land_cert => "landCert",
        assets_usage => "assetsUsage",
        is_mortgage => "isMortgage",
        /// On-book or held in custody.
        account => "account",
        location_detail => "locationDetail",
        longitude => "longitude",
        latitude => "latitude",
        remark => "remark",
    }
}
