//! Parameter domain names and fixed status codes
//!
//! Legal code values live in the external `parameters` table; only the
//! domain names used for lookups are fixed here.

/// Valid process statuses of a collect request
pub const COLLECT_REQUEST_PROCESS_STATUS: &str = "collectRequestProcessStatus";

/// Valid waste type codes
pub const WASTE_TYPE: &str = "wasteType";

/// Valid waste packaging codes
pub const WASTE_PACKAGING_TYPE: &str = "wastePackagingType";

/// Valid process statuses of a waste
pub const WASTE_PROCESS_STATUS: &str = "wasteProcessStatus";

/// Valid physical states of a waste (gaseous, liquid, ...)
pub const WASTE_STATE: &str = "wasteState";

/// Valid store types a waste can be classified into
pub const WASTE_STORE_TYPE: &str = "wasteStoreType";

/// Status assigned to every newly stored collect request.
pub const INITIAL_COLLECT_REQUEST_STATUS: i32 = 9;
