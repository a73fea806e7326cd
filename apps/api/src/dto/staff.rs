mod conversions;
mod types;

pub use types::{
    AutoConfigureResponse, StaffRoleMatchResponse, StaffRolesRequest, StaffSuggestionsResponse,
};
