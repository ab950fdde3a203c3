//! Endpoint paths for the clinic REST backend

pub struct Endpoints;

impl Endpoints {
    pub const LOGIN: &'static str = "/api/v1/users/login";
    pub const PROFILE: &'static str = "/api/v1/users/profile";

    pub const APPOINTMENTS: &'static str = "/api/v1/bookings/booking";
    pub const BOOK_APPOINTMENT: &'static str = "/api/v1/bookings/book/appointment/receptionist";
    pub const CANCEL_APPOINTMENT: &'static str = "/api/v1/bookings/cancel-appointment";
    // backend spells it this way
    pub const SUBMIT_VITALS: &'static str = "/api/v1/receptionist/vitelPateint";

    pub const DOCTORS: &'static str = "/api/v1/doctors";
    pub const PATIENTS: &'static str = "/api/v1/patients";

    pub const LABS: &'static str = "/api/v1/users/lab";
    pub const ADD_LAB: &'static str = "/api/v1/labs/add";
    pub const UPDATE_LAB: &'static str = "/api/v1/labs/update";
    pub const TESTS: &'static str = "/api/v1/labs/testList";
    pub const UPLOAD_REPORT: &'static str = "/api/v1/labs/uploadReport";
}
