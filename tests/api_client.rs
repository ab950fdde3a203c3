//! Integration tests for the API client against a mock clinic backend

use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use clinidesk::api::{ApiClient, ApiError};
use clinidesk::config::Config;
use clinidesk::models::{Attachment, BookingRequest, LabPayload, UploadPayload, Vitals};

fn client_for(server: &MockServer) -> ApiClient {
    let config = Config {
        api_base_url: server.uri(),
        token: Some("secret-token".to_string()),
        ..Config::default()
    };
    ApiClient::new(&config).unwrap()
}

#[tokio::test]
async fn list_unwraps_result_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/bookings/booking"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": [
                { "_id": "b1", "userId": { "name": "John" }, "paid": true },
                { "_id": "b2", "userId": null }
            ]
        })))
        .mount(&server)
        .await;

    let appointments = client_for(&server).list_appointments().await.unwrap();
    assert_eq!(appointments.len(), 2);
    assert_eq!(appointments[0].id, "b1");
    assert!(appointments[1].patient.is_none());
}

#[tokio::test]
async fn list_unwraps_data_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{ "_id": "d1", "name": "Dr. Lee" }]
        })))
        .mount(&server)
        .await;

    let doctors = client_for(&server).list_doctors().await.unwrap();
    assert_eq!(doctors[0].name, "Dr. Lee");
}

#[tokio::test]
async fn list_accepts_bare_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/lab"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "_id": "l1", "name": "X-Ray", "price": 300.0 }
        ])))
        .mount(&server)
        .await;

    let labs = client_for(&server).list_labs().await.unwrap();
    assert_eq!(labs[0].price, Some(300.0));
}

#[tokio::test]
async fn detail_unwraps_result_object() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/lab/l1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": { "_id": "l1", "name": "X-Ray", "price": 300.0 }
        })))
        .mount(&server)
        .await;

    let lab = client_for(&server).get_lab("l1").await.unwrap();
    assert_eq!(lab.name, "X-Ray");
}

#[tokio::test]
async fn detail_accepts_bare_object() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/labs/testList/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "_id": "t1", "testName": "CBC", "status": "Pending"
        })))
        .mount(&server)
        .await;

    let test = client_for(&server).get_patient_test("t1").await.unwrap();
    assert_eq!(test.status.as_deref(), Some("Pending"));
}

#[tokio::test]
async fn requests_carry_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/patients"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).list_patients().await.unwrap();
}

#[tokio::test]
async fn server_error_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/labs/add"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "message": "price must be positive"
        })))
        .mount(&server)
        .await;

    let payload = LabPayload {
        name: "X-Ray".to_string(),
        price: -1.0,
        description: None,
    };
    let err = client_for(&server).add_lab(&payload).await.unwrap_err();
    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "price must be positive");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn booking_posts_camel_case_json() {
    let server = MockServer::start().await;
    let booking = BookingRequest {
        patient_name: "John".to_string(),
        patient_email: "john@example.com".to_string(),
        patient_phone: "5551234567".to_string(),
        doctor_id: "d1".to_string(),
        appointment_date: "2025-03-25".to_string(),
        appointment_time: "09:00 AM".to_string(),
    };
    Mock::given(method("POST"))
        .and(path("/api/v1/bookings/book/appointment/receptionist"))
        .and(body_json(serde_json::json!({
            "patientName": "John",
            "patientEmail": "john@example.com",
            "patientPhone": "5551234567",
            "doctorId": "d1",
            "appointmentDate": "2025-03-25",
            "appointmentTime": "09:00 AM"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": { "_id": "b9", "bookingStatus": "Confirmed" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client_for(&server).book_appointment(&booking).await.unwrap();
    assert_eq!(created.id, "b9");
}

#[tokio::test]
async fn report_upload_sends_multipart_parts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/labs/uploadReport/t1"))
        .and(body_string_contains("name=\"reportName\""))
        .and(body_string_contains("name=\"files\""))
        .and(body_string_contains("filename=\"cbc.pdf\""))
        .and(body_string_contains("report bytes"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let payload = UploadPayload {
        target_id: "t1".to_string(),
        name: "CBC Report".to_string(),
        description: Some("complete blood count".to_string()),
        files: vec![Attachment {
            file_name: "cbc.pdf".to_string(),
            bytes: b"report bytes".to_vec(),
        }],
    };
    client_for(&server).upload_report(&payload).await.unwrap();
}

#[tokio::test]
async fn vitals_post_camel_case_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/receptionist/vitelPateint/b1"))
        .and(body_json(serde_json::json!({
            "bloodPressure": "120/80",
            "temperature": "98.6",
            "pulse": "72",
            "weight": "70"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "recorded"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let vitals = Vitals {
        blood_pressure: "120/80".to_string(),
        temperature: "98.6".to_string(),
        pulse: "72".to_string(),
        weight: "70".to_string(),
    };
    client_for(&server).submit_vitals("b1", &vitals).await.unwrap();
}

#[tokio::test]
async fn cancel_hits_the_booking_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/bookings/cancel-appointment/b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "cancelled"
        })))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).cancel_appointment("b1").await.unwrap();
}

#[tokio::test]
async fn login_returns_token_and_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/users/login"))
        .and(body_json(serde_json::json!({
            "email": "desk@clinic.test",
            "password": "pw"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": "issued",
            "user": { "_id": "u1", "name": "Front Desk", "role": "receptionist" }
        })))
        .mount(&server)
        .await;

    let login = client_for(&server).login("desk@clinic.test", "pw").await.unwrap();
    assert_eq!(login.token, "issued");
    assert_eq!(login.user.unwrap().name.as_deref(), Some("Front Desk"));
}
